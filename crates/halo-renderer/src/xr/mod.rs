//! XR session binding.
//!
//! Translates an external "active session" stream into at most one
//! activation/deactivation edge per distinct session. Sessions are compared by
//! `Rc` identity, never by value.

mod binding;
mod source;

pub use binding::{bind_to_session_source, XrBinding, XrCallbacks, XrTarget};
pub use source::{SessionListener, SessionSource, SessionState, Unsubscribe};
