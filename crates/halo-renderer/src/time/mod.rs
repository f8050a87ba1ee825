//! Time subsystem.
//!
//! - [`Clock`]: high-resolution timestamps for frames rendered without an
//!   explicit timestamp
//! - [`FrameQueue`]: animation-frame scheduler driven by a host event loop

mod clock;
mod frame_queue;

pub use clock::{Clock, MonotonicClock};
pub use frame_queue::FrameQueue;
