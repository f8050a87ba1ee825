use std::fmt;
use std::rc::Rc;

/// Snapshot published by a session source.
pub struct SessionState<S> {
    pub active_session: Option<Rc<S>>,
}

impl<S> SessionState<S> {
    pub fn new(active_session: Option<Rc<S>>) -> Self {
        Self { active_session }
    }

    pub fn inactive() -> Self {
        Self { active_session: None }
    }
}

// Manual impls: cloning shares the session, so `S` needs no bounds.
impl<S> Clone for SessionState<S> {
    fn clone(&self) -> Self {
        Self {
            active_session: self.active_session.clone(),
        }
    }
}

impl<S> Default for SessionState<S> {
    fn default() -> Self {
        Self::inactive()
    }
}

impl<S> fmt::Debug for SessionState<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionState")
            .field("active", &self.active_session.is_some())
            .finish()
    }
}

pub type SessionListener<S> = Box<dyn FnMut(&SessionState<S>)>;

/// Removes a listener from its source.
pub type Unsubscribe = Box<dyn FnOnce()>;

/// External publisher of immersive-session state.
///
/// The binding only subscribes and reads; it never mutates the source.
pub trait SessionSource<S> {
    /// Registers `listener`. `None` means the source cannot be subscribed to.
    fn subscribe(&self, listener: SessionListener<S>) -> Option<Unsubscribe>;

    /// Direct state accessor.
    fn state(&self) -> Option<SessionState<S>> {
        None
    }

    /// Snapshot through a nested store, consulted when [`state`](Self::state)
    /// is unavailable.
    fn store_snapshot(&self) -> Option<SessionState<S>> {
        None
    }

    /// Current snapshot: direct accessor, else store snapshot, else none.
    fn current(&self) -> Option<SessionState<S>> {
        self.state().or_else(|| self.store_snapshot())
    }
}
