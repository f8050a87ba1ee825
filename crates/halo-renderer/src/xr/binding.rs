use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use log::{debug, warn};

use super::source::{SessionSource, SessionState, Unsubscribe};
use crate::error::{RendererError, Result};

/// Receiver of XR activity changes.
pub trait XrTarget {
    fn set_xr_active(&self, active: bool);
}

impl<T: XrTarget + ?Sized> XrTarget for Rc<T> {
    fn set_xr_active(&self, active: bool) {
        (**self).set_xr_active(active);
    }
}

type StartCallback<S, R> = Box<dyn FnMut(&Rc<S>, &R)>;
type EndCallback<R> = Box<dyn FnMut(&R)>;

/// Optional session lifecycle callbacks.
pub struct XrCallbacks<S, R> {
    on_session_start: Option<StartCallback<S, R>>,
    on_session_end: Option<EndCallback<R>>,
}

impl<S, R> Default for XrCallbacks<S, R> {
    fn default() -> Self {
        Self {
            on_session_start: None,
            on_session_end: None,
        }
    }
}

impl<S, R> XrCallbacks<S, R> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Called when a session becomes active after none was.
    pub fn on_start(mut self, f: impl FnMut(&Rc<S>, &R) + 'static) -> Self {
        self.on_session_start = Some(Box::new(f));
        self
    }

    /// Called when the active session goes away.
    pub fn on_end(mut self, f: impl FnMut(&R) + 'static) -> Self {
        self.on_session_end = Some(Box::new(f));
        self
    }
}

/// Live subscription created by [`bind_to_session_source`].
///
/// Detaching consumes the binding, so a subscription is released at most once.
/// Dropping it without detaching leaves the listener registered.
#[must_use = "dropping an XrBinding without detach() leaves the subscription active"]
pub struct XrBinding {
    unsubscribe: Unsubscribe,
}

impl XrBinding {
    pub fn detach(self) {
        debug!("detaching XR session binding");
        (self.unsubscribe)();
    }
}

impl fmt::Debug for XrBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("XrBinding").finish_non_exhaustive()
    }
}

struct SessionTracker<S, R> {
    previous: Option<Rc<S>>,
    target: R,
    callbacks: XrCallbacks<S, R>,
}

impl<S, R: XrTarget> SessionTracker<S, R> {
    fn apply(&mut self, state: Option<&SessionState<S>>) {
        let session = state.and_then(|s| s.active_session.clone());

        let unchanged = match (&self.previous, &session) {
            (None, None) => true,
            (Some(a), Some(b)) => Rc::ptr_eq(a, b),
            _ => false,
        };
        if unchanged {
            return;
        }

        let was_active = self.previous.is_some();
        self.previous = session.clone();
        self.target.set_xr_active(session.is_some());

        // Edges fire on presence changes only; a switch between two distinct
        // sessions updates the tracked identity without a callback.
        match (was_active, session) {
            (false, Some(session)) => {
                debug!("XR session started");
                if let Some(on_start) = self.callbacks.on_session_start.as_mut() {
                    on_start(&session, &self.target);
                }
            }
            (true, None) => {
                debug!("XR session ended");
                if let Some(on_end) = self.callbacks.on_session_end.as_mut() {
                    on_end(&self.target);
                }
            }
            _ => {}
        }
    }
}

fn deliver<S, R: XrTarget>(
    tracker: &RefCell<SessionTracker<S, R>>,
    state: Option<&SessionState<S>>,
) {
    match tracker.try_borrow_mut() {
        Ok(mut tracker) => tracker.apply(state),
        Err(_) => warn!("XR session update delivered from inside a session callback; ignored"),
    }
}

/// Keeps `target`'s XR-active flag in sync with `source`.
///
/// The source's current snapshot is applied immediately, so the flag is
/// correct even if no change is ever published.
pub fn bind_to_session_source<S, R, Src>(
    target: R,
    source: &Src,
    callbacks: XrCallbacks<S, R>,
) -> Result<XrBinding>
where
    S: 'static,
    R: XrTarget + 'static,
    Src: SessionSource<S> + ?Sized,
{
    let tracker = Rc::new(RefCell::new(SessionTracker {
        previous: None,
        target,
        callbacks,
    }));

    let listener = Rc::clone(&tracker);
    let unsubscribe = source
        .subscribe(Box::new(move |state| deliver(&listener, Some(state))))
        .ok_or(RendererError::InvalidSessionSource)?;

    deliver(&tracker, source.current().as_ref());

    Ok(XrBinding { unsubscribe })
}
