use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::platform::{FrameCallback, FrameHandle, FrameScheduler};

/// Animation-frame queue for native event loops.
///
/// Renderers schedule into the queue; the host drains it once per display
/// refresh with [`run_frame`](Self::run_frame) (for winit, on
/// `WindowEvent::RedrawRequested`). The optional waker runs whenever a callback
/// is queued, typically `Window::request_redraw`.
///
/// Clones share the same queue.
#[derive(Clone, Default)]
pub struct FrameQueue {
    inner: Rc<RefCell<QueueInner>>,
}

#[derive(Default)]
struct QueueInner {
    next_handle: u64,
    pending: Vec<(FrameHandle, FrameCallback)>,
    waker: Option<Rc<dyn Fn()>>,
}

impl FrameQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_waker(waker: impl Fn() + 'static) -> Self {
        let queue = Self::new();
        queue.inner.borrow_mut().waker = Some(Rc::new(waker));
        queue
    }

    /// Number of callbacks waiting for the next frame.
    pub fn pending(&self) -> usize {
        self.inner.borrow().pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending() == 0
    }

    /// Fires every callback queued before this call with `timestamp`.
    ///
    /// Callbacks scheduled while the batch runs wait for the next frame.
    /// Returns the number of callbacks fired.
    pub fn run_frame(&self, timestamp: f64) -> usize {
        let batch = std::mem::take(&mut self.inner.borrow_mut().pending);
        let fired = batch.len();
        for (_, callback) in batch {
            callback(timestamp);
        }
        fired
    }
}

impl FrameScheduler for FrameQueue {
    fn schedule(&mut self, callback: FrameCallback) -> FrameHandle {
        let (handle, waker) = {
            let mut inner = self.inner.borrow_mut();
            inner.next_handle += 1;
            let handle = FrameHandle(inner.next_handle);
            inner.pending.push((handle, callback));
            (handle, inner.waker.clone())
        };
        if let Some(wake) = waker {
            wake();
        }
        handle
    }

    fn cancel(&mut self, handle: FrameHandle) -> bool {
        let mut inner = self.inner.borrow_mut();
        let before = inner.pending.len();
        inner.pending.retain(|(h, _)| *h != handle);
        inner.pending.len() != before
    }
}

impl fmt::Debug for FrameQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameQueue")
            .field("pending", &self.pending())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn recorder() -> (Rc<RefCell<Vec<(u32, f64)>>>, impl Fn(u32) -> FrameCallback) {
        let log: Rc<RefCell<Vec<(u32, f64)>>> = Rc::default();
        let sink = Rc::clone(&log);
        let make = move |id: u32| -> FrameCallback {
            let sink = Rc::clone(&sink);
            Box::new(move |ts| sink.borrow_mut().push((id, ts)))
        };
        (log, make)
    }

    #[test]
    fn run_frame_fires_in_schedule_order() {
        let (log, make) = recorder();
        let mut queue = FrameQueue::new();
        queue.schedule(make(1));
        queue.schedule(make(2));

        assert_eq!(queue.run_frame(16.0), 2);
        assert_eq!(*log.borrow(), vec![(1, 16.0), (2, 16.0)]);
        assert!(queue.is_empty());
    }

    #[test]
    fn handles_are_unique() {
        let (_, make) = recorder();
        let mut queue = FrameQueue::new();
        let a = queue.schedule(make(1));
        let b = queue.schedule(make(2));
        assert_ne!(a, b);
    }

    #[test]
    fn cancel_removes_only_that_callback() {
        let (log, make) = recorder();
        let mut queue = FrameQueue::new();
        let first = queue.schedule(make(1));
        queue.schedule(make(2));

        assert!(queue.cancel(first));
        assert!(!queue.cancel(first));
        queue.run_frame(1.0);
        assert_eq!(*log.borrow(), vec![(2, 1.0)]);
    }

    #[test]
    fn callbacks_queued_during_a_frame_wait_for_the_next() {
        let queue = FrameQueue::new();
        let fired = Rc::new(Cell::new(0));

        let mut scheduler = queue.clone();
        let inner_fired = Rc::clone(&fired);
        let reschedule = queue.clone();
        scheduler.schedule(Box::new(move |_| {
            inner_fired.set(inner_fired.get() + 1);
            let again = Rc::clone(&inner_fired);
            let mut reschedule = reschedule;
            reschedule.schedule(Box::new(move |_| again.set(again.get() + 1)));
        }));

        assert_eq!(queue.run_frame(0.0), 1);
        assert_eq!(fired.get(), 1);
        assert_eq!(queue.pending(), 1);
        assert_eq!(queue.run_frame(16.0), 1);
        assert_eq!(fired.get(), 2);
    }

    #[test]
    fn waker_runs_on_schedule() {
        let woken = Rc::new(Cell::new(0));
        let counter = Rc::clone(&woken);
        let mut queue = FrameQueue::with_waker(move || counter.set(counter.get() + 1));
        queue.schedule(Box::new(|_| {}));
        queue.schedule(Box::new(|_| {}));
        assert_eq!(woken.get(), 2);
    }
}
