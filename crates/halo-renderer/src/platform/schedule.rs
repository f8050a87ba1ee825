/// Opaque identity of a pending scheduled callback.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct FrameHandle(pub u64);

/// Callback fired once, on the next display refresh, with a timestamp in ms.
pub type FrameCallback = Box<dyn FnOnce(f64)>;

/// Host animation-frame primitive.
///
/// Callbacks must be invoked from the host loop, never from inside
/// [`schedule`](FrameScheduler::schedule) itself.
pub trait FrameScheduler {
    fn schedule(&mut self, callback: FrameCallback) -> FrameHandle;

    /// Cancels a pending callback. Returns `false` when the handle was not
    /// pending or the scheduler cannot cancel.
    fn cancel(&mut self, handle: FrameHandle) -> bool {
        let _ = handle;
        false
    }
}
