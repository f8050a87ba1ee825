use crate::platform::Backend;

/// Passed to [`FrameHooks::before_encode`] while the clear pass is open.
///
/// Draw commands recorded into `pass` land after the clear.
pub struct EncodeEvent<'a, B: Backend> {
    /// Index of the frame being recorded (pre-increment).
    pub frame: u64,
    pub timestamp: f64,
    pub device: &'a B::Device,
    pub context: &'a B::Context,
    pub canvas: &'a B::Canvas,
    pub pass: &'a mut B::Pass,
}

/// Passed to [`FrameHooks::after_submit`] once the frame has been submitted.
pub struct SubmitEvent<'a, B: Backend> {
    /// Index after the increment, i.e. the number of frames rendered so far.
    pub frame: u64,
    pub timestamp: f64,
    pub device: &'a B::Device,
    pub context: &'a B::Context,
    pub canvas: &'a B::Canvas,
}

/// Per-frame extension points, invoked synchronously during `render_once`.
///
/// Hooks may call any renderer method. Frames never nest: `render_once` (and
/// `start` without a scheduler) fails with `FrameInProgress`, and `resize`
/// takes effect once the current frame ends.
pub trait FrameHooks<B: Backend> {
    fn before_encode(&mut self, event: EncodeEvent<'_, B>) {
        let _ = event;
    }

    fn after_submit(&mut self, event: SubmitEvent<'_, B>) {
        let _ = event;
    }
}

/// Hooks that do nothing.
#[derive(Debug, Copy, Clone, Default)]
pub struct NoHooks;

impl<B: Backend> FrameHooks<B> for NoHooks {}

type BeforeEncodeFn<B> = Box<dyn FnMut(EncodeEvent<'_, B>)>;
type AfterSubmitFn<B> = Box<dyn FnMut(SubmitEvent<'_, B>)>;

/// Closure-backed [`FrameHooks`].
pub struct FnHooks<B: Backend> {
    before_encode: Option<BeforeEncodeFn<B>>,
    after_submit: Option<AfterSubmitFn<B>>,
}

impl<B: Backend> Default for FnHooks<B> {
    fn default() -> Self {
        Self {
            before_encode: None,
            after_submit: None,
        }
    }
}

impl<B: Backend> FnHooks<B> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_before_encode(mut self, f: impl FnMut(EncodeEvent<'_, B>) + 'static) -> Self {
        self.before_encode = Some(Box::new(f));
        self
    }

    pub fn on_after_submit(mut self, f: impl FnMut(SubmitEvent<'_, B>) + 'static) -> Self {
        self.after_submit = Some(Box::new(f));
        self
    }
}

impl<B: Backend> FrameHooks<B> for FnHooks<B> {
    fn before_encode(&mut self, event: EncodeEvent<'_, B>) {
        if let Some(f) = self.before_encode.as_mut() {
            f(event);
        }
    }

    fn after_submit(&mut self, event: SubmitEvent<'_, B>) {
        if let Some(f) = self.after_submit.as_mut() {
            f(event);
        }
    }
}
