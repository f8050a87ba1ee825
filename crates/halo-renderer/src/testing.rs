//! In-memory collaborators for unit tests.
//!
//! Every fake records what it was asked to do through shared `Rc<RefCell<..>>`
//! state, so a test can keep a clone and inspect it after the renderer has
//! taken ownership of its own handle.

use std::cell::{Cell, Ref, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use crate::config::{AlphaMode, PowerPreference, SURFACE_CONTEXT_KIND};
use crate::paint::ClearColor;
use crate::platform::{
    Backend, CanvasTarget, ConfigureError, Document, FrameCallback, FrameEncoder, FrameHandle,
    FrameScheduler, GpuAdapter, GpuDevice, GpuRuntime, SurfaceConfig, SurfaceContext,
    SurfaceTexture,
};
use crate::time::Clock;
use crate::xr::{SessionListener, SessionSource, SessionState, Unsubscribe};

pub(crate) struct FakeBackend;

impl Backend for FakeBackend {
    type Runtime = FakeRuntime;
    type Adapter = FakeAdapter;
    type Device = FakeDevice;
    type Encoder = FakeEncoder;
    type Pass = FakePass;
    type CommandBuffer = FakeCommandBuffer;
    type View = FakeView;
    type Texture = FakeTexture;
    type Context = FakeContext;
    type Canvas = FakeCanvas;
    type Document = FakeDocument;
}

// ── runtime / adapter ─────────────────────────────────────────────────────

pub(crate) struct FakeRuntime {
    adapter: Option<FakeAdapter>,
    preferred: Option<String>,
    requested: Rc<RefCell<Vec<PowerPreference>>>,
}

impl FakeRuntime {
    pub fn with_device(device: FakeDevice) -> Self {
        Self::with_adapter(FakeAdapter { device: Some(device) })
    }

    pub fn with_adapter(adapter: FakeAdapter) -> Self {
        Self {
            adapter: Some(adapter),
            preferred: None,
            requested: Rc::default(),
        }
    }

    pub fn without_adapter() -> Self {
        Self {
            adapter: None,
            preferred: None,
            requested: Rc::default(),
        }
    }

    pub fn preferred_format(mut self, format: &str) -> Self {
        self.preferred = Some(format.to_string());
        self
    }

    pub fn requested_preferences(&self) -> Rc<RefCell<Vec<PowerPreference>>> {
        Rc::clone(&self.requested)
    }
}

impl GpuRuntime for FakeRuntime {
    type Adapter = FakeAdapter;

    async fn request_adapter(&self, power_preference: PowerPreference) -> Option<FakeAdapter> {
        self.requested.borrow_mut().push(power_preference);
        self.adapter.clone()
    }

    fn preferred_format(&self) -> Option<String> {
        self.preferred.clone()
    }
}

#[derive(Clone)]
pub(crate) struct FakeAdapter {
    device: Option<FakeDevice>,
}

impl FakeAdapter {
    pub fn failing() -> Self {
        Self { device: None }
    }
}

impl GpuAdapter for FakeAdapter {
    type Device = FakeDevice;

    async fn request_device(&self) -> anyhow::Result<FakeDevice> {
        self.device
            .clone()
            .ok_or_else(|| anyhow::anyhow!("device request rejected"))
    }
}

// ── device / encoder ──────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub(crate) struct DeviceLog {
    pub encoder_labels: Vec<String>,
    pub clears: Vec<ClearColor>,
    pub passes_ended: usize,
    pub draws: Vec<String>,
    pub submissions: usize,
}

#[derive(Clone, Default)]
pub(crate) struct FakeDevice {
    log: Rc<RefCell<DeviceLog>>,
}

impl FakeDevice {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn log(&self) -> Ref<'_, DeviceLog> {
        self.log.borrow()
    }

    pub fn submissions(&self) -> usize {
        self.log.borrow().submissions
    }

    pub fn encoders(&self) -> usize {
        self.log.borrow().encoder_labels.len()
    }
}

impl GpuDevice for FakeDevice {
    type Encoder = FakeEncoder;
    type CommandBuffer = FakeCommandBuffer;

    fn create_command_encoder(&self, label: &str) -> FakeEncoder {
        self.log.borrow_mut().encoder_labels.push(label.to_string());
        FakeEncoder {
            log: Rc::clone(&self.log),
        }
    }

    fn submit(&self, _buffer: FakeCommandBuffer) {
        self.log.borrow_mut().submissions += 1;
    }
}

pub(crate) struct FakeEncoder {
    log: Rc<RefCell<DeviceLog>>,
}

#[derive(Debug, Default)]
pub(crate) struct FakePass {
    draws: Vec<String>,
}

impl FakePass {
    pub fn draw(&mut self, name: &str) {
        self.draws.push(name.to_string());
    }
}

pub(crate) struct FakeCommandBuffer;

pub(crate) struct FakeView;

impl FrameEncoder for FakeEncoder {
    type View = FakeView;
    type Pass = FakePass;
    type CommandBuffer = FakeCommandBuffer;

    fn begin_clear_pass(&mut self, _view: &FakeView, color: ClearColor) -> FakePass {
        self.log.borrow_mut().clears.push(color);
        FakePass::default()
    }

    fn end_pass(&mut self, pass: FakePass) {
        let mut log = self.log.borrow_mut();
        log.passes_ended += 1;
        log.draws.extend(pass.draws);
    }

    fn finish(self) -> FakeCommandBuffer {
        FakeCommandBuffer
    }
}

// ── context / texture ─────────────────────────────────────────────────────

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub(crate) enum TextureMode {
    Valid,
    /// A texture that cannot create views.
    NoView,
    /// No current texture at all.
    Missing,
}

#[derive(Debug)]
pub(crate) struct ContextState {
    pub supports_configure: bool,
    pub supports_unconfigure: bool,
    pub configured: Option<(String, AlphaMode)>,
    pub texture: TextureMode,
    pub unconfigured: usize,
    pub presented: usize,
}

#[derive(Clone)]
pub(crate) struct FakeContext {
    state: Rc<RefCell<ContextState>>,
}

impl FakeContext {
    pub fn new() -> Self {
        Self {
            state: Rc::new(RefCell::new(ContextState {
                supports_configure: true,
                supports_unconfigure: true,
                configured: None,
                texture: TextureMode::Valid,
                unconfigured: 0,
                presented: 0,
            })),
        }
    }

    pub fn without_configure() -> Self {
        let context = Self::new();
        context.state.borrow_mut().supports_configure = false;
        context
    }

    pub fn with_texture(texture: TextureMode) -> Self {
        let context = Self::new();
        context.state.borrow_mut().texture = texture;
        context
    }

    pub fn state(&self) -> Ref<'_, ContextState> {
        self.state.borrow()
    }

    pub fn set_texture(&self, texture: TextureMode) {
        self.state.borrow_mut().texture = texture;
    }
}

impl SurfaceContext for FakeContext {
    type Device = FakeDevice;
    type Texture = FakeTexture;

    fn configure(
        &mut self,
        _device: &FakeDevice,
        config: &SurfaceConfig<'_>,
    ) -> Result<(), ConfigureError> {
        let mut state = self.state.borrow_mut();
        if !state.supports_configure {
            return Err(ConfigureError::Unsupported);
        }
        state.configured = Some((config.format.to_string(), config.alpha_mode));
        Ok(())
    }

    fn current_texture(&mut self) -> Option<FakeTexture> {
        let mode = self.state.borrow().texture;
        match mode {
            TextureMode::Missing => None,
            TextureMode::Valid | TextureMode::NoView => Some(FakeTexture {
                has_view: mode == TextureMode::Valid,
                state: Rc::clone(&self.state),
            }),
        }
    }

    fn unconfigure(&mut self) -> bool {
        let mut state = self.state.borrow_mut();
        if !state.supports_unconfigure {
            return false;
        }
        state.configured = None;
        state.unconfigured += 1;
        true
    }
}

pub(crate) struct FakeTexture {
    has_view: bool,
    state: Rc<RefCell<ContextState>>,
}

impl SurfaceTexture for FakeTexture {
    type View = FakeView;

    fn create_view(&self) -> Option<FakeView> {
        self.has_view.then_some(FakeView)
    }

    fn present(self) {
        self.state.borrow_mut().presented += 1;
    }
}

// ── canvas / document ─────────────────────────────────────────────────────

#[derive(Debug)]
struct CanvasState {
    width: u32,
    height: u32,
    display: Option<(u32, u32)>,
    has_style: bool,
    pixel_ratio: Option<f64>,
    requested_kinds: Vec<String>,
}

#[derive(Clone)]
pub(crate) struct FakeCanvas {
    state: Rc<RefCell<CanvasState>>,
    context: Option<FakeContext>,
}

impl FakeCanvas {
    pub fn new() -> Self {
        Self::with_context(FakeContext::new())
    }

    pub fn with_context(context: FakeContext) -> Self {
        Self {
            state: Rc::new(RefCell::new(CanvasState {
                width: 0,
                height: 0,
                display: None,
                has_style: true,
                pixel_ratio: None,
                requested_kinds: Vec::new(),
            })),
            context: Some(context),
        }
    }

    pub fn without_context() -> Self {
        let mut canvas = Self::new();
        canvas.context = None;
        canvas
    }

    pub fn without_style(self) -> Self {
        self.state.borrow_mut().has_style = false;
        self
    }

    pub fn pixel_ratio(self, ratio: f64) -> Self {
        self.state.borrow_mut().pixel_ratio = Some(ratio);
        self
    }

    pub fn same_as(&self, other: &FakeCanvas) -> bool {
        Rc::ptr_eq(&self.state, &other.state)
    }

    pub fn size(&self) -> (u32, u32) {
        let state = self.state.borrow();
        (state.width, state.height)
    }

    pub fn display_size(&self) -> Option<(u32, u32)> {
        self.state.borrow().display
    }

    pub fn requested_kinds(&self) -> Vec<String> {
        self.state.borrow().requested_kinds.clone()
    }

    /// State of the context this canvas hands out.
    pub fn context_state(&self) -> Ref<'_, ContextState> {
        match &self.context {
            Some(context) => context.state(),
            None => panic!("canvas has no context"),
        }
    }

    pub fn fake_context(&self) -> FakeContext {
        match &self.context {
            Some(context) => context.clone(),
            None => panic!("canvas has no context"),
        }
    }
}

impl CanvasTarget for FakeCanvas {
    type Context = FakeContext;

    fn width(&self) -> u32 {
        self.state.borrow().width
    }

    fn height(&self) -> u32 {
        self.state.borrow().height
    }

    fn set_size(&mut self, width: u32, height: u32) {
        let mut state = self.state.borrow_mut();
        state.width = width;
        state.height = height;
    }

    fn set_display_size(&mut self, width: u32, height: u32) -> bool {
        let mut state = self.state.borrow_mut();
        if !state.has_style {
            return false;
        }
        state.display = Some((width, height));
        true
    }

    fn device_pixel_ratio(&self) -> Option<f64> {
        self.state.borrow().pixel_ratio
    }

    fn context(&mut self, kind: &str) -> Option<FakeContext> {
        self.state.borrow_mut().requested_kinds.push(kind.to_string());
        if kind == SURFACE_CONTEXT_KIND {
            self.context.clone()
        } else {
            None
        }
    }
}

#[derive(Default)]
pub(crate) struct FakeDocument {
    canvases: HashMap<String, FakeCanvas>,
    queries: Rc<RefCell<Vec<String>>>,
}

impl FakeDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, selector: &str, canvas: FakeCanvas) -> Self {
        self.canvases.insert(selector.to_string(), canvas);
        self
    }

    pub fn queries(&self) -> Rc<RefCell<Vec<String>>> {
        Rc::clone(&self.queries)
    }
}

impl Document for FakeDocument {
    type Canvas = FakeCanvas;

    fn query_selector(&self, selector: &str) -> Option<FakeCanvas> {
        self.queries.borrow_mut().push(selector.to_string());
        self.canvases.get(selector).cloned()
    }
}

// ── scheduling / time ─────────────────────────────────────────────────────

#[derive(Default)]
struct SchedulerState {
    captured: Option<FrameCallback>,
    scheduled: usize,
    cancelled: Vec<FrameHandle>,
}

/// Captures the most recent callback and always hands out the same handle.
#[derive(Clone)]
pub(crate) struct FakeScheduler {
    state: Rc<RefCell<SchedulerState>>,
    handle: FrameHandle,
    can_cancel: bool,
}

impl FakeScheduler {
    pub fn returning(handle: u64) -> Self {
        Self {
            state: Rc::default(),
            handle: FrameHandle(handle),
            can_cancel: true,
        }
    }

    pub fn without_cancel(mut self) -> Self {
        self.can_cancel = false;
        self
    }

    pub fn has_pending(&self) -> bool {
        self.state.borrow().captured.is_some()
    }

    /// Takes the captured callback, if any.
    pub fn take(&self) -> Option<FrameCallback> {
        self.state.borrow_mut().captured.take()
    }

    /// Fires the captured callback. Returns `false` when nothing was pending.
    pub fn fire(&self, timestamp: f64) -> bool {
        // Released before invoking: the callback reschedules into this state.
        let callback = self.take();
        match callback {
            Some(callback) => {
                callback(timestamp);
                true
            }
            None => false,
        }
    }

    pub fn scheduled(&self) -> usize {
        self.state.borrow().scheduled
    }

    pub fn cancelled(&self) -> Vec<FrameHandle> {
        self.state.borrow().cancelled.clone()
    }
}

impl FrameScheduler for FakeScheduler {
    fn schedule(&mut self, callback: FrameCallback) -> FrameHandle {
        let mut state = self.state.borrow_mut();
        state.captured = Some(callback);
        state.scheduled += 1;
        self.handle
    }

    fn cancel(&mut self, handle: FrameHandle) -> bool {
        if !self.can_cancel {
            return false;
        }
        let mut state = self.state.borrow_mut();
        state.cancelled.push(handle);
        state.captured = None;
        true
    }
}

#[derive(Clone, Default)]
pub(crate) struct FakeClock {
    now: Rc<Cell<f64>>,
}

impl FakeClock {
    pub fn at(now: f64) -> Self {
        let clock = Self::default();
        clock.set(now);
        clock
    }

    pub fn set(&self, now: f64) {
        self.now.set(now);
    }
}

impl Clock for FakeClock {
    fn now_ms(&self) -> f64 {
        self.now.get()
    }
}

// ── XR session sources ────────────────────────────────────────────────────

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub(crate) enum SnapshotAccess {
    Direct,
    Store,
    Unavailable,
}

pub(crate) struct FakeSession {
    pub id: &'static str,
}

pub(crate) fn session(id: &'static str) -> Rc<FakeSession> {
    Rc::new(FakeSession { id })
}

/// Observable session store with configurable snapshot accessors.
pub(crate) struct FakeSessionSource {
    state: RefCell<SessionState<FakeSession>>,
    listeners: Rc<RefCell<Vec<(u64, SessionListener<FakeSession>)>>>,
    next_id: Cell<u64>,
    subscribed: Cell<usize>,
    unsubscribed: Rc<Cell<usize>>,
    access: SnapshotAccess,
    subscribable: bool,
}

impl FakeSessionSource {
    pub fn new(access: SnapshotAccess) -> Self {
        Self {
            state: RefCell::new(SessionState::default()),
            listeners: Rc::default(),
            next_id: Cell::new(0),
            subscribed: Cell::new(0),
            unsubscribed: Rc::default(),
            access,
            subscribable: true,
        }
    }

    pub fn unsubscribable() -> Self {
        let mut source = Self::new(SnapshotAccess::Direct);
        source.subscribable = false;
        source
    }

    /// Sets the state without notifying listeners.
    pub fn set(&self, active: Option<Rc<FakeSession>>) {
        *self.state.borrow_mut() = SessionState::new(active);
    }

    /// Sets the state and notifies every listener.
    pub fn publish(&self, active: Option<Rc<FakeSession>>) {
        self.set(active);
        let state = self.state.borrow().clone();
        let mut listeners = std::mem::take(&mut *self.listeners.borrow_mut());
        for (_, listener) in listeners.iter_mut() {
            listener(&state);
        }
        let mut current = self.listeners.borrow_mut();
        listeners.extend(current.drain(..));
        *current = listeners;
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    pub fn subscribed(&self) -> usize {
        self.subscribed.get()
    }

    pub fn unsubscribed(&self) -> usize {
        self.unsubscribed.get()
    }
}

impl SessionSource<FakeSession> for FakeSessionSource {
    fn subscribe(&self, listener: SessionListener<FakeSession>) -> Option<Unsubscribe> {
        if !self.subscribable {
            return None;
        }
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.subscribed.set(self.subscribed.get() + 1);
        self.listeners.borrow_mut().push((id, listener));

        let listeners = Rc::clone(&self.listeners);
        let unsubscribed = Rc::clone(&self.unsubscribed);
        Some(Box::new(move || {
            listeners.borrow_mut().retain(|(other, _)| *other != id);
            unsubscribed.set(unsubscribed.get() + 1);
        }))
    }

    fn state(&self) -> Option<SessionState<FakeSession>> {
        (self.access == SnapshotAccess::Direct).then(|| self.state.borrow().clone())
    }

    fn store_snapshot(&self) -> Option<SessionState<FakeSession>> {
        (self.access == SnapshotAccess::Store).then(|| self.state.borrow().clone())
    }
}
