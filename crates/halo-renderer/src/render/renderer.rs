use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use log::{debug, error, info, trace, warn};

use super::hooks::{EncodeEvent, FrameHooks, SubmitEvent};
use super::state::{Lifecycle, RenderState, Stopped};
use crate::error::{RendererError, Result};
use crate::paint::{normalize, ClearColor, ColorInput};
use crate::platform::{
    Backend, CanvasTarget, FrameEncoder, FrameHandle, FrameScheduler, GpuDevice, SurfaceContext,
    SurfaceTexture,
};
use crate::surface::DrawableSurface;
use crate::time::Clock;
use crate::xr::{bind_to_session_source, SessionSource, XrBinding, XrCallbacks, XrTarget};

/// Result of one rendered frame.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FrameInfo {
    /// Frames rendered so far, including this one.
    pub frame: u64,
    pub timestamp: f64,
}

/// Backing buffer size in physical pixels.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct PixelSize {
    pub width: u32,
    pub height: u32,
}

/// Read-only view of renderer state.
#[derive(Debug, Clone, PartialEq)]
pub struct RendererSnapshot {
    pub running: bool,
    pub frame: u64,
    pub last_timestamp: f64,
    pub format: String,
    pub width: u32,
    pub height: u32,
    pub xr_active: bool,
}

/// Backing and display sizes computed by `resize`.
#[derive(Debug, Copy, Clone, PartialEq)]
struct ResizeRequest {
    backing: PixelSize,
    display: PixelSize,
}

impl ResizeRequest {
    fn apply<C: CanvasTarget>(self, canvas: &mut C) {
        canvas.set_size(self.backing.width, self.backing.height);
        canvas.set_display_size(self.display.width, self.display.height);
    }
}

pub(crate) struct RendererParts<B: Backend> {
    pub clear_color: ClearColor,
    pub scheduler: Option<Box<dyn FrameScheduler>>,
    pub clock: Box<dyn Clock>,
    pub hooks: Box<dyn FrameHooks<B>>,
}

// Separate cells so hooks (which run while `surface` is borrowed) can still
// drive `state`.
struct Shared<B: Backend> {
    surface: RefCell<DrawableSurface<B>>,
    state: RefCell<RenderState>,
    hooks: RefCell<Box<dyn FrameHooks<B>>>,
    scheduler: RefCell<Option<Box<dyn FrameScheduler>>>,
    xr_binding: RefCell<Option<XrBinding>>,
    /// Resize requested by a hook, applied when the frame ends.
    deferred_resize: Cell<Option<ResizeRequest>>,
    clock: Box<dyn Clock>,
}

impl<B: Backend> Drop for Shared<B> {
    fn drop(&mut self) {
        if let Some(binding) = self.xr_binding.get_mut().take() {
            binding.detach();
        }
    }
}

/// Frame renderer bound to one drawable surface.
///
/// A cheap, clonable handle; clones drive the same renderer. Single-threaded:
/// scheduled callbacks and session notifications must arrive on the thread
/// that owns the renderer.
pub struct Renderer<B: Backend> {
    shared: Rc<Shared<B>>,
}

/// Non-owning renderer handle, used by scheduled callbacks and XR bindings.
pub struct RendererRef<B: Backend> {
    shared: Weak<Shared<B>>,
}

impl<B: Backend> Renderer<B> {
    pub(crate) fn new(surface: DrawableSurface<B>, parts: RendererParts<B>) -> Self {
        let RendererParts {
            clear_color,
            scheduler,
            clock,
            hooks,
        } = parts;

        Self {
            shared: Rc::new(Shared {
                surface: RefCell::new(surface),
                state: RefCell::new(RenderState::new(clear_color)),
                hooks: RefCell::new(hooks),
                scheduler: RefCell::new(scheduler),
                xr_binding: RefCell::new(None),
                deferred_resize: Cell::new(None),
                clock,
            }),
        }
    }

    /// Renders one frame: clear pass, hooks, submit.
    ///
    /// `None` uses the renderer's clock. Fails with `FrameInProgress` when
    /// called from inside a frame hook.
    pub fn render_once(&self, timestamp: Option<f64>) -> Result<FrameInfo> {
        self.shared.state.borrow_mut().begin_frame()?;
        let result = self.render_frame(timestamp);
        self.shared.state.borrow_mut().end_frame();

        if let Some(request) = self.shared.deferred_resize.take() {
            request.apply(&mut self.shared.surface.borrow_mut().canvas);
        }
        // A hook may have destroyed the renderer while the surface was busy.
        self.release_surface();
        result
    }

    fn render_frame(&self, timestamp: Option<f64>) -> Result<FrameInfo> {
        let (frame, clear_color) = {
            let state = self.shared.state.borrow();
            (state.frame(), state.clear_color())
        };
        let timestamp = timestamp.unwrap_or_else(|| self.shared.clock.now_ms());

        let (texture, view, mut encoder, mut pass) = {
            let mut surface = self.shared.surface.borrow_mut();
            let texture = surface
                .context
                .current_texture()
                .ok_or(RendererError::InvalidSurfaceTexture)?;
            let view = texture
                .create_view()
                .ok_or(RendererError::InvalidSurfaceTexture)?;
            let mut encoder = surface
                .device
                .create_command_encoder(&format!("halo.frame.{frame}"));
            let pass = encoder.begin_clear_pass(&view, clear_color);
            (texture, view, encoder, pass)
        };

        let surface = self.shared.surface.borrow();

        self.shared.hooks.borrow_mut().before_encode(EncodeEvent {
            frame,
            timestamp,
            device: &surface.device,
            context: &surface.context,
            canvas: &surface.canvas,
            pass: &mut pass,
        });

        encoder.end_pass(pass);
        surface.device.submit(encoder.finish());
        drop(view);
        texture.present();

        let frame = self.shared.state.borrow_mut().complete_frame(timestamp);
        trace!("frame {frame} submitted at {timestamp:.3}ms");

        self.shared.hooks.borrow_mut().after_submit(SubmitEvent {
            frame,
            timestamp,
            device: &surface.device,
            context: &surface.context,
            canvas: &surface.canvas,
        });

        Ok(FrameInfo { frame, timestamp })
    }

    /// Starts the render loop.
    ///
    /// Returns `Ok(false)` if already running. Without a scheduler, one frame
    /// is rendered immediately instead; if that frame fails the loop is
    /// stopped again and the error returned.
    pub fn start(&self) -> Result<bool> {
        let started = self.shared.state.borrow_mut().start()?;
        if !started {
            return Ok(false);
        }
        debug!("render loop started");

        if !self.schedule_next() {
            if let Err(err) = self.render_once(None) {
                self.stop();
                return Err(err);
            }
        }
        Ok(true)
    }

    /// Stops the render loop. Returns `false` if it was not running.
    pub fn stop(&self) -> bool {
        let outcome = self.shared.state.borrow_mut().stop();
        let Stopped::Stopped { pending } = outcome else {
            return false;
        };

        if let Some(handle) = pending {
            self.cancel_frame(handle);
        }
        debug!("render loop stopped");
        true
    }

    /// Sizes the backing buffer to `css * pixel_ratio` and, when the canvas
    /// supports it, the displayed size to `css`.
    ///
    /// `pixel_ratio` falls back to the canvas's device pixel ratio, then 1.
    /// Called from a frame hook, the canvas is resized once the frame ends.
    pub fn resize(&self, css_width: f64, css_height: f64, pixel_ratio: Option<f64>) -> PixelSize {
        let ambient = self.shared.surface.borrow().canvas.device_pixel_ratio();
        let ratio = resolve_pixel_ratio(pixel_ratio, ambient);
        let request = ResizeRequest {
            backing: PixelSize {
                width: pixel_dimension(css_width * ratio),
                height: pixel_dimension(css_height * ratio),
            },
            display: PixelSize {
                width: pixel_dimension(css_width),
                height: pixel_dimension(css_height),
            },
        };
        let size = request.backing;

        match self.shared.surface.try_borrow_mut() {
            Ok(mut surface) => {
                request.apply(&mut surface.canvas);
                debug!("resized to {}x{} (ratio {ratio})", size.width, size.height);
            }
            Err(_) => {
                debug!("frame in progress, deferring resize to {}x{}", size.width, size.height);
                self.shared.deferred_resize.set(Some(request));
            }
        }
        size
    }

    pub fn set_clear_color(&self, color: impl Into<ColorInput>) -> ClearColor {
        let color = normalize(color);
        self.shared.state.borrow_mut().set_clear_color(color);
        color
    }

    pub fn clear_color(&self) -> ClearColor {
        self.shared.state.borrow().clear_color()
    }

    pub fn set_xr_active(&self, active: bool) {
        self.shared.state.borrow_mut().set_xr_active(active);
    }

    pub fn snapshot(&self) -> RendererSnapshot {
        let state = self.shared.state.borrow();
        let surface = self.shared.surface.borrow();
        RendererSnapshot {
            running: state.lifecycle().is_running(),
            frame: state.frame(),
            last_timestamp: state.last_timestamp(),
            format: surface.format.clone(),
            width: surface.canvas.width(),
            height: surface.canvas.height(),
            xr_active: state.xr_active(),
        }
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.shared.state.borrow().lifecycle()
    }

    pub fn is_running(&self) -> bool {
        self.lifecycle().is_running()
    }

    pub fn is_destroyed(&self) -> bool {
        self.lifecycle().is_destroyed()
    }

    pub fn format(&self) -> String {
        self.shared.surface.borrow().format.clone()
    }

    pub fn with_canvas<R>(&self, f: impl FnOnce(&B::Canvas) -> R) -> R {
        f(&self.shared.surface.borrow().canvas)
    }

    pub fn with_device<R>(&self, f: impl FnOnce(&B::Device) -> R) -> R {
        f(&self.shared.surface.borrow().device)
    }

    pub fn with_context<R>(&self, f: impl FnOnce(&B::Context) -> R) -> R {
        f(&self.shared.surface.borrow().context)
    }

    pub fn downgrade(&self) -> RendererRef<B> {
        RendererRef {
            shared: Rc::downgrade(&self.shared),
        }
    }

    /// Binds this renderer's XR flag to `source`, replacing any previous
    /// binding (which is detached first).
    ///
    /// The binding holds a [`RendererRef`], so it never keeps the renderer alive.
    pub fn bind_xr_manager<S, Src>(
        &self,
        source: &Src,
        callbacks: XrCallbacks<S, RendererRef<B>>,
    ) -> Result<()>
    where
        S: 'static,
        Src: SessionSource<S> + ?Sized,
    {
        self.shared.state.borrow().ensure_active()?;
        self.detach_xr_binding();

        let binding = bind_to_session_source(self.downgrade(), source, callbacks)?;
        // The initial apply runs callbacks, which may have destroyed us.
        if self.is_destroyed() {
            binding.detach();
            return Ok(());
        }
        let replaced = self.shared.xr_binding.borrow_mut().replace(binding);
        if let Some(replaced) = replaced {
            replaced.detach();
        }
        Ok(())
    }

    /// Detaches the current XR binding. Returns `false` if none was attached.
    pub fn detach_xr_binding(&self) -> bool {
        let binding = self.shared.xr_binding.borrow_mut().take();
        match binding {
            Some(binding) => {
                binding.detach();
                true
            }
            None => false,
        }
    }

    /// Stops the loop, detaches the XR binding and releases the surface
    /// configuration. Idempotent.
    pub fn destroy(&self) {
        self.stop();
        let first = self.shared.state.borrow_mut().destroy();
        self.detach_xr_binding();
        self.release_surface();
        if first {
            info!("renderer destroyed");
        }
    }

    fn release_surface(&self) {
        if !self.shared.state.borrow().needs_release() {
            return;
        }
        // Busy means a frame is in flight; render_once releases once it ends.
        let Ok(mut surface) = self.shared.surface.try_borrow_mut() else {
            return;
        };
        if !surface.release() {
            debug!("surface context has no unconfigure operation");
        }
        self.shared.state.borrow_mut().mark_released();
    }

    /// Schedules `tick` if a scheduler is available.
    fn schedule_next(&self) -> bool {
        let mut scheduler = self.shared.scheduler.borrow_mut();
        let Some(scheduler) = scheduler.as_mut() else {
            return false;
        };

        let epoch = self.shared.state.borrow().epoch();
        let renderer = self.downgrade();
        let handle = scheduler.schedule(Box::new(move |timestamp| {
            if let Some(renderer) = renderer.upgrade() {
                renderer.tick(epoch, timestamp);
            }
        }));

        self.shared.state.borrow_mut().set_scheduled(handle);
        true
    }

    fn cancel_frame(&self, handle: FrameHandle) {
        let mut scheduler = self.shared.scheduler.borrow_mut();
        if let Some(scheduler) = scheduler.as_mut() {
            if !scheduler.cancel(handle) {
                warn!("frame {handle:?} not cancelled; it will fire as a no-op");
            }
        }
    }

    /// Scheduled callback body. Stale callbacks (after stop, restart or
    /// destroy) return without rendering.
    fn tick(&self, epoch: u64, timestamp: f64) {
        if !self.shared.state.borrow_mut().begin_tick(epoch) {
            return;
        }

        match self.render_once(Some(timestamp)) {
            Ok(_) => {
                if self.shared.state.borrow().accepts_tick(epoch) {
                    self.schedule_next();
                }
            }
            Err(err) => {
                error!("scheduled frame failed, stopping render loop: {err}");
                self.stop();
            }
        }
    }
}

impl<B: Backend> Clone for Renderer<B> {
    fn clone(&self) -> Self {
        Self {
            shared: Rc::clone(&self.shared),
        }
    }
}

impl<B: Backend> fmt::Debug for Renderer<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Renderer")
            .field("lifecycle", &self.lifecycle())
            .field("frame", &self.shared.state.borrow().frame())
            .finish_non_exhaustive()
    }
}

impl<B: Backend> XrTarget for Renderer<B> {
    fn set_xr_active(&self, active: bool) {
        Renderer::set_xr_active(self, active);
    }
}

impl<B: Backend> RendererRef<B> {
    /// The renderer, if it is still alive.
    pub fn upgrade(&self) -> Option<Renderer<B>> {
        self.shared.upgrade().map(|shared| Renderer { shared })
    }
}

impl<B: Backend> Clone for RendererRef<B> {
    fn clone(&self) -> Self {
        Self {
            shared: Weak::clone(&self.shared),
        }
    }
}

impl<B: Backend> XrTarget for RendererRef<B> {
    fn set_xr_active(&self, active: bool) {
        if let Some(renderer) = self.upgrade() {
            renderer.set_xr_active(active);
        }
    }
}

/// Explicit ratio, else the canvas's, else 1.
pub(crate) fn resolve_pixel_ratio(explicit: Option<f64>, ambient: Option<f64>) -> f64 {
    explicit.or(ambient).unwrap_or(1.0)
}

/// `max(1, floor(value))`; NaN maps to 1 and huge values saturate.
pub(crate) fn pixel_dimension(value: f64) -> u32 {
    (value.floor() as u32).max(1)
}
