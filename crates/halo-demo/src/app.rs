use std::sync::Arc;

use anyhow::{Context, Result};
use log::{error, info, warn};
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use halo_renderer::config::DEFAULT_CANVAS_SELECTOR;
use halo_renderer::device::{CanvasRegistry, WgpuBackend, WgpuRuntime};
use halo_renderer::time::{Clock, FrameQueue, MonotonicClock};
use halo_renderer::{create_renderer_blocking, supports_runtime, Renderer, RendererOptions};

/// Clear colors cycled by `C`; the first is the initial one.
const PALETTE: [&str; 4] = ["#143251", "#2d1b4e", "#1b4e3a", "#4e2a1b"];

#[derive(Debug, Clone)]
pub struct DemoConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            title: "halo renderer".to_string(),
            initial_size: LogicalSize::new(960.0, 540.0),
        }
    }
}

/// One window, its renderer and the frame queue driving it.
struct Session {
    window: Arc<Window>,
    renderer: Renderer<WgpuBackend>,
    queue: FrameQueue,
    clock: MonotonicClock,
    palette_index: usize,
    // Keeps the selector table alive for the renderer's lifetime.
    _registry: CanvasRegistry,
}

impl Session {
    fn create(event_loop: &ActiveEventLoop, config: &DemoConfig) -> Result<Self> {
        let attrs = Window::default_attributes()
            .with_title(config.title.clone())
            .with_inner_size(config.initial_size);
        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .context("failed to create window")?,
        );

        let runtime = WgpuRuntime::default();
        anyhow::ensure!(
            supports_runtime::<WgpuBackend>(Some(&runtime)),
            "no GPU runtime available"
        );

        let registry = CanvasRegistry::new();
        registry.register(DEFAULT_CANVAS_SELECTOR, runtime.canvas_for(Arc::clone(&window)));

        let waker = Arc::clone(&window);
        let queue = FrameQueue::with_waker(move || waker.request_redraw());

        let options = RendererOptions::<WgpuBackend>::new()
            .runtime(runtime)
            .document(registry.clone())
            .clear_color(PALETTE[0])
            .scheduler(queue.clone());
        let renderer = create_renderer_blocking(options).map_err(|err| {
            let stage = if err.is_creation_failure() {
                "failed to acquire a drawable surface"
            } else {
                "failed to create renderer"
            };
            anyhow::Error::new(err).context(stage)
        })?;
        info!("renderer ready ({})", renderer.format());

        let session = Self {
            window,
            renderer,
            queue,
            clock: MonotonicClock::new(),
            palette_index: 0,
            _registry: registry,
        };
        session.fit_to_window();
        session.window.request_redraw();
        Ok(session)
    }

    fn fit_to_window(&self) {
        let scale = self.window.scale_factor();
        let logical: LogicalSize<f64> = self.window.inner_size().to_logical(scale);
        let size = self.renderer.resize(logical.width, logical.height, Some(scale));
        info!("resized to {}x{} physical px", size.width, size.height);
    }

    fn redraw(&self) {
        if self.renderer.is_destroyed() {
            return;
        }
        let fired = self.queue.run_frame(self.clock.now_ms());
        // Repaint exposed content while idle.
        if fired == 0 && !self.renderer.is_running() {
            self.step();
        }
    }

    fn step(&self) {
        match self.renderer.render_once(None) {
            Ok(frame) => info!("rendered frame {}", frame.frame),
            Err(err) => warn!("render failed: {err}"),
        }
    }

    /// Returns `true` when the demo should exit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::KeyS => match self.renderer.start() {
                Ok(true) => info!("loop started"),
                Ok(false) => info!("loop already running"),
                Err(err) => warn!("start failed: {err}"),
            },
            KeyCode::KeyX => {
                if self.renderer.stop() {
                    info!("loop stopped at frame {}", self.renderer.snapshot().frame);
                } else {
                    info!("loop was not running");
                }
            }
            KeyCode::Space => self.step(),
            KeyCode::KeyC => {
                self.palette_index = (self.palette_index + 1) % PALETTE.len();
                let color = self.renderer.set_clear_color(PALETTE[self.palette_index]);
                info!("clear color {} -> {:?}", PALETTE[self.palette_index], color.to_array());
                if !self.renderer.is_running() {
                    self.window.request_redraw();
                }
            }
            KeyCode::Escape => {
                let snapshot = self.renderer.snapshot();
                self.renderer.destroy();
                info!("renderer destroyed after {} frames", snapshot.frame);
                return true;
            }
            _ => {}
        }
        false
    }
}

pub struct Demo {
    config: DemoConfig,
    session: Option<Session>,
    exit_requested: bool,
}

impl Demo {
    pub fn new(config: DemoConfig) -> Self {
        Self {
            config,
            session: None,
            exit_requested: false,
        }
    }

    fn request_exit(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(session) = self.session.take() {
            session.renderer.destroy();
        }
        self.exit_requested = true;
        event_loop.exit();
    }
}

impl ApplicationHandler for Demo {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.session.is_some() {
            return;
        }
        event_loop.set_control_flow(ControlFlow::Wait);

        match Session::create(event_loop, &self.config) {
            Ok(session) => self.session = Some(session),
            Err(err) => {
                error!("failed to start demo: {err:#}");
                self.request_exit(event_loop);
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if session.window.id() != window_id {
            return;
        }

        match event {
            WindowEvent::CloseRequested => self.request_exit(event_loop),

            WindowEvent::Resized(_) | WindowEvent::ScaleFactorChanged { .. } => {
                session.fit_to_window();
                session.window.request_redraw();
            }

            WindowEvent::RedrawRequested => session.redraw(),

            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state: ElementState::Pressed,
                        repeat: false,
                        ..
                    },
                ..
            } => {
                if session.handle_key(code) {
                    self.request_exit(event_loop);
                }
            }

            _ => {}
        }
    }
}
