use log::debug;

use super::hooks::{FrameHooks, NoHooks};
use super::renderer::{Renderer, RendererParts};
use crate::config::PowerPreference;
use crate::error::Result;
use crate::paint::{normalize, ColorInput, DEFAULT_CLEAR_COLOR};
use crate::platform::{Backend, FrameScheduler};
use crate::surface::{self, SurfaceOptions};
use crate::time::{Clock, MonotonicClock};

/// Which scheduling primitive drives `start()`.
#[derive(Default)]
pub enum SchedulerChoice {
    /// [`Backend::ambient_scheduler`].
    #[default]
    Ambient,
    Custom(Box<dyn FrameScheduler>),
    /// No scheduler: `start()` renders a single frame synchronously.
    Disabled,
}

/// Everything recognized at renderer creation.
pub struct RendererOptions<B: Backend> {
    pub surface: SurfaceOptions<B>,
    pub clear_color: ColorInput,
    pub scheduler: SchedulerChoice,
    /// Timestamp source for frames rendered without one. Defaults to
    /// [`MonotonicClock`].
    pub clock: Option<Box<dyn Clock>>,
    pub hooks: Option<Box<dyn FrameHooks<B>>>,
}

impl<B: Backend> Default for RendererOptions<B> {
    fn default() -> Self {
        Self {
            surface: SurfaceOptions::default(),
            clear_color: DEFAULT_CLEAR_COLOR.into(),
            scheduler: SchedulerChoice::default(),
            clock: None,
            hooks: None,
        }
    }
}

impl<B: Backend> RendererOptions<B> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn surface(mut self, surface: SurfaceOptions<B>) -> Self {
        self.surface = surface;
        self
    }

    pub fn canvas(mut self, canvas: B::Canvas) -> Self {
        self.surface = self.surface.canvas(canvas);
        self
    }

    pub fn selector(mut self, selector: impl Into<String>) -> Self {
        self.surface = self.surface.selector(selector);
        self
    }

    pub fn runtime(mut self, runtime: B::Runtime) -> Self {
        self.surface = self.surface.runtime(runtime);
        self
    }

    pub fn document(mut self, document: B::Document) -> Self {
        self.surface = self.surface.document(document);
        self
    }

    pub fn power_preference(mut self, power_preference: PowerPreference) -> Self {
        self.surface = self.surface.power_preference(power_preference);
        self
    }

    pub fn alpha(mut self, alpha: bool) -> Self {
        self.surface = self.surface.alpha(alpha);
        self
    }

    pub fn format(mut self, format: impl Into<String>) -> Self {
        self.surface = self.surface.format(format);
        self
    }

    pub fn clear_color(mut self, color: impl Into<ColorInput>) -> Self {
        self.clear_color = color.into();
        self
    }

    pub fn scheduler(mut self, scheduler: impl FrameScheduler + 'static) -> Self {
        self.scheduler = SchedulerChoice::Custom(Box::new(scheduler));
        self
    }

    pub fn without_scheduler(mut self) -> Self {
        self.scheduler = SchedulerChoice::Disabled;
        self
    }

    pub fn clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Some(Box::new(clock));
        self
    }

    pub fn hooks(mut self, hooks: impl FrameHooks<B> + 'static) -> Self {
        self.hooks = Some(Box::new(hooks));
        self
    }
}

/// Acquires a surface and builds a renderer around it.
///
/// Creation failures abort construction; no partial renderer is returned.
pub async fn create_renderer<B: Backend>(options: RendererOptions<B>) -> Result<Renderer<B>> {
    let RendererOptions {
        surface,
        clear_color,
        scheduler,
        clock,
        hooks,
    } = options;

    let scheduler = match scheduler {
        SchedulerChoice::Ambient => B::ambient_scheduler(),
        SchedulerChoice::Custom(scheduler) => Some(scheduler),
        SchedulerChoice::Disabled => None,
    };

    let surface = surface::acquire(surface).await?;
    debug!(
        "renderer created (scheduler: {})",
        if scheduler.is_some() { "present" } else { "none" }
    );

    Ok(Renderer::new(
        surface,
        RendererParts {
            clear_color: normalize(clear_color),
            scheduler,
            clock: clock.unwrap_or_else(|| Box::new(MonotonicClock::new())),
            hooks: hooks.unwrap_or_else(|| Box::new(NoHooks)),
        },
    ))
}

/// [`create_renderer`] driven to completion on the current thread.
pub fn create_renderer_blocking<B: Backend>(options: RendererOptions<B>) -> Result<Renderer<B>> {
    pollster::block_on(create_renderer(options))
}
