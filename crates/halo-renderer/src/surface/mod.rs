//! Surface acquisition.
//!
//! One asynchronous attempt that turns [`SurfaceOptions`] into a configured
//! [`DrawableSurface`]:
//! runtime → canvas → adapter → device → context → format → configure.
//!
//! Every step has its own failure; nothing is retried. Callers retry by
//! invoking the whole acquisition again.

mod options;

pub use options::{CanvasSource, SurfaceOptions};

use log::{debug, info};

use crate::config::{AlphaMode, DEFAULT_CANVAS_SELECTOR, FALLBACK_FORMAT, SURFACE_CONTEXT_KIND};
use crate::error::{RendererError, Result};
use crate::platform::{
    Backend, CanvasTarget, Document, GpuAdapter, GpuRuntime, SurfaceConfig, SurfaceContext,
};

/// Device + configured context + format, bound to one canvas.
///
/// Owned exclusively by one renderer; canvases must not be shared between
/// surfaces.
pub struct DrawableSurface<B: Backend> {
    pub(crate) device: B::Device,
    pub(crate) context: B::Context,
    pub(crate) canvas: B::Canvas,
    pub(crate) format: String,
    pub(crate) alpha_mode: AlphaMode,
}

impl<B: Backend> DrawableSurface<B> {
    pub fn device(&self) -> &B::Device {
        &self.device
    }

    pub fn context(&self) -> &B::Context {
        &self.context
    }

    pub fn canvas(&self) -> &B::Canvas {
        &self.canvas
    }

    pub fn canvas_mut(&mut self) -> &mut B::Canvas {
        &mut self.canvas
    }

    pub fn format(&self) -> &str {
        &self.format
    }

    pub fn alpha_mode(&self) -> AlphaMode {
        self.alpha_mode
    }

    /// Releases the context configuration. Returns `false` when the context
    /// cannot unconfigure.
    pub(crate) fn release(&mut self) -> bool {
        self.context.unconfigure()
    }
}

/// Returns whether a runtime is available, either `runtime` or the ambient one.
///
/// Never fails.
pub fn supports_runtime<B: Backend>(runtime: Option<&B::Runtime>) -> bool {
    runtime.is_some() || B::ambient_runtime().is_some()
}

/// Acquires and configures a drawable surface.
pub async fn acquire<B: Backend>(options: SurfaceOptions<B>) -> Result<DrawableSurface<B>> {
    let SurfaceOptions {
        canvas,
        runtime,
        document,
        power_preference,
        alpha,
        format,
    } = options;

    let runtime = resolve_runtime::<B>(runtime)?;
    let mut canvas = resolve_canvas::<B>(canvas, document)?;

    debug!("requesting GPU adapter (power preference: {power_preference})");
    let adapter = runtime
        .request_adapter(power_preference)
        .await
        .ok_or(RendererError::AdapterUnavailable)?;

    let device = adapter
        .request_device()
        .await
        .map_err(RendererError::DeviceRequestFailed)?;

    let mut context = canvas
        .context(SURFACE_CONTEXT_KIND)
        .ok_or(RendererError::SurfaceContextUnavailable)?;

    let format = resolve_format(format, || runtime.preferred_format());
    let alpha_mode = AlphaMode::from_alpha(alpha);

    context
        .configure(
            &device,
            &SurfaceConfig {
                format: &format,
                alpha_mode,
            },
        )
        .map_err(|err| RendererError::SurfaceNotConfigurable {
            reason: err.to_string(),
        })?;

    info!(
        "surface configured: format={format}, alpha={alpha_mode}, {}x{}",
        canvas.width(),
        canvas.height()
    );

    Ok(DrawableSurface {
        device,
        context,
        canvas,
        format,
        alpha_mode,
    })
}

pub(crate) fn resolve_runtime<B: Backend>(explicit: Option<B::Runtime>) -> Result<B::Runtime> {
    explicit
        .or_else(B::ambient_runtime)
        .ok_or(RendererError::RuntimeUnavailable)
}

/// The selector actually looked up: blank or missing selectors become the default.
pub(crate) fn resolve_selector(selector: Option<&str>) -> &str {
    match selector {
        Some(s) if !s.trim().is_empty() => s,
        _ => DEFAULT_CANVAS_SELECTOR,
    }
}

pub(crate) fn resolve_canvas<B: Backend>(
    source: Option<CanvasSource<B::Canvas>>,
    document: Option<B::Document>,
) -> Result<B::Canvas> {
    let selector = match source {
        Some(CanvasSource::Element(canvas)) => return Ok(canvas),
        Some(CanvasSource::Selector(selector)) => Some(selector),
        None => None,
    };

    let document = document
        .or_else(B::ambient_document)
        .ok_or(RendererError::DocumentUnavailable)?;

    let selector = resolve_selector(selector.as_deref());
    debug!("resolving canvas for selector \"{selector}\"");

    document
        .query_selector(selector)
        .ok_or_else(|| RendererError::SurfaceTargetNotFound {
            selector: selector.to_string(),
        })
}

/// Explicit format, else the runtime's preference, else [`FALLBACK_FORMAT`].
pub(crate) fn resolve_format(
    explicit: Option<String>,
    preferred: impl FnOnce() -> Option<String>,
) -> String {
    explicit
        .filter(|f| !f.is_empty())
        .or_else(|| preferred().filter(|f| !f.is_empty()))
        .unwrap_or_else(|| FALLBACK_FORMAT.to_string())
}
