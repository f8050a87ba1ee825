use thiserror::Error;

use crate::config::AlphaMode;

/// Parameters passed to [`SurfaceContext::configure`].
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct SurfaceConfig<'a> {
    pub format: &'a str,
    pub alpha_mode: AlphaMode,
}

#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum ConfigureError {
    /// The context has no configuration operation.
    #[error("context does not support configure()")]
    Unsupported,
    /// The context refused this configuration.
    #[error("{0}")]
    Rejected(String),
}

/// Drawable GPU context obtained from a canvas.
pub trait SurfaceContext {
    type Device;
    type Texture;

    fn configure(&mut self, device: &Self::Device, config: &SurfaceConfig<'_>)
        -> Result<(), ConfigureError>;

    /// The texture to draw the current frame into, or `None` when the surface
    /// cannot produce one (stale, lost or unconfigured).
    fn current_texture(&mut self) -> Option<Self::Texture>;

    /// Releases the configuration. Returns `false` when unsupported.
    fn unconfigure(&mut self) -> bool {
        false
    }
}

pub trait SurfaceTexture {
    type View;

    fn create_view(&self) -> Option<Self::View>;

    /// Hands the finished frame to the compositor.
    fn present(self)
    where
        Self: Sized,
    {
    }
}

/// Canvas-like render target with a backing pixel buffer.
pub trait CanvasTarget {
    type Context;

    /// Backing buffer width in physical pixels (0 if unset).
    fn width(&self) -> u32;

    /// Backing buffer height in physical pixels (0 if unset).
    fn height(&self) -> u32;

    fn set_size(&mut self, width: u32, height: u32);

    /// Sets the displayed (layout) size. Returns `false` when the target has
    /// no layout styling.
    fn set_display_size(&mut self, width: u32, height: u32) -> bool {
        let _ = (width, height);
        false
    }

    /// Ambient device pixel ratio, if the target knows it.
    fn device_pixel_ratio(&self) -> Option<f64> {
        None
    }

    fn context(&mut self, kind: &str) -> Option<Self::Context>;
}

/// Selector lookup over a set of canvases.
pub trait Document {
    type Canvas;

    fn query_selector(&self, selector: &str) -> Option<Self::Canvas>;
}
