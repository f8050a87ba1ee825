//! halo-renderer.
//!
//! Acquires a GPU device and drawable surface for a canvas, drives a
//! clear-screen frame loop on it, and mirrors an external XR session store
//! into the renderer's state.
//!
//! The core is backend-agnostic ([`platform`]); [`device`] provides the
//! wgpu + winit implementation.

pub mod config;
pub mod device;
pub mod error;
pub mod logging;
pub mod paint;
pub mod platform;
pub mod render;
pub mod surface;
pub mod time;
pub mod xr;

#[cfg(test)]
mod testing;

pub use error::{ErrorKind, RendererError, Result};
pub use paint::{normalize, ClearColor, ColorInput};
pub use render::{
    create_renderer, create_renderer_blocking, FrameHooks, Renderer, RendererOptions,
    RendererSnapshot,
};
pub use surface::supports_runtime;
pub use xr::{bind_to_session_source, XrBinding, XrCallbacks};
