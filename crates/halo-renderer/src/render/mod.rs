//! Frame renderer.
//!
//! A [`Renderer`] owns one drawable surface and records one clear pass per
//! frame, either on demand ([`Renderer::render_once`]) or driven by a
//! [`FrameScheduler`](crate::platform::FrameScheduler) once started.
//!
//! Convention:
//! - frame indices count submitted frames; hooks see the index before and
//!   after the increment
//! - timestamps are milliseconds, as provided by the scheduler or clock

mod hooks;
mod options;
mod renderer;
mod state;

pub use hooks::{EncodeEvent, FnHooks, FrameHooks, NoHooks, SubmitEvent};
pub use options::{create_renderer, create_renderer_blocking, RendererOptions, SchedulerChoice};
pub use renderer::{FrameInfo, PixelSize, Renderer, RendererRef, RendererSnapshot};
pub use state::Lifecycle;
