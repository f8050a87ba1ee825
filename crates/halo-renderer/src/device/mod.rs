//! wgpu + winit backend.
//!
//! This module is responsible for:
//! - creating the wgpu Instance/Adapter/Device/Queue
//! - wrapping winit windows as canvases and creating their surfaces
//! - configuring surfaces and acquiring/presenting frames
//! - recording the per-frame clear pass

mod canvas;
mod error;
mod frame;
mod gpu;
mod init;
mod surface;

pub use canvas::{CanvasRegistry, WindowCanvas};
pub use error::SurfaceErrorAction;
pub use frame::{WgpuEncoder, WgpuTexture};
pub use gpu::{WgpuAdapter, WgpuDevice, WgpuRuntime};
pub use init::WgpuInit;
pub use surface::{parse_texture_format, texture_format_name, WgpuContext};

use crate::platform::Backend;

/// [`Backend`] over wgpu surfaces on winit windows.
///
/// The ambient runtime is a default [`WgpuRuntime`]. There is no ambient
/// document or scheduler: register windows in a [`CanvasRegistry`] and pass a
/// [`FrameQueue`](crate::time::FrameQueue) explicitly.
#[derive(Debug, Copy, Clone, Default)]
pub struct WgpuBackend;

impl Backend for WgpuBackend {
    type Runtime = WgpuRuntime;
    type Adapter = WgpuAdapter;
    type Device = WgpuDevice;
    type Encoder = WgpuEncoder;
    type Pass = wgpu::RenderPass<'static>;
    type CommandBuffer = wgpu::CommandBuffer;
    type View = wgpu::TextureView;
    type Texture = WgpuTexture;
    type Context = WgpuContext;
    type Canvas = WindowCanvas;
    type Document = CanvasRegistry<WindowCanvas>;

    fn ambient_runtime() -> Option<WgpuRuntime> {
        Some(WgpuRuntime::default())
    }
}
