//! Contracts for the external collaborators a renderer drives.
//!
//! The renderer never talks to a graphics API directly. A [`Backend`] names the
//! concrete handle types, and the traits here describe the capabilities the
//! surface acquirer and frame loop consume:
//! - runtime / adapter / device / command encoder
//! - drawable context, its textures, and the canvas that owns it
//! - selector lookup (document)
//! - frame scheduling
//!
//! `crate::device` implements all of them on top of wgpu + winit.

mod gpu;
mod schedule;
mod surface;

pub use gpu::{FrameEncoder, GpuAdapter, GpuDevice, GpuRuntime};
pub use schedule::{FrameCallback, FrameHandle, FrameScheduler};
pub use surface::{CanvasTarget, ConfigureError, Document, SurfaceConfig, SurfaceContext, SurfaceTexture};

/// Ties together the handle types of one graphics stack.
///
/// The associated-type equalities guarantee, at compile time, that a device
/// only ever receives encoders, views and command buffers of its own stack.
pub trait Backend: Sized + 'static {
    type Runtime: GpuRuntime<Adapter = Self::Adapter>;
    type Adapter: GpuAdapter<Device = Self::Device>;
    type Device: GpuDevice<Encoder = Self::Encoder, CommandBuffer = Self::CommandBuffer>;
    type Encoder: FrameEncoder<View = Self::View, Pass = Self::Pass, CommandBuffer = Self::CommandBuffer>;
    type Pass;
    type CommandBuffer;
    type View;
    type Texture: SurfaceTexture<View = Self::View>;
    type Context: SurfaceContext<Device = Self::Device, Texture = Self::Texture>;
    type Canvas: CanvasTarget<Context = Self::Context>;
    type Document: Document<Canvas = Self::Canvas>;

    /// Runtime used when the caller supplies none.
    fn ambient_runtime() -> Option<Self::Runtime> {
        None
    }

    /// Document used for selector lookups when the caller supplies none.
    fn ambient_document() -> Option<Self::Document> {
        None
    }

    /// Scheduler used when the caller does not override it.
    fn ambient_scheduler() -> Option<Box<dyn FrameScheduler>> {
        None
    }
}
