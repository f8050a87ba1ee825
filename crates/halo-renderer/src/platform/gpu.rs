use std::future::Future;

use crate::config::PowerPreference;
use crate::paint::ClearColor;

/// Entry point to a graphics stack.
pub trait GpuRuntime {
    type Adapter;

    /// Requests an adapter. `None` means no suitable adapter exists.
    fn request_adapter(
        &self,
        power_preference: PowerPreference,
    ) -> impl Future<Output = Option<Self::Adapter>>;

    /// The runtime's preferred canvas format, when it can name one.
    fn preferred_format(&self) -> Option<String> {
        None
    }
}

pub trait GpuAdapter {
    type Device;

    fn request_device(&self) -> impl Future<Output = anyhow::Result<Self::Device>>;
}

/// Logical device: creates encoders and owns the submission queue.
pub trait GpuDevice {
    type Encoder;
    type CommandBuffer;

    fn create_command_encoder(&self, label: &str) -> Self::Encoder;

    fn submit(&self, buffer: Self::CommandBuffer);
}

/// Records one frame's render pass.
pub trait FrameEncoder {
    type View;
    type Pass;
    type CommandBuffer;

    /// Begins a pass that clears the whole `view` to `color` and stores the result.
    fn begin_clear_pass(&mut self, view: &Self::View, color: ClearColor) -> Self::Pass;

    fn end_pass(&mut self, pass: Self::Pass);

    fn finish(self) -> Self::CommandBuffer;
}
