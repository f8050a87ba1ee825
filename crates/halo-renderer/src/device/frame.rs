use crate::paint::ClearColor;
use crate::platform::{FrameEncoder, SurfaceTexture};

/// Command encoder for a single frame.
pub struct WgpuEncoder {
    encoder: wgpu::CommandEncoder,
}

impl WgpuEncoder {
    pub(crate) fn new(encoder: wgpu::CommandEncoder) -> Self {
        Self { encoder }
    }

    /// Raw encoder, for work recorded outside the clear pass.
    pub fn encoder_mut(&mut self) -> &mut wgpu::CommandEncoder {
        &mut self.encoder
    }
}

impl FrameEncoder for WgpuEncoder {
    type View = wgpu::TextureView;
    type Pass = wgpu::RenderPass<'static>;
    type CommandBuffer = wgpu::CommandBuffer;

    fn begin_clear_pass(&mut self, view: &wgpu::TextureView, color: ClearColor) -> Self::Pass {
        self.encoder
            .begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("halo clear pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(color.to_wgpu()),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            })
            // The pass is ended explicitly in `end_pass`, before `finish`.
            .forget_lifetime()
    }

    fn end_pass(&mut self, pass: Self::Pass) {
        drop(pass);
    }

    fn finish(self) -> wgpu::CommandBuffer {
        self.encoder.finish()
    }
}

/// Acquired swapchain image.
///
/// Holding it blocks acquisition of the next one; presented once the frame
/// has been submitted.
pub struct WgpuTexture {
    texture: wgpu::SurfaceTexture,
}

impl WgpuTexture {
    pub(crate) fn new(texture: wgpu::SurfaceTexture) -> Self {
        Self { texture }
    }

    pub fn texture(&self) -> &wgpu::Texture {
        &self.texture.texture
    }
}

impl SurfaceTexture for WgpuTexture {
    type View = wgpu::TextureView;

    fn create_view(&self) -> Option<wgpu::TextureView> {
        Some(
            self.texture
                .texture
                .create_view(&wgpu::TextureViewDescriptor::default()),
        )
    }

    fn present(self) {
        self.texture.present();
    }
}
