use std::sync::Arc;

use anyhow::Context;
use log::debug;
use winit::window::Window;

use super::canvas::WindowCanvas;
use super::frame::WgpuEncoder;
use super::WgpuInit;
use crate::config::PowerPreference;
use crate::platform::{GpuAdapter, GpuDevice, GpuRuntime};

/// wgpu instance plus backend configuration.
///
/// Clones share the same instance.
#[derive(Debug, Clone)]
pub struct WgpuRuntime {
    instance: wgpu::Instance,
    init: WgpuInit,
}

impl WgpuRuntime {
    pub fn new(init: WgpuInit) -> Self {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: init.backends,
            ..Default::default()
        });
        Self { instance, init }
    }

    pub fn instance(&self) -> &wgpu::Instance {
        &self.instance
    }

    pub fn init(&self) -> &WgpuInit {
        &self.init
    }

    /// Wraps `window` as a canvas whose contexts are created by this instance.
    pub fn canvas_for(&self, window: Arc<Window>) -> WindowCanvas {
        WindowCanvas::new(window, self.instance.clone())
    }
}

impl Default for WgpuRuntime {
    fn default() -> Self {
        Self::new(WgpuInit::default())
    }
}

impl GpuRuntime for WgpuRuntime {
    type Adapter = WgpuAdapter;

    async fn request_adapter(&self, power_preference: PowerPreference) -> Option<WgpuAdapter> {
        let adapter = self
            .instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: to_wgpu_power(power_preference),
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await;

        match adapter {
            Ok(adapter) => {
                debug!("adapter selected: {:?}", adapter.get_info().name);
                Some(WgpuAdapter {
                    adapter,
                    init: self.init.clone(),
                })
            }
            Err(err) => {
                debug!("adapter request failed: {err}");
                None
            }
        }
    }

    fn preferred_format(&self) -> Option<String> {
        self.init.preferred_format.clone()
    }
}

pub struct WgpuAdapter {
    adapter: wgpu::Adapter,
    init: WgpuInit,
}

impl WgpuAdapter {
    pub fn adapter(&self) -> &wgpu::Adapter {
        &self.adapter
    }
}

impl GpuAdapter for WgpuAdapter {
    type Device = WgpuDevice;

    async fn request_device(&self) -> anyhow::Result<WgpuDevice> {
        let (device, queue) = self
            .adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("halo-renderer device"),
                required_features: self.init.required_features,
                required_limits: self.init.required_limits.clone(),
                experimental_features: wgpu::ExperimentalFeatures::disabled(),
                memory_hints: wgpu::MemoryHints::Performance,
                trace: wgpu::Trace::Off,
            })
            .await
            .context("failed to create wgpu device/queue")?;

        Ok(WgpuDevice {
            adapter: self.adapter.clone(),
            device,
            queue,
            init: self.init.clone(),
        })
    }
}

/// Logical device and its submission queue.
///
/// Hooks reach the raw wgpu handles through [`device`](Self::device) and
/// [`queue`](Self::queue) to build pipelines and upload resources.
pub struct WgpuDevice {
    adapter: wgpu::Adapter,
    device: wgpu::Device,
    queue: wgpu::Queue,
    init: WgpuInit,
}

impl WgpuDevice {
    pub fn adapter(&self) -> &wgpu::Adapter {
        &self.adapter
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    pub(crate) fn init(&self) -> &WgpuInit {
        &self.init
    }
}

impl GpuDevice for WgpuDevice {
    type Encoder = WgpuEncoder;
    type CommandBuffer = wgpu::CommandBuffer;

    fn create_command_encoder(&self, label: &str) -> WgpuEncoder {
        WgpuEncoder::new(
            self.device
                .create_command_encoder(&wgpu::CommandEncoderDescriptor { label: Some(label) }),
        )
    }

    fn submit(&self, buffer: wgpu::CommandBuffer) {
        self.queue.submit(std::iter::once(buffer));
    }
}

fn to_wgpu_power(preference: PowerPreference) -> wgpu::PowerPreference {
    match preference {
        PowerPreference::HighPerformance => wgpu::PowerPreference::HighPerformance,
        PowerPreference::LowPower => wgpu::PowerPreference::LowPower,
    }
}
