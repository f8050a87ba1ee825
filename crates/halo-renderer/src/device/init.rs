/// Initialization parameters for the wgpu backend.
///
/// Keep this structure stable and minimal. Add configuration flags only when a
/// concrete platform or backend requirement exists.
#[derive(Debug, Clone)]
pub struct WgpuInit {
    /// Backends the instance may select from.
    pub backends: wgpu::Backends,

    /// Present mode (swap behavior).
    ///
    /// FIFO is broadly supported and paces frames to the display.
    pub present_mode: wgpu::PresentMode,

    /// Required wgpu features.
    ///
    /// Favor an empty set for portability unless a feature is strictly necessary.
    pub required_features: wgpu::Features,

    /// Limits requested from the adapter/device.
    pub required_limits: wgpu::Limits,

    /// Desired maximum frame latency for the surface.
    ///
    /// This value is a hint; support depends on platform/backend.
    pub desired_maximum_frame_latency: u32,

    /// Canvas format name reported as the runtime's preference
    /// (e.g. `"bgra8unorm"`). `None` leaves the choice to the fallback.
    pub preferred_format: Option<String>,
}

impl Default for WgpuInit {
    fn default() -> Self {
        Self {
            backends: wgpu::Backends::all(),
            present_mode: wgpu::PresentMode::Fifo,
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            desired_maximum_frame_latency: 2,
            preferred_format: None,
        }
    }
}
