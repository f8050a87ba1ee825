use std::cell::Cell;
use std::rc::Rc;

use log::{debug, error, warn};
use winit::dpi::PhysicalSize;

use super::frame::WgpuTexture;
use super::gpu::WgpuDevice;
use super::SurfaceErrorAction;
use crate::config::AlphaMode;
use crate::platform::{ConfigureError, SurfaceConfig, SurfaceContext};

/// Canvas format names and the wgpu formats they select.
const FORMATS: &[(&str, wgpu::TextureFormat)] = &[
    ("bgra8unorm", wgpu::TextureFormat::Bgra8Unorm),
    ("bgra8unorm-srgb", wgpu::TextureFormat::Bgra8UnormSrgb),
    ("rgba8unorm", wgpu::TextureFormat::Rgba8Unorm),
    ("rgba8unorm-srgb", wgpu::TextureFormat::Rgba8UnormSrgb),
    ("rgba16float", wgpu::TextureFormat::Rgba16Float),
    ("rgb10a2unorm", wgpu::TextureFormat::Rgb10a2Unorm),
];

/// Looks up a canvas format name (case-insensitive).
pub fn parse_texture_format(name: &str) -> Option<wgpu::TextureFormat> {
    let name = name.trim();
    FORMATS
        .iter()
        .find(|(candidate, _)| candidate.eq_ignore_ascii_case(name))
        .map(|&(_, format)| format)
}

/// Canvas name of `format`, if it is one of the supported canvas formats.
pub fn texture_format_name(format: wgpu::TextureFormat) -> Option<&'static str> {
    FORMATS
        .iter()
        .find(|&&(_, candidate)| candidate == format)
        .map(|&(name, _)| name)
}

struct Configured {
    device: wgpu::Device,
    config: wgpu::SurfaceConfiguration,
    size: PhysicalSize<u32>,
}

/// wgpu surface bound to one [`WindowCanvas`](super::WindowCanvas).
///
/// The backing size is shared with the canvas; a changed size is applied
/// before the next texture is acquired.
pub struct WgpuContext {
    surface: wgpu::Surface<'static>,
    backing: Rc<Cell<PhysicalSize<u32>>>,
    configured: Option<Configured>,
}

impl WgpuContext {
    pub(crate) fn new(surface: wgpu::Surface<'static>, backing: Rc<Cell<PhysicalSize<u32>>>) -> Self {
        Self {
            surface,
            backing,
            configured: None,
        }
    }

    pub fn surface(&self) -> &wgpu::Surface<'static> {
        &self.surface
    }

    /// Active configuration, if configured.
    pub fn config(&self) -> Option<&wgpu::SurfaceConfiguration> {
        self.configured.as_ref().map(|c| &c.config)
    }

    pub fn texture_format(&self) -> Option<wgpu::TextureFormat> {
        self.config().map(|c| c.format)
    }
}

impl SurfaceContext for WgpuContext {
    type Device = WgpuDevice;
    type Texture = WgpuTexture;

    fn configure(
        &mut self,
        device: &WgpuDevice,
        config: &SurfaceConfig<'_>,
    ) -> Result<(), ConfigureError> {
        let format = parse_texture_format(config.format).ok_or_else(|| {
            ConfigureError::Rejected(format!("unsupported canvas format `{}`", config.format))
        })?;

        let caps = self.surface.get_capabilities(device.adapter());
        if caps.formats.is_empty() {
            return Err(ConfigureError::Rejected(
                "surface is not compatible with the selected adapter".to_string(),
            ));
        }
        if !caps.formats.contains(&format) {
            return Err(ConfigureError::Rejected(format!(
                "format `{}` is not supported by this surface",
                config.format
            )));
        }

        let alpha_mode = choose_alpha_mode(&caps.alpha_modes, to_wgpu_alpha(config.alpha_mode));
        let init = device.init();
        let backing = self.backing.get();
        let size = PhysicalSize::new(backing.width.max(1), backing.height.max(1));

        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width,
            height: size.height,
            present_mode: init.present_mode,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: init.desired_maximum_frame_latency,
        };
        self.surface.configure(device.device(), &surface_config);
        debug!(
            "surface configured: {format:?} {}x{} {alpha_mode:?}",
            size.width, size.height
        );

        self.configured = Some(Configured {
            device: device.device().clone(),
            config: surface_config,
            size,
        });
        Ok(())
    }

    fn current_texture(&mut self) -> Option<WgpuTexture> {
        let configured = self.configured.as_mut()?;
        if !configured.follow_backing(&self.surface, self.backing.get()) {
            return None;
        }

        match self.surface.get_current_texture() {
            Ok(texture) => Some(WgpuTexture::new(texture)),
            Err(err) => match configured.recover(&self.surface, &err) {
                SurfaceErrorAction::Reconfigured => {
                    self.surface.get_current_texture().ok().map(WgpuTexture::new)
                }
                SurfaceErrorAction::SkipFrame => {
                    warn!("surface texture unavailable, skipping frame: {err}");
                    None
                }
                SurfaceErrorAction::Fatal => {
                    error!("surface failed: {err}");
                    None
                }
            },
        }
    }

    fn unconfigure(&mut self) -> bool {
        if self.configured.take().is_some() {
            debug!("surface configuration released");
        }
        true
    }
}

fn to_wgpu_alpha(mode: AlphaMode) -> wgpu::CompositeAlphaMode {
    match mode {
        AlphaMode::Premultiplied => wgpu::CompositeAlphaMode::PreMultiplied,
        AlphaMode::Opaque => wgpu::CompositeAlphaMode::Opaque,
    }
}

/// `requested` when supported, else the surface's first mode, else `Auto`.
pub(crate) fn choose_alpha_mode(
    supported: &[wgpu::CompositeAlphaMode],
    requested: wgpu::CompositeAlphaMode,
) -> wgpu::CompositeAlphaMode {
    Some(requested)
        .filter(|m| supported.contains(m))
        .or_else(|| supported.first().copied())
        .unwrap_or(wgpu::CompositeAlphaMode::Auto)
}

impl Configured {
    fn drawable(&self) -> bool {
        self.size.width > 0 && self.size.height > 0
    }

    /// Reconfigures for a changed backing size. wgpu cannot configure a 0x0
    /// surface, so such a size is only recorded. Returns whether the surface
    /// can be drawn to.
    fn follow_backing(&mut self, surface: &wgpu::Surface, backing: PhysicalSize<u32>) -> bool {
        if backing != self.size {
            self.size = backing;
            if self.drawable() {
                self.config.width = backing.width;
                self.config.height = backing.height;
                surface.configure(&self.device, &self.config);
                debug!("surface resized to {}x{}", backing.width, backing.height);
            }
        }
        self.drawable()
    }

    /// Lost and outdated surfaces are configured again in place.
    fn recover(&self, surface: &wgpu::Surface, err: &wgpu::SurfaceError) -> SurfaceErrorAction {
        let action = surface_error_action(err);
        if action == SurfaceErrorAction::Reconfigured && self.drawable() {
            surface.configure(&self.device, &self.config);
        }
        action
    }
}

fn surface_error_action(err: &wgpu::SurfaceError) -> SurfaceErrorAction {
    match err {
        wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => SurfaceErrorAction::Reconfigured,
        wgpu::SurfaceError::OutOfMemory => SurfaceErrorAction::Fatal,
        wgpu::SurfaceError::Timeout | wgpu::SurfaceError::Other => SurfaceErrorAction::SkipFrame,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FALLBACK_FORMAT;
    use wgpu::CompositeAlphaMode as Alpha;
    use wgpu::TextureFormat as Tf;

    #[test]
    fn canvas_format_names_resolve() {
        assert_eq!(parse_texture_format(FALLBACK_FORMAT), Some(Tf::Bgra8Unorm));
        assert_eq!(parse_texture_format(" RGBA16Float "), Some(Tf::Rgba16Float));
        assert_eq!(parse_texture_format("rgb10a2unorm"), Some(Tf::Rgb10a2Unorm));
        assert_eq!(parse_texture_format("depth24plus"), None);
        assert_eq!(parse_texture_format(""), None);
    }

    #[test]
    fn every_mapped_format_has_its_name() {
        for &(name, format) in FORMATS {
            assert_eq!(texture_format_name(format), Some(name));
        }
        assert_eq!(texture_format_name(Tf::R8Unorm), None);
    }

    #[test]
    fn alpha_mode_prefers_request_then_first_supported() {
        let supported = [Alpha::Opaque, Alpha::PreMultiplied];
        assert_eq!(choose_alpha_mode(&supported, Alpha::PreMultiplied), Alpha::PreMultiplied);
        assert_eq!(choose_alpha_mode(&[Alpha::Opaque], Alpha::PreMultiplied), Alpha::Opaque);
        assert_eq!(choose_alpha_mode(&[], Alpha::Opaque), Alpha::Auto);
    }

    #[test]
    fn only_lost_or_outdated_surfaces_are_reconfigured() {
        use wgpu::SurfaceError;
        assert_eq!(surface_error_action(&SurfaceError::Lost), SurfaceErrorAction::Reconfigured);
        assert_eq!(surface_error_action(&SurfaceError::Outdated), SurfaceErrorAction::Reconfigured);
        assert_eq!(surface_error_action(&SurfaceError::Timeout), SurfaceErrorAction::SkipFrame);
        assert_eq!(surface_error_action(&SurfaceError::Other), SurfaceErrorAction::SkipFrame);
        assert_eq!(surface_error_action(&SurfaceError::OutOfMemory), SurfaceErrorAction::Fatal);
    }

    #[test]
    fn alpha_flag_maps_to_composite_mode() {
        assert_eq!(to_wgpu_alpha(AlphaMode::from_alpha(true)), Alpha::PreMultiplied);
        assert_eq!(to_wgpu_alpha(AlphaMode::from_alpha(false)), Alpha::Opaque);
    }
}
