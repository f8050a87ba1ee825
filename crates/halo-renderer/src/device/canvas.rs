use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

use log::debug;
use winit::dpi::{LogicalSize, PhysicalSize};
use winit::window::Window;

use super::surface::WgpuContext;
use crate::config::SURFACE_CONTEXT_KIND;
use crate::platform::{CanvasTarget, Document};

/// A winit window used as a canvas.
///
/// The backing size is tracked in physical pixels and shared with every
/// context created from this canvas. The display size maps to the window's
/// logical inner size; the pixel ratio is the window scale factor.
#[derive(Clone)]
pub struct WindowCanvas {
    window: Arc<Window>,
    instance: wgpu::Instance,
    backing: Rc<Cell<PhysicalSize<u32>>>,
}

impl WindowCanvas {
    pub fn new(window: Arc<Window>, instance: wgpu::Instance) -> Self {
        let backing = Rc::new(Cell::new(window.inner_size()));
        Self {
            window,
            instance,
            backing,
        }
    }

    pub fn window(&self) -> &Arc<Window> {
        &self.window
    }
}

impl fmt::Debug for WindowCanvas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WindowCanvas")
            .field("window", &self.window.id())
            .field("backing", &self.backing.get())
            .finish()
    }
}

impl CanvasTarget for WindowCanvas {
    type Context = WgpuContext;

    fn width(&self) -> u32 {
        self.backing.get().width
    }

    fn height(&self) -> u32 {
        self.backing.get().height
    }

    fn set_size(&mut self, width: u32, height: u32) {
        self.backing.set(PhysicalSize::new(width, height));
    }

    fn set_display_size(&mut self, width: u32, height: u32) -> bool {
        let current: LogicalSize<f64> = self.window.inner_size().to_logical(self.window.scale_factor());
        let unchanged =
            current.width.floor() as u32 == width && current.height.floor() as u32 == height;
        if !unchanged {
            // Platforms may ignore or adjust the request; a `Resized` event follows if applied.
            let _ = self
                .window
                .request_inner_size(LogicalSize::new(f64::from(width), f64::from(height)));
        }
        true
    }

    fn device_pixel_ratio(&self) -> Option<f64> {
        Some(self.window.scale_factor())
    }

    fn context(&mut self, kind: &str) -> Option<WgpuContext> {
        if kind != SURFACE_CONTEXT_KIND {
            return None;
        }
        match self.instance.create_surface(Arc::clone(&self.window)) {
            Ok(surface) => Some(WgpuContext::new(surface, Rc::clone(&self.backing))),
            Err(err) => {
                debug!("failed to create wgpu surface: {err}");
                None
            }
        }
    }
}

/// Selector → canvas lookup table; the document of the wgpu backend.
///
/// Selectors are matched verbatim after trimming. Clones share the same table.
pub struct CanvasRegistry<C = WindowCanvas> {
    canvases: Rc<RefCell<HashMap<String, C>>>,
}

impl<C> Default for CanvasRegistry<C> {
    fn default() -> Self {
        Self {
            canvases: Rc::default(),
        }
    }
}

impl<C> Clone for CanvasRegistry<C> {
    fn clone(&self) -> Self {
        Self {
            canvases: Rc::clone(&self.canvases),
        }
    }
}

impl<C: Clone> CanvasRegistry<C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `canvas` under `selector`, returning the canvas it replaced.
    pub fn register(&self, selector: impl Into<String>, canvas: C) -> Option<C> {
        let selector = selector.into().trim().to_string();
        self.canvases.borrow_mut().insert(selector, canvas)
    }

    pub fn remove(&self, selector: &str) -> Option<C> {
        self.canvases.borrow_mut().remove(selector.trim())
    }

    pub fn len(&self) -> usize {
        self.canvases.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.canvases.borrow().is_empty()
    }
}

impl<C: Clone> Document for CanvasRegistry<C> {
    type Canvas = C;

    fn query_selector(&self, selector: &str) -> Option<C> {
        self.canvases.borrow().get(selector.trim()).cloned()
    }
}

impl<C> fmt::Debug for CanvasRegistry<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let canvases = self.canvases.borrow();
        let mut selectors: Vec<&String> = canvases.keys().collect();
        selectors.sort();
        f.debug_struct("CanvasRegistry")
            .field("selectors", &selectors)
            .finish()
    }
}
