use crate::config::PowerPreference;
use crate::platform::Backend;

/// Where the canvas target comes from.
pub enum CanvasSource<C> {
    /// Use this canvas directly.
    Element(C),
    /// Look the canvas up in a document. An empty selector means the default.
    Selector(String),
}

/// Options for one surface acquisition.
pub struct SurfaceOptions<B: Backend> {
    /// Canvas element or selector. `None` looks up the default selector.
    pub canvas: Option<CanvasSource<B::Canvas>>,

    /// Runtime override. `None` uses [`Backend::ambient_runtime`].
    pub runtime: Option<B::Runtime>,

    /// Document override for selector lookups. `None` uses
    /// [`Backend::ambient_document`].
    pub document: Option<B::Document>,

    pub power_preference: PowerPreference,

    /// `true` composites with premultiplied alpha, `false` is opaque.
    pub alpha: bool,

    /// Explicit pixel format. `None` asks the runtime, then falls back to
    /// [`FALLBACK_FORMAT`](crate::config::FALLBACK_FORMAT).
    pub format: Option<String>,
}

impl<B: Backend> Default for SurfaceOptions<B> {
    fn default() -> Self {
        Self {
            canvas: None,
            runtime: None,
            document: None,
            power_preference: PowerPreference::default(),
            alpha: true,
            format: None,
        }
    }
}

impl<B: Backend> SurfaceOptions<B> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn canvas(mut self, canvas: B::Canvas) -> Self {
        self.canvas = Some(CanvasSource::Element(canvas));
        self
    }

    pub fn selector(mut self, selector: impl Into<String>) -> Self {
        self.canvas = Some(CanvasSource::Selector(selector.into()));
        self
    }

    pub fn runtime(mut self, runtime: B::Runtime) -> Self {
        self.runtime = Some(runtime);
        self
    }

    pub fn document(mut self, document: B::Document) -> Self {
        self.document = Some(document);
        self
    }

    pub fn power_preference(mut self, power_preference: PowerPreference) -> Self {
        self.power_preference = power_preference;
        self
    }

    pub fn alpha(mut self, alpha: bool) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }
}
