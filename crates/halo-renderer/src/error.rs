use thiserror::Error;

/// Failures raised by renderer creation, the frame loop and XR binding.
///
/// Every variant is terminal for the call that raised it; nothing is retried
/// internally. Use [`RendererError::kind`] to branch on the cause.
#[derive(Debug, Error)]
pub enum RendererError {
    /// No GPU runtime was supplied and none is available ambiently.
    #[error("GPU runtime unavailable: no device-capable runtime was provided")]
    RuntimeUnavailable,

    /// A selector lookup was needed but no document was supplied or ambient.
    #[error("document unavailable: provide a document to resolve canvas selectors")]
    DocumentUnavailable,

    /// The document did not contain a canvas for the selector.
    #[error("unable to find canvas for selector \"{selector}\"")]
    SurfaceTargetNotFound { selector: String },

    /// The runtime returned no adapter for the requested power preference.
    #[error("unable to obtain GPU adapter")]
    AdapterUnavailable,

    /// The adapter failed to produce a device.
    #[error("GPU device request failed")]
    DeviceRequestFailed(#[source] anyhow::Error),

    /// The canvas cannot hand out a drawable GPU context.
    #[error("unable to obtain a GPU canvas context")]
    SurfaceContextUnavailable,

    /// The context does not support (or rejected) configuration.
    #[error("canvas GPU context cannot be configured: {reason}")]
    SurfaceNotConfigurable { reason: String },

    /// The renderer has been destroyed.
    #[error("renderer was destroyed")]
    RendererDestroyed,

    /// The surface could not produce a current texture view.
    #[error("GPU context returned an invalid current texture")]
    InvalidSurfaceTexture,

    /// `render_once` was called while a frame was already being rendered.
    #[error("a frame is already in progress")]
    FrameInProgress,

    /// The session source cannot be subscribed to.
    #[error("XR session source must support subscribe(listener)")]
    InvalidSessionSource,
}

/// Field-less discriminant of [`RendererError`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ErrorKind {
    RuntimeUnavailable,
    DocumentUnavailable,
    SurfaceTargetNotFound,
    AdapterUnavailable,
    DeviceRequestFailed,
    SurfaceContextUnavailable,
    SurfaceNotConfigurable,
    RendererDestroyed,
    InvalidSurfaceTexture,
    FrameInProgress,
    InvalidSessionSource,
}

impl RendererError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::RuntimeUnavailable => ErrorKind::RuntimeUnavailable,
            Self::DocumentUnavailable => ErrorKind::DocumentUnavailable,
            Self::SurfaceTargetNotFound { .. } => ErrorKind::SurfaceTargetNotFound,
            Self::AdapterUnavailable => ErrorKind::AdapterUnavailable,
            Self::DeviceRequestFailed(_) => ErrorKind::DeviceRequestFailed,
            Self::SurfaceContextUnavailable => ErrorKind::SurfaceContextUnavailable,
            Self::SurfaceNotConfigurable { .. } => ErrorKind::SurfaceNotConfigurable,
            Self::RendererDestroyed => ErrorKind::RendererDestroyed,
            Self::InvalidSurfaceTexture => ErrorKind::InvalidSurfaceTexture,
            Self::FrameInProgress => ErrorKind::FrameInProgress,
            Self::InvalidSessionSource => ErrorKind::InvalidSessionSource,
        }
    }

    /// True for failures raised while acquiring the surface.
    pub fn is_creation_failure(&self) -> bool {
        !matches!(
            self.kind(),
            ErrorKind::RendererDestroyed
                | ErrorKind::InvalidSurfaceTexture
                | ErrorKind::FrameInProgress
                | ErrorKind::InvalidSessionSource
        )
    }
}

pub type Result<T> = std::result::Result<T, RendererError>;
