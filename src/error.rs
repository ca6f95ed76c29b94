//! Errors raised while binding surfaces to rendering contexts.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SurfaceError {
    /// No drawable element exists for the identifier.
    #[error("no drawable target with id `{target}`")]
    TargetNotFound { target: String },

    /// The element exists but a rendering context could not be set up on it.
    #[error("could not create a rendering context for `{target}`: {reason}")]
    ContextCreationFailed { target: String, reason: String },

    /// The browser has no graphics capability at all.
    #[error("graphics capability is not available")]
    GraphicsUnavailable,

    /// A mesh or buffer could not be allocated on an existing context.
    #[error("could not allocate rendering resources on `{target}`: {reason}")]
    ResourceAllocationFailed { target: String, reason: String },

    #[error("frame request for `{target}` failed: {reason}")]
    FrameRequestFailed { target: String, reason: String },
}

impl SurfaceError {
    /// The target this error concerns, when it is specific to one.
    #[must_use]
    pub fn target(&self) -> Option<&str> {
        match self {
            Self::TargetNotFound { target }
            | Self::ContextCreationFailed { target, .. }
            | Self::ResourceAllocationFailed { target, .. }
            | Self::FrameRequestFailed { target, .. } => Some(target),
            Self::GraphicsUnavailable => None,
        }
    }

    /// Whether the failure applies to every surface rather than one.
    #[must_use]
    pub fn is_global(&self) -> bool {
        matches!(self, Self::GraphicsUnavailable)
    }
}
