use crate::plan::gate::QualityTier;

/// Convenience result type used across the render pipeline.
pub type RenderResult<T> = Result<T, RenderError>;

/// Top-level error taxonomy surfaced to render callers.
///
/// Every variant renders with a stable, taxonomy-tagged prefix so transport layers can pass the
/// message straight through.
#[derive(thiserror::Error, Debug)]
pub enum RenderError {
    /// Unknown format/quality value or otherwise malformed input.
    #[error("validation error: {0}")]
    Validation(String),

    /// Requested quality exceeds what the caller's plan permits.
    #[error(
        "authorization error: quality '{requested}' is not available on plan '{plan}'; maximum allowed quality is '{max_allowed}'"
    )]
    Authorization {
        /// Plan name the caller is subscribed to.
        plan: String,
        /// Tier that was requested.
        requested: QualityTier,
        /// Highest tier the plan allows.
        max_allowed: QualityTier,
    },

    /// Missing project, photo, agent or stored video.
    #[error("not found: {0}")]
    NotFound(String),

    /// A single input payload could not be used (e.g. undecodable photo bytes).
    #[error("resource error: {0}")]
    Resource(String),

    /// The encoder failed; nothing is persisted.
    #[error("encoding error: {0}")]
    Encoding(String),

    /// Blob write/read failure.
    #[error("storage error: {0}")]
    Storage(String),

    /// The render was cancelled through its [`CancelToken`](crate::CancelToken).
    #[error("render cancelled")]
    Cancelled,

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Closed classification of [`RenderError`] for status-code mapping.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// See [`RenderError::Validation`].
    Validation,
    /// See [`RenderError::Authorization`].
    Authorization,
    /// See [`RenderError::NotFound`].
    NotFound,
    /// See [`RenderError::Resource`].
    Resource,
    /// See [`RenderError::Encoding`].
    Encoding,
    /// See [`RenderError::Storage`].
    Storage,
    /// See [`RenderError::Cancelled`].
    Cancelled,
    /// See [`RenderError::Other`].
    Internal,
}

impl RenderError {
    /// Build a [`RenderError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`RenderError::NotFound`] value.
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Build a [`RenderError::Resource`] value.
    pub fn resource(msg: impl Into<String>) -> Self {
        Self::Resource(msg.into())
    }

    /// Build a [`RenderError::Encoding`] value.
    pub fn encoding(msg: impl Into<String>) -> Self {
        Self::Encoding(msg.into())
    }

    /// Build a [`RenderError::Storage`] value.
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::Authorization { .. } => ErrorKind::Authorization,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Resource(_) => ErrorKind::Resource,
            Self::Encoding(_) => ErrorKind::Encoding,
            Self::Storage(_) => ErrorKind::Storage,
            Self::Cancelled => ErrorKind::Cancelled,
            Self::Other(_) => ErrorKind::Internal,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
