//! Error taxonomy shared by every points operation.
//!
//! Each variant names a failure *kind*; the transport layer decides how a kind
//! is presented (see `io::rest::error`). Storage failures arrive as
//! `anyhow::Error` with context attached and become [`PointsError::Internal`].

pub type PointsResult<T> = std::result::Result<T, PointsError>;

#[derive(Debug, thiserror::Error)]
pub enum PointsError {
    /// Caller-supplied data failed shape or business rules
    #[error("invalid input: {}", .0.join("; "))]
    InvalidInput(Vec<String>),

    /// No resolvable identity
    #[error("unauthenticated: {0}")]
    Unauthenticated(String),

    /// Identity resolved but lacks permission for the target records
    #[error("access denied: {0}")]
    AccessDenied(String),

    #[error("resource not found: {0}")]
    NotFound(String),

    /// Structurally valid but inconsistent with the current state
    #[error("bad request: {0}")]
    BadRequest(String),

    /// A conditional write lost a race; the caller may retry
    #[error("conflict: {0}")]
    Conflict(String),

    #[error("{0:#}")]
    Internal(#[from] anyhow::Error),
}

impl PointsError {
    /// Stable machine-readable name of the error kind
    pub fn code(&self) -> &'static str {
        match self {
            PointsError::InvalidInput(_) => "INVALID_INPUT",
            PointsError::Unauthenticated(_) => "UNAUTHENTICATED",
            PointsError::AccessDenied(_) => "ACCESS_DENIED",
            PointsError::NotFound(_) => "NOT_FOUND",
            PointsError::BadRequest(_) => "BAD_REQUEST",
            PointsError::Conflict(_) => "CONFLICT",
            PointsError::Internal(_) => "INTERNAL",
        }
    }

    /// Individual field messages carried by an `InvalidInput` failure
    pub fn field_errors(&self) -> &[String] {
        match self {
            PointsError::InvalidInput(errors) => errors,
            _ => &[],
        }
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self, PointsError::Conflict(_))
    }
}
