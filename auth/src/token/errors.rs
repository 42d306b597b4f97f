use thiserror::Error;

/// Error type for session-token operations.
///
/// `Expired` and `Invalid` are client errors (unauthorized); `Service` signals
/// a server-side defect and must map to an internal error, not a 401.
#[derive(Debug, Clone, Error)]
pub enum TokenError {
    #[error("Token has expired")]
    Expired,

    #[error("Invalid token format or signature: {0}")]
    Invalid(String),

    #[error("Token service error: {0}")]
    Service(String),
}
