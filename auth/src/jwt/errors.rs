use thiserror::Error;

/// Error type for token issuance and validation.
///
/// Callers exposing tokens to clients should collapse every validation
/// variant into a single "unauthorized" outcome; the variants exist so the
/// reason can be logged.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),

    #[error("Token is malformed: {0}")]
    Malformed(String),

    #[error("Token signature is invalid")]
    InvalidSignature,

    #[error("Token is expired")]
    Expired,

    #[error("Token has no subject")]
    MissingSubject,
}
