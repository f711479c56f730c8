use thiserror::Error;

/// Error for Username validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UsernameError {
    #[error("Username must not be empty")]
    Empty,
}

/// Top-level error for credential operations
#[derive(Debug, Clone, Error)]
pub enum AccountError {
    #[error("Invalid username: {0}")]
    InvalidUsername(#[from] UsernameError),

    #[error("Username already registered: {0}")]
    DuplicateUsername(String),

    #[error("Passwords do not match")]
    PasswordMismatch,

    /// Unknown username and wrong password share this variant.
    #[error("Invalid credentials")]
    AuthenticationFailed,

    #[error("Password error: {0}")]
    Password(#[from] auth::PasswordError),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

/// Failure to resolve a bearer token to a user.
#[derive(Debug, Clone, Error)]
pub enum GuardError {
    /// Token invalid, expired, forged, without subject, or for an unknown user.
    #[error("Unauthorized")]
    Unauthorized,

    /// The user lookup itself failed.
    #[error("Account lookup failed: {0}")]
    Account(#[from] AccountError),
}
