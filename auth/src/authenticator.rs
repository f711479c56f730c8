use chrono::Duration;

use crate::jwt::IssuedToken;
use crate::jwt::TokenError;
use crate::jwt::TokenService;
use crate::password::PasswordError;
use crate::password::PasswordHasher;

/// Authentication coordinator combining password hashing and token handling.
///
/// Built once at startup from the configured signing secret and shared by
/// reference; it holds no mutable state.
#[derive(Clone)]
pub struct Authenticator {
    password_hasher: PasswordHasher,
    token_service: TokenService,
}

/// Authentication operation errors.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum AuthenticationError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Password error: {0}")]
    PasswordError(#[from] PasswordError),
}

impl Authenticator {
    /// Create a new authenticator signing tokens with `jwt_secret`.
    pub fn new(jwt_secret: &[u8]) -> Self {
        Self {
            password_hasher: PasswordHasher::new(),
            token_service: TokenService::new(jwt_secret),
        }
    }

    /// Override the token lifetime used by [`issue_default_token`](Self::issue_default_token).
    pub fn with_default_token_ttl(mut self, ttl: Duration) -> Self {
        self.token_service = self.token_service.with_default_ttl(ttl);
        self
    }

    /// Hash a password for storage.
    ///
    /// # Errors
    /// * `PasswordError` - Hashing operation failed
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Check a plaintext password against a stored hash.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Password does not match
    /// * `PasswordError` - Stored hash could not be read
    pub fn authenticate(&self, password: &str, stored_hash: &str) -> Result<(), AuthenticationError> {
        if self.password_hasher.verify(password, stored_hash)? {
            Ok(())
        } else {
            Err(AuthenticationError::InvalidCredentials)
        }
    }

    /// Issue a signed token for `subject` valid for `ttl`.
    ///
    /// # Errors
    /// * `EncodingFailed` - Token generation failed
    pub fn issue_token(&self, subject: &str, ttl: Duration) -> Result<IssuedToken, TokenError> {
        self.token_service.issue(subject, ttl)
    }

    /// Issue a signed token for `subject` with the default lifetime.
    ///
    /// # Errors
    /// * `EncodingFailed` - Token generation failed
    pub fn issue_default_token(&self, subject: &str) -> Result<IssuedToken, TokenError> {
        self.token_service.issue_default(subject)
    }

    /// Validate a token and return its subject.
    ///
    /// # Errors
    /// * `TokenError` - Token is malformed, forged, expired or has no subject
    pub fn validate_token(&self, token: &str) -> Result<String, TokenError> {
        self.token_service.validate(token)
    }

    pub fn token_service(&self) -> &TokenService {
        &self.token_service
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"test_secret_key_at_least_32_bytes!";

    #[test]
    fn test_authenticate_success() {
        let authenticator = Authenticator::new(SECRET);
        let hash = authenticator
            .hash_password("my_password")
            .expect("Failed to hash password");

        assert_eq!(authenticator.authenticate("my_password", &hash), Ok(()));
    }

    #[test]
    fn test_authenticate_invalid_password() {
        let authenticator = Authenticator::new(SECRET);
        let hash = authenticator
            .hash_password("my_password")
            .expect("Failed to hash password");

        let result = authenticator.authenticate("wrong_password", &hash);

        assert_eq!(result, Err(AuthenticationError::InvalidCredentials));
    }

    #[test]
    fn test_authenticate_unreadable_hash() {
        let authenticator = Authenticator::new(SECRET);

        let result = authenticator.authenticate("my_password", "garbage");

        assert!(matches!(result, Err(AuthenticationError::PasswordError(_))));
    }

    #[test]
    fn test_issue_and_validate_token() {
        let authenticator = Authenticator::new(SECRET);

        let issued = authenticator
            .issue_token("alice", Duration::minutes(30))
            .expect("Failed to issue token");

        assert_eq!(
            authenticator.validate_token(&issued.token),
            Ok("alice".to_string())
        );
    }

    #[test]
    fn test_default_token_ttl_override() {
        let authenticator =
            Authenticator::new(SECRET).with_default_token_ttl(Duration::minutes(5));

        assert_eq!(
            authenticator.token_service().default_ttl(),
            Duration::minutes(5)
        );
        let issued = authenticator.issue_default_token("alice").unwrap();
        assert_eq!(
            authenticator.validate_token(&issued.token),
            Ok("alice".to_string())
        );
    }

    #[test]
    fn test_validate_invalid_token() {
        let authenticator = Authenticator::new(SECRET);

        assert!(authenticator.validate_token("invalid.token.here").is_err());
    }
}
