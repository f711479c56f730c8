use std::fmt;

use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::account::errors::UsernameError;

/// Registered user.
///
/// Created once on registration and never modified or deleted afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub username: Username,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// User unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserId(pub Uuid);

impl UserId {
    /// Generate a new random user ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Username value type
///
/// Compared case-sensitively and stored exactly as given. The only rule is
/// that it is non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Username(String);

impl Username {
    /// Create a new valid username.
    ///
    /// # Errors
    /// * `Empty` - Username is the empty string
    pub fn new(username: String) -> Result<Self, UsernameError> {
        if username.is_empty() {
            return Err(UsernameError::Empty);
        }

        Ok(Self(username))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Command to register a new user.
///
/// Carries plaintext passwords; its `Debug` output redacts them.
pub struct RegisterCommand {
    pub username: Username,
    pub password: String,
    pub verify_password: String,
}

impl RegisterCommand {
    pub fn new(username: Username, password: String, verify_password: String) -> Self {
        Self {
            username,
            password,
            verify_password,
        }
    }
}

impl fmt::Debug for RegisterCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterCommand")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("verify_password", &"<redacted>")
            .finish()
    }
}

/// A user about to be persisted; the store assigns the identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub username: Username,
    pub password_hash: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_username_accepts_plain_names() {
        let username = Username::new("alice".to_string()).unwrap();
        assert_eq!(username.as_str(), "alice");

        assert!(Username::new("a".to_string()).is_ok());
        assert!(Username::new("josé maría".to_string()).is_ok());
    }

    #[test]
    fn test_username_is_case_sensitive() {
        let lower = Username::new("alice".to_string()).unwrap();
        let upper = Username::new("Alice".to_string()).unwrap();

        assert_ne!(lower, upper);
    }

    #[test]
    fn test_username_rejects_empty() {
        assert_eq!(Username::new(String::new()), Err(UsernameError::Empty));
    }

    #[test]
    fn test_username_accepts_long_names() {
        let long = "a".repeat(100);

        let username = Username::new(long.clone()).unwrap();

        assert_eq!(username.as_str(), long);
    }

    #[test]
    fn test_username_keeps_surrounding_whitespace() {
        let padded = Username::new("alice ".to_string()).unwrap();
        let plain = Username::new("alice".to_string()).unwrap();

        assert_eq!(padded.as_str(), "alice ");
        assert_ne!(padded, plain);
    }

    #[test]
    fn test_register_command_debug_redacts_passwords() {
        let command = RegisterCommand::new(
            Username::new("alice".to_string()).unwrap(),
            "pw1-secret".to_string(),
            "pw1-secret".to_string(),
        );

        let rendered = format!("{:?}", command);

        assert!(rendered.contains("alice"));
        assert!(!rendered.contains("pw1-secret"));
    }
}
