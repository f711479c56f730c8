//! Authentication primitives for the email service.
//!
//! - Password hashing (Argon2id, salted PHC strings)
//! - Signed token issuance and validation (HS256 JWT)
//! - `Authenticator`, which coordinates the two
//!
//! Nothing here performs I/O; every type is safe to share across tasks.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &hash).unwrap());
//! ```
//!
//! ## Tokens
//! ```
//! use auth::TokenService;
//! use chrono::Duration;
//!
//! let tokens = TokenService::new(b"secret_key_at_least_32_bytes_long!");
//! let issued = tokens.issue("alice", Duration::minutes(30)).unwrap();
//! assert_eq!(tokens.validate(&issued.token).unwrap(), "alice");
//! ```
//!
//! ## Complete Authentication Flow
//! ```
//! use auth::Authenticator;
//! use chrono::Duration;
//!
//! let auth = Authenticator::new(b"secret_key_at_least_32_bytes_long!");
//!
//! // Register: hash password
//! let hash = auth.hash_password("password123").unwrap();
//!
//! // Login: verify, then issue a token for the username
//! auth.authenticate("password123", &hash).unwrap();
//! let issued = auth.issue_token("alice", Duration::minutes(30)).unwrap();
//!
//! // Protected request: validate token back to the username
//! assert_eq!(auth.validate_token(&issued.token).unwrap(), "alice");
//! ```

pub mod authenticator;
pub mod jwt;
pub mod password;

// Re-export commonly used items
pub use authenticator::AuthenticationError;
pub use authenticator::Authenticator;
pub use jwt::Claims;
pub use jwt::IssuedToken;
pub use jwt::TokenError;
pub use jwt::TokenService;
pub use password::PasswordError;
pub use password::PasswordHasher;
