use async_trait::async_trait;

use crate::domain::account::errors::AccountError;
use crate::domain::account::models::NewUser;
use crate::domain::account::models::RegisterCommand;
use crate::domain::account::models::User;
use crate::domain::account::models::Username;

/// Port for credential lifecycle operations.
#[async_trait]
pub trait AccountServicePort: Send + Sync + 'static {
    /// Register a new user.
    ///
    /// The username check runs before the password comparison, so a taken
    /// username is reported even when the two passwords differ.
    ///
    /// # Errors
    /// * `DuplicateUsername` - Username is already registered
    /// * `PasswordMismatch` - `password` and `verify_password` differ
    /// * `Password` - Hashing failed
    /// * `DatabaseError` - Database operation failed
    async fn register(&self, command: RegisterCommand) -> Result<User, AccountError>;

    /// Check credentials and return the token subject (the username).
    ///
    /// # Errors
    /// * `AuthenticationFailed` - Unknown username or wrong password
    /// * `Password` - Stored hash is unreadable
    /// * `DatabaseError` - Database operation failed
    async fn login(&self, username: &Username, password: &str) -> Result<Username, AccountError>;

    /// Look up a user by exact username.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_username(&self, username: &Username) -> Result<Option<User>, AccountError>;
}

/// Persistence operations for users.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Persist a new user, assigning its identifier and creation time.
    ///
    /// # Errors
    /// * `DuplicateUsername` - Unique constraint on username violated
    /// * `DatabaseError` - Database operation failed
    async fn create(&self, user: NewUser) -> Result<User, AccountError>;

    /// Retrieve user by username.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_username(&self, username: &Username) -> Result<Option<User>, AccountError>;
}
