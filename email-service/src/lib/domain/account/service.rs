use std::sync::Arc;

use async_trait::async_trait;
use auth::AuthenticationError;
use auth::Authenticator;

use crate::domain::account::errors::AccountError;
use crate::domain::account::models::NewUser;
use crate::domain::account::models::RegisterCommand;
use crate::domain::account::models::User;
use crate::domain::account::models::Username;
use crate::domain::account::ports::AccountServicePort;
use crate::domain::account::ports::UserRepository;

/// Credential store: owns the user lifecycle.
///
/// Password hashing and verification run on the blocking pool.
pub struct AccountService<UR>
where
    UR: UserRepository,
{
    repository: Arc<UR>,
    authenticator: Arc<Authenticator>,
}

impl<UR> AccountService<UR>
where
    UR: UserRepository,
{
    pub fn new(repository: Arc<UR>, authenticator: Arc<Authenticator>) -> Self {
        Self {
            repository,
            authenticator,
        }
    }

    async fn hash_password(&self, password: String) -> Result<String, AccountError> {
        let authenticator = Arc::clone(&self.authenticator);

        tokio::task::spawn_blocking(move || authenticator.hash_password(&password))
            .await
            .map_err(|e| AccountError::Unknown(format!("Password hashing task failed: {}", e)))?
            .map_err(AccountError::from)
    }

    async fn check_password(&self, password: &str, stored_hash: &str) -> Result<(), AccountError> {
        let authenticator = Arc::clone(&self.authenticator);
        let password = password.to_string();
        let stored_hash = stored_hash.to_string();

        tokio::task::spawn_blocking(move || authenticator.authenticate(&password, &stored_hash))
            .await
            .map_err(|e| AccountError::Unknown(format!("Password check task failed: {}", e)))?
            .map_err(|e| match e {
                AuthenticationError::InvalidCredentials => AccountError::AuthenticationFailed,
                AuthenticationError::PasswordError(err) => AccountError::Password(err),
            })
    }
}

#[async_trait]
impl<UR> AccountServicePort for AccountService<UR>
where
    UR: UserRepository,
{
    async fn register(&self, command: RegisterCommand) -> Result<User, AccountError> {
        if self
            .repository
            .find_by_username(&command.username)
            .await?
            .is_some()
        {
            return Err(AccountError::DuplicateUsername(command.username.to_string()));
        }

        if command.password != command.verify_password {
            return Err(AccountError::PasswordMismatch);
        }

        let password_hash = self.hash_password(command.password).await?;

        let user = self
            .repository
            .create(NewUser {
                username: command.username,
                password_hash,
            })
            .await?;

        tracing::info!(user_id = %user.id, username = %user.username, "User registered");

        Ok(user)
    }

    async fn login(&self, username: &Username, password: &str) -> Result<Username, AccountError> {
        let Some(user) = self.repository.find_by_username(username).await? else {
            tracing::debug!(username = %username, "Login for unknown username");
            return Err(AccountError::AuthenticationFailed);
        };

        self.check_password(password, &user.password_hash).await?;

        Ok(user.username)
    }

    async fn find_by_username(&self, username: &Username) -> Result<Option<User>, AccountError> {
        self.repository.find_by_username(username).await
    }
}
