use std::sync::Arc;

use auth::Authenticator;

use crate::domain::account::errors::GuardError;
use crate::domain::account::models::User;
use crate::domain::account::models::Username;
use crate::domain::account::ports::AccountServicePort;

/// Resolves bearer tokens to registered users.
///
/// Every way a token can fail (malformed, forged, expired, no subject,
/// subject no longer registered) collapses into `GuardError::Unauthorized`;
/// the specific reason is only logged.
pub struct AuthGuard {
    authenticator: Arc<Authenticator>,
    accounts: Arc<dyn AccountServicePort>,
}

impl AuthGuard {
    pub fn new(authenticator: Arc<Authenticator>, accounts: Arc<dyn AccountServicePort>) -> Self {
        Self {
            authenticator,
            accounts,
        }
    }

    /// Resolve `token` to the user it was issued for.
    ///
    /// # Errors
    /// * `Unauthorized` - Token rejected or its subject is not a registered user
    /// * `Account` - User lookup failed
    pub async fn resolve(&self, token: &str) -> Result<User, GuardError> {
        let subject = self.authenticator.validate_token(token).map_err(|e| {
            tracing::warn!(reason = %e, "Token rejected");
            GuardError::Unauthorized
        })?;

        let username = Username::new(subject).map_err(|e| {
            tracing::warn!(reason = %e, "Token subject is not a valid username");
            GuardError::Unauthorized
        })?;

        match self.accounts.find_by_username(&username).await? {
            Some(user) => Ok(user),
            None => {
                tracing::warn!(username = %username, "Token subject is not a registered user");
                Err(GuardError::Unauthorized)
            }
        }
    }
}
