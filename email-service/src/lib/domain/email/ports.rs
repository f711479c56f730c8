use async_trait::async_trait;

use crate::domain::account::models::UserId;
use crate::domain::email::errors::EmailError;
use crate::domain::email::errors::UpstreamFailure;
use crate::domain::email::models::EmailGenerationRequest;
use crate::domain::email::models::EmailGenerationResult;
use crate::domain::email::models::HistoryEntry;
use crate::domain::email::models::NewHistoryEntry;
use crate::domain::email::models::TextGenerationRequest;

/// Port for email operations exposed to the inbound layer.
#[async_trait]
pub trait EmailServicePort: Send + Sync + 'static {
    /// Generate an email for `owner` and record it in their history.
    ///
    /// # Errors
    /// * `Generation` - Subject too long, an upstream stage failed, or no marker
    async fn generate_email(
        &self,
        owner: &UserId,
        request: EmailGenerationRequest,
    ) -> Result<EmailGenerationResult, EmailError>;

    /// List `owner`'s past generations, newest first.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn list_history(&self, owner: &UserId) -> Result<Vec<HistoryEntry>, EmailError>;
}

/// A hosted text-generation endpoint.
#[async_trait]
pub trait TextGenerator: Send + Sync + 'static {
    /// Run one generation and return the generated text.
    ///
    /// # Errors
    /// * `UpstreamFailure` - Non-success status, transport failure, or unusable payload
    async fn generate(&self, request: &TextGenerationRequest) -> Result<String, UpstreamFailure>;
}

/// Persistence operations for generation history.
#[async_trait]
pub trait EmailHistoryRepository: Send + Sync + 'static {
    /// Append an entry, assigning its identifier and timestamp.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn append(&self, entry: NewHistoryEntry) -> Result<HistoryEntry, EmailError>;

    /// Entries owned by `user_id`, newest first.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<HistoryEntry>, EmailError>;
}
