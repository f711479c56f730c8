use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::account::models::UserId;
use crate::domain::email::errors::EmailError;
use crate::domain::email::models::EmailGenerationRequest;
use crate::domain::email::models::EmailGenerationResult;
use crate::domain::email::models::HistoryEntry;
use crate::domain::email::models::NewHistoryEntry;
use crate::domain::email::pipeline::GenerationPipeline;
use crate::domain::email::ports::EmailHistoryRepository;
use crate::domain::email::ports::EmailServicePort;
use crate::domain::email::ports::TextGenerator;

/// Domain service for email generation and per-user history.
pub struct EmailService<N, F, HR>
where
    N: TextGenerator,
    F: TextGenerator,
    HR: EmailHistoryRepository,
{
    pipeline: GenerationPipeline<N, F>,
    history: Arc<HR>,
}

impl<N, F, HR> EmailService<N, F, HR>
where
    N: TextGenerator,
    F: TextGenerator,
    HR: EmailHistoryRepository,
{
    pub fn new(pipeline: GenerationPipeline<N, F>, history: Arc<HR>) -> Self {
        Self { pipeline, history }
    }
}

#[async_trait]
impl<N, F, HR> EmailServicePort for EmailService<N, F, HR>
where
    N: TextGenerator,
    F: TextGenerator,
    HR: EmailHistoryRepository,
{
    async fn generate_email(
        &self,
        owner: &UserId,
        request: EmailGenerationRequest,
    ) -> Result<EmailGenerationResult, EmailError> {
        let result = self.pipeline.generate(request).await?;

        // History failures are logged, never returned
        if let Err(e) = self
            .history
            .append(NewHistoryEntry::from_result(*owner, &result))
            .await
        {
            tracing::error!(
                "Failed to record generation history for user {}: {}",
                owner,
                e
            );
        }

        Ok(result)
    }

    async fn list_history(&self, owner: &UserId) -> Result<Vec<HistoryEntry>, EmailError> {
        self.history.list_for_user(owner).await
    }
}
