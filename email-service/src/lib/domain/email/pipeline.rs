use std::sync::Arc;
use std::time::Duration;

use crate::domain::email::errors::GenerationError;
use crate::domain::email::models::extract_email_body;
use crate::domain::email::models::format_prompt;
use crate::domain::email::models::normalize_prompt;
use crate::domain::email::models::EmailGenerationRequest;
use crate::domain::email::models::EmailGenerationResult;
use crate::domain::email::models::Stage;
use crate::domain::email::models::TextGenerationRequest;
use crate::domain::email::models::UpstreamStatus;
use crate::domain::email::models::MAX_SUBJECT_CHARS;
use crate::domain::email::ports::TextGenerator;

/// Translate-then-format pipeline over two text-generation endpoints.
///
/// The stages run strictly in order since the format prompt embeds the
/// normalize output. Each stage is bounded by `stage_timeout`; nothing is
/// retried. Dropping the returned future cancels the in-flight call.
pub struct GenerationPipeline<N, F>
where
    N: TextGenerator,
    F: TextGenerator,
{
    normalizer: Arc<N>,
    formatter: Arc<F>,
    max_new_tokens: u32,
    stage_timeout: Duration,
}

impl<N, F> GenerationPipeline<N, F>
where
    N: TextGenerator,
    F: TextGenerator,
{
    pub const DEFAULT_MAX_NEW_TOKENS: u32 = 1024;
    pub const DEFAULT_STAGE_TIMEOUT: Duration = Duration::from_secs(20);

    pub fn new(normalizer: Arc<N>, formatter: Arc<F>) -> Self {
        Self {
            normalizer,
            formatter,
            max_new_tokens: Self::DEFAULT_MAX_NEW_TOKENS,
            stage_timeout: Self::DEFAULT_STAGE_TIMEOUT,
        }
    }

    pub fn with_max_new_tokens(mut self, max_new_tokens: u32) -> Self {
        self.max_new_tokens = max_new_tokens;
        self
    }

    pub fn with_stage_timeout(mut self, stage_timeout: Duration) -> Self {
        self.stage_timeout = stage_timeout;
        self
    }

    /// Turn a subject line into a formatted email body.
    ///
    /// # Errors
    /// * `SubjectTooLong` - Subject exceeds 500 characters; no call is made
    /// * `Upstream` - A stage failed or timed out
    /// * `MarkerNotFound` - Formatted text has no `Subject:` line
    pub async fn generate(
        &self,
        request: EmailGenerationRequest,
    ) -> Result<EmailGenerationResult, GenerationError> {
        let length = request.subject.chars().count();
        if length > MAX_SUBJECT_CHARS {
            return Err(GenerationError::SubjectTooLong {
                max: MAX_SUBJECT_CHARS,
                actual: length,
            });
        }

        let english = self
            .run_stage(
                Stage::Normalize,
                self.normalizer.as_ref(),
                TextGenerationRequest::new(normalize_prompt(&request.subject)),
            )
            .await?;

        let formatted = self
            .run_stage(
                Stage::Format,
                self.formatter.as_ref(),
                TextGenerationRequest::new(format_prompt(&english, &request.tone))
                    .with_max_new_tokens(self.max_new_tokens),
            )
            .await?;

        let body = extract_email_body(&formatted).ok_or_else(|| {
            tracing::warn!(
                generated_chars = formatted.chars().count(),
                "Formatted text has no subject marker"
            );
            GenerationError::MarkerNotFound
        })?;

        Ok(EmailGenerationResult {
            subject: request.subject,
            tone: request.tone,
            body: body.to_string(),
        })
    }

    async fn run_stage<G>(
        &self,
        stage: Stage,
        generator: &G,
        request: TextGenerationRequest,
    ) -> Result<String, GenerationError>
    where
        G: TextGenerator,
    {
        tracing::debug!(%stage, prompt_chars = request.prompt.chars().count(), "Stage started");

        let outcome = tokio::time::timeout(self.stage_timeout, generator.generate(&request)).await;

        match outcome {
            Ok(Ok(text)) => {
                tracing::debug!(%stage, generated_chars = text.chars().count(), "Stage completed");
                Ok(text)
            }
            Ok(Err(failure)) => {
                tracing::warn!(%stage, status = %failure.status, body = %failure.body, "Stage failed");
                Err(GenerationError::Upstream {
                    stage,
                    status: failure.status,
                    body: failure.body,
                })
            }
            Err(_) => {
                tracing::warn!(%stage, timeout_ms = self.stage_timeout.as_millis() as u64, "Stage timed out");
                Err(GenerationError::Upstream {
                    stage,
                    status: UpstreamStatus::Timeout,
                    body: format!("no response within {:?}", self.stage_timeout),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use mockall::mock;

    use super::*;
    use crate::domain::email::errors::UpstreamFailure;
    use crate::domain::email::models::Tone;

    mock! {
        pub TestTextGenerator {}

        #[async_trait]
        impl TextGenerator for TestTextGenerator {
            async fn generate(&self, request: &TextGenerationRequest) -> Result<String, UpstreamFailure>;
        }
    }

    struct SlowTextGenerator;

    #[async_trait]
    impl TextGenerator for SlowTextGenerator {
        async fn generate(&self, _request: &TextGenerationRequest) -> Result<String, UpstreamFailure> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok("too late".to_string())
        }
    }

    fn pipeline(
        normalizer: MockTestTextGenerator,
        formatter: MockTestTextGenerator,
    ) -> GenerationPipeline<MockTestTextGenerator, MockTestTextGenerator> {
        GenerationPipeline::new(Arc::new(normalizer), Arc::new(formatter))
    }

    #[tokio::test]
    async fn test_generate_translates_then_formats() {
        let mut normalizer = MockTestTextGenerator::new();
        let mut formatter = MockTestTextGenerator::new();

        normalizer
            .expect_generate()
            .withf(|request| {
                request.prompt == "convert this into English: Hola, ¿cómo estás?"
                    && request.max_new_tokens.is_none()
            })
            .times(1)
            .returning(|_| Ok("How are you?".to_string()));
        formatter
            .expect_generate()
            .withf(|request| {
                request.prompt
                    == "Please reformat the following text as a formal tone English email: How are you?"
                    && request.max_new_tokens == Some(1024)
            })
            .times(1)
            .returning(|_| Ok("Greeting...\nSubject: How are you?\nBody...".to_string()));

        let result = pipeline(normalizer, formatter)
            .generate(EmailGenerationRequest::new(
                "Hola, ¿cómo estás?",
                Some(Tone::new("formal")),
            ))
            .await
            .expect("Generation failed");

        assert_eq!(result.subject, "Hola, ¿cómo estás?");
        assert_eq!(result.tone.as_str(), "formal");
        assert_eq!(result.body, "Subject: How are you?\nBody...");
    }

    #[tokio::test]
    async fn test_subject_too_long_makes_no_calls() {
        let mut normalizer = MockTestTextGenerator::new();
        let mut formatter = MockTestTextGenerator::new();
        normalizer.expect_generate().times(0);
        formatter.expect_generate().times(0);

        let result = pipeline(normalizer, formatter)
            .generate(EmailGenerationRequest::new("a".repeat(501), None))
            .await;

        assert_eq!(
            result,
            Err(GenerationError::SubjectTooLong {
                max: 500,
                actual: 501
            })
        );
    }

    #[tokio::test]
    async fn test_subject_length_counts_characters() {
        let mut normalizer = MockTestTextGenerator::new();
        let mut formatter = MockTestTextGenerator::new();
        normalizer
            .expect_generate()
            .times(1)
            .returning(|_| Ok("Hello".to_string()));
        formatter
            .expect_generate()
            .times(1)
            .returning(|_| Ok("Subject: Hello".to_string()));

        // 500 two-byte characters: 1000 bytes but within the limit
        let result = pipeline(normalizer, formatter)
            .generate(EmailGenerationRequest::new("é".repeat(500), None))
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_normalize_failure_skips_format() {
        let mut normalizer = MockTestTextGenerator::new();
        let mut formatter = MockTestTextGenerator::new();
        normalizer.expect_generate().times(1).returning(|_| {
            Err(UpstreamFailure::new(
                UpstreamStatus::Http(503),
                "Model is currently loading",
            ))
        });
        formatter.expect_generate().times(0);

        let result = pipeline(normalizer, formatter)
            .generate(EmailGenerationRequest::new("Hola", None))
            .await;

        assert_eq!(
            result,
            Err(GenerationError::Upstream {
                stage: Stage::Normalize,
                status: UpstreamStatus::Http(503),
                body: "Model is currently loading".to_string(),
            })
        );
    }

    #[tokio::test]
    async fn test_format_failure_is_attributed_to_format_stage() {
        let mut normalizer = MockTestTextGenerator::new();
        let mut formatter = MockTestTextGenerator::new();
        normalizer
            .expect_generate()
            .returning(|_| Ok("Hello".to_string()));
        formatter
            .expect_generate()
            .times(1)
            .returning(|_| Err(UpstreamFailure::new(UpstreamStatus::Http(429), "rate limited")));

        let result = pipeline(normalizer, formatter)
            .generate(EmailGenerationRequest::new("Hola", None))
            .await;

        assert!(matches!(
            result,
            Err(GenerationError::Upstream {
                stage: Stage::Format,
                status: UpstreamStatus::Http(429),
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_missing_marker_is_an_error() {
        let mut normalizer = MockTestTextGenerator::new();
        let mut formatter = MockTestTextGenerator::new();
        normalizer
            .expect_generate()
            .returning(|_| Ok("Hello".to_string()));
        formatter
            .expect_generate()
            .returning(|_| Ok("Dear colleague, hello.".to_string()));

        let result = pipeline(normalizer, formatter)
            .generate(EmailGenerationRequest::new("Hola", None))
            .await;

        assert_eq!(result, Err(GenerationError::MarkerNotFound));
    }

    #[tokio::test]
    async fn test_neutral_tone_and_custom_token_budget() {
        let mut normalizer = MockTestTextGenerator::new();
        let mut formatter = MockTestTextGenerator::new();
        normalizer
            .expect_generate()
            .returning(|_| Ok("Hello".to_string()));
        formatter
            .expect_generate()
            .withf(|request| {
                request.prompt.contains("as a neutral tone") && request.max_new_tokens == Some(256)
            })
            .times(1)
            .returning(|_| Ok("Subject: Hello".to_string()));

        let result = pipeline(normalizer, formatter)
            .with_max_new_tokens(256)
            .generate(EmailGenerationRequest::new("Hola", None))
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_stage_timeout() {
        let mut formatter = MockTestTextGenerator::new();
        formatter.expect_generate().times(0);

        let pipeline = GenerationPipeline::new(Arc::new(SlowTextGenerator), Arc::new(formatter))
            .with_stage_timeout(Duration::from_millis(50));

        let result = pipeline
            .generate(EmailGenerationRequest::new("Hola", None))
            .await;

        assert!(matches!(
            result,
            Err(GenerationError::Upstream {
                stage: Stage::Normalize,
                status: UpstreamStatus::Timeout,
                ..
            })
        ));
    }
}
