use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::StatusCode;
use serde::Deserialize;
use serde::Serialize;

use crate::domain::email::errors::UpstreamFailure;
use crate::domain::email::models::TextGenerationRequest;
use crate::domain::email::models::UpstreamStatus;
use crate::domain::email::ports::TextGenerator;

/// Text generator backed by a Hugging Face hosted inference endpoint.
///
/// One instance per model URL. The API token is sent as a bearer credential
/// and never appears in returned errors.
pub struct HuggingFaceTextGenerator {
    http_client: Client,
    endpoint: String,
    api_token: String,
    timeout: Duration,
}

#[derive(Debug, Serialize)]
struct InferencePayload<'a> {
    inputs: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    parameters: Option<InferenceParameters>,
}

#[derive(Debug, Serialize)]
struct InferenceParameters {
    max_new_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct GeneratedText {
    generated_text: String,
}

/// Text-generation pipelines answer with a list; some models answer with a bare object.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum InferenceResponse {
    Batch(Vec<GeneratedText>),
    Single(GeneratedText),
}

impl InferenceResponse {
    fn into_text(self) -> Option<String> {
        match self {
            InferenceResponse::Batch(items) => items.into_iter().next().map(|g| g.generated_text),
            InferenceResponse::Single(item) => Some(item.generated_text),
        }
    }
}

impl HuggingFaceTextGenerator {
    /// Create a generator for one model endpoint.
    ///
    /// # Arguments
    /// * `http_client` - Shared reqwest client
    /// * `endpoint` - Full model URL, e.g. `https://api-inference.huggingface.co/models/<model>`
    /// * `api_token` - Inference API token
    /// * `timeout` - Per-request timeout
    pub fn new(
        http_client: Client,
        endpoint: impl Into<String>,
        api_token: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            http_client,
            endpoint: endpoint.into(),
            api_token: api_token.into(),
            timeout,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl TextGenerator for HuggingFaceTextGenerator {
    async fn generate(&self, request: &TextGenerationRequest) -> Result<String, UpstreamFailure> {
        let payload = InferencePayload {
            inputs: &request.prompt,
            parameters: request
                .max_new_tokens
                .map(|max_new_tokens| InferenceParameters { max_new_tokens }),
        };

        let response = self
            .http_client
            .post(&self.endpoint)
            .bearer_auth(&self.api_token)
            .timeout(self.timeout)
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    UpstreamFailure::new(
                        UpstreamStatus::Timeout,
                        format!("no response within {:?}", self.timeout),
                    )
                } else {
                    UpstreamFailure::new(UpstreamStatus::Unreachable, e.to_string())
                }
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                UpstreamFailure::new(UpstreamStatus::Timeout, e.to_string())
            } else {
                UpstreamFailure::new(UpstreamStatus::Unreachable, e.to_string())
            }
        })?;

        if status != StatusCode::OK {
            tracing::debug!(endpoint = %self.endpoint, status = status.as_u16(), "Inference request rejected");
            return Err(UpstreamFailure::new(
                UpstreamStatus::Http(status.as_u16()),
                body,
            ));
        }

        serde_json::from_str::<InferenceResponse>(&body)
            .ok()
            .and_then(InferenceResponse::into_text)
            .ok_or_else(|| UpstreamFailure::new(UpstreamStatus::InvalidPayload, body))
    }
}
