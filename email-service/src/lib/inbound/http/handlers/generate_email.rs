use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::email::models::EmailGenerationRequest;
use crate::domain::email::models::EmailGenerationResult;
use crate::domain::email::models::Tone;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;

pub async fn generate_email(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(user)): Extension<AuthenticatedUser>,
    Json(body): Json<GenerateEmailRequest>,
) -> Result<ApiSuccess<GenerateEmailResponseData>, ApiError> {
    state
        .email_service
        .generate_email(&user.id, body.into_request())
        .await
        .map_err(ApiError::from)
        .map(|ref result| ApiSuccess::new(StatusCode::OK, result.into()))
}

/// HTTP request body for generating an email (raw JSON)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GenerateEmailRequest {
    subject: String,
    #[serde(default)]
    tone: Option<String>,
}

impl GenerateEmailRequest {
    fn into_request(self) -> EmailGenerationRequest {
        EmailGenerationRequest::new(self.subject, self.tone.map(Tone::new))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerateEmailResponseData {
    pub subject: String,
    pub tone: String,
    pub email_body: String,
}

impl From<&EmailGenerationResult> for GenerateEmailResponseData {
    fn from(result: &EmailGenerationResult) -> Self {
        Self {
            subject: result.subject.clone(),
            tone: result.tone.as_str().to_string(),
            email_body: result.body.clone(),
        }
    }
}
