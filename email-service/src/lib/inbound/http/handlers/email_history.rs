use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use chrono::DateTime;
use chrono::Utc;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::email::models::HistoryEntry;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;

pub async fn email_history(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(user)): Extension<AuthenticatedUser>,
) -> Result<ApiSuccess<Vec<HistoryEntryData>>, ApiError> {
    state
        .email_service
        .list_history(&user.id)
        .await
        .map_err(ApiError::from)
        .map(|entries| {
            ApiSuccess::new(
                StatusCode::OK,
                entries.iter().map(HistoryEntryData::from).collect(),
            )
        })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryEntryData {
    pub id: String,
    pub prompt: String,
    pub tone: String,
    pub generated_email: String,
    pub created_at: DateTime<Utc>,
}

impl From<&HistoryEntry> for HistoryEntryData {
    fn from(entry: &HistoryEntry) -> Self {
        Self {
            id: entry.id.to_string(),
            prompt: entry.prompt.clone(),
            tone: entry.tone.as_str().to_string(),
            generated_email: entry.generated_email.clone(),
            created_at: entry.created_at,
        }
    }
}
