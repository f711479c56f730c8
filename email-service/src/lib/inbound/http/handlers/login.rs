use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::account::errors::AccountError;
use crate::domain::account::models::Username;
use crate::inbound::http::router::AppState;

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<ApiSuccess<LoginResponseData>, ApiError> {
    // A malformed username cannot belong to anyone; answer like a wrong password
    let username = Username::new(body.username)
        .map_err(|_| ApiError::from(AccountError::AuthenticationFailed))?;

    let subject = state
        .account_service
        .login(&username, &body.password)
        .await?;

    let issued = state
        .authenticator
        .issue_token(subject.as_str(), state.login_token_ttl)?;

    tracing::info!(username = %subject, "User logged in");

    Ok(ApiSuccess::new(
        StatusCode::OK,
        LoginResponseData {
            access_token: issued.token,
            token_type: "bearer".to_string(),
            expires_in: state.login_token_ttl.num_seconds(),
            expires_at: issued.expires_at,
        },
    ))
}

#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequest {
    username: String,
    password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginResponseData {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub expires_at: DateTime<Utc>,
}
