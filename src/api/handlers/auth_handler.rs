//! API token issue.

use axum::{extract::State, routing::post, Router};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::errors::AppResult;
use crate::services::TokenResponse;
use crate::types::ApiResponse;

/// Token request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct TokenRequest {
    /// Back-office username
    #[validate(length(min = 1, message = "Username is required"))]
    #[schema(example = "maria")]
    pub username: String,
    /// Back-office password
    #[validate(length(min = 1, message = "Password is required"))]
    #[schema(example = "SecurePass123!")]
    pub password: String,
}

/// Create authentication routes
pub fn auth_routes() -> Router<AppState> {
    Router::new().route("/token", post(issue_token))
}

/// Exchange back-office credentials for a JWT
#[utoipa::path(
    post,
    path = "/api/auth/token",
    tag = "Authentication",
    request_body = TokenRequest,
    responses(
        (status = 200, description = "Token issued", body = TokenResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Invalid credentials"),
        (status = 429, description = "Too many attempts")
    )
)]
pub async fn issue_token(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<TokenRequest>,
) -> AppResult<ApiResponse<TokenResponse>> {
    let token = state
        .services
        .auth()
        .login(payload.username.trim(), &payload.password)
        .await?;

    tracing::info!(username = %payload.username.trim(), "API token issued");
    Ok(ApiResponse::success(token))
}
