//! Optional shared password in front of the public catalog.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use crate::api::session::SessionHandle;
use crate::api::AppState;

pub const SITE_PASSWORD_PATH: &str = "/site-password";

/// Redirect visitors without site access to the password page.
///
/// Does nothing when no site password is configured. Signed-in staff always
/// pass.
pub async fn site_gate_middleware(
    State(state): State<AppState>,
    session: SessionHandle,
    request: Request,
    next: Next,
) -> Response {
    if state.config.site_password().is_none() || session.has_site_access().await {
        return next.run(request).await;
    }

    let target = request
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| "/".to_string());
    session.set_return_to(target).await;

    Redirect::to(SITE_PASSWORD_PATH).into_response()
}
