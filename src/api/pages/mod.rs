//! Server-rendered HTML pages: the public catalog and the back office.
//!
//! Page handlers share the JSON handlers' services but answer with HTML,
//! redirects and flash messages instead of the API envelope.

pub mod auth;
pub mod catalog;
pub mod checkpoints;
pub mod contacts;
pub mod dashboard;
pub mod families;
pub mod inventory;
pub mod products;

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};

use super::middleware::CurrentUser;
use super::session::SessionHandle;
use super::views::{escape, Page};
use super::AppState;
use crate::config::DEFAULT_SITE_NAME;
use crate::domain::FlashKind;
use crate::errors::AppError;

/// An [`AppError`] rendered as an HTML page.
#[derive(Debug)]
pub struct PageError(pub AppError);

impl From<AppError> for PageError {
    fn from(err: AppError) -> Self {
        PageError(err)
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        let status = self.0.status();
        let title = match status {
            StatusCode::NOT_FOUND => "Not found",
            StatusCode::FORBIDDEN => "Access denied",
            StatusCode::UNAUTHORIZED => "Sign in required",
            s if s.is_client_error() => "Request rejected",
            _ => "Something went wrong",
        };
        let body = format!(
            r#"<p>{}</p><p><a href="/">Back to the home page</a></p>"#,
            escape(&self.0.user_message())
        );
        let html = Page::public(DEFAULT_SITE_NAME, title).render(&body);

        (status, Html(html)).into_response()
    }
}

pub type PageResult<T = Response> = Result<T, PageError>;

/// Errors the user can fix by editing the form they submitted.
///
/// Anything else is passed through and rendered as an error page.
pub fn form_message(err: AppError) -> Result<String, PageError> {
    match err {
        AppError::Validation(_)
        | AppError::BadRequest(_)
        | AppError::AlreadyExists(_)
        | AppError::Conflict(_) => Ok(err.user_message()),
        other => Err(PageError(other)),
    }
}

/// Render a public page with the visitor's pending flash messages.
pub async fn public_page(
    state: &AppState,
    session: &SessionHandle,
    title: &str,
    body: &str,
) -> Html<String> {
    let flash = session.take_flash().await;
    Html(
        Page::public(&state.config.site_name, title)
            .with_flash(flash)
            .render(body),
    )
}

/// Render a back-office page for the signed-in user.
pub async fn admin_page(
    state: &AppState,
    session: &SessionHandle,
    user: &CurrentUser,
    title: &str,
    body: &str,
) -> Html<String> {
    let flash = session.take_flash().await;
    Html(
        Page::admin(&state.config.site_name, title, Some(&user.0))
            .with_flash(flash)
            .render(body),
    )
}

/// Flash a message and redirect (303) to `to`.
pub async fn flash_redirect(
    session: &SessionHandle,
    kind: FlashKind,
    message: impl Into<String>,
    to: &str,
) -> Response {
    session.flash(kind, message).await;
    Redirect::to(to).into_response()
}

/// Finish a POST action: flash the outcome and go back to the listing.
///
/// Client errors become an error flash; server errors become an error page.
pub async fn finish_action<T>(
    session: &SessionHandle,
    result: Result<T, AppError>,
    success: impl FnOnce(T) -> String,
    to: &str,
) -> PageResult {
    match result {
        Ok(value) => Ok(flash_redirect(session, FlashKind::Success, success(value), to).await),
        Err(err) if err.status().is_client_error() => {
            tracing::debug!(error = %err, "Action rejected");
            Ok(flash_redirect(session, FlashKind::Error, err.user_message(), to).await)
        }
        Err(err) => Err(PageError(err)),
    }
}
