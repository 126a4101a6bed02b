//! Back-office sign in and sign out.

use axum::{
    extract::State,
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};

use super::{PageError, PageResult};
use crate::api::forms::{safe_return_path, LoginForm};
use crate::api::session::SessionHandle;
use crate::api::views::{admin as view, Page};
use crate::api::AppState;
use crate::domain::FlashKind;
use crate::errors::AppError;

const DASHBOARD_PATH: &str = "/admin/dashboard";

/// `GET /admin`
pub async fn admin_root(session: SessionHandle) -> Redirect {
    if session.user().await.is_some() {
        Redirect::to(DASHBOARD_PATH)
    } else {
        Redirect::to("/admin/login")
    }
}

async fn login_page(
    state: &AppState,
    session: &SessionHandle,
    username: &str,
    error: Option<&str>,
) -> Html<String> {
    let flash = session.take_flash().await;
    Html(
        Page::admin(&state.config.site_name, "Sign in", None)
            .with_flash(flash)
            .render(&view::login(username, error)),
    )
}

pub async fn login_form(State(state): State<AppState>, session: SessionHandle) -> Response {
    if session.user().await.is_some() {
        return Redirect::to(DASHBOARD_PATH).into_response();
    }
    login_page(&state, &session, "", None).await.into_response()
}

pub async fn login_submit(
    State(state): State<AppState>,
    session: SessionHandle,
    Form(form): Form<LoginForm>,
) -> PageResult {
    let username = form.username.trim();

    match state.services.auth().authenticate(username, &form.password).await {
        Ok(user) => {
            tracing::info!(username = %user.username, "Admin signed in");
            let target = session.take_return_to().await;
            session.login(user).await;
            session
                .flash(FlashKind::Success, format!("Welcome, {}", username))
                .await;
            Ok(Redirect::to(&safe_return_path(target.as_deref(), DASHBOARD_PATH)).into_response())
        }
        Err(AppError::InvalidCredentials) => {
            tracing::warn!(username = %username, "Failed sign in");
            Ok(login_page(&state, &session, username, Some("Invalid username or password"))
                .await
                .into_response())
        }
        Err(e) => Err(PageError(e)),
    }
}

pub async fn logout(session: SessionHandle) -> Redirect {
    if let Some(user) = session.user().await {
        tracing::info!(username = %user.username, "Admin signed out");
    }
    session.logout().await;
    Redirect::to("/admin/login")
}
