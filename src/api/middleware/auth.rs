//! Authentication middleware for the back office and the admin API.

use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{request::Parts, Method},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};

use crate::api::session::SessionHandle;
use crate::api::AppState;
use crate::domain::{FlashKind, SessionUser};
use crate::errors::AppError;

/// Signed-in user, placed in request extensions by the auth middleware.
#[derive(Clone, Debug)]
pub struct CurrentUser(pub SessionUser);

impl CurrentUser {
    pub fn username(&self) -> &str {
        &self.0.username
    }

    pub fn is_admin(&self) -> bool {
        self.0.is_admin()
    }
}

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or(AppError::Unauthorized)
    }
}

/// Back-office pages: redirect to the login page when nobody is signed in.
pub async fn admin_session_middleware(
    session: SessionHandle,
    mut request: Request,
    next: Next,
) -> Response {
    match session.user().await {
        Some(user) => {
            request.extensions_mut().insert(CurrentUser(user));
            next.run(request).await
        }
        None => {
            if request.method() == Method::GET {
                let target = request
                    .uri()
                    .path_and_query()
                    .map(|pq| pq.as_str().to_string())
                    .unwrap_or_else(|| request.uri().path().to_string());
                session.set_return_to(target).await;
            }
            session
                .flash(FlashKind::Info, "Please sign in to continue")
                .await;
            Redirect::to("/admin/login").into_response()
        }
    }
}

/// Admin JSON API: a bearer token or a signed-in session.
pub async fn api_auth_middleware(
    State(state): State<AppState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    session: Option<SessionHandle>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user = match bearer {
        Some(TypedHeader(auth)) => {
            SessionUser::from(state.services.auth().verify_token(auth.token())?)
        }
        None => match session {
            Some(session) => session.user().await.ok_or(AppError::Unauthorized)?,
            None => return Err(AppError::Unauthorized),
        },
    };

    request.extensions_mut().insert(CurrentUser(user));
    Ok(next.run(request).await)
}

/// Require admin role, returns Forbidden error if not admin.
pub fn require_admin(user: &CurrentUser) -> Result<(), AppError> {
    if user.is_admin() {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}
