//! Cookie sessions backed by a [`SessionStore`].
//!
//! The middleware loads the session named by the `gonzagas_session` cookie,
//! hands handlers a [`SessionHandle`] through request extensions and writes
//! the session back only when a handler changed it.

use std::sync::Arc;

use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::api::pages::PageError;
use crate::api::AppState;
use crate::config::SESSION_COOKIE_NAME;
use crate::domain::{Flash, FlashKind, Session, SessionUser};
use crate::errors::AppError;
use crate::infra::SessionStore;

#[derive(Debug, Default)]
struct SessionState {
    id: Option<String>,
    data: Session,
    dirty: bool,
    /// A new id is issued on login so a pre-login cookie cannot be reused
    rotate: bool,
    destroyed: bool,
}

/// What the response has to do with the session cookie.
#[derive(Debug, PartialEq, Eq)]
pub enum CookieChange {
    Keep,
    Set(String),
    Remove,
}

/// Per-request view of the browser session.
#[derive(Clone, Debug, Default)]
pub struct SessionHandle {
    inner: Arc<Mutex<SessionState>>,
}

impl SessionHandle {
    pub fn new(id: Option<String>, data: Session) -> Self {
        Self {
            inner: Arc::new(Mutex::new(SessionState {
                id,
                data,
                ..SessionState::default()
            })),
        }
    }

    pub async fn user(&self) -> Option<SessionUser> {
        self.inner.lock().await.data.user.clone()
    }

    pub async fn has_site_access(&self) -> bool {
        let state = self.inner.lock().await;
        state.data.site_access || state.data.user.is_some()
    }

    pub async fn login(&self, user: SessionUser) {
        let mut state = self.inner.lock().await;
        state.data.user = Some(user);
        state.dirty = true;
        state.rotate = true;
    }

    /// Drop everything, including the stored copy
    pub async fn logout(&self) {
        let mut state = self.inner.lock().await;
        state.data = Session::default();
        state.destroyed = true;
    }

    pub async fn grant_site_access(&self) {
        let mut state = self.inner.lock().await;
        state.data.site_access = true;
        state.dirty = true;
    }

    pub async fn flash(&self, kind: FlashKind, message: impl Into<String>) {
        let mut state = self.inner.lock().await;
        state.data.push_flash(kind, message);
        state.dirty = true;
    }

    pub async fn take_flash(&self) -> Vec<Flash> {
        let mut state = self.inner.lock().await;
        if state.data.flash.is_empty() {
            return Vec::new();
        }
        state.dirty = true;
        state.data.take_flash()
    }

    pub async fn set_return_to(&self, path: impl Into<String>) {
        let mut state = self.inner.lock().await;
        state.data.return_to = Some(path.into());
        state.dirty = true;
    }

    pub async fn take_return_to(&self) -> Option<String> {
        let mut state = self.inner.lock().await;
        let path = state.data.return_to.take();
        if path.is_some() {
            state.dirty = true;
        }
        path
    }

    /// Write changes to the store and report the cookie update.
    pub async fn persist(
        &self,
        store: &dyn SessionStore,
        ttl_seconds: u64,
    ) -> Result<CookieChange, AppError> {
        let mut state = self.inner.lock().await;

        if state.destroyed {
            if let Some(id) = state.id.take() {
                store.destroy(&id).await?;
            }
            return Ok(CookieChange::Remove);
        }

        if !state.dirty {
            return Ok(CookieChange::Keep);
        }

        if state.rotate {
            if let Some(old) = state.id.take() {
                store.destroy(&old).await?;
            }
        }

        if state.data.is_empty() {
            return match state.id.take() {
                Some(id) => {
                    store.destroy(&id).await?;
                    Ok(CookieChange::Remove)
                }
                None => Ok(CookieChange::Keep),
            };
        }

        let id = state
            .id
            .get_or_insert_with(|| Uuid::new_v4().to_string())
            .clone();
        store.save(&id, &state.data, ttl_seconds).await?;
        Ok(CookieChange::Set(id))
    }
}

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for SessionHandle {
    type Rejection = PageError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<SessionHandle>()
            .cloned()
            .ok_or_else(|| PageError::from(AppError::internal("Session layer is not installed")))
    }
}

fn session_cookie(id: String, ttl_seconds: u64) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE_NAME, id))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::seconds(
            i64::try_from(ttl_seconds).unwrap_or(i64::MAX),
        ))
        .build()
}

/// Load the session before the handler and save it afterwards.
pub async fn session_middleware(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    let cookie_id = jar.get(SESSION_COOKIE_NAME).map(|c| c.value().to_string());

    let loaded = match &cookie_id {
        Some(id) => match state.sessions.load(id).await {
            Ok(session) => session.map(|s| (id.clone(), s)),
            Err(e) => {
                tracing::warn!(error = %e, "Could not load session, starting a new one");
                None
            }
        },
        None => None,
    };
    let had_stale_cookie = cookie_id.is_some() && loaded.is_none();

    let handle = match loaded {
        Some((id, session)) => SessionHandle::new(Some(id), session),
        None => SessionHandle::new(None, Session::default()),
    };
    request.extensions_mut().insert(handle.clone());

    let response = next.run(request).await;

    let ttl = state.config.session_ttl_seconds();
    match handle.persist(state.sessions.as_ref(), ttl).await {
        Ok(CookieChange::Set(id)) => (jar.add(session_cookie(id, ttl)), response).into_response(),
        Ok(CookieChange::Remove) => {
            (jar.remove(Cookie::build(SESSION_COOKIE_NAME).path("/")), response).into_response()
        }
        Ok(CookieChange::Keep) if had_stale_cookie => {
            (jar.remove(Cookie::build(SESSION_COOKIE_NAME).path("/")), response).into_response()
        }
        Ok(CookieChange::Keep) => response,
        Err(e) => {
            tracing::error!(error = %e, "Failed to save session");
            response
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UserRole;
    use crate::infra::MemoryStore;

    fn maria() -> SessionUser {
        SessionUser {
            id: 1,
            username: "maria".to_string(),
            role: UserRole::Admin,
        }
    }

    #[tokio::test]
    async fn test_untouched_session_is_not_saved() {
        let store = MemoryStore::new();
        let handle = SessionHandle::new(None, Session::default());

        assert_eq!(handle.persist(&store, 60).await.unwrap(), CookieChange::Keep);
        assert_eq!(store.session_count().await, 0);
    }

    #[tokio::test]
    async fn test_login_rotates_session_id() {
        let store = MemoryStore::new();
        let mut before = Session::default();
        before.site_access = true;
        store.save("old-id", &before, 60).await.unwrap();

        let handle = SessionHandle::new(Some("old-id".to_string()), before);
        handle.login(maria()).await;

        let CookieChange::Set(new_id) = handle.persist(&store, 60).await.unwrap() else {
            panic!("expected a new cookie");
        };
        assert_ne!(new_id, "old-id");
        assert!(store.load("old-id").await.unwrap().is_none());
        let saved = store.load(&new_id).await.unwrap().unwrap();
        assert_eq!(saved.user, Some(maria()));
    }

    #[tokio::test]
    async fn test_logout_removes_cookie_and_store_entry() {
        let store = MemoryStore::new();
        let mut session = Session::default();
        session.user = Some(maria());
        store.save("abc", &session, 60).await.unwrap();

        let handle = SessionHandle::new(Some("abc".to_string()), session);
        handle.logout().await;

        assert_eq!(handle.persist(&store, 60).await.unwrap(), CookieChange::Remove);
        assert!(store.load("abc").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_flash_survives_until_taken() {
        let handle = SessionHandle::new(None, Session::default());
        handle.flash(FlashKind::Error, "Nope").await;

        let flash = handle.take_flash().await;
        assert_eq!(flash.len(), 1);
        assert!(handle.take_flash().await.is_empty());
    }
}
