//! Session and rate-limit storage.
//!
//! Redis is the production backend. [`MemoryStore`] keeps the same contract in
//! process memory for development without Redis and for tests.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use redis::{aio::ConnectionManager, AsyncCommands, Client, RedisError};
use serde::{de::DeserializeOwned, Serialize};
use tokio::sync::Mutex;

use crate::config::{Config, CACHE_PREFIX_RATE_LIMIT, CACHE_PREFIX_SESSION};
use crate::domain::Session;
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Server-side session storage keyed by the session cookie value.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn load(&self, session_id: &str) -> AppResult<Option<Session>>;

    /// Store the session, resetting its time to live
    async fn save(&self, session_id: &str, session: &Session, ttl_seconds: u64) -> AppResult<()>;

    async fn destroy(&self, session_id: &str) -> AppResult<()>;

    /// Count one hit against `key` in a fixed window.
    /// Returns (hits in window, allowed).
    async fn check_rate_limit(
        &self,
        key: &str,
        max_requests: u64,
        window_seconds: u64,
    ) -> AppResult<(u64, bool)>;

    async fn ping(&self) -> AppResult<()>;
}

/// Redis-backed store with a pooled connection.
#[derive(Clone)]
pub struct Cache {
    connection: ConnectionManager,
}

impl Cache {
    pub async fn connect(config: &Config) -> Result<Self, RedisError> {
        let client = Client::open(config.redis_url.as_str())?;
        let connection = ConnectionManager::new(client).await?;

        tracing::info!("Redis cache connected");
        Ok(Self { connection })
    }

    async fn get_json<T: DeserializeOwned>(&self, key: &str) -> AppResult<Option<T>> {
        let mut conn = self.connection.clone();
        let value: Option<String> = conn.get(key).await?;

        match value {
            Some(json) => match serde_json::from_str(&json) {
                Ok(parsed) => Ok(Some(parsed)),
                Err(e) => {
                    // Unreadable entries (older layout) are treated as absent.
                    tracing::warn!(key = %key, error = %e, "Discarding unreadable cache entry");
                    Ok(None)
                }
            },
            None => Ok(None),
        }
    }

    async fn set_json<T: Serialize + Sync>(
        &self,
        key: &str,
        value: &T,
        ttl_seconds: u64,
    ) -> AppResult<()> {
        let json = serde_json::to_string(value)
            .map_err(|e| AppError::internal(format!("Cache serialization error: {}", e)))?;

        let mut conn = self.connection.clone();
        conn.set_ex::<_, _, ()>(key, json, ttl_seconds).await?;
        Ok(())
    }
}

fn session_key(session_id: &str) -> String {
    format!("{}{}", CACHE_PREFIX_SESSION, session_id)
}

fn rate_limit_key(key: &str) -> String {
    format!("{}{}", CACHE_PREFIX_RATE_LIMIT, key)
}

#[async_trait]
impl SessionStore for Cache {
    async fn load(&self, session_id: &str) -> AppResult<Option<Session>> {
        self.get_json(&session_key(session_id)).await
    }

    async fn save(&self, session_id: &str, session: &Session, ttl_seconds: u64) -> AppResult<()> {
        self.set_json(&session_key(session_id), session, ttl_seconds).await
    }

    async fn destroy(&self, session_id: &str) -> AppResult<()> {
        let mut conn = self.connection.clone();
        let _: () = conn.del(session_key(session_id)).await?;
        Ok(())
    }

    async fn check_rate_limit(
        &self,
        key: &str,
        max_requests: u64,
        window_seconds: u64,
    ) -> AppResult<(u64, bool)> {
        let key = rate_limit_key(key);
        let mut conn = self.connection.clone();

        let count: i64 = conn.incr(&key, 1).await?;
        if count == 1 {
            let _: () = conn.expire(&key, window_seconds as i64).await?;
        }

        let count = count.max(0) as u64;
        Ok((count, count <= max_requests))
    }

    async fn ping(&self) -> AppResult<()> {
        let mut conn = self.connection.clone();
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(())
    }
}

struct Entry {
    session: Session,
    expires_at: Instant,
}

struct Window {
    hits: u64,
    resets_at: Instant,
}

#[derive(Default)]
struct MemoryState {
    sessions: HashMap<String, Entry>,
    windows: HashMap<String, Window>,
}

/// In-process store. Data is lost on restart and not shared between processes.
#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live sessions.
    pub async fn session_count(&self) -> usize {
        let now = Instant::now();
        let state = self.state.lock().await;
        state
            .sessions
            .values()
            .filter(|entry| entry.expires_at > now)
            .count()
    }
}

#[async_trait]
impl SessionStore for MemoryStore {
    async fn load(&self, session_id: &str) -> AppResult<Option<Session>> {
        let mut state = self.state.lock().await;
        match state.sessions.get(session_id) {
            Some(entry) if entry.expires_at > Instant::now() => Ok(Some(entry.session.clone())),
            Some(_) => {
                state.sessions.remove(session_id);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn save(&self, session_id: &str, session: &Session, ttl_seconds: u64) -> AppResult<()> {
        let mut state = self.state.lock().await;
        state.sessions.insert(
            session_id.to_string(),
            Entry {
                session: session.clone(),
                expires_at: Instant::now() + Duration::from_secs(ttl_seconds),
            },
        );
        Ok(())
    }

    async fn destroy(&self, session_id: &str) -> AppResult<()> {
        self.state.lock().await.sessions.remove(session_id);
        Ok(())
    }

    async fn check_rate_limit(
        &self,
        key: &str,
        max_requests: u64,
        window_seconds: u64,
    ) -> AppResult<(u64, bool)> {
        let now = Instant::now();
        let mut state = self.state.lock().await;

        let window = state
            .windows
            .entry(key.to_string())
            .or_insert_with(|| Window {
                hits: 0,
                resets_at: now + Duration::from_secs(window_seconds),
            });
        if window.resets_at <= now {
            window.hits = 0;
            window.resets_at = now + Duration::from_secs(window_seconds);
        }
        window.hits += 1;

        Ok((window.hits, window.hits <= max_requests))
    }

    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FlashKind, SessionUser, UserRole};
    use tokio_test::assert_ok;

    #[tokio::test]
    async fn test_memory_store_round_trip_and_destroy() {
        let store = MemoryStore::new();
        let mut session = Session::default();
        session.user = Some(SessionUser {
            id: 1,
            username: "admin".to_string(),
            role: UserRole::Admin,
        });
        session.push_flash(FlashKind::Info, "Welcome");

        assert_ok!(store.save("abc", &session, 60).await);
        assert_eq!(store.load("abc").await.unwrap(), Some(session));
        assert_eq!(store.session_count().await, 1);

        assert_ok!(store.destroy("abc").await);
        assert!(store.load("abc").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_memory_store_expired_session_is_gone() {
        let store = MemoryStore::new();
        store.save("old", &Session::default(), 0).await.unwrap();
        assert!(store.load("old").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_memory_store_ping() {
        assert_ok!(MemoryStore::new().ping().await);
    }

    #[tokio::test]
    async fn test_memory_rate_limit_blocks_after_max() {
        let store = MemoryStore::new();
        for expected in 1..=5 {
            let (count, allowed) = store.check_rate_limit("login:1.2.3.4", 5, 300).await.unwrap();
            assert_eq!(count, expected);
            assert!(allowed);
        }
        let (count, allowed) = store.check_rate_limit("login:1.2.3.4", 5, 300).await.unwrap();
        assert_eq!(count, 6);
        assert!(!allowed);

        let (_, allowed) = store.check_rate_limit("login:5.6.7.8", 5, 300).await.unwrap();
        assert!(allowed);
    }
}
