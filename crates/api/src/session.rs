//! Cookie-backed server-side sessions.
//!
//! The client holds an opaque token in the `qid` cookie; only the SHA-256
//! digest of that token is stored in the `sessions` table, so a database
//! leak does not let anyone forge a cookie. A session row is created lazily
//! the first time a request actually mutates its session (logging in or
//! registering); anonymous reads never touch the table.

use std::sync::{Arc, Mutex, MutexGuard};

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::Utc;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use lireddit_db::models::session::CreateSession;
use lireddit_db::repositories::SessionRepo;
use lireddit_db::types::DbId;
use lireddit_db::DbPool;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "qid";

/// Default session lifetime in days (~10 years).
const DEFAULT_TTL_DAYS: i64 = 3650;

/// Session cookie configuration.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Session lifetime in days. Applied to both the cookie max-age and the
    /// server-side row expiry.
    pub ttl_days: i64,
    /// Whether to set the `Secure` flag on the cookie (HTTPS only).
    pub cookie_secure: bool,
}

impl SessionConfig {
    /// Load session configuration from environment variables.
    ///
    /// | Env Var            | Default |
    /// |--------------------|---------|
    /// | `SESSION_TTL_DAYS` | `3650`  |
    /// | `COOKIE_SECURE`    | `false` |
    pub fn from_env() -> Self {
        let ttl_days: i64 = std::env::var("SESSION_TTL_DAYS")
            .unwrap_or_else(|_| DEFAULT_TTL_DAYS.to_string())
            .parse()
            .expect("SESSION_TTL_DAYS must be a valid i64");

        let cookie_secure: bool = std::env::var("COOKIE_SECURE")
            .unwrap_or_else(|_| "false".into())
            .parse()
            .expect("COOKIE_SECURE must be `true` or `false`");

        Self {
            ttl_days,
            cookie_secure,
        }
    }
}

#[derive(Debug, Default)]
struct SessionState {
    /// Database row id of the backing session, if one exists yet.
    record_id: Option<DbId>,
    /// The authenticated user, if any.
    user_id: Option<DbId>,
    /// Whether a resolver changed the session during this request.
    dirty: bool,
}

/// Per-request session handle, shared with resolvers via GraphQL context data.
///
/// Mutations made through this handle stay in memory until [`Session::flush`]
/// persists them, which the transport layer does before the response is sent.
#[derive(Debug, Clone, Default)]
pub struct Session {
    inner: Arc<Mutex<SessionState>>,
}

impl Session {
    /// Load the session named by the request's cookie, or an empty one when
    /// the cookie is absent, unknown, or expired.
    pub async fn load(pool: &DbPool, jar: &CookieJar) -> Result<Self, sqlx::Error> {
        let state = match jar.get(SESSION_COOKIE) {
            Some(cookie) => {
                let token_hash = hash_session_token(cookie.value());
                match SessionRepo::find_by_token_hash(pool, &token_hash).await? {
                    Some(record) => SessionState {
                        record_id: Some(record.id),
                        user_id: record.user_id,
                        dirty: false,
                    },
                    None => SessionState::default(),
                }
            }
            None => SessionState::default(),
        };

        Ok(Self {
            inner: Arc::new(Mutex::new(state)),
        })
    }

    /// The authenticated user's id, if the session is logged in.
    pub fn user_id(&self) -> Option<DbId> {
        self.state().user_id
    }

    /// Mark the session as belonging to `user_id`.
    ///
    /// Takes effect in storage only once the transport layer flushes.
    pub fn log_in(&self, user_id: DbId) {
        let mut state = self.state();
        state.user_id = Some(user_id);
        state.dirty = true;
    }

    /// Persist any change made during resolver execution.
    ///
    /// When the request had no backing session row yet, a new row and token
    /// are created and the session cookie is added to the returned jar.
    /// Must run before the response is produced.
    pub async fn flush(
        &self,
        pool: &DbPool,
        config: &SessionConfig,
        jar: CookieJar,
    ) -> Result<CookieJar, sqlx::Error> {
        let (record_id, user_id, dirty) = {
            let state = self.state();
            (state.record_id, state.user_id, state.dirty)
        };

        if !dirty {
            return Ok(jar);
        }

        match record_id {
            Some(id) => {
                SessionRepo::set_user(pool, id, user_id).await?;
                Ok(jar)
            }
            None => {
                let token = Uuid::new_v4().to_string();
                let record = SessionRepo::create(
                    pool,
                    &CreateSession {
                        token_hash: hash_session_token(&token),
                        user_id,
                        expires_at: Utc::now() + chrono::Duration::days(config.ttl_days),
                    },
                )
                .await?;
                self.state().record_id = Some(record.id);

                let cookie = Cookie::build((SESSION_COOKIE, token))
                    .path("/")
                    .http_only(true)
                    .same_site(SameSite::Lax) // csrf
                    .secure(config.cookie_secure)
                    .max_age(time::Duration::days(config.ttl_days))
                    .build();
                Ok(jar.add(cookie))
            }
        }
    }

    fn state(&self) -> MutexGuard<'_, SessionState> {
        self.inner.lock().expect("session state lock poisoned")
    }
}

/// Compute the SHA-256 hex digest of a session token.
///
/// Use this to compare an incoming cookie value against the stored hash.
pub fn hash_session_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}
