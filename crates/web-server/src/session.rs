use async_trait::async_trait;
use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;
use axum_extra::extract::cookie::CookieJar;
use std::collections::HashMap;
use thiserror::Error;
use tokio::sync::RwLock;

/// Name of the session cookie, and of the header that may carry the token.
pub const SESSION_COOKIE: &str = "Authorization";
/// Alternative plain-token header.
pub const TOKEN_HEADER: &str = "x-token";

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Session store unavailable: {0}")]
    Unavailable(String),
}

/// Maps opaque session tokens to user emails.
///
/// Route logic only depends on this trait; the in-memory store can be
/// replaced by a shared one without touching the handlers.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn put(&self, token: String, email: String) -> Result<(), SessionError>;
    async fn get(&self, token: &str) -> Result<Option<String>, SessionError>;
    /// Removes the token, returning the email it was bound to.
    async fn delete(&self, token: &str) -> Result<Option<String>, SessionError>;
}

/// Process-local token table. Entries are lost on restart.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    tokens: RwLock<HashMap<String, String>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.tokens.read().await.len()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn put(&self, token: String, email: String) -> Result<(), SessionError> {
        self.tokens.write().await.insert(token, email);
        Ok(())
    }

    async fn get(&self, token: &str) -> Result<Option<String>, SessionError> {
        Ok(self.tokens.read().await.get(token).cloned())
    }

    async fn delete(&self, token: &str) -> Result<Option<String>, SessionError> {
        Ok(self.tokens.write().await.remove(token))
    }
}

/// Finds the session token in, by priority: the `x-token` header, an
/// `Authorization: Bearer` header, or the `Authorization` cookie.
pub fn token_from_headers(headers: &HeaderMap) -> Option<String> {
    if let Some(token) = headers.get(TOKEN_HEADER).and_then(|v| v.to_str().ok()) {
        let token = token.trim();
        if !token.is_empty() {
            return Some(token.to_string());
        }
    }

    if let Some(token) = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(strip_bearer)
    {
        return Some(token);
    }

    CookieJar::from_headers(headers)
        .get(SESSION_COOKIE)
        .and_then(|c| strip_bearer(c.value().trim_matches('"')))
}

fn strip_bearer(value: &str) -> Option<String> {
    let token = value.trim().strip_prefix("Bearer ")?.trim();
    (!token.is_empty()).then(|| token.to_string())
}
