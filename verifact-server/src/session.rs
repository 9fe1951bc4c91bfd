//! Caller identity.
//!
//! Authentication proper lives outside this service; a [`SessionProvider`]
//! only maps request headers to a user.

use async_trait::async_trait;
use axum::http::{header::AUTHORIZATION, HeaderMap};
use std::collections::HashMap;

pub const ANONYMOUS_USER: &str = "anonymous";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user_id: String,
}

#[async_trait]
pub trait SessionProvider: Send + Sync {
    /// The caller's session, or `None` when the request is unauthenticated.
    async fn session(&self, headers: &HeaderMap) -> Option<Session>;
}

/// Token from an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Treats every caller as the anonymous development user.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnonymousSessions;

#[async_trait]
impl SessionProvider for AnonymousSessions {
    async fn session(&self, _headers: &HeaderMap) -> Option<Session> {
        Some(Session {
            user_id: ANONYMOUS_USER.to_string(),
        })
    }
}

/// Fixed bearer-token to user mapping.
#[derive(Debug, Clone, Default)]
pub struct StaticTokenSessions {
    tokens: HashMap<String, String>,
}

impl StaticTokenSessions {
    pub fn new<I, T, U>(tokens: I) -> Self
    where
        I: IntoIterator<Item = (T, U)>,
        T: Into<String>,
        U: Into<String>,
    {
        Self {
            tokens: tokens
                .into_iter()
                .map(|(t, u)| (t.into(), u.into()))
                .collect(),
        }
    }
}

#[async_trait]
impl SessionProvider for StaticTokenSessions {
    async fn session(&self, headers: &HeaderMap) -> Option<Session> {
        let token = bearer_token(headers)?;
        self.tokens.get(token).map(|user| Session {
            user_id: user.clone(),
        })
    }
}
