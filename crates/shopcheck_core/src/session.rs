//! Session token tracking for one actor.
//!
//! The application authenticates exclusively through a cookie named
//! `session`. A [`SessionContext`] holds zero or one token; there is no
//! cookie jar, no expiry handling and no other cookie is ever sent.

use crate::types::{HttpExchange, HttpRequest, SessionToken};
use tracing::{debug, warn};

/// Name of the only cookie the harness tracks.
pub const SESSION_COOKIE: &str = "session";

/// Holds the current session token of one actor.
#[derive(Debug, Default, Clone)]
pub struct SessionContext {
    token: Option<SessionToken>,
}

impl SessionContext {
    /// An empty context (no session).
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads the `session` cookie set by `exchange`.
    ///
    /// When several `Set-Cookie` headers name the session, the last one in
    /// wire order wins. A missing or empty value yields `None`.
    pub fn extract(exchange: &HttpExchange) -> Option<SessionToken> {
        exchange
            .header_values("set-cookie")
            .filter_map(parse_set_cookie)
            .filter(|(name, _)| *name == SESSION_COOKIE)
            .last()
            .and_then(|(_, value)| SessionToken::new(value))
    }

    /// Sets the session cookie on `request` when `token` is present.
    pub fn attach(token: Option<&SessionToken>, request: &mut HttpRequest) {
        request.session = token.cloned();
    }

    /// Attaches the held token to `request`.
    pub fn apply(&self, request: &mut HttpRequest) {
        Self::attach(self.token.as_ref(), request);
    }

    /// Replaces the held token with whatever `exchange` carries.
    ///
    /// Afterwards "a token is held" and "the exchange set a non-empty session
    /// cookie" are the same statement. Used after login and logout only.
    pub fn update(&mut self, exchange: &HttpExchange) {
        let next = Self::extract(exchange);
        match (&self.token, &next) {
            (None, Some(token)) => debug!(token = %token.redacted(), "session established"),
            (Some(_), None) => warn!(path = %exchange.path, "session cleared"),
            (Some(old), Some(new)) if old != new => {
                debug!(token = %new.redacted(), "session replaced")
            }
            _ => {}
        }
        self.token = next;
    }

    /// The held token, if any.
    pub fn token(&self) -> Option<&SessionToken> {
        self.token.as_ref()
    }

    /// True when a token is held.
    pub fn is_present(&self) -> bool {
        self.token.is_some()
    }

    /// Drops the held token.
    pub fn clear(&mut self) {
        self.token = None;
    }
}

/// Splits the leading `name=value` pair off a `Set-Cookie` header.
fn parse_set_cookie(header: &str) -> Option<(&str, &str)> {
    let pair = header.split(';').next()?;
    let (name, value) = pair.split_once('=')?;
    let value = value.trim();
    let value = value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value);
    Some((name.trim(), value))
}
