//! Core data types shared by the transport, session, resolver and oracle.

use serde::{Deserialize, Serialize};
use std::fmt;

/// HTTP methods the harness issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Method {
    /// Plain page fetch.
    Get,
    /// Form submission.
    Post,
}

impl Method {
    /// Upper-case wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Opaque session cookie value. Never empty.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SessionToken(String);

impl SessionToken {
    /// Wraps `value`, returning `None` for an empty string.
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let value = value.into();
        if value.is_empty() {
            None
        } else {
            Some(Self(value))
        }
    }

    /// The raw cookie value.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First ten characters, for logs.
    pub fn redacted(&self) -> String {
        let prefix: String = self.0.chars().take(10).collect();
        format!("{}...", prefix)
    }
}

// Tokens are credentials; keep them out of debug output.
impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SessionToken({})", self.redacted())
    }
}

/// An outgoing request before it reaches the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    /// Request method.
    pub method: Method,
    /// Path relative to the base URL, or an absolute URL from a `Location` header.
    pub path: String,
    /// URL-encoded form fields, in submission order.
    pub form: Vec<(String, String)>,
    /// Session cookie to send, if any.
    pub session: Option<SessionToken>,
}

impl HttpRequest {
    /// A GET without form data or session.
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            path: path.into(),
            form: Vec::new(),
            session: None,
        }
    }

    /// A POST carrying `form`.
    pub fn post(path: impl Into<String>, form: Vec<(String, String)>) -> Self {
        Self {
            method: Method::Post,
            path: path.into(),
            form,
            session: None,
        }
    }
}

/// Immutable record of one request and its response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpExchange {
    /// Request method.
    pub method: Method,
    /// Path or location as requested.
    pub path: String,
    /// Form fields that were submitted.
    pub form_parameters: Vec<(String, String)>,
    /// Response status code.
    pub status: u16,
    /// Response headers in wire order.
    pub headers: Vec<(String, String)>,
    /// Raw response body text.
    pub body: String,
}

impl HttpExchange {
    /// First header named `name`, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Every header named `name`, compared case-insensitively, in wire order.
    pub fn header_values<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.headers
            .iter()
            .filter(move |(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// The `Location` header.
    pub fn location(&self) -> Option<&str> {
        self.header("location")
    }

    /// True for any 3xx status.
    pub fn is_redirect(&self) -> bool {
        (300..400).contains(&self.status)
    }
}

/// Application state derived from a response by the oracle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "state", content = "count")]
pub enum ApplicationState {
    /// Page offered to a visitor without a session.
    Anonymous,
    /// Page rendered for a signed-in actor.
    Authenticated,
    /// Credentials were rejected.
    AuthenticationFailed,
    /// Page shows a cart counter with this many items.
    CartState(u32),
    /// No predicate matched.
    Unknown,
}

impl fmt::Display for ApplicationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Anonymous => write!(f, "Anonymous"),
            Self::Authenticated => write!(f, "Authenticated"),
            Self::AuthenticationFailed => write!(f, "AuthenticationFailed"),
            Self::CartState(n) => write!(f, "CartState({})", n),
            Self::Unknown => write!(f, "Unknown"),
        }
    }
}

/// Cart mutations exposed by the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CartAction {
    /// `GET /addToCart?productId=..`
    Add,
    /// `GET /removeFromCart?productId=..`
    Remove,
}

impl CartAction {
    /// Request path for `product_id`.
    pub fn path(&self, product_id: &str) -> String {
        match self {
            Self::Add => format!("/addToCart?productId={}", product_id),
            Self::Remove => format!("/removeFromCart?productId={}", product_id),
        }
    }
}
