//! Error types for shopcheck_core operations.

use thiserror::Error;

/// Core error type for harness operations.
///
/// Every variant is fatal to the scenario step that produced it. Nothing in
/// the harness retries or recovers on its own.
#[derive(Error, Debug)]
pub enum HarnessError {
    /// Connection refused, DNS failure, timeout or a body that could not be read.
    #[error("transport error on {method} {path}: {source}")]
    Transport {
        /// HTTP method of the failing request
        method: String,
        /// Path or location that was requested
        path: String,
        /// Underlying client error
        #[source]
        source: reqwest::Error,
    },

    /// A redirect status arrived without a `Location` header.
    #[error("{status} response to {method} {path} has no Location header")]
    MissingLocation {
        /// HTTP method of the redirecting request
        method: String,
        /// Path of the redirecting request
        path: String,
        /// The 3xx status that was received
        status: u16,
    },

    /// A path or location could not be turned into a request URL.
    #[error("invalid url {url:?}: {reason}")]
    InvalidUrl {
        /// The offending input
        url: String,
        /// Parser message
        reason: String,
    },

    /// The classified application state differs from the expected one.
    #[error("expected state {expected}, classified {actual}; body starts with: {body_prefix}")]
    OracleMismatch {
        /// Expected state, rendered
        expected: String,
        /// Classified state, rendered
        actual: String,
        /// Bounded prefix of the response body
        body_prefix: String,
    },

    /// A status code outside the accepted set.
    #[error("{context}: expected status {expected}, got {actual}; body starts with: {body_prefix}")]
    UnexpectedStatus {
        /// What was being checked
        context: String,
        /// Accepted status codes, rendered
        expected: String,
        /// Status actually received
        actual: u16,
        /// Bounded prefix of the response body
        body_prefix: String,
    },

    /// A content predicate over the response body did not hold.
    #[error("{context}; body starts with: {body_prefix}")]
    ContentMismatch {
        /// Description of the failed predicate
        context: String,
        /// Bounded prefix of the response body
        body_prefix: String,
    },

    /// The actor's session presence differs from the expected one.
    #[error("actor {actor:?}: expected {expected}")]
    SessionMismatch {
        /// Actor whose session was checked
        actor: String,
        /// What was expected, e.g. "a session token"
        expected: &'static str,
    },

    /// A scenario step failed.
    #[error("step {index} ({step}): {source}")]
    Step {
        /// Zero-based position in the scenario
        index: usize,
        /// Rendered step
        step: String,
        /// What went wrong
        #[source]
        source: Box<HarnessError>,
    },

    /// An assertion needs an exchange but the actor has not issued a request yet.
    #[error("no exchange recorded for actor {0:?}")]
    NoExchange(String),

    /// A step needs a registered actor profile but none was set.
    #[error("no actor profile bound for actor {0:?}")]
    NoActor(String),

    /// Scenario name not present in the registry.
    #[error("unknown scenario: {0}")]
    UnknownScenario(String),

    /// Configuration error (loading, parsing, invalid values).
    #[error("configuration error: {0}")]
    ConfigError(String),
}

impl HarnessError {
    /// Returns a user-friendly recovery suggestion for the error, if available.
    pub fn recovery_suggestion(&self) -> Option<&'static str> {
        match self {
            Self::Transport { .. } => Some(
                "Check that the application is running at BASE_URL and answers within TIMEOUT ms.",
            ),
            Self::MissingLocation { .. } => Some(
                "The application under test sent a redirect without a target; \
                 this is a bug in the application.",
            ),
            Self::InvalidUrl { .. } => {
                Some("BASE_URL must be an absolute http:// or https:// URL.")
            }
            Self::OracleMismatch { .. } | Self::ContentMismatch { .. } => Some(
                "If the page wording changed, adjust the [oracle] markers in the config file.",
            ),
            Self::Step { source, .. } => source.recovery_suggestion(),
            Self::UnknownScenario(_) => Some("Run 'shopcheck list' to see registered scenarios."),
            Self::ConfigError(_) => {
                Some("Check the config file and the BASE_URL / TIMEOUT environment variables.")
            }
            _ => None,
        }
    }
}

/// Convenience Result type for shopcheck_core operations.
pub type Result<T> = std::result::Result<T, HarnessError>;

/// Cuts `body` to at most `max_chars` characters for error messages.
pub fn body_prefix(body: &str, max_chars: usize) -> String {
    match body.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
