//! Configuration types for the harness.
//!
//! Values are resolved once at process start (defaults, then an optional
//! TOML file, then the environment, then command-line flags) and are never
//! mutated afterwards.

use crate::error::{HarnessError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Environment variable overriding [`TargetConfig::base_url`].
pub const BASE_URL_ENV: &str = "BASE_URL";

/// Environment variable overriding [`TargetConfig::timeout_ms`].
pub const TIMEOUT_ENV: &str = "TIMEOUT";

/// Complete harness configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct HarnessConfig {
    /// Application under test.
    #[serde(default)]
    pub target: TargetConfig,

    /// Content markers used by the state oracle.
    #[serde(default)]
    pub oracle: OracleConfig,

    /// Diagnostic output settings.
    #[serde(default)]
    pub report: ReportConfig,
}

impl HarnessConfig {
    /// Load configuration from a TOML file.
    ///
    /// Missing sections and keys fall back to their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            HarnessError::ConfigError(format!("failed to read {}: {}", path.display(), e))
        })?;
        toml::from_str(&content)
            .map_err(|e| HarnessError::ConfigError(format!("failed to parse config: {}", e)))
    }

    /// Defaults, optional file, then process environment.
    pub fn resolve(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        config.with_env_overrides(|key| std::env::var(key).ok())
    }

    /// Applies `BASE_URL` / `TIMEOUT` overrides from `lookup`. Blank values
    /// are ignored.
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(BASE_URL_ENV).filter(|v| !v.trim().is_empty()) {
            self.target.base_url = url.trim().to_string();
        }
        if let Some(raw) = lookup(TIMEOUT_ENV).filter(|v| !v.trim().is_empty()) {
            self.target.timeout_ms = raw.trim().parse().map_err(|_| {
                HarnessError::ConfigError(format!(
                    "{} must be milliseconds, got {:?}",
                    TIMEOUT_ENV, raw
                ))
            })?;
        }
        Ok(self)
    }
}

/// Where the application lives and how long to wait for it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TargetConfig {
    /// Base URL every relative path is joined onto (default: http://localhost:5000/).
    pub base_url: String,

    /// Bound on both connection setup and the whole request, in milliseconds (default: 10000).
    pub timeout_ms: u64,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000/".to_string(),
            timeout_ms: 10_000,
        }
    }
}

impl TargetConfig {
    /// Returns the timeout as a Duration.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Substrings and labels the oracle looks for in response bodies.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct OracleConfig {
    /// Sign-out affordance shown to authenticated users.
    pub sign_out_marker: String,

    /// Greeting shown to authenticated users.
    pub greeting_marker: String,

    /// Error text shown after a rejected login.
    pub invalid_credentials_marker: String,

    /// Any of these marks a page offered to anonymous visitors.
    pub sign_in_markers: Vec<String>,

    /// Label preceding the cart item count, as in `CART 3`.
    pub cart_label: String,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            sign_out_marker: "Sign Out".to_string(),
            greeting_marker: "Welcome".to_string(),
            invalid_credentials_marker: "Invalid".to_string(),
            sign_in_markers: vec!["Sign In".to_string(), "Register here".to_string()],
            cart_label: "CART".to_string(),
        }
    }
}

/// Diagnostic output settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ReportConfig {
    /// Characters of response body attached to failures (default: 500).
    pub body_prefix_chars: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            body_prefix_chars: 500,
        }
    }
}
