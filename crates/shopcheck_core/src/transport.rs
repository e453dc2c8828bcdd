//! Blocking HTTP transport.
//!
//! Issues one request at a time, never follows redirects and never keeps a
//! cookie jar. The only cookie it sends is the session token carried on the
//! [`HttpRequest`].

use crate::config::TargetConfig;
use crate::error::{HarnessError, Result};
use crate::session::SESSION_COOKIE;
use crate::types::{HttpExchange, HttpRequest, Method};
use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, COOKIE};
use reqwest::redirect::Policy;
use reqwest::Url;
use tracing::debug;

/// Anything able to turn a request into an exchange.
///
/// Application-level 4xx/5xx statuses are successful exchanges; only
/// failures to complete the round trip are errors.
pub trait Transport {
    /// Performs `request` and records the result.
    fn send(&self, request: &HttpRequest) -> Result<HttpExchange>;

    /// Path to request when following `location` out of `origin`.
    fn redirect_path(&self, _origin: &HttpExchange, location: &str) -> Result<String> {
        Ok(location.to_string())
    }
}

/// Production transport over `reqwest`'s blocking client.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: Url,
}

impl HttpTransport {
    /// Builds a client bound to `target.base_url` with `target.timeout()` for
    /// both connect and whole-request deadlines.
    pub fn new(target: &TargetConfig) -> Result<Self> {
        let mut base = target.base_url.clone();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url = Url::parse(&base).map_err(|e| HarnessError::InvalidUrl {
            url: target.base_url.clone(),
            reason: e.to_string(),
        })?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(HarnessError::InvalidUrl {
                url: target.base_url.clone(),
                reason: "scheme must be http or https".to_string(),
            });
        }

        let timeout = target.timeout();
        let client = Client::builder()
            .redirect(Policy::none())
            .connect_timeout(timeout)
            .timeout(timeout)
            .pool_max_idle_per_host(0)
            .build()
            .map_err(|e| HarnessError::ConfigError(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { client, base_url })
    }

    /// Base URL every relative path is joined onto.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolves a step path against the base URL.
    ///
    /// Absolute `http(s)://` URLs are used unchanged. Anything else is
    /// treated as relative to the base, so a base of `http://host/shop/`
    /// turns `/cart` into `http://host/shop/cart`.
    pub fn url_for(&self, path: &str) -> Result<Url> {
        if path.starts_with("http://") || path.starts_with("https://") {
            return Url::parse(path).map_err(|e| HarnessError::InvalidUrl {
                url: path.to_string(),
                reason: e.to_string(),
            });
        }
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| HarnessError::InvalidUrl {
                url: path.to_string(),
                reason: e.to_string(),
            })
    }
}

impl Transport for HttpTransport {
    /// Joins `location` onto the URL `origin` was sent to (RFC 3986).
    ///
    /// Targets under the base URL come back as `/`-prefixed step paths;
    /// anything else comes back absolute.
    fn redirect_path(&self, origin: &HttpExchange, location: &str) -> Result<String> {
        let target = self
            .url_for(&origin.path)?
            .join(location)
            .map_err(|e| HarnessError::InvalidUrl {
                url: location.to_string(),
                reason: e.to_string(),
            })?;
        Ok(match target.as_str().strip_prefix(self.base_url.as_str()) {
            Some(rest) => format!("/{}", rest),
            None => target.to_string(),
        })
    }

    fn send(&self, request: &HttpRequest) -> Result<HttpExchange> {
        let url = self.url_for(&request.path)?;
        let transport_err = |source: reqwest::Error| HarnessError::Transport {
            method: request.method.to_string(),
            path: request.path.clone(),
            source,
        };

        let mut builder = match request.method {
            Method::Get => self.client.get(url),
            Method::Post => self.client.post(url).form(&request.form),
        };
        builder = builder.header(ACCEPT, "text/html");
        if let Some(token) = &request.session {
            builder = builder.header(COOKIE, format!("{}={}", SESSION_COOKIE, token.as_str()));
        }

        debug!(
            method = %request.method,
            path = %request.path,
            with_session = request.session.is_some(),
            "sending request"
        );

        let response = builder.send().map_err(transport_err)?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();
        let body = response.text().map_err(transport_err)?;

        debug!(status, bytes = body.len(), "received response");

        Ok(HttpExchange {
            method: request.method,
            path: request.path.clone(),
            form_parameters: request.form.clone(),
            status,
            headers,
            body,
        })
    }
}
