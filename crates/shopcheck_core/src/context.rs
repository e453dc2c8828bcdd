//! Per-actor composition of transport, session and redirect resolution.

use crate::config::HarnessConfig;
use crate::error::{body_prefix, HarnessError, Result};
use crate::fixtures::ActorProfile;
use crate::redirect::{RedirectResolver, ResolvedExchange};
use crate::session::SessionContext;
use crate::transport::{HttpTransport, Transport};
use crate::types::{CartAction, HttpRequest};
use tracing::debug;

/// Statuses `/register` may answer with on success.
const REGISTRATION_OK: [u16; 2] = [200, 302];

/// Everything one actor owns while a scenario runs.
///
/// Each step operation sends its request, captures the session from the
/// *original* response where the step changes authentication, and only
/// then resolves a redirect. The redirect target never re-sends the session
/// cookie, so reading it from the resolved page would lose the token.
pub struct ScenarioContext<T: Transport> {
    name: String,
    transport: T,
    session: SessionContext,
    actor: Option<ActorProfile>,
    last: Option<ResolvedExchange>,
    body_prefix_chars: usize,
}

impl ScenarioContext<HttpTransport> {
    /// A context talking to `config.target` over HTTP.
    pub fn connect(name: impl Into<String>, config: &HarnessConfig) -> Result<Self> {
        let transport = HttpTransport::new(&config.target)?;
        Ok(Self::new(name, transport).with_body_prefix(config.report.body_prefix_chars))
    }
}

impl<T: Transport> ScenarioContext<T> {
    /// A context without session or actor.
    pub fn new(name: impl Into<String>, transport: T) -> Self {
        Self {
            name: name.into(),
            transport,
            session: SessionContext::new(),
            actor: None,
            last: None,
            body_prefix_chars: 500,
        }
    }

    /// Characters of body attached to errors raised here.
    pub fn with_body_prefix(mut self, chars: usize) -> Self {
        self.body_prefix_chars = chars;
        self
    }

    /// Actor name used in logs and errors.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The actor's session.
    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    /// Profile bound by the last successful registration.
    pub fn actor(&self) -> Option<&ActorProfile> {
        self.actor.as_ref()
    }

    /// The most recent step result.
    pub fn last(&self) -> Option<&ResolvedExchange> {
        self.last.as_ref()
    }

    /// Submits the registration form for `profile`.
    ///
    /// Succeeds on 200 or 302 and binds `profile` to this actor. The redirect,
    /// if any, is not followed.
    pub fn register_actor(&mut self, profile: &ActorProfile) -> Result<&ResolvedExchange> {
        debug!(actor = %self.name, email = %profile.email, "registering actor");
        let mut request = HttpRequest::post("/register", profile.registration_form());
        self.session.apply(&mut request);
        let exchange = self.transport.send(&request)?;

        if !REGISTRATION_OK.contains(&exchange.status) {
            return Err(HarnessError::UnexpectedStatus {
                context: format!("registration of {}", profile.email),
                expected: "200 or 302".to_string(),
                actual: exchange.status,
                body_prefix: body_prefix(&exchange.body, self.body_prefix_chars),
            });
        }

        self.actor = Some(profile.clone());
        Ok(self.record(ResolvedExchange::unresolved(exchange)))
    }

    /// Posts credentials to `/login` and follows the landing redirect.
    ///
    /// The held token afterwards is whatever the login response set (absent
    /// on a rejected login).
    pub fn authenticate(&mut self, email: &str, password: &str) -> Result<&ResolvedExchange> {
        debug!(actor = %self.name, email, "authenticating");
        let form = vec![
            ("email".to_string(), email.to_string()),
            ("password".to_string(), password.to_string()),
        ];
        let request = HttpRequest::post("/login", form);
        let original = self.transport.send(&request)?;

        self.session.update(&original);
        let resolved = RedirectResolver::resolve_pair(original, &self.transport, &self.session)?;
        Ok(self.record(resolved))
    }

    /// Requests `/logout` with the current session.
    ///
    /// The redirect envelope is the interesting part, so it is not followed.
    pub fn deauthenticate(&mut self) -> Result<&ResolvedExchange> {
        debug!(actor = %self.name, "deauthenticating");
        let mut request = HttpRequest::get("/logout");
        self.session.apply(&mut request);
        let original = self.transport.send(&request)?;

        self.session.update(&original);
        Ok(self.record(ResolvedExchange::unresolved(original)))
    }

    /// GETs `path` with the current session and resolves a redirect.
    pub fn fetch(&mut self, path: &str) -> Result<&ResolvedExchange> {
        let mut request = HttpRequest::get(path);
        self.session.apply(&mut request);
        let original = self.transport.send(&request)?;
        let resolved = RedirectResolver::resolve_pair(original, &self.transport, &self.session)?;
        Ok(self.record(resolved))
    }

    /// GETs a page that requires authentication.
    ///
    /// An anonymous actor is expected to be redirected; the redirect is
    /// resolved so callers can see where it went.
    pub fn fetch_protected(&mut self, path: &str) -> Result<&ResolvedExchange> {
        let name = self.name.clone();
        let resolved = self.fetch(path)?;
        if resolved.was_redirected() {
            debug!(actor = %name, path, "protected page redirected");
        }
        Ok(resolved)
    }

    /// Adds or removes `product_id` and resolves to the landing page.
    pub fn mutate_cart(
        &mut self,
        action: CartAction,
        product_id: &str,
    ) -> Result<&ResolvedExchange> {
        debug!(actor = %self.name, ?action, product_id, "mutating cart");
        self.fetch(&action.path(product_id))
    }

    fn record(&mut self, resolved: ResolvedExchange) -> &ResolvedExchange {
        &*self.last.insert(resolved)
    }
}
