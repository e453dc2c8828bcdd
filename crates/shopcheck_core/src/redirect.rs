//! Single-hop redirect resolution.
//!
//! A 3xx response is resolved by exactly one GET to its `Location`, joined
//! onto the URL the response came from by the transport, carrying
//! the actor's current session. Whatever that GET returns is final, even if
//! it is another redirect: a chain longer than one hop is surfaced to the
//! caller instead of being chased.

use crate::error::{HarnessError, Result};
use crate::session::SessionContext;
use crate::transport::Transport;
use crate::types::{HttpExchange, HttpRequest};
use tracing::debug;

/// An exchange together with the page its redirect led to, if resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedExchange {
    /// What the application answered to the step's own request.
    pub original: HttpExchange,
    /// The single follow-up GET, when the original was a resolved redirect.
    pub target: Option<HttpExchange>,
}

impl ResolvedExchange {
    /// Wraps an exchange that was not resolved.
    pub fn unresolved(original: HttpExchange) -> Self {
        Self {
            original,
            target: None,
        }
    }

    /// The page the step ends on: the redirect target if one was fetched,
    /// otherwise the original exchange.
    pub fn destination(&self) -> &HttpExchange {
        self.target.as_ref().unwrap_or(&self.original)
    }

    /// Consumes the pair, keeping only the destination.
    pub fn into_destination(self) -> HttpExchange {
        self.target.unwrap_or(self.original)
    }

    /// True when a follow-up request was issued.
    pub fn was_redirected(&self) -> bool {
        self.target.is_some()
    }
}

/// Stateless single-hop resolver.
#[derive(Debug, Default, Clone, Copy)]
pub struct RedirectResolver;

impl RedirectResolver {
    /// Resolves `exchange` if it is a redirect, returning the target exchange
    /// unchanged; non-redirects are returned as-is.
    pub fn resolve<T: Transport + ?Sized>(
        exchange: HttpExchange,
        transport: &T,
        session: &SessionContext,
    ) -> Result<HttpExchange> {
        Ok(Self::resolve_pair(exchange, transport, session)?.into_destination())
    }

    /// Like [`resolve`](Self::resolve) but keeps the original envelope.
    pub fn resolve_pair<T: Transport + ?Sized>(
        exchange: HttpExchange,
        transport: &T,
        session: &SessionContext,
    ) -> Result<ResolvedExchange> {
        if !exchange.is_redirect() {
            return Ok(ResolvedExchange::unresolved(exchange));
        }

        let location = exchange
            .location()
            .ok_or_else(|| HarnessError::MissingLocation {
                method: exchange.method.to_string(),
                path: exchange.path.clone(),
                status: exchange.status,
            })?
            .to_string();

        debug!(
            from = %exchange.path,
            status = exchange.status,
            to = %location,
            "resolving redirect"
        );

        let path = transport.redirect_path(&exchange, &location)?;
        let mut follow_up = HttpRequest::get(path);
        session.apply(&mut follow_up);
        let target = transport.send(&follow_up)?;

        Ok(ResolvedExchange {
            original: exchange,
            target: Some(target),
        })
    }
}
