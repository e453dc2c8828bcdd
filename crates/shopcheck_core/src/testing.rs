//! In-memory transport for unit tests.

use crate::error::Result;
use crate::transport::Transport;
use crate::types::{HttpExchange, HttpRequest, Method};
use std::cell::RefCell;
use std::collections::VecDeque;

/// Replays canned responses in order and records every request it receives.
pub struct ScriptedTransport {
    responses: RefCell<VecDeque<HttpExchange>>,
    requests: RefCell<Vec<HttpRequest>>,
}

impl ScriptedTransport {
    pub fn new(responses: Vec<HttpExchange>) -> Self {
        Self {
            responses: RefCell::new(responses.into()),
            requests: RefCell::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.borrow().clone()
    }
}

impl Transport for ScriptedTransport {
    fn send(&self, request: &HttpRequest) -> Result<HttpExchange> {
        self.requests.borrow_mut().push(request.clone());
        let mut exchange = self
            .responses
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| panic!("no scripted response left for {}", request.path));
        exchange.method = request.method;
        exchange.path = request.path.clone();
        exchange.form_parameters = request.form.clone();
        Ok(exchange)
    }
}

/// A response with `status` and `body` and no headers.
pub fn page(status: u16, body: &str) -> HttpExchange {
    HttpExchange {
        method: Method::Get,
        path: "/".to_string(),
        form_parameters: Vec::new(),
        status,
        headers: vec![("Content-Type".to_string(), "text/html".to_string())],
        body: body.to_string(),
    }
}

/// A 302 pointing at `location`.
pub fn redirect(location: &str) -> HttpExchange {
    let mut exchange = page(302, "");
    exchange
        .headers
        .push(("Location".to_string(), location.to_string()));
    exchange
}

impl HttpExchange {
    /// Adds a `Set-Cookie` header.
    pub fn with_cookie(mut self, cookie: &str) -> Self {
        self.headers
            .push(("Set-Cookie".to_string(), cookie.to_string()));
        self
    }
}
