//! Shopcheck Core Library
//!
//! A session-aware HTTP harness for testing a stateful storefront:
//! - A blocking [`Transport`] that never follows redirects on its own
//! - A single-token [`SessionContext`] carried across requests
//! - Explicit single-hop redirect resolution
//! - A declarative [`StateOracle`] mapping pages to application states
//! - A scenario DSL, runner and registry on top of [`ScenarioContext`]
//!
//! # Quick Start
//!
//! ```
//! use shopcheck_core::{ApplicationState, HarnessConfig, HttpExchange, Method, StateOracle};
//!
//! let config = HarnessConfig::default();
//! let oracle = StateOracle::new(config.oracle).unwrap();
//!
//! let page = HttpExchange {
//!     method: Method::Get,
//!     path: "/".into(),
//!     form_parameters: Vec::new(),
//!     status: 200,
//!     headers: Vec::new(),
//!     body: "Welcome, Test | Sign Out | CART 2".into(),
//! };
//!
//! // Priority order: authenticated markers win over the cart counter
//! assert_eq!(oracle.classify(&page), ApplicationState::Authenticated);
//! assert_eq!(oracle.cart_state(&page), ApplicationState::CartState(2));
//! ```
//!
//! # Scenarios
//!
//! Scenarios are plain values. Nothing touches the network until one is run:
//!
//! ```
//! use shopcheck_core::{ApplicationState, PageFacet, Scenario};
//!
//! let scenario = Scenario::new("cart_unauthorized")
//!     .fetch_protected("/cart")
//!     .assert_redirected()
//!     .assert_shows(PageFacet::RegistrationAffordance)
//!     .assert_state(ApplicationState::Anonymous);
//!
//! assert_eq!(scenario.steps().len(), 5);
//! ```
//!
//! Fixed credentials go through [`ActorProfile`]; [`WRONG_PASSWORD`] is what
//! the failed-login steps send:
//!
//! ```
//! use shopcheck_core::{ActorProfile, Scenario, DEFAULT_PASSWORD, WRONG_PASSWORD};
//!
//! let profile = ActorProfile::with_credentials("u1@example.com", "pw123");
//! let scenario = Scenario::new("login_invalid")
//!     .with_profile(profile)
//!     .login_as("u1@example.com", WRONG_PASSWORD)
//!     .assert_login_failed();
//!
//! assert_ne!(WRONG_PASSWORD, DEFAULT_PASSWORD);
//! assert_eq!(scenario.steps().len(), 2);
//! ```

mod config;
mod context;
mod error;
mod fixtures;
pub mod harness;
mod oracle;
mod redirect;
mod session;
mod transport;
mod types;

#[cfg(test)]
mod testing;

pub use config::{
    HarnessConfig, OracleConfig, ReportConfig, TargetConfig, BASE_URL_ENV, TIMEOUT_ENV,
};
pub use context::ScenarioContext;
pub use error::{body_prefix, HarnessError, Result};
pub use fixtures::{unique_email, ActorProfile, DEFAULT_PASSWORD};
pub use harness::{
    Assertion, Credentials, Scenario, ScenarioRegistry, ScenarioResult, ScenarioRunner,
    ScenarioStep, TransportFactory, PRIMARY_ACTOR, WRONG_PASSWORD,
};
pub use oracle::{PageFacet, StateOracle};
pub use redirect::{RedirectResolver, ResolvedExchange};
pub use session::{SessionContext, SESSION_COOKIE};
pub use transport::{HttpTransport, Transport};
pub use types::*;
