//! Response classification.
//!
//! The oracle maps an exchange to an [`ApplicationState`] using a fixed,
//! ordered table of content predicates. Rules are evaluated top to bottom
//! and the first one that matches decides the state, so a page satisfying
//! several rules still has exactly one classification:
//!
//! 1. `Authenticated`: sign-out marker and greeting marker both present
//! 2. `AuthenticationFailed`: neither of those, but the invalid-credentials marker
//! 3. `CartState(n)`: a standalone `CART <digits>` counter (`Unknown` if it
//!    overflows)
//! 4. `Anonymous`: a sign-in/register affordance and no authenticated marker
//! 5. `Unknown`: nothing matched
//!
//! The oracle never touches the session or the transport.

use crate::config::OracleConfig;
use crate::error::{HarnessError, Result};
use crate::types::{ApplicationState, HttpExchange};
use regex::Regex;
use serde::{Deserialize, Serialize};

type Predicate = fn(&StateOracle, &HttpExchange) -> Option<ApplicationState>;

struct Rule {
    name: &'static str,
    test: Predicate,
}

const RULES: [Rule; 4] = [
    Rule {
        name: "authenticated",
        test: StateOracle::authenticated,
    },
    Rule {
        name: "authentication_failed",
        test: StateOracle::authentication_failed,
    },
    Rule {
        name: "cart",
        test: StateOracle::cart,
    },
    Rule {
        name: "anonymous",
        test: StateOracle::anonymous,
    },
];

/// Page features checked by individual scenario assertions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageFacet {
    /// "Profile", "View Profile" and "Edit Profile" all present.
    ProfileAffordances,
    /// "Register here" link offered to anonymous visitors.
    RegistrationAffordance,
    /// "Proceed to checkout" button on the cart page.
    CheckoutAffordance,
    /// "$0" cart total.
    EmptyCartTotal,
    /// The "cartIcon" element of the page header.
    CartIcon,
    /// "Sign In" link.
    SignInAffordance,
    /// "Hello," user menu.
    UserMenu,
}

impl PageFacet {
    /// Substrings that must all be present for the facet to show.
    pub fn markers(&self) -> &'static [&'static str] {
        match self {
            Self::ProfileAffordances => &["Profile", "View Profile", "Edit Profile"],
            Self::RegistrationAffordance => &["Register here"],
            Self::CheckoutAffordance => &["Proceed to checkout"],
            Self::EmptyCartTotal => &["$0"],
            Self::CartIcon => &["cartIcon"],
            Self::SignInAffordance => &["Sign In"],
            Self::UserMenu => &["Hello,"],
        }
    }
}

/// Declarative classifier over response bodies.
#[derive(Debug, Clone)]
pub struct StateOracle {
    markers: OracleConfig,
    cart_pattern: Regex,
}

impl StateOracle {
    /// Builds an oracle for `markers`.
    pub fn new(markers: OracleConfig) -> Result<Self> {
        if markers.cart_label.trim().is_empty() {
            return Err(HarnessError::ConfigError(
                "oracle.cart_label must not be empty".to_string(),
            ));
        }
        let pattern = cart_pattern(markers.cart_label.trim());
        let cart_pattern = Regex::new(&pattern).map_err(|e| {
            HarnessError::ConfigError(format!("invalid cart pattern {:?}: {}", pattern, e))
        })?;
        Ok(Self {
            markers,
            cart_pattern,
        })
    }

    /// Markers in use.
    pub fn markers(&self) -> &OracleConfig {
        &self.markers
    }

    /// Classifies `exchange` by the priority table.
    pub fn classify(&self, exchange: &HttpExchange) -> ApplicationState {
        RULES
            .iter()
            .find_map(|rule| (rule.test)(self, exchange))
            .unwrap_or(ApplicationState::Unknown)
    }

    /// Name of the rule that decided the classification, for diagnostics.
    pub fn deciding_rule(&self, exchange: &HttpExchange) -> Option<&'static str> {
        RULES
            .iter()
            .find(|rule| (rule.test)(self, exchange).is_some())
            .map(|rule| rule.name)
    }

    /// Classifies the page reached after a login attempt.
    ///
    /// Anything short of authenticated markers plus a held session token
    /// counts as a failed login.
    pub fn classify_login_attempt(
        &self,
        landing: &HttpExchange,
        token_present: bool,
    ) -> ApplicationState {
        match self.classify(landing) {
            ApplicationState::Authenticated if token_present => ApplicationState::Authenticated,
            _ => ApplicationState::AuthenticationFailed,
        }
    }

    /// The cart rule alone: `CartState(n)` or `Unknown`.
    ///
    /// Authenticated pages carry the counter too, so the full table would
    /// answer `Authenticated` for them.
    pub fn cart_state(&self, exchange: &HttpExchange) -> ApplicationState {
        self.cart(exchange).unwrap_or(ApplicationState::Unknown)
    }

    /// Parsed cart counter, if the page shows one that fits a `u32`.
    pub fn cart_count(&self, exchange: &HttpExchange) -> Option<u32> {
        self.cart_digits(exchange).and_then(|digits| digits.parse().ok())
    }

    fn cart_digits<'a>(&self, exchange: &'a HttpExchange) -> Option<&'a str> {
        self.cart_pattern
            .captures(&exchange.body)
            .and_then(|caps| caps.get(1))
            .map(|digits| digits.as_str())
    }

    /// True when every marker of `facet` is in the body.
    pub fn shows(&self, facet: PageFacet, exchange: &HttpExchange) -> bool {
        facet
            .markers()
            .iter()
            .all(|marker| exchange.body.contains(marker))
    }

    // ===== Rules =====

    fn has_sign_out(&self, exchange: &HttpExchange) -> bool {
        exchange.body.contains(&self.markers.sign_out_marker)
    }

    fn has_greeting(&self, exchange: &HttpExchange) -> bool {
        exchange.body.contains(&self.markers.greeting_marker)
    }

    fn authenticated(&self, exchange: &HttpExchange) -> Option<ApplicationState> {
        (self.has_sign_out(exchange) && self.has_greeting(exchange))
            .then_some(ApplicationState::Authenticated)
    }

    fn authentication_failed(&self, exchange: &HttpExchange) -> Option<ApplicationState> {
        let signed_in = self.has_sign_out(exchange) || self.has_greeting(exchange);
        (!signed_in && exchange.body.contains(&self.markers.invalid_credentials_marker))
            .then_some(ApplicationState::AuthenticationFailed)
    }

    /// A counter too large to parse still decides the page, as `Unknown`.
    fn cart(&self, exchange: &HttpExchange) -> Option<ApplicationState> {
        self.cart_digits(exchange).map(|digits| {
            digits
                .parse()
                .map(ApplicationState::CartState)
                .unwrap_or(ApplicationState::Unknown)
        })
    }

    fn anonymous(&self, exchange: &HttpExchange) -> Option<ApplicationState> {
        let offers_sign_in = self
            .markers
            .sign_in_markers
            .iter()
            .any(|marker| exchange.body.contains(marker.as_str()));
        let signed_in = self.has_sign_out(exchange) || self.has_greeting(exchange);
        (offers_sign_in && !signed_in).then_some(ApplicationState::Anonymous)
    }
}

/// `<label> <digits>` as a standalone token, spaces or tabs in between.
fn cart_pattern(label: &str) -> String {
    let word = |c: Option<char>| c.is_some_and(|c| c.is_alphanumeric() || c == '_');
    let lead = if word(label.chars().next()) { r"\b" } else { "" };
    let trail = if word(label.chars().last()) { r"\b" } else { "" };
    format!(r"{}{}{}[ \t]+(\d+)\b", lead, regex::escape(label), trail)
}
