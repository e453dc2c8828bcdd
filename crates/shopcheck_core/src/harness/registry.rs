use super::assertions::Assertion;
use super::scenario::{Scenario, ScenarioResult};
use crate::config::HarnessConfig;
use crate::error::{HarnessError, Result};
use crate::oracle::PageFacet;
use crate::types::ApplicationState;
use tracing::info;

/// Named scenarios, executed one after another in registration order.
#[derive(Debug, Clone, Default)]
pub struct ScenarioRegistry {
    scenarios: Vec<Scenario>,
}

impl ScenarioRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The storefront feature set: authentication, profile and cart.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        for scenario in builtin_scenarios() {
            registry.register(scenario);
        }
        registry
    }

    /// Add a scenario, replacing any previous one with the same name.
    pub fn register(&mut self, scenario: Scenario) {
        match self.scenarios.iter_mut().find(|s| s.name() == scenario.name()) {
            Some(existing) => *existing = scenario,
            None => self.scenarios.push(scenario),
        }
    }

    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.scenarios.iter().map(Scenario::name).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Scenario> {
        self.scenarios.iter()
    }

    pub fn get(&self, name: &str) -> Option<&Scenario> {
        self.scenarios.iter().find(|s| s.name() == name)
    }

    /// Scenarios named in `filter`, in the order given; all of them when
    /// `filter` is empty.
    pub fn select(&self, filter: &[String]) -> Result<Vec<&Scenario>> {
        if filter.is_empty() {
            return Ok(self.scenarios.iter().collect());
        }
        filter
            .iter()
            .map(|name| {
                self.get(name)
                    .ok_or_else(|| HarnessError::UnknownScenario(name.clone()))
            })
            .collect()
    }

    /// Run the selected scenarios sequentially against `config.target`.
    pub fn run(&self, config: &HarnessConfig, filter: &[String]) -> Result<Vec<ScenarioResult>> {
        let selected = self.select(filter)?;
        let mut results = Vec::with_capacity(selected.len());
        for scenario in selected {
            results.push(scenario.run_against(config));
        }
        let failed = results.iter().filter(|r| !r.success).count();
        info!(total = results.len(), failed, "scenario run finished");
        Ok(results)
    }
}

fn builtin_scenarios() -> Vec<Scenario> {
    vec![
        Scenario::new("registration")
            .describe("a new user can register")
            .register()
            .assert(Assertion::OriginalStatusIn(vec![200, 302])),
        Scenario::new("login_valid")
            .describe("a registered user can log in")
            .register()
            .login()
            .assert_redirected()
            .assert_session_present()
            .assert_login_succeeded(),
        Scenario::new("login_invalid")
            .describe("a wrong password is rejected")
            .register()
            .login_with_wrong_password()
            .assert_original_status(302)
            .assert_login_failed()
            .assert_not_state(ApplicationState::Authenticated),
        Scenario::new("logout")
            .describe("logging out drops the session")
            .register()
            .login()
            .assert_session_present()
            .logout()
            .assert_redirected()
            .assert_no_session()
            .fetch("/")
            .assert_final_status(200)
            .assert_shows(PageFacet::SignInAffordance)
            .assert_hides(PageFacet::UserMenu)
            .assert_body_lacks("Sign Out")
            .as_actor("fresh")
            .fetch_protected("/account/profile")
            .assert_redirected()
            .assert_not_state(ApplicationState::Authenticated),
        Scenario::new("profile_access")
            .describe("a logged-in user sees the profile page")
            .register()
            .login()
            .fetch_protected("/account/profile")
            .assert_original_status(200)
            .assert_shows(PageFacet::ProfileAffordances)
            .assert_state(ApplicationState::Authenticated),
        Scenario::new("cart_add")
            .describe("adding a product increments the cart")
            .register()
            .login()
            .add_to_cart("1")
            .assert_redirected()
            .assert_final_status(200)
            .assert_shows(PageFacet::CartIcon)
            .assert_cart_count_at_least(1),
        Scenario::new("cart_view")
            .describe("a logged-in user can view the cart")
            .register()
            .login()
            .add_to_cart("1")
            .fetch_protected("/cart")
            .assert_original_status(200)
            .assert_shows(PageFacet::CheckoutAffordance),
        Scenario::new("cart_remove")
            .describe("removing the last product empties the cart")
            .register()
            .login()
            .add_to_cart("1")
            .assert_cart_count(1)
            .remove_from_cart("1")
            .assert_final_status(200)
            .assert_cart_count(0)
            .fetch_protected("/cart")
            .assert_original_status(200)
            .assert_shows(PageFacet::EmptyCartTotal),
        Scenario::new("cart_unauthorized")
            .describe("an anonymous visitor is sent to the login page")
            .fetch_protected("/cart")
            .assert_redirected()
            .assert_final_status(200)
            .assert_shows(PageFacet::RegistrationAffordance)
            .assert_state(ApplicationState::Anonymous),
        Scenario::new("end_to_end")
            .describe("register, log in, fill and empty the cart")
            .register()
            .login()
            .assert_session_present()
            .add_to_cart("1")
            .assert_cart_count(1)
            .remove_from_cart("1")
            .assert_cart_count(0)
            .as_actor("anonymous")
            .fetch_protected("/cart")
            .assert_redirected()
            .assert_shows(PageFacet::RegistrationAffordance),
    ]
}
