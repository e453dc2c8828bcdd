use super::assertions::Assertion;
use super::runner::{ScenarioRunner, PRIMARY_ACTOR};
use super::steps::{Credentials, ScenarioStep};
use crate::config::HarnessConfig;
use crate::fixtures::ActorProfile;
use crate::oracle::PageFacet;
use crate::transport::Transport;
use crate::types::{ApplicationState, CartAction};
use serde::Serialize;
use std::collections::BTreeMap;
use std::time::Instant;
use tracing::{info, warn};

/// Fluent DSL for building scenarios
#[derive(Debug, Clone)]
pub struct Scenario {
    name: String,
    description: String,
    profiles: BTreeMap<String, ActorProfile>,
    steps: Vec<ScenarioStep>,
}

impl Scenario {
    /// Create a new scenario with the given name
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            description: String::new(),
            profiles: BTreeMap::new(),
            steps: Vec::new(),
        }
    }

    /// One-line summary shown by `shopcheck list`.
    pub fn describe(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn steps(&self) -> &[ScenarioStep] {
        &self.steps
    }

    // ===== Actors =====

    /// Use `profile` for the primary actor instead of a generated one.
    pub fn with_profile(self, profile: ActorProfile) -> Self {
        self.with_actor_profile(PRIMARY_ACTOR, profile)
    }

    /// Use `profile` for the named actor instead of a generated one.
    pub fn with_actor_profile(mut self, actor: &str, profile: ActorProfile) -> Self {
        self.profiles.insert(actor.to_string(), profile);
        self
    }

    /// Subsequent steps act as `actor`, a fresh context on first use.
    pub fn as_actor(self, actor: &str) -> Self {
        self.step(ScenarioStep::UseActor {
            name: actor.to_string(),
        })
    }

    /// Subsequent steps act as the primary actor again.
    pub fn as_primary(self) -> Self {
        self.as_actor(PRIMARY_ACTOR)
    }

    // ===== Actor operations =====

    /// Register the current actor's profile.
    pub fn register(self) -> Self {
        self.step(ScenarioStep::RegisterActor)
    }

    /// Log in with the current actor's profile.
    pub fn login(self) -> Self {
        self.step(ScenarioStep::Authenticate {
            credentials: Credentials::Registered,
        })
    }

    /// Log in with the current actor's email and a wrong password.
    pub fn login_with_wrong_password(self) -> Self {
        self.step(ScenarioStep::Authenticate {
            credentials: Credentials::WrongPassword,
        })
    }

    /// Log in with explicit credentials.
    pub fn login_as(self, email: &str, password: &str) -> Self {
        self.step(ScenarioStep::Authenticate {
            credentials: Credentials::Explicit {
                email: email.to_string(),
                password: password.to_string(),
            },
        })
    }

    pub fn logout(self) -> Self {
        self.step(ScenarioStep::Deauthenticate)
    }

    /// GET a public page.
    pub fn fetch(self, path: &str) -> Self {
        self.step(ScenarioStep::Fetch {
            path: path.to_string(),
        })
    }

    /// GET a page that requires a session.
    pub fn fetch_protected(self, path: &str) -> Self {
        self.step(ScenarioStep::FetchProtected {
            path: path.to_string(),
        })
    }

    pub fn add_to_cart(self, product_id: &str) -> Self {
        self.step(ScenarioStep::MutateCart {
            action: CartAction::Add,
            product_id: product_id.to_string(),
        })
    }

    pub fn remove_from_cart(self, product_id: &str) -> Self {
        self.step(ScenarioStep::MutateCart {
            action: CartAction::Remove,
            product_id: product_id.to_string(),
        })
    }

    // ===== Assertions =====

    /// Add a general assertion
    pub fn assert(self, assertion: Assertion) -> Self {
        self.step(ScenarioStep::Assert { assertion })
    }

    /// Assert the final page classifies as `state`.
    pub fn assert_state(self, state: ApplicationState) -> Self {
        self.assert(Assertion::State(state))
    }

    /// Assert the final page does not classify as `state`.
    pub fn assert_not_state(self, state: ApplicationState) -> Self {
        self.assert(Assertion::NotState(state))
    }

    pub fn assert_login_succeeded(self) -> Self {
        self.assert(Assertion::LoginSucceeded)
    }

    pub fn assert_login_failed(self) -> Self {
        self.assert(Assertion::LoginFailed)
    }

    pub fn assert_cart_count(self, count: u32) -> Self {
        self.assert(Assertion::CartCount(count))
    }

    pub fn assert_cart_count_at_least(self, count: u32) -> Self {
        self.assert(Assertion::CartCountAtLeast(count))
    }

    pub fn assert_session_present(self) -> Self {
        self.assert(Assertion::SessionPresent)
    }

    pub fn assert_no_session(self) -> Self {
        self.assert(Assertion::NoSession)
    }

    /// Assert the status of the step's own response.
    pub fn assert_original_status(self, status: u16) -> Self {
        self.assert(Assertion::OriginalStatus(status))
    }

    /// Assert the status of the page the step ended on.
    pub fn assert_final_status(self, status: u16) -> Self {
        self.assert(Assertion::FinalStatus(status))
    }

    /// Assert a 302 with a Location header.
    pub fn assert_redirected(self) -> Self {
        self.assert_original_status(302)
            .assert(Assertion::LocationPresent)
    }

    pub fn assert_shows(self, facet: PageFacet) -> Self {
        self.assert(Assertion::Shows(facet))
    }

    pub fn assert_hides(self, facet: PageFacet) -> Self {
        self.assert(Assertion::Hides(facet))
    }

    pub fn assert_body_contains(self, text: &str) -> Self {
        self.assert(Assertion::BodyContains(text.to_string()))
    }

    pub fn assert_body_lacks(self, text: &str) -> Self {
        self.assert(Assertion::BodyLacks(text.to_string()))
    }

    fn step(mut self, step: ScenarioStep) -> Self {
        self.steps.push(step);
        self
    }

    // ===== Execution =====

    /// Execute the scenario over HTTP against `config.target`.
    pub fn run_against(&self, config: &HarnessConfig) -> ScenarioResult {
        match ScenarioRunner::http(config) {
            Ok(runner) => self.run_with(runner),
            Err(e) => ScenarioResult {
                name: self.name.clone(),
                success: false,
                steps_executed: 0,
                failure_step: Some(0),
                error: Some(format!("Failed to create runner: {}", e)),
                duration_ms: 0,
            },
        }
    }

    /// Execute the scenario with a prepared runner.
    pub fn run_with<T: Transport>(&self, runner: ScenarioRunner<T>) -> ScenarioResult {
        let mut runner = self
            .profiles
            .iter()
            .fold(runner, |runner, (actor, profile)| {
                runner.with_profile(actor, profile.clone())
            });

        info!(scenario = %self.name, steps = self.steps.len(), "scenario started");
        let started = Instant::now();
        let outcome = runner.execute(&self.steps);
        let duration_ms = started.elapsed().as_millis() as u64;

        match outcome {
            Ok(()) => {
                info!(scenario = %self.name, duration_ms, "scenario passed");
                ScenarioResult {
                    name: self.name.clone(),
                    success: true,
                    steps_executed: self.steps.len(),
                    failure_step: None,
                    error: None,
                    duration_ms,
                }
            }
            Err(e) => {
                let failure_step = runner.current_step();
                warn!(scenario = %self.name, step = failure_step, error = %e, "scenario failed");
                ScenarioResult {
                    name: self.name.clone(),
                    success: false,
                    steps_executed: failure_step,
                    failure_step: Some(failure_step),
                    error: Some(e.to_string()),
                    duration_ms,
                }
            }
        }
    }
}

/// Result of running a scenario
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioResult {
    pub name: String,
    pub success: bool,
    pub steps_executed: usize,
    pub failure_step: Option<usize>,
    pub error: Option<String>,
    pub duration_ms: u64,
}

impl ScenarioResult {
    /// Unwrap the result, panicking if it failed
    pub fn unwrap(self) {
        if !self.success {
            panic!(
                "Scenario '{}' failed at step {}: {}",
                self.name,
                self.failure_step.unwrap_or(0),
                self.error.unwrap_or_else(|| "unknown error".to_string())
            );
        }
    }

    /// Expect the result to be successful
    pub fn expect(self, msg: &str) {
        if !self.success {
            panic!(
                "{}: Scenario '{}' failed at step {}: {}",
                msg,
                self.name,
                self.failure_step.unwrap_or(0),
                self.error.unwrap_or_else(|| "unknown error".to_string())
            );
        }
    }

    /// Expect the scenario to fail, returning the error text.
    pub fn expect_failure(self) -> String {
        match (self.success, self.error) {
            (false, Some(error)) => error,
            (false, None) => "unknown error".to_string(),
            (true, _) => panic!("Scenario '{}' was expected to fail but passed", self.name),
        }
    }
}
