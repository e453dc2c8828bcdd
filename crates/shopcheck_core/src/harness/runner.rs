use super::steps::{Credentials, ScenarioStep, WRONG_PASSWORD};
use crate::config::HarnessConfig;
use crate::context::ScenarioContext;
use crate::error::{HarnessError, Result};
use crate::fixtures::ActorProfile;
use crate::oracle::StateOracle;
use crate::transport::{HttpTransport, Transport};
use std::collections::BTreeMap;
use tracing::debug;

/// Name of the actor steps act as until told otherwise.
pub const PRIMARY_ACTOR: &str = "primary";

/// Creates a fresh transport for each new actor.
pub type TransportFactory<T> = Box<dyn Fn() -> Result<T>>;

struct ActorSlot<T: Transport> {
    context: ScenarioContext<T>,
    profile: ActorProfile,
}

/// Executes scenario steps strictly in order against per-actor contexts.
pub struct ScenarioRunner<T: Transport> {
    factory: TransportFactory<T>,
    oracle: StateOracle,
    body_prefix_chars: usize,
    profiles: BTreeMap<String, ActorProfile>,
    actors: BTreeMap<String, ActorSlot<T>>,
    current_actor: String,
    current_step: usize,
}

impl ScenarioRunner<HttpTransport> {
    /// A runner whose actors talk HTTP to `config.target`.
    pub fn http(config: &HarnessConfig) -> Result<Self> {
        let target = config.target.clone();
        Self::new(config, Box::new(move || HttpTransport::new(&target)))
    }
}

impl<T: Transport> ScenarioRunner<T> {
    /// Create a runner; actors are created lazily through `factory`.
    pub fn new(config: &HarnessConfig, factory: TransportFactory<T>) -> Result<Self> {
        Ok(Self {
            factory,
            oracle: StateOracle::new(config.oracle.clone())?,
            body_prefix_chars: config.report.body_prefix_chars,
            profiles: BTreeMap::new(),
            actors: BTreeMap::new(),
            current_actor: PRIMARY_ACTOR.to_string(),
            current_step: 0,
        })
    }

    /// Use `profile` for `actor` instead of a generated one.
    pub fn with_profile(mut self, actor: &str, profile: ActorProfile) -> Self {
        self.profiles.insert(actor.to_string(), profile);
        self
    }

    /// Get current step number
    pub fn current_step(&self) -> usize {
        self.current_step
    }

    /// The oracle used by assertions.
    pub fn oracle(&self) -> &StateOracle {
        &self.oracle
    }

    /// Context of `actor`, if it has been used.
    pub fn actor(&self, actor: &str) -> Option<&ScenarioContext<T>> {
        self.actors.get(actor).map(|slot| &slot.context)
    }

    /// Execute all steps in sequence, stopping at the first failure.
    pub fn execute(&mut self, steps: &[ScenarioStep]) -> Result<()> {
        for (i, step) in steps.iter().enumerate() {
            self.current_step = i;
            self.execute_step(step).map_err(|e| HarnessError::Step {
                index: i,
                step: format!("{:?}", step),
                source: Box::new(e),
            })?;
        }
        Ok(())
    }

    /// Execute a single step
    fn execute_step(&mut self, step: &ScenarioStep) -> Result<()> {
        debug!(actor = %self.current_actor, step = ?step, "executing step");
        match step {
            ScenarioStep::UseActor { name } => {
                self.current_actor = name.clone();
                self.slot()?;
                Ok(())
            }
            ScenarioStep::RegisterActor => {
                let slot = self.slot()?;
                let profile = slot.profile.clone();
                slot.context.register_actor(&profile)?;
                Ok(())
            }
            ScenarioStep::Authenticate { credentials } => {
                let slot = self.slot()?;
                let (email, password) = match credentials {
                    Credentials::Registered => {
                        (slot.profile.email.clone(), slot.profile.password.clone())
                    }
                    Credentials::WrongPassword => {
                        (slot.profile.email.clone(), WRONG_PASSWORD.to_string())
                    }
                    Credentials::Explicit { email, password } => (email.clone(), password.clone()),
                };
                slot.context.authenticate(&email, &password)?;
                Ok(())
            }
            ScenarioStep::Deauthenticate => {
                self.slot()?.context.deauthenticate()?;
                Ok(())
            }
            ScenarioStep::Fetch { path } => {
                self.slot()?.context.fetch(path)?;
                Ok(())
            }
            ScenarioStep::FetchProtected { path } => {
                self.slot()?.context.fetch_protected(path)?;
                Ok(())
            }
            ScenarioStep::MutateCart { action, product_id } => {
                self.slot()?.context.mutate_cart(*action, product_id)?;
                Ok(())
            }
            ScenarioStep::Assert { assertion } => {
                self.slot()?;
                let slot = self
                    .actors
                    .get(&self.current_actor)
                    .ok_or_else(|| HarnessError::NoActor(self.current_actor.clone()))?;
                assertion.check(&slot.context, &self.oracle, self.body_prefix_chars)
            }
        }
    }

    /// The current actor's slot, created on first use.
    fn slot(&mut self) -> Result<&mut ActorSlot<T>> {
        if !self.actors.contains_key(&self.current_actor) {
            let name = self.current_actor.clone();
            let transport = (self.factory)()?;
            let profile = self
                .profiles
                .get(&name)
                .cloned()
                .unwrap_or_else(ActorProfile::generated);
            debug!(actor = %name, email = %profile.email, "creating actor");
            let context = ScenarioContext::new(name.clone(), transport)
                .with_body_prefix(self.body_prefix_chars);
            self.actors.insert(name, ActorSlot { context, profile });
        }
        self.actors
            .get_mut(&self.current_actor)
            .ok_or_else(|| HarnessError::NoActor(self.current_actor.clone()))
    }
}
