//! Declarative scenarios over [`ScenarioContext`](crate::ScenarioContext).
//!
//! A [`Scenario`] is a named list of [`ScenarioStep`]s built with a fluent
//! DSL. The [`ScenarioRunner`] executes the steps strictly in order, one
//! context per named actor, and [`ScenarioRegistry`] holds the scenarios a
//! run can choose from.

pub mod assertions;
pub mod registry;
pub mod runner;
pub mod scenario;
pub mod steps;

pub use assertions::Assertion;
pub use registry::ScenarioRegistry;
pub use runner::{ScenarioRunner, TransportFactory, PRIMARY_ACTOR};
pub use scenario::{Scenario, ScenarioResult};
pub use steps::{Credentials, ScenarioStep, WRONG_PASSWORD};
