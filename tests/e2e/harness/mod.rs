//! Shared setup for the end-to-end scenarios.

use shopcheck_core::{HarnessConfig, HttpTransport, ScenarioContext, StateOracle};
use shopcheck_e2e_tests::Storefront;

/// A running storefront and a config pointing at it.
pub fn storefront() -> (Storefront, HarnessConfig) {
    let storefront = Storefront::start().expect("storefront should start");
    let mut config = HarnessConfig::default();
    config.target.base_url = storefront.base_url();
    config.target.timeout_ms = 5_000;
    (storefront, config)
}

/// A fresh actor context against `config.target`.
pub fn actor(name: &str, config: &HarnessConfig) -> ScenarioContext<HttpTransport> {
    ScenarioContext::connect(name, config).expect("context should connect")
}

pub fn oracle(config: &HarnessConfig) -> StateOracle {
    StateOracle::new(config.oracle.clone()).expect("default markers are valid")
}
