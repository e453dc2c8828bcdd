use crate::harness::storefront;
use shopcheck_core::{ApplicationState, HarnessError, Scenario, ScenarioRegistry};

#[test]
fn test_builtin_scenarios_pass() {
    let (_shop, config) = storefront();
    let registry = ScenarioRegistry::builtin();
    let results = registry.run(&config, &[]).unwrap();

    assert_eq!(results.len(), registry.len());
    let failures: Vec<_> = results
        .iter()
        .filter(|r| !r.success)
        .map(|r| format!("{}: {:?}", r.name, r.error))
        .collect();
    assert!(failures.is_empty(), "failed scenarios: {failures:#?}");
}

#[test]
fn test_selected_scenarios_run_in_given_order() {
    let (shop, config) = storefront();
    let filter = vec!["cart_unauthorized".to_string(), "registration".to_string()];
    let results = ScenarioRegistry::builtin().run(&config, &filter).unwrap();

    let names: Vec<_> = results.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["cart_unauthorized", "registration"]);
    assert!(results.iter().all(|r| r.success));
    assert_eq!(shop.requests()[0].target, "/cart");
}

#[test]
fn test_unknown_scenario_runs_nothing() {
    let (shop, config) = storefront();
    let err = ScenarioRegistry::builtin()
        .run(&config, &["registration".to_string(), "checkout".to_string()])
        .unwrap_err();
    assert!(matches!(err, HarnessError::UnknownScenario(name) if name == "checkout"));
    assert!(shop.requests().is_empty());
}

#[test]
fn test_mismatch_reports_step_and_body() {
    let (_shop, config) = storefront();
    let result = Scenario::new("expects_login")
        .fetch("/")
        .assert_final_status(200)
        .assert_state(ApplicationState::Authenticated)
        .fetch("/cart")
        .run_against(&config);

    assert!(!result.success);
    assert_eq!(result.failure_step, Some(2));
    let error = result.expect_failure();
    assert!(error.contains("expected state Authenticated"), "{error}");
    assert!(error.contains("Register here"), "{error}");
}

#[test]
fn test_unreachable_target_fails_first_step() {
    let mut config = shopcheck_core::HarnessConfig::default();
    config.target.base_url = "ftp://localhost/".to_string();
    let result = Scenario::new("bad_target").fetch("/").run_against(&config);
    assert!(!result.success);
    assert_eq!(result.failure_step, Some(0));
}
