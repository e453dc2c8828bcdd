//! List command - show registered scenarios.

use anyhow::Result;
use console::style;
use shopcheck_core::ScenarioRegistry;

/// Print every builtin scenario with its description.
pub fn run() -> Result<()> {
    let registry = ScenarioRegistry::builtin();
    let width = registry.names().iter().map(|n| n.len()).max().unwrap_or(0);

    println!("{}", style("Scenarios:").bold());
    for scenario in registry.iter() {
        println!(
            "  {:width$}  {} {}",
            style(scenario.name()).cyan(),
            scenario.description(),
            style(format!("({} steps)", scenario.steps().len())).dim(),
            width = width
        );
    }
    Ok(())
}
