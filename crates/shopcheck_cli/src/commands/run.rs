//! Run command - execute scenarios sequentially and report.

use crate::OutputFormat;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use shopcheck_core::{HarnessConfig, ScenarioRegistry, ScenarioResult};

/// Machine-readable summary of one `shopcheck run`.
#[derive(Serialize)]
struct RunReport<'a> {
    started_at: DateTime<Utc>,
    base_url: &'a str,
    passed: usize,
    failed: usize,
    scenarios: &'a [ScenarioResult],
}

/// Run the selected scenarios. Returns whether all of them passed.
pub fn run(config: &HarnessConfig, names: &[String], format: OutputFormat) -> Result<bool> {
    let registry = ScenarioRegistry::builtin();
    let selected = registry.select(names)?;
    let started_at = Utc::now();

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.enable_steady_tick(std::time::Duration::from_millis(100));

    let mut results = Vec::with_capacity(selected.len());
    for (i, scenario) in selected.iter().enumerate() {
        pb.set_message(format!(
            "[{}/{}] {}",
            i + 1,
            selected.len(),
            scenario.name()
        ));
        let result = scenario.run_against(config);
        if format == OutputFormat::Text {
            pb.suspend(|| print_result(&result));
        }
        results.push(result);
    }
    pb.finish_and_clear();

    let failed = results.iter().filter(|r| !r.success).count();
    let passed = results.len() - failed;

    match format {
        OutputFormat::Json => {
            let report = RunReport {
                started_at,
                base_url: &config.target.base_url,
                passed,
                failed,
                scenarios: &results,
            };
            let json =
                serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
            println!("{}", json);
        }
        OutputFormat::Text => {
            println!();
            println!(
                "{} passed, {} failed against {}",
                style(passed).green(),
                if failed > 0 {
                    style(failed).red()
                } else {
                    style(failed).green()
                },
                style(&config.target.base_url).cyan()
            );
        }
    }

    Ok(failed == 0)
}

fn print_result(result: &ScenarioResult) {
    if result.success {
        println!(
            "{} {} {}",
            style("PASS").green().bold(),
            result.name,
            style(format!("({} ms)", result.duration_ms)).dim()
        );
        return;
    }

    println!(
        "{} {} {}",
        style("FAIL").red().bold(),
        result.name,
        style(format!("(step {})", result.failure_step.unwrap_or(0))).dim()
    );
    if let Some(error) = &result.error {
        for line in error.lines() {
            println!("  {} {}", style("×").red(), line);
        }
    }
}
