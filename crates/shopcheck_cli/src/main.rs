//! Shopcheck CLI - run session-aware storefront scenarios from the shell.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use shopcheck_core::HarnessConfig;
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(name = "shopcheck")]
#[command(about = "Session-aware HTTP scenarios for a storefront", long_about = None)]
#[command(version)]
struct Cli {
    /// TOML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Base URL of the application (overrides BASE_URL)
    #[arg(long, global = true)]
    base_url: Option<String>,
    /// Request timeout in milliseconds (overrides TIMEOUT)
    #[arg(long, global = true)]
    timeout: Option<u64>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List registered scenarios
    List,
    /// Run all or the named scenarios, one after another
    Run {
        /// Scenario names (all if omitted)
        names: Vec<String>,
        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
    /// Fetch one page anonymously and classify it
    Probe {
        /// Path relative to the base URL
        path: String,
        /// Report the redirect itself instead of its target
        #[arg(long)]
        no_follow: bool,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

impl Cli {
    /// Defaults, config file, environment, then flags.
    fn harness_config(&self) -> Result<HarnessConfig> {
        let mut config = HarnessConfig::resolve(self.config.as_deref())
            .context("Failed to resolve configuration")?;
        if let Some(url) = &self.base_url {
            config.target.base_url = url.clone();
        }
        if let Some(ms) = self.timeout {
            config.target.timeout_ms = ms;
        }
        Ok(config)
    }
}

fn main() -> Result<()> {
    // Respects RUST_LOG environment variable (e.g., RUST_LOG=debug)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::List => commands::list::run(),
        Commands::Run { names, format } => {
            let config = cli.harness_config()?;
            let passed = commands::run::run(&config, names, *format)?;
            if !passed {
                std::process::exit(1);
            }
            Ok(())
        }
        Commands::Probe { path, no_follow } => {
            let config = cli.harness_config()?;
            commands::probe::run(&config, path, *no_follow)
        }
    }
}
