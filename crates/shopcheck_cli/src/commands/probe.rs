//! Probe command - fetch one page and show how the oracle reads it.

use anyhow::{Context, Result};
use console::style;
use shopcheck_core::{
    body_prefix, HarnessConfig, HttpExchange, HttpRequest, HttpTransport, RedirectResolver,
    ResolvedExchange, SessionContext, StateOracle, Transport,
};

/// GET `path` without a session and print status, Location and state.
pub fn run(config: &HarnessConfig, path: &str, no_follow: bool) -> Result<()> {
    let transport = HttpTransport::new(&config.target)?;
    let oracle = StateOracle::new(config.oracle.clone())?;
    let session = SessionContext::new();

    let original = transport
        .send(&HttpRequest::get(path))
        .with_context(|| format!("Failed to fetch {}", path))?;

    let resolved = if no_follow {
        ResolvedExchange::unresolved(original)
    } else {
        RedirectResolver::resolve_pair(original, &transport, &session)?
    };

    print_exchange("Response", &resolved.original);
    if let Some(target) = &resolved.target {
        print_exchange("Redirect target", target);
    }

    let page = resolved.destination();
    println!();
    println!(
        "  State:    {} {}",
        style(oracle.classify(page)).cyan().bold(),
        style(format!(
            "(rule: {})",
            oracle.deciding_rule(page).unwrap_or("none")
        ))
        .dim()
    );
    if let Some(count) = oracle.cart_count(page) {
        println!("  Cart:     {}", style(count).cyan());
    }
    println!();
    println!("{}", style("Body:").bold());
    println!("{}", body_prefix(&page.body, config.report.body_prefix_chars));

    Ok(())
}

fn print_exchange(title: &str, exchange: &HttpExchange) {
    println!("{}", style(format!("{}:", title)).bold());
    let status = if exchange.is_redirect() {
        style(exchange.status).yellow()
    } else if exchange.status >= 400 {
        style(exchange.status).red()
    } else {
        style(exchange.status).green()
    };
    println!("  {} {} -> {}", exchange.method, exchange.path, status);
    if let Some(location) = exchange.location() {
        println!("  Location: {}", style(location).cyan());
    }
}
