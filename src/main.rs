// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Set up logging (stderr, filtered by RUST_LOG)
// 2. Parse command-line arguments and validate the seed URL
// 3. Walk the site, checking every outbound link along the way
// 4. Exit with proper code (0 = finished, 2 = could not start)
//
// stdout carries only the per-link result lines; everything else goes
// through tracing to stderr.
// =============================================================================

// Module declarations - tells Rust about our other source files
mod checker; // src/checker/ - outbound link checking
mod cli; // src/cli.rs - command-line parsing
mod config; // src/config.rs - validated run settings
mod crawl; // src/crawl/ - website crawling

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use checker::LinkChecker;
use cli::Cli;
use config::Config;
use crawl::SiteWalker;

#[tokio::main]
async fn main() {
    init_tracing();

    let exit_code = match run(Cli::parse()).await {
        Ok(()) => 0,
        Err(e) => {
            // Only start-up failures (bad seed, client setup) get here
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::from_cli(&cli)?;

    info!(seed = %config.seed, host = config.own_host(), "starting crawl");

    let mut checker = LinkChecker::new(&config).context("Failed to create HTTP client")?;
    let walker = SiteWalker::new(&config).context("Failed to create HTTP client")?;

    let pages = walker.walk(&config.seed, &mut checker).await;

    let stats = checker.stats();
    info!(
        pages,
        links = stats.discovered,
        unique = checker.unique_links(),
        checked = stats.checked(),
        ok = stats.ok,
        redirected = stats.redirected,
        failed = stats.failed,
        "crawl finished"
    );

    Ok(())
}
