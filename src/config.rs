// src/config.rs
// =============================================================================
// Run configuration.
//
// The seed URL comes from the command line; everything else has a fixed
// default. Validation of the seed happens here, and it is the only place in
// the program where a bad input stops the whole run.
// =============================================================================

use anyhow::{anyhow, Result};
use std::time::Duration;
use url::Url;

use crate::cli::Cli;

/// Redirect hops followed for one link before it is reported as a loop.
pub const MAX_REDIRECTS: usize = 10;

/// Per-request timeout for both page fetches and link checks.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct Config {
    /// Where the crawl starts
    pub seed: Url,
    /// Hostname of the seed; links on this host are crawled, never checked
    own_host: String,
    pub max_redirects: usize,
    pub timeout: Duration,
    pub user_agent: String,
}

impl Config {
    /// Builds a config from parsed command-line arguments.
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let seed = Url::parse(&cli.url)
            .map_err(|e| anyhow!("Invalid seed URL '{}': {}", cli.url, e))?;
        Self::for_seed(seed)
    }

    /// Builds a config with default settings for an already parsed seed.
    pub fn for_seed(seed: Url) -> Result<Self> {
        if seed.scheme() != "http" && seed.scheme() != "https" {
            return Err(anyhow!(
                "Seed URL must use http or https, got '{}': {}",
                seed.scheme(),
                seed
            ));
        }

        let own_host = seed
            .host_str()
            .ok_or_else(|| anyhow!("Seed URL has no host: {}", seed))?
            .to_string();

        Ok(Self {
            seed,
            own_host,
            max_redirects: MAX_REDIRECTS,
            timeout: REQUEST_TIMEOUT,
            user_agent: format!("outbound/{}", env!("CARGO_PKG_VERSION")),
        })
    }

    pub fn own_host(&self) -> &str {
        &self.own_host
    }
}
