// src/checker/mod.rs
// =============================================================================
// This module contains all link checking logic.
//
// Submodules:
// - filter: Decides which discovered links get checked (once, external, http)
// - http: Requests a link and follows its redirect chain
// - error: The ways a check can fail
//
// This file ties them together in `LinkChecker`, which the site walker hands
// every link it finds, and prints one line per checked link.
// =============================================================================

mod error;
mod filter;
mod http;

pub use error::VerifyError;
pub use filter::{Eligibility, LinkFilter, SkipReason};
pub use http::{trace_prefix, LinkFailure, LinkObservation, RedirectHop, Verifier};

use tracing::{debug, warn};

use crate::config::Config;
use crate::crawl::LinkHandler;

/// Counters for the end-of-run summary
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CheckStats {
    /// Links handed to the checker, repeats included
    pub discovered: usize,
    pub skipped: usize,
    pub ok: usize,
    /// Successful checks that went through at least one redirect
    pub redirected: usize,
    pub failed: usize,
}

impl CheckStats {
    pub fn checked(&self) -> usize {
        self.ok + self.failed
    }
}

/// What happened to one link that was actually requested
#[derive(Debug)]
pub enum LinkReport {
    Verified(LinkObservation),
    Failed {
        link: String,
        /// Redirects followed before the failure
        hops: Vec<RedirectHop>,
        error: VerifyError,
    },
}

impl LinkReport {
    /// The console line for this report, if it has one.
    ///
    /// Unclassified failures have no line; they go to the log instead.
    pub fn line(&self) -> Option<String> {
        match self {
            LinkReport::Verified(observation) => Some(observation.to_string()),
            LinkReport::Failed { link, hops, error } if error.is_classified() => {
                Some(format!("{}{}: {}", trace_prefix(hops), link, error))
            }
            LinkReport::Failed { .. } => None,
        }
    }

    fn emit(&self) {
        match self.line() {
            Some(line) => println!("{}", line),
            None => {
                if let LinkReport::Failed { link, hops, error } = self {
                    warn!(
                        url = %link,
                        trace = %trace_prefix(hops),
                        error = %error,
                        "link check failed"
                    );
                }
            }
        }
    }
}

/// Checks each outbound link of a crawl exactly once.
pub struct LinkChecker {
    filter: LinkFilter,
    verifier: Verifier,
    stats: CheckStats,
}

impl LinkChecker {
    pub fn new(config: &Config) -> reqwest::Result<Self> {
        Ok(Self {
            filter: LinkFilter::new(config.own_host()),
            verifier: Verifier::new(config)?,
            stats: CheckStats::default(),
        })
    }

    pub fn stats(&self) -> CheckStats {
        self.stats
    }

    /// Distinct link strings seen so far, checked or not
    pub fn unique_links(&self) -> usize {
        self.filter.seen().len()
    }

    /// Runs one discovered link through the filter and, if eligible, checks it.
    ///
    /// Returns None when the link was skipped.
    pub async fn check(&mut self, link: &str) -> Option<LinkReport> {
        self.stats.discovered += 1;

        let url = match self.filter.evaluate(link) {
            Eligibility::Proceed(url) => url,
            Eligibility::Skip(reason) => {
                self.stats.skipped += 1;
                match reason {
                    SkipReason::Malformed(e) => warn!(url = %link, error = %e, "malformed link"),
                    SkipReason::AlreadySeen => {}
                    other => debug!(url = %link, reason = ?other, "skipping link"),
                }
                return None;
            }
        };

        let report = match self.verifier.verify(&url).await {
            Ok(observation) => {
                debug!(url = %observation.original, status = observation.status, "link verified");
                self.stats.ok += 1;
                if observation.was_redirected() {
                    self.stats.redirected += 1;
                }
                LinkReport::Verified(observation)
            }
            Err(LinkFailure { hops, error }) => {
                self.stats.failed += 1;
                LinkReport::Failed {
                    link: link.to_string(),
                    hops,
                    error,
                }
            }
        };
        Some(report)
    }
}

impl LinkHandler for LinkChecker {
    async fn handle_link(&mut self, link: &str) {
        if let Some(report) = self.check(link).await {
            report.emit();
        }
    }
}
