// src/checker/filter.rs
// =============================================================================
// Decides whether a discovered link should be checked at all.
//
// Rules, in order:
// 1. A link already seen in this run is skipped.
// 2. Otherwise it is recorded as seen, whatever happens next.
// 3. Links that don't parse, point at our own host, or use a scheme other
//    than http/https are skipped.
// 4. Everything else is checked.
//
// Rule 2 before rule 3 means a mailto: or internal link is evaluated once
// and then ignored on every later page that repeats it.
// =============================================================================

use std::collections::HashSet;
use url::Url;

/// Every link string the filter has been asked about during this run.
///
/// It only grows: nothing is ever removed.
#[derive(Debug, Default)]
pub struct VerifiedLinkSet {
    links: HashSet<String>,
}

impl VerifiedLinkSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a link. Returns false if it was already present.
    pub fn insert(&mut self, link: &str) -> bool {
        if self.links.contains(link) {
            return false;
        }
        self.links.insert(link.to_string())
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }
}

/// Why a link was not checked
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    AlreadySeen,
    Malformed(String),
    Internal,
    UnsupportedScheme(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Eligibility {
    /// Check this (parsed) URL
    Proceed(Url),
    Skip(SkipReason),
}

#[derive(Debug)]
pub struct LinkFilter {
    seen: VerifiedLinkSet,
    own_host: String,
}

impl LinkFilter {
    pub fn new(own_host: impl Into<String>) -> Self {
        Self {
            seen: VerifiedLinkSet::new(),
            own_host: own_host.into(),
        }
    }

    pub fn seen(&self) -> &VerifiedLinkSet {
        &self.seen
    }

    pub fn evaluate(&mut self, link: &str) -> Eligibility {
        if !self.seen.insert(link) {
            return Eligibility::Skip(SkipReason::AlreadySeen);
        }

        let url = match Url::parse(link) {
            Ok(url) => url,
            Err(e) => return Eligibility::Skip(SkipReason::Malformed(e.to_string())),
        };

        if url.host_str() == Some(self.own_host.as_str()) {
            return Eligibility::Skip(SkipReason::Internal);
        }

        match url.scheme() {
            "http" | "https" => Eligibility::Proceed(url),
            other => Eligibility::Skip(SkipReason::UnsupportedScheme(other.to_string())),
        }
    }
}
