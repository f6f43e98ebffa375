// src/checker/http.rs
// =============================================================================
// This module checks if an outbound URL is alive by requesting it.
//
// Key functionality:
// - Makes one GET request per link
// - Follows redirects by hand, one Location header per hop, so that every
//   hop's URL and status code can be shown
// - Stops after a fixed number of hops and reports a redirect loop
// - Turns transport errors into a small set of readable reasons
//
// The reqwest client is built with redirects disabled; a 3xx response comes
// back to us instead of being followed inside the client.
// =============================================================================

use reqwest::header::LOCATION;
use reqwest::{Client, StatusCode};
use std::fmt;
use tracing::debug;
use url::Url;

use super::error::VerifyError;
use crate::config::Config;

/// One redirect response seen on the way to the final URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectHop {
    /// The URL that answered with a redirect
    pub url: Url,
    pub status: u16,
}

/// The outcome of a successful check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkObservation {
    /// The URL as it was requested
    pub original: Url,
    /// The URL that produced the final, non-redirect response
    pub final_url: Url,
    pub status: u16,
    /// Redirects followed, in order
    pub hops: Vec<RedirectHop>,
}

impl LinkObservation {
    pub fn was_redirected(&self) -> bool {
        !self.hops.is_empty()
    }
}

/// A check that failed, with the redirects followed before it did
#[derive(Debug)]
pub struct LinkFailure {
    pub hops: Vec<RedirectHop>,
    pub error: VerifyError,
}

/// The "<url> (<code>) --> " prefix for each hop, in order
pub fn trace_prefix(hops: &[RedirectHop]) -> String {
    hops.iter()
        .map(|hop| format!("{} ({}) --> ", hop.url, hop.status))
        .collect()
}

// Renders as the console line:
//   https://a/ (301) --> https://b/ (302) --> https://c/ (200)
impl fmt::Display for LinkObservation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{} ({})", trace_prefix(&self.hops), self.final_url, self.status)
    }
}

// The redirect family we follow: 301, 302, 303, 307, 308
fn is_redirect(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::MOVED_PERMANENTLY
            | StatusCode::FOUND
            | StatusCode::SEE_OTHER
            | StatusCode::TEMPORARY_REDIRECT
            | StatusCode::PERMANENT_REDIRECT
    )
}

pub struct Verifier {
    client: Client,
    max_redirects: usize,
}

impl Verifier {
    pub fn new(config: &Config) -> reqwest::Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout)
            .redirect(reqwest::redirect::Policy::none())
            .build()?;

        Ok(Self {
            client,
            max_redirects: config.max_redirects,
        })
    }

    /// Requests `url`, following redirects until a non-redirect response.
    ///
    /// On failure the hops followed so far are returned with the error.
    pub async fn verify(&self, url: &Url) -> Result<LinkObservation, LinkFailure> {
        let mut hops = Vec::new();
        match self.follow(url, &mut hops).await {
            Ok((final_url, status)) => Ok(LinkObservation {
                original: url.clone(),
                final_url,
                status,
                hops,
            }),
            Err(error) => Err(LinkFailure { hops, error }),
        }
    }

    // Walks the redirect chain, recording each hop as it is followed.
    // Returns the URL and status of the final response.
    async fn follow(&self, url: &Url, hops: &mut Vec<RedirectHop>) -> Result<(Url, u16), VerifyError> {
        let mut current = url.clone();

        loop {
            let response = self.client.get(current.clone()).send().await?;
            let status = response.status();

            if !is_redirect(status) {
                return Ok((current, status.as_u16()));
            }

            // A redirect without somewhere to go is where the chain ends
            let Some(location) = response.headers().get(LOCATION) else {
                debug!(url = %current, status = status.as_u16(), "redirect without Location header");
                return Ok((current, status.as_u16()));
            };

            if hops.len() >= self.max_redirects {
                return Err(VerifyError::RedirectLoop { hops: hops.len() });
            }

            let next = location
                .to_str()
                .ok()
                .and_then(|location| current.join(location).ok())
                .ok_or_else(|| VerifyError::InvalidLocation {
                    location: String::from_utf8_lossy(location.as_bytes()).into_owned(),
                })?;

            debug!(from = %current, to = %next, status = status.as_u16(), "following redirect");
            hops.push(RedirectHop {
                url: current,
                status: status.as_u16(),
            });
            current = next;
        }
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why Policy::none()?
//    - By default reqwest follows redirects itself and only hands back the
//      last response
//    - With Policy::none() a 301/302/... is returned to us like any other
//      response, so we can record it before moving on
//
// 2. What does current.join(location) do?
//    - Location headers may be relative ("/new-path")
//    - join() resolves them against the URL that sent the redirect,
//      the same way a browser would
//
// 3. What is let ... else?
//    - let Some(x) = value else { ... }; binds x if the pattern matches
//    - Otherwise the else block runs, and it must leave the function
//      (return, break, continue or panic)
// -----------------------------------------------------------------------------
