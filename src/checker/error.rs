// src/checker/error.rs
// =============================================================================
// Why a link check failed.
//
// The first four variants are the "classified" failures: they are expected
// on the open web and get printed as a one-line observation. The rest are
// logged as diagnostics. None of them stop the crawl.
//
// Classification looks at the structure of the reqwest error (its timeout
// flag and the io::Error buried in its source chain) rather than at the
// wording of its message.
// =============================================================================

use std::error::Error as StdError;
use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum VerifyError {
    #[error("connection refused")]
    ConnectionRefused(#[source] reqwest::Error),

    #[error("no such host")]
    NoSuchHost(#[source] reqwest::Error),

    #[error("i/o timeout")]
    Timeout(#[source] reqwest::Error),

    #[error("redirect loop")]
    RedirectLoop { hops: usize },

    #[error("invalid redirect location {location:?}")]
    InvalidLocation { location: String },

    #[error("request failed: {0}")]
    Transport(#[source] reqwest::Error),
}

impl VerifyError {
    /// True for the failures reported as `<url>: <reason>` lines.
    pub fn is_classified(&self) -> bool {
        matches!(
            self,
            VerifyError::ConnectionRefused(_)
                | VerifyError::NoSuchHost(_)
                | VerifyError::Timeout(_)
                | VerifyError::RedirectLoop { .. }
        )
    }
}

impl From<reqwest::Error> for VerifyError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            return VerifyError::Timeout(error);
        }
        if !error.is_connect() {
            return VerifyError::Transport(error);
        }

        match connect_failure(&error) {
            Some(ConnectFailure::Refused) => VerifyError::ConnectionRefused(error),
            Some(ConnectFailure::Dns) => VerifyError::NoSuchHost(error),
            Some(ConnectFailure::TimedOut) => VerifyError::Timeout(error),
            None => VerifyError::Transport(error),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConnectFailure {
    Refused,
    Dns,
    TimedOut,
}

// Walks the source chain of a connect error looking for the underlying cause.
//
// hyper's connector wraps the OS error: "tcp connect error" carries an
// io::Error with a meaningful kind, "dns error" carries the resolver's
// io::Error whose kind is unspecified, so the connector's marker is what
// identifies it.
fn connect_failure(error: &(dyn StdError + 'static)) -> Option<ConnectFailure> {
    let mut current = error.source();
    while let Some(err) = current {
        if let Some(io_err) = err.downcast_ref::<io::Error>() {
            match io_err.kind() {
                io::ErrorKind::ConnectionRefused => return Some(ConnectFailure::Refused),
                io::ErrorKind::TimedOut => return Some(ConnectFailure::TimedOut),
                _ => {}
            }
        }
        if is_dns_marker(&err.to_string()) {
            return Some(ConnectFailure::Dns);
        }
        current = err.source();
    }
    None
}

fn is_dns_marker(description: &str) -> bool {
    description == "dns error" || description.starts_with("failed to lookup address information")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redirect_loop_is_classified() {
        let err = VerifyError::RedirectLoop { hops: 10 };
        assert!(err.is_classified());
        assert_eq!(err.to_string(), "redirect loop");
    }

    #[test]
    fn test_invalid_location_is_not_classified() {
        let err = VerifyError::InvalidLocation {
            location: "http://[::1".to_string(),
        };
        assert!(!err.is_classified());
        assert_eq!(err.to_string(), "invalid redirect location \"http://[::1\"");
    }

    #[test]
    fn test_dns_marker() {
        assert!(is_dns_marker("dns error"));
        assert!(is_dns_marker(
            "failed to lookup address information: Name or service not known"
        ));
        assert!(!is_dns_marker("tcp connect error"));
    }

    #[derive(Debug)]
    struct Wrapper(io::Error);

    impl std::fmt::Display for Wrapper {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str("tcp connect error")
        }
    }

    impl StdError for Wrapper {
        fn source(&self) -> Option<&(dyn StdError + 'static)> {
            Some(&self.0)
        }
    }

    #[derive(Debug)]
    struct Outer(Wrapper);

    impl std::fmt::Display for Outer {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str("error trying to connect")
        }
    }

    impl StdError for Outer {
        fn source(&self) -> Option<&(dyn StdError + 'static)> {
            Some(&self.0)
        }
    }

    #[test]
    fn test_connect_failure_finds_nested_io_kind() {
        let refused = Outer(Wrapper(io::Error::from(io::ErrorKind::ConnectionRefused)));
        assert_eq!(connect_failure(&refused), Some(ConnectFailure::Refused));

        let timed_out = Outer(Wrapper(io::Error::from(io::ErrorKind::TimedOut)));
        assert_eq!(connect_failure(&timed_out), Some(ConnectFailure::TimedOut));

        let other = Outer(Wrapper(io::Error::from(io::ErrorKind::PermissionDenied)));
        assert_eq!(connect_failure(&other), None);
    }
}
