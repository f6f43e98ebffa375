// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// The tool takes exactly one input: the page where crawling starts.
// Everything else (timeouts, redirect cap) lives in `Config` with fixed
// defaults.
//
// Rust concepts:
// - Structs: Custom data types that group related data
// - Derive macros: Automatically generate code for our types
// =============================================================================

use clap::Parser;

/// The URL used when no `--url` flag is given.
pub const DEFAULT_SEED_URL: &str = "https://kalifi.org/sitemap.html";

// This struct represents our entire CLI application
//
// #[derive(Parser)] tells clap to automatically generate parsing code
// The #[command(...)] attributes configure how the CLI behaves
#[derive(Parser, Debug)]
#[command(
    name = "outbound",
    version,
    about = "Crawl a website and check that its outbound links resolve",
    long_about = "outbound walks every page of a single site, collects the links that point \
                  to other hosts and requests each of them once, printing the final URL and \
                  status code (with the redirect chain, if any) or the reason it failed."
)]
pub struct Cli {
    /// URL from where to start crawling the site and check outbound links
    ///
    /// Only pages on this URL's host are crawled.
    #[arg(long, default_value = DEFAULT_SEED_URL)]
    pub url: String,
}
