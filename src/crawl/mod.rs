// src/crawl/mod.rs
// =============================================================================
// This module handles website crawling.
//
// Features:
// - Breadth-first crawling starting from the seed URL
// - Same-host restriction (doesn't crawl external sites)
// - Hands every link found on every page to a `LinkHandler`, one at a time
// =============================================================================

mod html;
mod queue;

pub use queue::SiteWalker;

/// Receives each link the walker finds, in document order.
///
/// The walker waits for `handle_link` to finish before it moves on, so a
/// handler never sees two links at once.
#[allow(async_fn_in_trait)]
pub trait LinkHandler {
    async fn handle_link(&mut self, link: &str);
}
