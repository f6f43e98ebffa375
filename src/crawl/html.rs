// src/crawl/html.rs
// =============================================================================
// This module extracts links from HTML pages.
//
// We use the `scraper` crate which:
// - Parses HTML into a DOM (Document Object Model)
// - Supports CSS selectors for finding elements
//
// We also use the `url` crate to resolve relative links to absolute URLs.
//
// Every anchor is returned, whatever its scheme: deciding which links are
// worth checking is the checker's job, not the parser's.
// =============================================================================

use scraper::{Html, Selector};
use tracing::warn;
use url::{ParseError, Url};

// Extracts every link from HTML content
//
// Parameters:
//   html: the HTML content to parse
//   page_url: the URL the page was served from
//
// Returns: absolute URLs in document order, fragments removed.
// Hrefs that can't be resolved are logged and left out.
//
// Example:
//   html = "<a href='/docs#intro'>Docs</a>"
//   page_url = "https://example.com/page"
//   result = ["https://example.com/docs"]
pub fn extract_html_links(html: &str, page_url: &Url) -> Vec<String> {
    let document = Html::parse_document(html);

    // Both selectors are constants and known to be valid
    let anchors = Selector::parse("a[href]").unwrap();
    let base_tag = Selector::parse("base[href]").unwrap();

    // A <base href> changes what relative links are relative to
    let base = document
        .select(&base_tag)
        .next()
        .and_then(|element| element.value().attr("href"))
        .and_then(|href| match page_url.join(href.trim()) {
            Ok(base) => Some(base),
            Err(e) => {
                warn!(page = %page_url, href, error = %e, "malformed base href");
                None
            }
        })
        .unwrap_or_else(|| page_url.clone());

    document
        .select(&anchors)
        .filter_map(|element| element.value().attr("href"))
        .filter_map(|href| match resolve_url(&base, href) {
            Ok(link) => link,
            Err(e) => {
                warn!(page = %page_url, href, error = %e, "malformed link");
                None
            }
        })
        .collect()
}

// Resolves a possibly-relative href to an absolute URL without fragment
//
// Returns Ok(None) for in-page anchors ("#section") and an error for hrefs
// that can't be resolved.
fn resolve_url(base: &Url, href: &str) -> Result<Option<String>, ParseError> {
    let href = href.trim();
    if href.starts_with('#') {
        return Ok(None);
    }

    let mut url = base.join(href)?;
    url.set_fragment(None);
    Ok(Some(url.to_string()))
}
