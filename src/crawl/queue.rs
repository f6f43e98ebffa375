// src/crawl/queue.rs
// =============================================================================
// This module implements website crawling with a breadth-first approach.
//
// How it works:
// 1. Start with the seed URL in a queue
// 2. Fetch the page HTML
// 3. Hand each link on the page to the handler, waiting for each one
// 4. Add same-host links to the queue (if not visited)
// 5. Repeat until the queue is empty
//
// There is no depth limit: the walk ends when the site has no unvisited
// pages left.
// =============================================================================

use anyhow::{anyhow, Result};
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use std::collections::{HashSet, VecDeque};
use tracing::{debug, warn};
use url::Url;

use super::html::extract_html_links;
use super::LinkHandler;
use crate::config::Config;

/// A fetched page that is worth parsing
#[derive(Debug)]
struct Page {
    /// Where the page ended up after redirects
    url: Url,
    html: String,
}

pub struct SiteWalker {
    client: Client,
    allowed_host: String,
}

impl SiteWalker {
    pub fn new(config: &Config) -> reqwest::Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .build()?;

        Ok(Self {
            client,
            allowed_host: config.own_host().to_string(),
        })
    }

    /// Crawls every reachable page on the allowed host, starting at `seed`.
    ///
    /// Returns the number of pages that were parsed.
    pub async fn walk<H: LinkHandler>(&self, seed: &Url, handler: &mut H) -> usize {
        let mut queue = VecDeque::new();
        queue.push_back(seed.clone());

        // Track visited URLs to avoid crawling the same page twice
        let mut visited = HashSet::new();
        let mut pages = 0;

        while let Some(url) = queue.pop_front() {
            if !visited.insert(url.to_string()) {
                continue;
            }

            debug!(url = %url, "crawling page");

            let page = match self.fetch_page(&url).await {
                Ok(Some(page)) => page,
                Ok(None) => continue,
                Err(e) => {
                    warn!(url = %url, error = %e, "failed to fetch page");
                    continue;
                }
            };
            pages += 1;

            for link in extract_html_links(&page.html, &page.url) {
                if let Some(next) = self.in_scope(&link) {
                    if !visited.contains(next.as_str()) {
                        queue.push_back(next);
                    }
                }
                handler.handle_link(&link).await;
            }
        }

        pages
    }

    // Returns the link as a crawlable URL if it is an http(s) page on our host
    fn in_scope(&self, link: &str) -> Option<Url> {
        let url = Url::parse(link).ok()?;
        let crawlable = matches!(url.scheme(), "http" | "https")
            && url.host_str() == Some(self.allowed_host.as_str());
        crawlable.then_some(url)
    }

    // Fetches a page, returning None when it is not HTML or redirected off-site
    async fn fetch_page(&self, url: &Url) -> Result<Option<Page>> {
        let response = self.client.get(url.clone()).send().await?;

        if !response.status().is_success() {
            return Err(anyhow!("HTTP {}", response.status()));
        }

        let final_url = response.url().clone();
        if final_url.host_str() != Some(self.allowed_host.as_str()) {
            debug!(url = %url, final_url = %final_url, "page redirected off-site");
            return Ok(None);
        }

        let is_html = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_ascii_lowercase().contains("html"))
            .unwrap_or(false);
        if !is_html {
            debug!(url = %url, "not an HTML page");
            return Ok(None);
        }

        let html = response.text().await?;
        Ok(Some(Page {
            url: final_url,
            html,
        }))
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why is `walk` generic over H: LinkHandler?
//    - The walker doesn't care what happens to a link, only that someone
//      receives it
//    - The real program passes a LinkChecker; tests pass a recorder that
//      just collects links
//
// 2. What does visited.insert() return?
//    - HashSet::insert returns false if the value was already there
//    - That lets us check and mark a page in one step
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::{
        matchers::{method, path},
        Mock, MockServer, ResponseTemplate,
    };

    #[derive(Default)]
    struct Recorder {
        links: Vec<String>,
    }

    impl LinkHandler for Recorder {
        async fn handle_link(&mut self, link: &str) {
            self.links.push(link.to_string());
        }
    }

    async fn html_page(server: &MockServer, at: &str, body: String) {
        Mock::given(method("GET"))
            .and(path(at))
            .respond_with(
                ResponseTemplate::new(200).set_body_raw(body, "text/html; charset=utf-8"),
            )
            .mount(server)
            .await;
    }

    fn walker_for(server: &MockServer) -> (SiteWalker, Url) {
        let seed = Url::parse(&format!("{}/", server.uri())).unwrap();
        let config = Config::for_seed(seed.clone()).unwrap();
        (SiteWalker::new(&config).unwrap(), seed)
    }

    #[tokio::test]
    async fn test_walks_internal_pages_and_reports_all_links() {
        let server = MockServer::start().await;

        html_page(
            &server,
            "/",
            r#"<html><body>
                <a href="/one">One</a>
                <a href="https://www.rust-lang.org/">Rust</a>
                <a href="mailto:me@example.com">Mail</a>
            </body></html>"#
                .to_string(),
        )
        .await;
        html_page(
            &server,
            "/one",
            r#"<a href="/">Home</a><a href="/two#part">Two</a>"#.to_string(),
        )
        .await;
        html_page(&server, "/two", "<p>no links</p>".to_string()).await;

        let (walker, seed) = walker_for(&server);
        let mut recorder = Recorder::default();
        let pages = walker.walk(&seed, &mut recorder).await;

        let base = server.uri();
        assert_eq!(pages, 3);
        assert_eq!(
            recorder.links,
            vec![
                format!("{}/one", base),
                "https://www.rust-lang.org/".to_string(),
                "mailto:me@example.com".to_string(),
                format!("{}/", base),
                format!("{}/two", base),
            ]
        );
    }

    #[tokio::test]
    async fn test_each_page_fetched_once() {
        let server = MockServer::start().await;
        let body = r#"<a href="/">Home</a><a href="/loop">Loop</a>"#.to_string();

        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(
                ResponseTemplate::new(200).set_body_raw(body.clone(), "text/html"),
            )
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/loop"))
            .respond_with(
                ResponseTemplate::new(200).set_body_raw(body, "text/html"),
            )
            .expect(1)
            .mount(&server)
            .await;

        let (walker, seed) = walker_for(&server);
        let mut recorder = Recorder::default();
        assert_eq!(walker.walk(&seed, &mut recorder).await, 2);
        // Links are reported every time they appear; dedup is the checker's job
        assert_eq!(recorder.links.len(), 4);
    }

    #[tokio::test]
    async fn test_skips_non_html_and_failed_pages() {
        let server = MockServer::start().await;
        html_page(
            &server,
            "/",
            r#"<a href="/data.json">Data</a><a href="/missing">Missing</a>"#.to_string(),
        )
        .await;
        Mock::given(method("GET"))
            .and(path("/data.json"))
            .respond_with(
                ResponseTemplate::new(200).set_body_raw(r#"{"a": "<a href=\"/hidden\">x</a>"}"#, "application/json"),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let (walker, seed) = walker_for(&server);
        let mut recorder = Recorder::default();
        let pages = walker.walk(&seed, &mut recorder).await;

        assert_eq!(pages, 1);
        assert_eq!(recorder.links.len(), 2);
    }

    #[tokio::test]
    async fn test_unreachable_seed_ends_walk() {
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let seed = Url::parse(&format!("http://127.0.0.1:{}/", port)).unwrap();
        let walker = SiteWalker::new(&Config::for_seed(seed.clone()).unwrap()).unwrap();

        let mut recorder = Recorder::default();
        assert_eq!(walker.walk(&seed, &mut recorder).await, 0);
        assert!(recorder.links.is_empty());
    }

    #[test]
    fn test_in_scope() {
        let config = Config::for_seed(Url::parse("https://example.com/").unwrap()).unwrap();
        let walker = SiteWalker::new(&config).unwrap();

        assert!(walker.in_scope("https://example.com/docs").is_some());
        assert!(walker.in_scope("http://example.com/docs").is_some());
        assert!(walker.in_scope("https://other.com/").is_none());
        assert!(walker.in_scope("mailto:me@example.com").is_none());
        assert!(walker.in_scope("::not a url::").is_none());
    }

    #[tokio::test]
    async fn test_fetch_page_accepts_html_with_charset() {
        let server = MockServer::start().await;
        html_page(&server, "/", r#"<a href="/x">X</a>"#.to_string()).await;

        let (walker, seed) = walker_for(&server);
        let page = walker.fetch_page(&seed).await.unwrap().unwrap();

        assert_eq!(page.url, seed);
        assert!(page.html.contains("/x"));
    }

    #[tokio::test]
    async fn test_fetch_page_rejects_plain_text() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<a href=\"/x\">X</a>"))
            .mount(&server)
            .await;

        let (walker, seed) = walker_for(&server);
        assert!(walker.fetch_page(&seed).await.unwrap().is_none());
    }
}
