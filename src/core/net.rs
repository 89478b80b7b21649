// src/core/net.rs
// Page fetching: blocking HTTP GET behind a small trait.

use std::collections::HashMap;
use std::time::Duration;

use tracing::debug;

use crate::config::consts::{SUGGESTION_MARKER, USER_AGENT};
use crate::error::FetchError;

/// Anything that can turn a URL into page HTML.
pub trait Fetch {
    fn get(&mut self, url: &str) -> Result<String, FetchError>;
}

/// Blocking reqwest client with a per-request timeout.
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
    timeout: Duration,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout.min(Duration::from_secs(10)))
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { client, timeout })
    }
}

impl Fetch for HttpFetcher {
    fn get(&mut self, url: &str) -> Result<String, FetchError> {
        debug!(url, "GET");
        let resp = self.client.get(url).send().map_err(|e| self.classify(e))?;
        let status = resp.status();
        let body = resp.text().map_err(|e| self.classify(e))?;

        // 404 + suggestion page is an answer, not a failure
        if status.is_success() || body.contains(SUGGESTION_MARKER) {
            Ok(body)
        } else {
            Err(FetchError::Status { url: s!(url), status: status.as_u16() })
        }
    }
}

impl HttpFetcher {
    fn classify(&self, e: reqwest::Error) -> FetchError {
        if e.is_timeout() {
            FetchError::Timeout(self.timeout)
        } else {
            FetchError::Http(e)
        }
    }
}

/// Serves pages from memory. Offline runs against saved pages, tests, benches.
#[derive(Default)]
pub struct StaticFetcher {
    pages: HashMap<String, String>,
    requested: Vec<String>,
}

impl StaticFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: impl Into<String>, html: impl Into<String>) -> Self {
        self.insert(url, html);
        self
    }

    pub fn insert(&mut self, url: impl Into<String>, html: impl Into<String>) {
        self.pages.insert(url.into(), html.into());
    }

    /// URLs requested so far, in order.
    pub fn requested(&self) -> &[String] {
        &self.requested
    }
}

impl Fetch for StaticFetcher {
    fn get(&mut self, url: &str) -> Result<String, FetchError> {
        self.requested.push(s!(url));
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| FetchError::NotFound(s!(url)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_fetcher_serves_and_records() {
        let mut f = StaticFetcher::new().with_page("http://a", "<p>a</p>");
        assert_eq!(f.get("http://a").unwrap(), "<p>a</p>");
        assert!(matches!(f.get("http://b"), Err(FetchError::NotFound(u)) if u == "http://b"));
        assert_eq!(f.requested(), &[s!("http://a"), s!("http://b")]);
    }
}
