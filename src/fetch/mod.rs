//! Page acquisition: plain HTTP fetches and headless-browser rendering.

pub mod browser;
pub mod http;

pub use browser::{ChromeRenderer, RenderPlan, Renderer};
pub use http::HttpFetcher;

use crate::error::ScrapeError;
use async_trait::async_trait;
use std::time::Duration;

/// Desktop Chrome on Windows, matching the TLS fingerprint the HTTP client
/// emulates.
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

/// Raw response of a single GET.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    pub status: u16,
    pub body: String,
}

impl FetchedPage {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self { status, body: body.into() }
    }

    /// True for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Trait for fetching a page - enables fakes in tests.
///
/// Implementations send exactly one request and report whatever status came
/// back; deciding which statuses are failures is up to the caller.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Performs a GET, failing with [`ScrapeError::Network`] when the request
    /// cannot complete within `timeout`.
    async fn fetch(&self, url: &str, timeout: Duration) -> Result<FetchedPage, ScrapeError>;
}
