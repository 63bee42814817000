//! Amazon India search results: `div[data-asin]` tiles in the served HTML.

use super::selectors::amazon as sel;
use super::Scraper;
use crate::diagnostics::{DiagnosticSink, NullSink};
use crate::error::ScrapeError;
use crate::fetch::PageFetcher;
use crate::filters::FilterChainBuilder;
use crate::models::Product;
use crate::normalize::{clean_price, non_empty, strip_thousands};
use crate::retailers::Retailer;
use async_trait::async_trait;
use scraper::{ElementRef, Html};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, trace, warn};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Artifact name for non-2xx response bodies.
pub const ERROR_PAGE_ARTIFACT: &str = "amazon_error_page.html";
/// Artifact name for pages without any result containers.
pub const NO_RESULTS_ARTIFACT: &str = "amazon_no_results.html";

/// Parses a search results page.
///
/// Returns `Ok(None)` when the page has no result containers at all, which
/// usually means the markup changed rather than that nothing matched.
pub fn parse_search(html: &str) -> Result<Option<Vec<Product>>, ScrapeError> {
    let document = Html::parse_document(html);

    // Result tiles win over challenge markup; product images can mention dogs
    let containers: Vec<_> = document.select(&sel::CONTAINER).collect();
    if containers.is_empty() {
        check_for_challenge(&document)?;
        return Ok(None);
    }

    let valid = FilterChainBuilder::new().required_fields(true).build();
    let products: Vec<Product> = containers
        .into_iter()
        .filter(|c| c.select(&sel::PRICE_BLOCK).next().is_some())
        .map(parse_container)
        .filter(|p| valid.matches(p))
        .inspect(|p| trace!("Parsed product: {} - {}", p.name, p.price))
        .collect();

    Ok(Some(products))
}

/// Challenge pages come back as 200 without result tiles, so they have to be
/// recognised by markup.
fn check_for_challenge(document: &Html) -> Result<(), ScrapeError> {
    if document.select(&sel::CAPTCHA).next().is_some() {
        return Err(ScrapeError::Challenge(
            "CAPTCHA detected. Amazon is blocking requests. \
             Try using a proxy or waiting before retrying."
                .to_string(),
        ));
    }

    if document.select(&sel::DOG_PAGE).next().is_some() {
        return Err(ScrapeError::Challenge(
            "Amazon error page detected (503). \
             The service may be temporarily unavailable."
                .to_string(),
        ));
    }

    Ok(())
}

fn parse_container(container: ElementRef<'_>) -> Product {
    let name = sel::NAME.text(container).unwrap_or_default();
    let price = sel::PRICE.text(container).map(|p| clean_price(&p)).unwrap_or_default();

    let mut product = Product::new(Retailer::Amazon, name, price);
    product.rating = sel::RATING.text(container);
    product.reviews = sel::REVIEWS.text(container).map(|r| strip_thousands(&r)).and_then(non_empty);
    product.image_url = sel::IMAGE.attr(container, "src");
    product
}

/// Scrapes amazon.in search results over plain HTTP.
pub struct AmazonScraper {
    fetcher: Arc<dyn PageFetcher>,
    base_url: String,
    timeout: Duration,
    diagnostics: Arc<dyn DiagnosticSink>,
}

impl AmazonScraper {
    pub fn new(fetcher: Arc<dyn PageFetcher>) -> Self {
        Self {
            fetcher,
            base_url: Retailer::Amazon.base_url(),
            timeout: DEFAULT_TIMEOUT,
            diagnostics: Arc::new(NullSink),
        }
    }

    /// Overrides the origin (for testing).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_diagnostics(mut self, diagnostics: Arc<dyn DiagnosticSink>) -> Self {
        self.diagnostics = diagnostics;
        self
    }
}

#[async_trait]
impl Scraper for AmazonScraper {
    fn retailer(&self) -> Retailer {
        Retailer::Amazon
    }

    async fn scrape(&self, query: &str) -> Result<Vec<Product>, ScrapeError> {
        let url = Retailer::Amazon.search_url(&self.base_url, query);
        info!("Searching Amazon for '{}'", query);

        let page = self.fetcher.fetch(&url, self.timeout).await?;

        if !page.is_success() {
            warn!("Failed to retrieve Amazon page, status code: {}", page.status);
            self.diagnostics.capture(ERROR_PAGE_ARTIFACT, &page.body);
            return Err(ScrapeError::UpstreamBlocked { status: page.status });
        }

        match parse_search(&page.body)? {
            Some(products) => {
                debug!("Extracted {} products from Amazon", products.len());
                Ok(products)
            }
            None => {
                warn!("No product containers found on the Amazon page");
                self.diagnostics.capture(NO_RESULTS_ARTIFACT, &page.body);
                Ok(Vec::new())
            }
        }
    }
}
