//! Flipkart search results. Listings are rendered client-side, so the page
//! is captured from a headless browser before extraction.

use super::selectors::flipkart as sel;
use super::Scraper;
use crate::diagnostics::{DiagnosticSink, NullSink};
use crate::error::ScrapeError;
use crate::fetch::{RenderPlan, Renderer};
use crate::filters::FilterChainBuilder;
use crate::models::Product;
use crate::normalize::{clean_price, non_empty, strip_thousands};
use crate::retailers::Retailer;
use async_trait::async_trait;
use scraper::{ElementRef, Html};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, trace, warn};

pub const DEFAULT_POPUP_WAIT: Duration = Duration::from_secs(5);
pub const DEFAULT_LISTING_WAIT: Duration = Duration::from_secs(15);

/// Artifact name for rendered pages without any known container layout.
pub const NO_RESULTS_ARTIFACT: &str = "flipkart_no_results.html";

const LAYOUT_NAMES: [&str; 4] = ["list", "grid", "card", "data-id"];

/// Parses rendered search results.
///
/// Returns `None` when none of the known container layouts is present.
pub fn parse_listing(html: &str) -> Option<Vec<Product>> {
    let document = Html::parse_document(html);

    let (layout, containers) = sel::CONTAINER_LAYOUTS.select_first_layout(&document)?;
    debug!(
        "Using {} layout with {} containers",
        LAYOUT_NAMES.get(layout).copied().unwrap_or("unknown"),
        containers.len()
    );

    let valid = FilterChainBuilder::new().required_fields(true).build();
    let products = containers
        .into_iter()
        .map(parse_container)
        .filter(|p| valid.matches(p))
        .inspect(|p| trace!("Parsed product: {} - {}", p.name, p.price))
        .collect();

    Some(products)
}

fn parse_container(container: ElementRef<'_>) -> Product {
    let name = sel::NAME.text(container).unwrap_or_default();
    let price = sel::PRICE.text(container).map(|p| clean_price(&p)).unwrap_or_default();

    let mut product = Product::new(Retailer::Flipkart, name, price);
    product.rating = sel::RATING.text(container);
    product.reviews = sel::REVIEWS.text(container).map(|r| strip_thousands(&r)).and_then(non_empty);
    product.image_url = sel::IMAGE.attr(container, "src");
    product
}

/// Scrapes flipkart.com search results through a [`Renderer`].
pub struct FlipkartScraper {
    renderer: Arc<dyn Renderer>,
    base_url: String,
    popup_wait: Duration,
    listing_wait: Duration,
    diagnostics: Arc<dyn DiagnosticSink>,
}

impl FlipkartScraper {
    pub fn new(renderer: Arc<dyn Renderer>) -> Self {
        Self {
            renderer,
            base_url: Retailer::Flipkart.base_url(),
            popup_wait: DEFAULT_POPUP_WAIT,
            listing_wait: DEFAULT_LISTING_WAIT,
            diagnostics: Arc::new(NullSink),
        }
    }

    /// Overrides the origin (for testing).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Sets how long to wait for the login popup and for the listings.
    pub fn with_waits(mut self, popup_wait: Duration, listing_wait: Duration) -> Self {
        self.popup_wait = popup_wait;
        self.listing_wait = listing_wait;
        self
    }

    pub fn with_diagnostics(mut self, diagnostics: Arc<dyn DiagnosticSink>) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    fn plan(&self) -> RenderPlan {
        RenderPlan {
            dismiss: Some(sel::POPUP_CLOSE.to_string()),
            dismiss_wait: self.popup_wait,
            ready: sel::LISTING_READY.to_string(),
            ready_wait: self.listing_wait,
        }
    }
}

#[async_trait]
impl Scraper for FlipkartScraper {
    fn retailer(&self) -> Retailer {
        Retailer::Flipkart
    }

    async fn scrape(&self, query: &str) -> Result<Vec<Product>, ScrapeError> {
        let url = Retailer::Flipkart.search_url(&self.base_url, query);
        info!("Searching Flipkart for '{}'", query);

        let Some(html) = self.renderer.render(&url, &self.plan()).await? else {
            return Ok(Vec::new());
        };

        match parse_listing(&html) {
            Some(products) => {
                debug!("Extracted {} products from Flipkart", products.len());
                Ok(products)
            }
            None => {
                warn!("No product containers found on the Flipkart page");
                self.diagnostics.capture(NO_RESULTS_ARTIFACT, &html);
                Ok(Vec::new())
            }
        }
    }
}
