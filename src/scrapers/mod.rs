//! Per-retailer scrapers: fetch a search page, extract products, filter.

pub mod amazon;
pub mod flipkart;
pub mod myntra;
pub mod selectors;

use crate::config::Config;
use crate::diagnostics::sink_for;
use crate::error::ScrapeError;
use crate::fetch::{ChromeRenderer, HttpFetcher, PageFetcher};
use crate::models::Product;
use crate::retailers::Retailer;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

pub use amazon::AmazonScraper;
pub use flipkart::FlipkartScraper;
pub use myntra::MyntraScraper;

/// A search against one retailer - enables fakes in API and command tests.
#[async_trait]
pub trait Scraper: Send + Sync {
    /// The retailer this scraper targets.
    fn retailer(&self) -> Retailer;

    /// Runs one search. An empty result is `Ok(vec![])`, not an error.
    async fn scrape(&self, query: &str) -> Result<Vec<Product>, ScrapeError>;
}

/// Builds scrapers for every retailer from configuration, sharing one HTTP
/// client between the plain-fetch retailers.
pub fn build_all(config: &Config) -> Result<HashMap<Retailer, Arc<dyn Scraper>>, ScrapeError> {
    let fetcher: Arc<dyn PageFetcher> = Arc::new(HttpFetcher::new(config.proxy.as_deref())?);

    Ok(Retailer::all()
        .iter()
        .map(|&retailer| (retailer, build_with(retailer, config, fetcher.clone())))
        .collect())
}

/// Builds the scraper for a single retailer.
pub fn build(retailer: Retailer, config: &Config) -> Result<Arc<dyn Scraper>, ScrapeError> {
    let fetcher: Arc<dyn PageFetcher> = Arc::new(HttpFetcher::new(config.proxy.as_deref())?);
    Ok(build_with(retailer, config, fetcher))
}

fn build_with(retailer: Retailer, config: &Config, fetcher: Arc<dyn PageFetcher>) -> Arc<dyn Scraper> {
    let diagnostics = sink_for(config.debug_dir.as_deref());

    match retailer {
        Retailer::Amazon => Arc::new(
            AmazonScraper::new(fetcher)
                .with_timeout(config.amazon_timeout())
                .with_diagnostics(diagnostics),
        ),
        Retailer::Myntra => Arc::new(MyntraScraper::new(fetcher).with_timeout(config.myntra_timeout())),
        Retailer::Flipkart => {
            let renderer = ChromeRenderer::new(config.chrome_executable.clone());
            Arc::new(
                FlipkartScraper::new(Arc::new(renderer))
                    .with_waits(config.popup_wait(), config.listing_wait())
                    .with_diagnostics(diagnostics),
            )
        }
    }
}
