//! Search command implementation.

use crate::config::Config;
use crate::filters::FilterChainBuilder;
use crate::format::Formatter;
use crate::models::to_records;
use crate::retailers::Retailer;
use crate::scrapers::{self, Scraper};
use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::{debug, info};

/// Runs a single search against one retailer.
pub struct SearchCommand {
    config: Config,
    min_price: Option<f64>,
    max_price: Option<f64>,
    output: Option<PathBuf>,
}

impl SearchCommand {
    /// Creates a new search command.
    pub fn new(config: Config) -> Self {
        Self { config, min_price: None, max_price: None, output: None }
    }

    /// Keeps only products priced within the given bounds.
    pub fn with_price_range(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.min_price = min;
        self.max_price = max;
        self
    }

    /// Writes the formatted results to a file instead of returning them.
    pub fn with_output(mut self, path: Option<PathBuf>) -> Self {
        self.output = path;
        self
    }

    /// Executes the search and returns text for the terminal.
    pub async fn execute(&self, retailer: Retailer, query: &str) -> Result<String> {
        let scraper = scrapers::build(retailer, &self.config).context("Failed to create HTTP client")?;

        self.execute_with_scraper(scraper.as_ref(), query).await
    }

    /// Executes the search with a provided scraper (for testing).
    pub async fn execute_with_scraper(&self, scraper: &dyn Scraper, query: &str) -> Result<String> {
        info!("Searching {} for: {}", scraper.retailer(), query);

        let filters = FilterChainBuilder::new().price_range(self.min_price, self.max_price).build();
        if !filters.is_empty() {
            debug!("Active filters: {}", filters.descriptions().join(", "));
        }

        let products = scraper
            .scrape(query)
            .await
            .with_context(|| format!("Search on {} failed", scraper.retailer()))?;
        let products = filters.apply(products);

        info!("Found {} products matching criteria", products.len());

        let records = to_records(&products);
        let formatter = Formatter::new(self.config.format);

        let Some(path) = &self.output else {
            return formatter.format_records(&records);
        };

        if records.is_empty() {
            return Ok(format!("No products found; {} was not written.", path.display()));
        }

        let content = formatter.format_records(&records)?;
        std::fs::write(path, content).with_context(|| format!("Failed to write output file: {}", path.display()))?;

        Ok(format!("Saved {} products to {}", records.len(), path.display()))
    }
}
