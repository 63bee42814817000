//! Myntra search results, read from the JSON state the page embeds in a
//! `window.__myx = {...}` script.

use super::Scraper;
use crate::error::{EntryError, ScrapeError};
use crate::extract::{extract_assigned_json, lookup_array};
use crate::fetch::PageFetcher;
use crate::models::Product;
use crate::retailers::Retailer;
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, trace, warn};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Script variable holding the page state.
pub const STATE_MARKER: &str = "window.__myx";

const PRODUCTS_PATH: [&str; 3] = ["searchData", "results", "products"];

/// Extracts products from a search page.
///
/// A page without the state script or with unparseable state is an error.
/// Entries that cannot be mapped are logged and skipped.
pub fn parse_products(html: &str) -> Result<Vec<Product>, ScrapeError> {
    let state = extract_assigned_json(html, STATE_MARKER)?;
    let entries = lookup_array(&state, &PRODUCTS_PATH);

    if entries.is_empty() {
        debug!("No products in the page state");
        return Ok(Vec::new());
    }

    let products = entries
        .iter()
        .enumerate()
        .filter_map(|(idx, entry)| match map_entry(entry) {
            Ok(product) => {
                trace!("Parsed product: {} - {}", product.name, product.price);
                Some(product)
            }
            Err(e) => {
                warn!("Skipping product entry {}: {}", idx, e);
                None
            }
        })
        .collect();

    Ok(products)
}

/// Maps one `searchData.results.products[]` entry.
pub fn map_entry(entry: &Value) -> Result<Product, EntryError> {
    let entry = entry.as_object().ok_or(EntryError::NotAnObject)?;

    let brand = display_field(entry, "brand")?.unwrap_or_default();
    let product_name = display_field(entry, "productName")?.unwrap_or_default();
    let name = format!("{} {}", brand, product_name).trim().to_string();

    let mut product = Product::new(Retailer::Myntra, name, price(entry)?);
    product.image_url = first_image(entry)?;
    product.rating = rating(entry)?;
    product.reviews = rating_count(entry)?;
    product.url = display_field(entry, "landingPageUrl")?
        .filter(|path| !path.is_empty())
        .map(|path| format!("https://www.myntra.com/{}", path));

    Ok(product)
}

/// A display field; absent and `null` are `None`, numbers are rendered as text.
fn display_field(entry: &Map<String, Value>, field: &'static str) -> Result<Option<String>, EntryError> {
    match entry.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(_) => Err(EntryError::WrongType { field, expected: "string" }),
    }
}

/// `discountedPrice`, falling back to `price`, then `0`.
fn price(entry: &Map<String, Value>) -> Result<String, EntryError> {
    for field in ["discountedPrice", "price"] {
        match entry.get(field) {
            None | Some(Value::Null) => continue,
            Some(Value::Number(n)) => return Ok(n.to_string()),
            Some(Value::String(s)) => return Ok(s.trim().to_string()),
            Some(_) => return Err(EntryError::WrongType { field, expected: "number" }),
        }
    }
    Ok("0".to_string())
}

fn first_image(entry: &Map<String, Value>) -> Result<Option<String>, EntryError> {
    let images = match entry.get("images") {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Array(images)) => images,
        Some(_) => return Err(EntryError::WrongType { field: "images", expected: "array" }),
    };

    let Some(first) = images.first() else {
        return Ok(None);
    };
    let first = first.as_object().ok_or(EntryError::WrongType { field: "images", expected: "array of objects" })?;

    Ok(display_field(first, "src")?.filter(|src| !src.is_empty()))
}

/// Average rating with one decimal; zero means unrated.
fn rating(entry: &Map<String, Value>) -> Result<Option<String>, EntryError> {
    match entry.get("rating") {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => Ok(n
            .as_f64()
            .filter(|value| *value != 0.0)
            .map(|value| format!("{:.1} out of 5 stars", value))),
        Some(_) => Err(EntryError::WrongType { field: "rating", expected: "number" }),
    }
}

fn rating_count(entry: &Map<String, Value>) -> Result<Option<String>, EntryError> {
    match entry.get("ratingCount") {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) if n.as_f64() == Some(0.0) => Ok(None),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(Value::String(s)) if s.is_empty() => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(EntryError::WrongType { field: "ratingCount", expected: "number" }),
    }
}

/// Scrapes myntra.com search results over plain HTTP.
pub struct MyntraScraper {
    fetcher: Arc<dyn PageFetcher>,
    base_url: String,
    timeout: Duration,
}

impl MyntraScraper {
    pub fn new(fetcher: Arc<dyn PageFetcher>) -> Self {
        Self { fetcher, base_url: Retailer::Myntra.base_url(), timeout: DEFAULT_TIMEOUT }
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
}

#[async_trait]
impl Scraper for MyntraScraper {
    fn retailer(&self) -> Retailer {
        Retailer::Myntra
    }

    async fn scrape(&self, query: &str) -> Result<Vec<Product>, ScrapeError> {
        let url = Retailer::Myntra.search_url(&self.base_url, query);
        info!("Searching Myntra for '{}'", query);

        let page = self.fetcher.fetch(&url, self.timeout).await?;
        if !page.is_success() {
            warn!("Failed to retrieve Myntra page, status code: {}", page.status);
            return Err(ScrapeError::UpstreamBlocked { status: page.status });
        }

        let products = parse_products(&page.body)?;
        debug!("Extracted {} products from Myntra", products.len());
        Ok(products)
    }
}
