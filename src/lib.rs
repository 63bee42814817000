//! shop-scraper - Product search scraping for Amazon India, Flipkart and Myntra
//!
//! Fetches a retailer's search page, extracts product records from its HTML
//! or embedded JSON, and serves them over a small HTTP API or the CLI.

pub mod api;
pub mod commands;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod filters;
pub mod format;
pub mod models;
pub mod normalize;
pub mod retailers;
pub mod scrapers;

pub use config::Config;
pub use error::ScrapeError;
pub use models::{Product, ProductRecord};
pub use retailers::Retailer;
