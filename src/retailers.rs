//! Supported retailers with their origins, search URLs and fetch modes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How a retailer's search page has to be obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchMode {
    /// Plain HTTP GET with browser-like headers.
    Http,
    /// Page content is populated by scripts; needs a headless browser.
    Rendered,
}

impl fmt::Display for FetchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchMode::Http => write!(f, "http"),
            FetchMode::Rendered => write!(f, "browser"),
        }
    }
}

/// Retailers with a known search-page extractor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Retailer {
    Amazon,
    Flipkart,
    Myntra,
}

impl Retailer {
    /// Returns the retailer's domain.
    pub fn domain(&self) -> &'static str {
        match self {
            Retailer::Amazon => "amazon.in",
            Retailer::Flipkart => "flipkart.com",
            Retailer::Myntra => "myntra.com",
        }
    }

    /// Returns the origin URL (no trailing slash).
    pub fn base_url(&self) -> String {
        format!("https://www.{}", self.domain())
    }

    /// Builds the search-results URL for `query` relative to `base_url`.
    pub fn search_url(&self, base_url: &str, query: &str) -> String {
        let base = base_url.trim_end_matches('/');
        match self {
            Retailer::Amazon => format!("{}/s?k={}", base, plus_encode(query)),
            Retailer::Flipkart => format!("{}/search?q={}", base, plus_encode(query)),
            Retailer::Myntra => {
                let slug = query.split_whitespace().collect::<Vec<_>>().join("-");
                format!("{}/{}", base, urlencoding::encode(&slug))
            }
        }
    }

    /// Returns how pages for this retailer are fetched.
    pub fn fetch_mode(&self) -> FetchMode {
        match self {
            Retailer::Flipkart => FetchMode::Rendered,
            Retailer::Amazon | Retailer::Myntra => FetchMode::Http,
        }
    }

    /// Sentinel written in place of a missing image URL.
    pub fn missing_image(&self) -> &'static str {
        match self {
            Retailer::Myntra => "No Image Found",
            Retailer::Amazon | Retailer::Flipkart => "N/A",
        }
    }

    /// Whether records from this retailer carry a product page URL.
    pub fn has_product_url(&self) -> bool {
        matches!(self, Retailer::Myntra)
    }

    /// Returns all supported retailers.
    pub fn all() -> &'static [Retailer] {
        &[Retailer::Amazon, Retailer::Flipkart, Retailer::Myntra]
    }
}

/// Percent-encodes a query, using `+` for spaces as search forms do.
fn plus_encode(query: &str) -> String {
    query.split_whitespace().map(|word| urlencoding::encode(word).into_owned()).collect::<Vec<_>>().join("+")
}

impl fmt::Display for Retailer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            Retailer::Amazon => "amazon",
            Retailer::Flipkart => "flipkart",
            Retailer::Myntra => "myntra",
        };
        write!(f, "{}", code)
    }
}

impl FromStr for Retailer {
    type Err = RetailerParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "amazon" | "amz" | "amazon.in" => Ok(Retailer::Amazon),
            "flipkart" | "fk" | "flipkart.com" => Ok(Retailer::Flipkart),
            "myntra" | "myntra.com" => Ok(Retailer::Myntra),
            _ => Err(RetailerParseError(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, thiserror::Error)]
#[error("Unknown retailer '{0}'. Valid retailers: amazon, flipkart, myntra")]
pub struct RetailerParseError(String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retailer_parsing() {
        assert_eq!(Retailer::from_str("amazon").unwrap(), Retailer::Amazon);
        assert_eq!(Retailer::from_str("amz").unwrap(), Retailer::Amazon);
        assert_eq!(Retailer::from_str("flipkart").unwrap(), Retailer::Flipkart);
        assert_eq!(Retailer::from_str("fk").unwrap(), Retailer::Flipkart);
        assert_eq!(Retailer::from_str("myntra.com").unwrap(), Retailer::Myntra);

        // Case insensitive
        assert_eq!(Retailer::from_str("AMAZON").unwrap(), Retailer::Amazon);
        assert_eq!(Retailer::from_str(" Myntra ").unwrap(), Retailer::Myntra);

        assert!(Retailer::from_str("ebay").is_err());
        assert!(Retailer::from_str("").is_err());
    }

    #[test]
    fn test_parse_error_display() {
        let msg = Retailer::from_str("xyz").unwrap_err().to_string();
        assert!(msg.contains("xyz"));
        assert!(msg.contains("Valid retailers"));
    }

    #[test]
    fn test_base_urls() {
        assert_eq!(Retailer::Amazon.base_url(), "https://www.amazon.in");
        assert_eq!(Retailer::Flipkart.base_url(), "https://www.flipkart.com");
        assert_eq!(Retailer::Myntra.base_url(), "https://www.myntra.com");
    }

    #[test]
    fn test_search_urls() {
        let amazon = Retailer::Amazon;
        assert_eq!(
            amazon.search_url(&amazon.base_url(), "gaming laptop"),
            "https://www.amazon.in/s?k=gaming+laptop"
        );

        let flipkart = Retailer::Flipkart;
        assert_eq!(
            flipkart.search_url("http://localhost:8080/", "mobile"),
            "http://localhost:8080/search?q=mobile"
        );

        let myntra = Retailer::Myntra;
        assert_eq!(
            myntra.search_url(&myntra.base_url(), "men shirts"),
            "https://www.myntra.com/men-shirts"
        );
    }

    #[test]
    fn test_search_url_special_characters() {
        let url = Retailer::Amazon.search_url("https://www.amazon.in", "rust & c++");
        assert_eq!(url, "https://www.amazon.in/s?k=rust+%26+c%2B%2B");
    }

    #[test]
    fn test_fetch_modes() {
        assert_eq!(Retailer::Amazon.fetch_mode(), FetchMode::Http);
        assert_eq!(Retailer::Myntra.fetch_mode(), FetchMode::Http);
        assert_eq!(Retailer::Flipkart.fetch_mode(), FetchMode::Rendered);
    }

    #[test]
    fn test_missing_image_sentinels() {
        assert_eq!(Retailer::Amazon.missing_image(), "N/A");
        assert_eq!(Retailer::Flipkart.missing_image(), "N/A");
        assert_eq!(Retailer::Myntra.missing_image(), "No Image Found");
    }

    #[test]
    fn test_retailer_display_and_serde() {
        for retailer in Retailer::all() {
            let json = serde_json::to_string(retailer).unwrap();
            assert_eq!(json, format!("\"{}\"", retailer));
            assert_eq!(Retailer::from_str(&retailer.to_string()).unwrap(), *retailer);
        }
    }
}
