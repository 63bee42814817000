//! Product data as extracted, and its wire representation.

use crate::normalize::NOT_AVAILABLE;
use crate::retailers::Retailer;
use serde::{Deserialize, Serialize};

/// A product extracted from one search-result container or JSON entry.
///
/// Optional fields are `None` when the page did not provide them; the
/// `"N/A"`-style placeholders only appear once converted to a
/// [`ProductRecord`].
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    /// Retailer the product was scraped from
    pub retailer: Retailer,
    /// Display name
    pub name: String,
    /// Price text with currency symbols and separators removed
    pub price: String,
    /// Rating text, e.g. "4.3 out of 5 stars"
    pub rating: Option<String>,
    /// Review or rating count without thousands separators
    pub reviews: Option<String>,
    /// Primary image URL
    pub image_url: Option<String>,
    /// Absolute product page URL (Myntra only)
    pub url: Option<String>,
}

impl Product {
    /// Creates a product with only the required fields set.
    pub fn new(retailer: Retailer, name: impl Into<String>, price: impl Into<String>) -> Self {
        Self {
            retailer,
            name: name.into(),
            price: price.into(),
            rating: None,
            reviews: None,
            image_url: None,
            url: None,
        }
    }

    /// Returns the price as a number if the text parses as one.
    pub fn price_value(&self) -> Option<f64> {
        self.price.trim().parse().ok()
    }

    /// Converts to the serialized output shape.
    pub fn to_record(&self) -> ProductRecord {
        ProductRecord::from(self)
    }
}

/// Serialized product: every field is a string, absent values use sentinels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub name: String,
    pub price: String,
    pub rating: String,
    pub reviews: String,
    pub image_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl From<&Product> for ProductRecord {
    fn from(product: &Product) -> Self {
        let or_na = |value: &Option<String>| value.clone().unwrap_or_else(|| NOT_AVAILABLE.to_string());

        let url = product
            .retailer
            .has_product_url()
            .then(|| product.url.clone().unwrap_or_default());

        Self {
            name: product.name.clone(),
            price: product.price.clone(),
            rating: or_na(&product.rating),
            reviews: or_na(&product.reviews),
            image_url: product
                .image_url
                .clone()
                .unwrap_or_else(|| product.retailer.missing_image().to_string()),
            url,
        }
    }
}

impl From<Product> for ProductRecord {
    fn from(product: Product) -> Self {
        ProductRecord::from(&product)
    }
}

/// Converts a list of products into records, preserving order.
pub fn to_records(products: &[Product]) -> Vec<ProductRecord> {
    products.iter().map(ProductRecord::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_full_product() -> Product {
        Product {
            retailer: Retailer::Amazon,
            name: "Test Laptop".to_string(),
            price: "54990".to_string(),
            rating: Some("4.2 out of 5 stars".to_string()),
            reviews: Some("1234".to_string()),
            image_url: Some("https://m.media-amazon.com/images/I/test.jpg".to_string()),
            url: None,
        }
    }

    #[test]
    fn test_record_keeps_present_fields() {
        let record = make_full_product().to_record();
        assert_eq!(record.name, "Test Laptop");
        assert_eq!(record.price, "54990");
        assert_eq!(record.rating, "4.2 out of 5 stars");
        assert_eq!(record.reviews, "1234");
        assert!(record.url.is_none());
    }

    #[test]
    fn test_record_sentinels_for_dom_retailers() {
        let product = Product::new(Retailer::Flipkart, "Phone", "9999");
        let record = product.to_record();
        assert_eq!(record.rating, "N/A");
        assert_eq!(record.reviews, "N/A");
        assert_eq!(record.image_url, "N/A");
        assert!(record.url.is_none());
    }

    #[test]
    fn test_record_sentinels_for_myntra() {
        let product = Product::new(Retailer::Myntra, "Roadster Shirt", "799");
        let record = product.to_record();
        assert_eq!(record.image_url, "No Image Found");
        assert_eq!(record.url, Some(String::new()));
    }

    #[test]
    fn test_record_json_shape() {
        let json = serde_json::to_value(make_full_product().to_record()).unwrap();
        let obj = json.as_object().unwrap();
        assert_eq!(obj.len(), 5);
        for key in ["name", "price", "rating", "reviews", "image_url"] {
            assert!(obj.get(key).unwrap().is_string(), "missing string field {}", key);
        }

        let mut myntra = Product::new(Retailer::Myntra, "Kurta", "1299");
        myntra.url = Some("https://www.myntra.com/kurtas/abc/123/buy".to_string());
        let json = serde_json::to_value(myntra.to_record()).unwrap();
        assert_eq!(json["url"], "https://www.myntra.com/kurtas/abc/123/buy");
    }

    #[test]
    fn test_price_value() {
        assert_eq!(make_full_product().price_value(), Some(54990.0));
        assert_eq!(Product::new(Retailer::Amazon, "x", "12.50").price_value(), Some(12.5));
        assert_eq!(Product::new(Retailer::Amazon, "x", "about 5").price_value(), None);
    }

    #[test]
    fn test_to_records_preserves_order() {
        let products = vec![
            Product::new(Retailer::Amazon, "First", "1"),
            Product::new(Retailer::Amazon, "Second", "2"),
        ];
        let records = to_records(&products);
        assert_eq!(records[0].name, "First");
        assert_eq!(records[1].name, "Second");
    }
}
