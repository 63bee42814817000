//! Validity filter: a listing is a product only if it has a name and a price.

use super::Filter;
use crate::models::Product;
use crate::normalize::is_missing;

/// Drops records whose name or price is empty or the `"N/A"` placeholder.
///
/// Applied to DOM-extracted listings, where tiles without these fields are
/// ads, banners or related-search widgets.
#[derive(Debug, Default, Clone, Copy)]
pub struct RequiredFields;

impl Filter for RequiredFields {
    fn matches(&self, product: &Product) -> bool {
        !is_missing(&product.name) && !is_missing(&product.price)
    }

    fn description(&self) -> String {
        "Requires name and price".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::retailers::Retailer;

    #[test]
    fn test_complete_product_passes() {
        let product = Product::new(Retailer::Flipkart, "Redmi Note 13", "17999");
        assert!(RequiredFields.matches(&product));
    }

    #[test]
    fn test_missing_name_or_price_rejected() {
        assert!(!RequiredFields.matches(&Product::new(Retailer::Amazon, "", "100")));
        assert!(!RequiredFields.matches(&Product::new(Retailer::Amazon, "N/A", "100")));
        assert!(!RequiredFields.matches(&Product::new(Retailer::Amazon, "Mouse", "N/A")));
        assert!(!RequiredFields.matches(&Product::new(Retailer::Amazon, "Mouse", "  ")));
    }

    #[test]
    fn test_optional_fields_do_not_matter() {
        let mut product = Product::new(Retailer::Amazon, "Mouse", "499");
        product.rating = None;
        product.image_url = None;
        assert!(RequiredFields.matches(&product));
    }
}
