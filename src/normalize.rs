//! Value-cleaning helpers shared by all extractors.

/// Placeholder for a field the page did not provide.
pub const NOT_AVAILABLE: &str = "N/A";

/// Characters removed from price text: rupee sign, its mis-decoded UTF-8 form
/// and thousands separators.
const PRICE_NOISE: [&str; 3] = ["\u{20b9}", "â‚¹", ","];

/// Collapses runs of whitespace into single spaces and trims the ends.
pub fn clean_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Strips currency symbols and separators from a price string.
///
/// `"₹1,29,900"` becomes `"129900"`. Applying it twice yields the same result.
pub fn clean_price(text: &str) -> String {
    let mut cleaned = text.to_string();
    for noise in PRICE_NOISE {
        cleaned = cleaned.replace(noise, "");
    }
    cleaned.trim().to_string()
}

/// Removes thousands separators from a count such as `"12,345"`.
pub fn strip_thousands(text: &str) -> String {
    clean_text(text).replace(',', "")
}

/// Returns true for empty text or the `"N/A"` placeholder.
pub fn is_missing(text: &str) -> bool {
    let trimmed = text.trim();
    trimmed.is_empty() || trimmed == NOT_AVAILABLE
}

/// Converts text into `None` when it is missing.
pub fn non_empty(text: String) -> Option<String> {
    if is_missing(&text) {
        None
    } else {
        Some(text)
    }
}
