//! Error types for fetching and extraction.

/// Failure of a whole scrape. Surfaced to API callers as a JSON 500.
#[derive(Debug, thiserror::Error)]
pub enum ScrapeError {
    /// Request failed or timed out.
    #[error("Failed to retrieve data: {0}")]
    Network(String),

    /// Upstream answered with a non-2xx status, usually an anti-bot response.
    #[error("Failed to retrieve page, status code: {status}")]
    UpstreamBlocked { status: u16 },

    /// Anti-bot challenge page served with a success status.
    #[error("Request was blocked by an anti-bot challenge: {0}")]
    Challenge(String),

    /// Expected data marker is absent from the page.
    #[error("Failed to find product data. {0}")]
    NotFound(String),

    /// Malformed embedded JSON or unexpected structure.
    #[error("Failed to parse product data from the page: {0}")]
    Parse(String),

    /// Headless browser could not be launched or driven.
    #[error("Browser automation failed: {0}")]
    Browser(String),
}

impl From<serde_json::Error> for ScrapeError {
    fn from(err: serde_json::Error) -> Self {
        ScrapeError::Parse(err.to_string())
    }
}

impl From<wreq::Error> for ScrapeError {
    fn from(err: wreq::Error) -> Self {
        ScrapeError::Network(err.to_string())
    }
}

impl From<chromiumoxide::error::CdpError> for ScrapeError {
    fn from(err: chromiumoxide::error::CdpError) -> Self {
        ScrapeError::Browser(err.to_string())
    }
}

/// A single product entry that could not be mapped. Logged and skipped.
#[derive(Debug, thiserror::Error)]
pub enum EntryError {
    #[error("entry is not an object")]
    NotAnObject,

    #[error("field '{field}' has unexpected type: expected {expected}")]
    WrongType { field: &'static str, expected: &'static str },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blocked_message_contains_status() {
        let err = ScrapeError::UpstreamBlocked { status: 503 };
        assert_eq!(err.to_string(), "Failed to retrieve page, status code: 503");
    }

    #[test]
    fn test_json_error_becomes_parse() {
        let json_err = serde_json::from_str::<serde_json::Value>("{oops").unwrap_err();
        let err: ScrapeError = json_err.into();
        assert!(matches!(err, ScrapeError::Parse(_)));
        assert!(err.to_string().starts_with("Failed to parse product data"));
    }

    #[test]
    fn test_entry_error_display() {
        let err = EntryError::WrongType { field: "images", expected: "array" };
        assert_eq!(err.to_string(), "field 'images' has unexpected type: expected array");
    }
}
