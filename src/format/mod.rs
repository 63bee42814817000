//! Output formatting for product records (table, JSON, CSV).

use crate::config::OutputFormat;
use crate::models::ProductRecord;
use anyhow::{Context, Result};

/// CSV column order.
pub const CSV_HEADER: [&str; 5] = ["name", "price", "rating", "reviews", "image_url"];

/// Formats records for output.
pub struct Formatter {
    format: OutputFormat,
}

impl Formatter {
    /// Creates a new formatter.
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats multiple records.
    pub fn format_records(&self, records: &[ProductRecord]) -> Result<String> {
        if records.is_empty() && self.format == OutputFormat::Table {
            return Ok("No products found.".to_string());
        }

        match self.format {
            OutputFormat::Json => self.json_records(records),
            OutputFormat::Table => Ok(self.table_records(records)),
            OutputFormat::Csv => self.csv_records(records),
        }
    }

    // JSON formatting

    fn json_records(&self, records: &[ProductRecord]) -> Result<String> {
        serde_json::to_string_pretty(records).context("Failed to serialize products as JSON")
    }

    // Table formatting

    fn table_records(&self, records: &[ProductRecord]) -> String {
        let price_width = 12;
        let rating_width = 20;
        let reviews_width = 8;
        let name_width = 60;

        let mut lines = Vec::new();

        // Header
        lines.push(format!(
            "{:<price_width$}  {:<rating_width$}  {:<reviews_width$}  {}",
            "Price", "Rating", "Reviews", "Name"
        ));
        lines.push(format!(
            "{:-<price_width$}  {:-<rating_width$}  {:-<reviews_width$}  {:-<name_width$}",
            "", "", "", ""
        ));

        // Rows
        for record in records {
            lines.push(format!(
                "{:>price_width$}  {:<rating_width$}  {:>reviews_width$}  {}",
                record.price,
                truncate(&record.rating, rating_width),
                record.reviews,
                truncate(&record.name, name_width)
            ));
        }

        lines.push(String::new());
        lines.push(format!("Total: {} products", records.len()));

        lines.join("\n")
    }

    // CSV formatting

    fn csv_records(&self, records: &[ProductRecord]) -> Result<String> {
        let mut writer = csv::Writer::from_writer(Vec::new());

        writer.write_record(CSV_HEADER).context("Failed to write CSV header")?;
        for record in records {
            writer
                .write_record([&record.name, &record.price, &record.rating, &record.reviews, &record.image_url])
                .context("Failed to write CSV row")?;
        }

        let bytes = writer.into_inner().context("Failed to flush CSV output")?;
        String::from_utf8(bytes).context("CSV output is not valid UTF-8")
    }
}

/// Shortens `text` to at most `width` characters, marking the cut with `...`.
fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let kept: String = text.chars().take(width.saturating_sub(3)).collect();
    format!("{}...", kept)
}
