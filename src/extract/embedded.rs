//! JSON payloads embedded in `<script>` blocks as `name = {...};` assignments.

use crate::error::ScrapeError;
use scraper::{Html, Selector};
use serde_json::Value;
use std::sync::LazyLock;
use tracing::debug;

static SCRIPT: LazyLock<Selector> = LazyLock::new(|| Selector::parse("script").unwrap());

/// Returns the text of the first `<script>` block that assigns `marker`,
/// falling back to the first one that merely mentions it.
pub fn find_script(document: &Html, marker: &str) -> Option<String> {
    let mentioning: Vec<String> = document
        .select(&SCRIPT)
        .map(|e| e.text().collect::<String>())
        .filter(|text| text.contains(marker))
        .collect();

    let idx = mentioning.iter().position(|text| slice_assignment(text, marker).is_some()).unwrap_or(0);
    mentioning.into_iter().nth(idx)
}

/// Slices the assigned value out of `marker = <value>;`.
///
/// Occurrences of `marker` not followed by `=` (such as a longer name that
/// starts with it) are skipped. Returns `None` when no occurrence is an
/// assignment.
pub fn slice_assignment<'a>(script: &'a str, marker: &str) -> Option<&'a str> {
    script.match_indices(marker).find_map(|(start, _)| {
        let rest = script[start + marker.len()..].trim_start().strip_prefix('=')?;
        Some(rest.trim().trim_end_matches(';').trim_end())
    })
}

/// Locates `marker = {...}` in the page's scripts and parses the value.
///
/// Fails with [`ScrapeError::NotFound`] when no script carries the marker and
/// [`ScrapeError::Parse`] when the assigned text is not valid JSON.
pub fn extract_assigned_json(html: &str, marker: &str) -> Result<Value, ScrapeError> {
    let document = Html::parse_document(html);

    let script = find_script(&document, marker).ok_or_else(|| {
        ScrapeError::NotFound(format!("No script assigns '{}'. The site structure may have changed.", marker))
    })?;

    let payload = slice_assignment(&script, marker)
        .ok_or_else(|| ScrapeError::Parse(format!("'{}' is not followed by an assignment", marker)))?;

    debug!("Found {} byte payload for {}", payload.len(), marker);
    Ok(serde_json::from_str(payload)?)
}

/// Walks `path` through nested objects. Missing keys and non-object
/// intermediates yield `None` instead of an error.
pub fn lookup<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter().try_fold(value, |current, key| current.as_object()?.get(*key))
}

/// Like [`lookup`] but for arrays: anything other than an array at `path`
/// becomes an empty slice.
pub fn lookup_array<'a>(value: &'a Value, path: &[&str]) -> &'a [Value] {
    lookup(value, path).and_then(Value::as_array).map(Vec::as_slice).unwrap_or(&[])
}
