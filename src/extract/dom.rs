//! Ordered selector fallbacks for DOM extraction.
//!
//! A comma-joined CSS selector returns matches in document order, which is not
//! what a fallback needs: when a page carries both an old and a new title
//! element the newer one must win regardless of position. [`SelectorChain`]
//! keeps the selectors separate and tries them in the order given.

use crate::normalize::clean_text;
use scraper::{ElementRef, Html, Selector};

/// Selectors tried in priority order; the first one that yields a usable
/// value wins.
#[derive(Debug, Clone)]
pub struct SelectorChain {
    selectors: Vec<Selector>,
}

impl SelectorChain {
    /// Parses each pattern into a selector, keeping the given order.
    pub fn parse(patterns: &[&str]) -> Result<Self, String> {
        let selectors = patterns
            .iter()
            .map(|p| Selector::parse(p).map_err(|e| format!("invalid selector '{}': {}", p, e)))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { selectors })
    }

    /// Number of alternatives in the chain.
    pub fn len(&self) -> usize {
        self.selectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selectors.is_empty()
    }

    /// Returns the first element matched by the highest-priority selector
    /// that matches anything inside `scope`.
    pub fn first<'a>(&self, scope: ElementRef<'a>) -> Option<ElementRef<'a>> {
        self.selectors.iter().find_map(|selector| scope.select(selector).next())
    }

    /// Returns the cleaned text of the first match with non-empty text.
    pub fn text(&self, scope: ElementRef<'_>) -> Option<String> {
        self.selectors.iter().find_map(|selector| {
            scope.select(selector).map(element_text).find(|text| !text.is_empty())
        })
    }

    /// Returns the first non-empty value of `attr` across the chain.
    pub fn attr(&self, scope: ElementRef<'_>, attr: &str) -> Option<String> {
        self.selectors.iter().find_map(|selector| {
            scope
                .select(selector)
                .filter_map(|e| e.value().attr(attr))
                .map(str::trim)
                .find(|value| !value.is_empty())
                .map(String::from)
        })
    }

    /// Returns true if any selector in the chain matches inside `scope`.
    pub fn matches(&self, scope: ElementRef<'_>) -> bool {
        self.first(scope).is_some()
    }

    /// Selects all elements for the first selector with at least one match in
    /// the document, along with that selector's position in the chain.
    pub fn select_first_layout<'a>(&self, document: &'a Html) -> Option<(usize, Vec<ElementRef<'a>>)> {
        self.selectors.iter().enumerate().find_map(|(idx, selector)| {
            let found: Vec<_> = document.select(selector).collect();
            (!found.is_empty()).then_some((idx, found))
        })
    }
}

/// Collects an element's text with whitespace collapsed.
pub fn element_text(element: ElementRef<'_>) -> String {
    clean_text(&element.text().collect::<String>())
}
