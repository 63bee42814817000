//! Extraction building blocks shared by the retailer extractors.
//!
//! - [`dom`]: prioritized selector chains for markup whose structure drifts
//!   between page layouts.
//! - [`embedded`]: locating a JSON payload assigned inside a `<script>` block
//!   and walking it with defaulting lookups.

pub mod dom;
pub mod embedded;

pub use dom::{element_text, SelectorChain};
pub use embedded::{extract_assigned_json, lookup, lookup_array};
