//! Query fragment derivation
//!
//! The raw search text is expanded into three parallel matching strategies:
//! a full-text term, a prefix term for `to_tsquery`'s `:*` operator, and an
//! `ILIKE` substring pattern. All three travel to the database as bound
//! parameters; none of them is ever spliced into the query text.

use serde::{Deserialize, Serialize};

/// The derived query terms for one search invocation.
///
/// Built once per request from the raw query text and immutable thereafter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryFragments {
    /// Lowercased raw query; the full-text term and the positional-scoring anchor
    pub normalized_text: String,
    /// Full-text prefix term: spaces joined with `+`, suffixed with `:*`
    pub prefix_term: String,
    /// Case-insensitive substring pattern: `%<normalized>%`
    pub substring_pattern: String,
}

impl QueryFragments {
    /// Derive fragments from the raw query text.
    ///
    /// Total over all inputs: the empty string yields an empty full-text
    /// term and a `%%` pattern that matches everything, which mirrors
    /// browse-all behavior when no search text is given.
    pub fn build(raw_query: &str) -> Self {
        let normalized_text = raw_query.to_lowercase();
        let prefix_term = format!("{}:*", normalized_text.replace(' ', "+"));
        let substring_pattern = format!("%{}%", normalized_text);
        Self {
            normalized_text,
            prefix_term,
            substring_pattern,
        }
    }
}
