//! Match records and the caller-facing suggestion shape

use serde::{Deserialize, Serialize};

/// One row matched by the store's search query.
///
/// Owned by the executor for the duration of one call; never cached or
/// mutated after creation.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchRecord {
    /// Item id
    pub id: i64,
    /// Username of the owning user
    pub owner_username: String,
    /// Item type ("table" or "remote")
    pub item_type: String,
    /// Item name
    pub name: String,
    /// Item description
    pub description: Option<String>,
    /// Item tags
    pub tags: Vec<String>,
    /// Positional match score, never negative
    pub rank: f64,
}

/// Nested payload of a suggestion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestionData {
    pub name: String,
    pub description: Option<String>,
    pub tags: Vec<String>,
}

/// The uniform suggestion shape consumed by the aggregator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    /// Item id
    pub id: i64,
    /// Display name of the matched dataset
    pub dataset_name: String,
    /// Always true: this backend only ever returns dataset-like items
    pub is_dataset: bool,
    /// Relevance score copied from the record's rank
    pub score: f64,
    /// Nested item payload
    pub data: SuggestionData,
}

impl From<MatchRecord> for Suggestion {
    fn from(record: MatchRecord) -> Self {
        Self {
            id: record.id,
            dataset_name: record.name.clone(),
            is_dataset: true,
            score: record.rank,
            data: SuggestionData {
                name: record.name,
                description: record.description,
                tags: record.tags,
            },
        }
    }
}
