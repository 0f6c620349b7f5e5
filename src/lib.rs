//! Dataset-Suggest: a fail-soft PostgreSQL suggestion backend
//!
//! One pluggable backend of a search/autocomplete aggregator: given a
//! free-text query and an acting-user context, it returns a ranked list
//! of matching datasets owned by that user. A call never fails from the
//! caller's perspective; every internal error degrades to an empty list.

pub mod config;
pub mod context;
pub mod error;
pub mod plugin;
pub mod query;
pub mod results;
pub mod store;

pub use config::PostgresSettings;
pub use context::{validate_identity, RequestContext};
pub use error::SuggestError;
pub use plugin::{DatasetSuggestPlugin, SuggestBackend};
pub use query::QueryFragments;
pub use results::{MatchRecord, Suggestion};
pub use store::{DatasetStore, PostgresStore};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Maximum number of suggestions returned per call
pub const RESULT_LIMIT: usize = 50;

/// Default timeout for connection acquisition and query execution, in seconds
pub const DEFAULT_TIMEOUT: u64 = 5;
