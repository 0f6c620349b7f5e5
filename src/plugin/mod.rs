//! The suggestion backend trait and the dataset plugin entry point
//!
//! The aggregator invokes `search` once per query and expects exactly one
//! completion carrying a (possibly empty) suggestion list, never an error.
//! All internal failures funnel through one terminal handler here: log one
//! diagnostic line prefixed with the plugin name, resolve with the empty
//! list.

use crate::context::{validate_identity, RequestContext};
use crate::error::SuggestError;
use crate::query::QueryFragments;
use crate::results::Suggestion;
use crate::store::{DatasetStore, PostgresStore};
use async_trait::async_trait;
use tracing::{error, warn};

/// Trait for suggestion backends
#[async_trait]
pub trait SuggestBackend: Send + Sync {
    /// Backend name, used as the diagnostic prefix
    fn name(&self) -> &str;

    /// Fetch ranked suggestions for a query.
    ///
    /// Fail-soft: completes exactly once, always with a list, never with an
    /// error. Failures degrade to an empty list.
    async fn search(&self, query: &str, context: &RequestContext) -> Vec<Suggestion>;
}

/// PostgreSQL-backed dataset suggestion plugin.
///
/// Holds only an immutable name and store; there is no shared mutable
/// state, so concurrent invocations are independent.
pub struct DatasetSuggestPlugin<S> {
    name: String,
    store: S,
}

impl DatasetSuggestPlugin<PostgresStore> {
    /// Create a plugin backed by PostgreSQL
    pub fn postgres(name: impl Into<String>, settings: crate::config::PostgresSettings) -> Self {
        Self::new(name, PostgresStore::new(settings))
    }
}

impl<S: DatasetStore> DatasetSuggestPlugin<S> {
    /// Create a plugin over any dataset store
    pub fn new(name: impl Into<String>, store: S) -> Self {
        Self {
            name: name.into(),
            store,
        }
    }

    /// The fallible pipeline: validate, derive fragments, query, map.
    ///
    /// Kept separate from [`SuggestBackend::search`] so every failure kind
    /// reaches exactly one terminal handler.
    async fn run(
        &self,
        query: &str,
        context: &RequestContext,
    ) -> Result<Vec<Suggestion>, SuggestError> {
        let username = validate_identity(context).ok_or(SuggestError::InvalidContext)?;
        let fragments = QueryFragments::build(query);
        let records = self.store.search(&fragments, username).await?;
        Ok(records.into_iter().map(Suggestion::from).collect())
    }
}

#[async_trait]
impl<S: DatasetStore> SuggestBackend for DatasetSuggestPlugin<S> {
    fn name(&self) -> &str {
        &self.name
    }

    async fn search(&self, query: &str, context: &RequestContext) -> Vec<Suggestion> {
        match self.run(query, context).await {
            Ok(suggestions) => suggestions,
            Err(e @ SuggestError::InvalidContext) => {
                warn!("{}: {}", self.name, e);
                vec![]
            }
            Err(e) => {
                error!("{}: {}", self.name, e);
                vec![]
            }
        }
    }
}
