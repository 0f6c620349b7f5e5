//! Dataset store seam and the PostgreSQL search executor
//!
//! The executor owns the whole data-store interaction for one call: it
//! opens a dedicated connection, runs the ranked search as a single
//! parameterized query, maps the rows, and closes the connection on every
//! exit path. One connection per query, no pooling, no retry: the
//! aggregator fans out to independent backends and tolerates one of them
//! being unavailable.

use crate::config::PostgresSettings;
use crate::error::SuggestError;
use crate::query::QueryFragments;
use crate::results::MatchRecord;
use async_trait::async_trait;
use std::time::Duration;
use tokio::time::timeout;
use tokio_postgres::{NoTls, Row};
use tracing::debug;

/// Ranked ownership-filtered search over items and their tags.
///
/// Parameters: $1 = normalized query text (positional-scoring anchor),
/// $2 = validated username, $3 = full-text prefix term, $4 = substring
/// pattern. Items fully backed by a live external import are excluded:
/// only native items, or items whose most recent import failed, are
/// searchable here. A positional miss scores against a 10000 sentinel so
/// it contributes ~0, and tag positions are scaled by 1000 so a tag hit
/// never outranks a name hit at the same position.
const SEARCH_SQL: &str = "\
SELECT
    id,
    username,
    item_type,
    name,
    description,
    tags,
    (1.0 / (CASE WHEN pos_name = 0 THEN 10000 ELSE pos_name END) +
     1.0 / (CASE WHEN pos_tags = 0 THEN 10000 ELSE pos_tags END))::float8 AS rank
FROM (
    SELECT
        i.id::bigint AS id,
        u.username,
        i.type AS item_type,
        COALESCE(i.name, '') AS name,
        i.description,
        COALESCE(i.tags, ARRAY[]::text[]) AS tags,
        COALESCE(position($1 in lower(i.name)), 0) AS pos_name,
        COALESCE(position($1 in lower(array_to_string(i.tags, ' '))), 0) * 1000 AS pos_tags
    FROM items AS i
        INNER JOIN users AS u ON u.id = i.owner_id
        LEFT JOIN external_sources AS es ON es.item_id = i.id
        LEFT JOIN external_data_imports AS edi ON (
            edi.external_source_id = es.id AND
            (SELECT state FROM data_imports WHERE id = edi.data_import_id) <> 'failure'
        ) WHERE (
            edi.id IS NULL AND
            i.owner_id = (SELECT id FROM users WHERE username = $2) AND
            i.type IN ('table', 'remote') AND (
                to_tsvector(COALESCE(i.name, '')) @@ to_tsquery($3) OR
                to_tsvector(array_to_string(i.tags, ' ')) @@ to_tsquery($3) OR
                i.name ILIKE $4 OR
                array_to_string(i.tags, ' ') ILIKE $4
            )
        )
) AS matches
ORDER BY rank DESC, item_type DESC LIMIT 50";

/// Data-store seam for the ranked dataset search.
#[async_trait]
pub trait DatasetStore: Send + Sync {
    /// Run the ranked search for one validated user.
    ///
    /// Returns the matched records in store order (rank descending, item
    /// type as tie-break), capped at [`crate::RESULT_LIMIT`].
    async fn search(
        &self,
        fragments: &QueryFragments,
        username: &str,
    ) -> Result<Vec<MatchRecord>, SuggestError>;
}

/// PostgreSQL-backed store.
///
/// Holds only immutable connection settings; each search owns its
/// connection exclusively and drops it before returning.
pub struct PostgresStore {
    settings: PostgresSettings,
}

impl PostgresStore {
    /// Create a store from connection settings
    pub fn new(settings: PostgresSettings) -> Self {
        Self { settings }
    }

    /// Build the driver configuration from the settings
    fn pg_config(&self) -> tokio_postgres::Config {
        let mut config = tokio_postgres::Config::new();
        config
            .host(&self.settings.host)
            .port(self.settings.port)
            .user(&self.settings.user)
            .dbname(&self.settings.dbname);
        if let Some(password) = &self.settings.password {
            config.password(password);
        }
        config
    }
}

#[async_trait]
impl DatasetStore for PostgresStore {
    async fn search(
        &self,
        fragments: &QueryFragments,
        username: &str,
    ) -> Result<Vec<MatchRecord>, SuggestError> {
        let connect_timeout = Duration::from_secs(self.settings.connect_timeout_secs);
        let query_timeout = Duration::from_secs(self.settings.query_timeout_secs);

        let config = self.pg_config();
        let (client, connection) = timeout(connect_timeout, config.connect(NoTls))
            .await
            .map_err(|_| SuggestError::Connection {
                message: format!("timed out after {:?}", connect_timeout),
            })?
            .map_err(|e| SuggestError::Connection {
                message: e.to_string(),
            })?;

        // The connection task drives the socket; it finishes once the
        // client is dropped, which happens on every exit path below.
        let driver = tokio::spawn(async move {
            if let Err(e) = connection.await {
                debug!("postgres connection closed with error: {}", e);
            }
        });

        let result = timeout(
            query_timeout,
            client.query(
                SEARCH_SQL,
                &[
                    &fragments.normalized_text,
                    &username,
                    &fragments.prefix_term,
                    &fragments.substring_pattern,
                ],
            ),
        )
        .await;

        drop(client);
        driver.abort();

        let rows = match result {
            Ok(Ok(rows)) => rows,
            Ok(Err(e)) => {
                return Err(SuggestError::Query {
                    message: e.to_string(),
                })
            }
            Err(_) => {
                return Err(SuggestError::Query {
                    message: format!("timed out after {:?}", query_timeout),
                })
            }
        };

        rows.iter().map(record_from_row).collect()
    }
}

/// Convert one result row into a match record.
fn record_from_row(row: &Row) -> Result<MatchRecord, SuggestError> {
    let mapping = |e: tokio_postgres::Error| SuggestError::Mapping {
        message: e.to_string(),
    };
    Ok(MatchRecord {
        id: row.try_get("id").map_err(mapping)?,
        owner_username: row.try_get("username").map_err(mapping)?,
        item_type: row.try_get("item_type").map_err(mapping)?,
        name: row.try_get("name").map_err(mapping)?,
        description: row.try_get("description").map_err(mapping)?,
        tags: row.try_get("tags").map_err(mapping)?,
        rank: row.try_get("rank").map_err(mapping)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_postgres::config::Host;

    #[test]
    fn test_pg_config_from_settings() {
        let store = PostgresStore::new(PostgresSettings {
            host: "db.internal".to_string(),
            port: 6432,
            user: "suggest".to_string(),
            password: Some("hunter2".to_string()),
            dbname: "catalog".to_string(),
            ..Default::default()
        });
        let config = store.pg_config();
        assert_eq!(config.get_hosts(), &[Host::Tcp("db.internal".to_string())]);
        assert_eq!(config.get_ports(), &[6432]);
        assert_eq!(config.get_user(), Some("suggest"));
        assert_eq!(config.get_dbname(), Some("catalog"));
        assert_eq!(config.get_password(), Some("hunter2".as_bytes()));
    }

    #[test]
    fn test_sql_binds_all_fragments() {
        for param in ["$1", "$2", "$3", "$4"] {
            assert!(SEARCH_SQL.contains(param), "missing {param}");
        }
    }

    #[test]
    fn test_sql_filters_by_owner() {
        assert!(SEARCH_SQL.contains("(SELECT id FROM users WHERE username = $2)"));
    }

    #[test]
    fn test_sql_restricts_item_types() {
        assert!(SEARCH_SQL.contains("i.type IN ('table', 'remote')"));
    }

    #[test]
    fn test_sql_excludes_live_imports() {
        // Only items with no surviving import link are eligible.
        assert!(SEARCH_SQL.contains("edi.id IS NULL"));
        assert!(SEARCH_SQL.contains("<> 'failure'"));
    }

    #[test]
    fn test_sql_orders_and_caps() {
        assert!(SEARCH_SQL.contains("ORDER BY rank DESC, item_type DESC"));
        assert!(SEARCH_SQL.contains(&format!("LIMIT {}", crate::RESULT_LIMIT)));
    }
}
