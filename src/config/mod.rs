//! Connection settings for the PostgreSQL store
//!
//! The plugin holds these settings as immutable configuration supplied at
//! construction time; nothing here is mutated across search invocations.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Connection descriptor for the backing PostgreSQL database.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PostgresSettings {
    /// Database host
    pub host: String,
    /// Database port
    pub port: u16,
    /// Database user
    pub user: String,
    /// Database password, if the server requires one
    pub password: Option<String>,
    /// Database name
    pub dbname: String,
    /// Timeout for connection acquisition (seconds)
    pub connect_timeout_secs: u64,
    /// Timeout for query execution (seconds)
    pub query_timeout_secs: u64,
}

impl Default for PostgresSettings {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            user: "postgres".to_string(),
            password: None,
            dbname: "datasets".to_string(),
            connect_timeout_secs: crate::DEFAULT_TIMEOUT,
            query_timeout_secs: crate::DEFAULT_TIMEOUT,
        }
    }
}

impl PostgresSettings {
    /// Load settings from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let settings: PostgresSettings = serde_yaml::from_str(&content)?;
        Ok(settings)
    }

    /// Merge with environment variables (SUGGEST_PG_* prefix)
    pub fn merge_env(&mut self) {
        if let Ok(val) = std::env::var("SUGGEST_PG_HOST") {
            self.host = val;
        }
        if let Ok(val) = std::env::var("SUGGEST_PG_PORT") {
            if let Ok(port) = val.parse() {
                self.port = port;
            }
        }
        if let Ok(val) = std::env::var("SUGGEST_PG_USER") {
            self.user = val;
        }
        if let Ok(val) = std::env::var("SUGGEST_PG_PASSWORD") {
            self.password = Some(val);
        }
        if let Ok(val) = std::env::var("SUGGEST_PG_DBNAME") {
            self.dbname = val;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = PostgresSettings::default();
        assert_eq!(settings.host, "localhost");
        assert_eq!(settings.port, 5432);
        assert_eq!(settings.dbname, "datasets");
        assert!(settings.password.is_none());
        assert_eq!(settings.connect_timeout_secs, crate::DEFAULT_TIMEOUT);
    }

    #[test]
    fn test_parse_yaml() {
        let yaml = r#"
host: db.internal
port: 6432
user: suggest
password: hunter2
dbname: catalog
"#;
        let settings: PostgresSettings = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(settings.host, "db.internal");
        assert_eq!(settings.port, 6432);
        assert_eq!(settings.user, "suggest");
        assert_eq!(settings.password.as_deref(), Some("hunter2"));
        assert_eq!(settings.dbname, "catalog");
        // Unspecified fields fall back to defaults
        assert_eq!(settings.query_timeout_secs, crate::DEFAULT_TIMEOUT);
    }
}
