//! Request context and identity validation
//!
//! The aggregator forwards an opaque bag of backend-specific parameters with
//! every query. This backend only cares about one of them: the acting
//! username, which must pass a strict allow-list check before it is ever
//! used to build a query. The username later reaches the database as a bound
//! parameter, but restricting it to plain alphanumerics up front keeps a
//! malformed context object from ever touching query construction.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Usernames must be plain alphanumerics, matched in full.
static USERNAME_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9a-zA-Z]+$").unwrap());

/// Caller-supplied context forwarded by the aggregator with each query.
///
/// Parameters arrive as loosely-typed JSON values: a field may be missing,
/// may be the wrong type, or may carry arbitrary content. Nothing in here is
/// trusted until validated.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RequestContext {
    /// Backend-specific parameters (e.g. the acting username)
    #[serde(default, flatten)]
    pub params: HashMap<String, serde_json::Value>,
}

impl RequestContext {
    /// Create an empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a parameter
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// The raw `username` parameter, if present and a string
    pub fn username(&self) -> Option<&str> {
        self.params.get("username").and_then(|v| v.as_str())
    }
}

/// Validate the acting user's identity from the request context.
///
/// Returns the username only if it is present, a string, and fully matches
/// `^[0-9a-zA-Z]+$`; anything else yields `None`. Pure; never panics.
pub fn validate_identity(context: &RequestContext) -> Option<&str> {
    context.username().filter(|u| USERNAME_RE.is_match(u))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ctx_with_username(value: serde_json::Value) -> RequestContext {
        RequestContext::new().with_param("username", value)
    }

    #[test]
    fn test_accepts_alphanumeric() {
        assert_eq!(
            validate_identity(&ctx_with_username(json!("alice"))),
            Some("alice")
        );
        assert_eq!(
            validate_identity(&ctx_with_username(json!("Bob42"))),
            Some("Bob42")
        );
        assert_eq!(validate_identity(&ctx_with_username(json!("007"))), Some("007"));
    }

    #[test]
    fn test_rejects_missing_username() {
        assert_eq!(validate_identity(&RequestContext::new()), None);
        let other = RequestContext::new().with_param("user", json!("alice"));
        assert_eq!(validate_identity(&other), None);
    }

    #[test]
    fn test_rejects_non_string_username() {
        assert_eq!(validate_identity(&ctx_with_username(json!(42))), None);
        assert_eq!(validate_identity(&ctx_with_username(json!(null))), None);
        assert_eq!(
            validate_identity(&ctx_with_username(json!({"name": "alice"}))),
            None
        );
        assert_eq!(validate_identity(&ctx_with_username(json!(["alice"]))), None);
    }

    #[test]
    fn test_rejects_malformed_strings() {
        for bad in ["", " ", "alice bob", "alice-1", "a_b", "bob'; --", "ali.ce", "café"] {
            assert_eq!(validate_identity(&ctx_with_username(json!(bad))), None, "{bad:?}");
        }
    }

    #[test]
    fn test_match_is_anchored() {
        // A valid prefix or suffix is not enough; the whole value must match.
        assert_eq!(validate_identity(&ctx_with_username(json!("alice\n"))), None);
        assert_eq!(validate_identity(&ctx_with_username(json!(" alice"))), None);
        assert_eq!(validate_identity(&ctx_with_username(json!("alice;drop"))), None);
    }
}
