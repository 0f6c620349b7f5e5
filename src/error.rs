//! Failure taxonomy for one search invocation
//!
//! Every variant is terminal for its call: the plugin logs it once and
//! completes with an empty suggestion list. None of these cross the public
//! `search` boundary, and none are retried.

use thiserror::Error;

/// Everything that can go wrong between receiving a query and returning
/// suggestions.
#[derive(Debug, Error)]
pub enum SuggestError {
    /// The request context carried no username passing identity validation
    #[error("no valid username in request context")]
    InvalidContext,

    /// The store connection could not be established
    #[error("connection failed: {message}")]
    Connection { message: String },

    /// The store rejected or failed to execute the search query
    #[error("query failed: {message}")]
    Query { message: String },

    /// A returned row could not be converted into a match record
    #[error("row mapping failed: {message}")]
    Mapping { message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        assert_eq!(
            SuggestError::InvalidContext.to_string(),
            "no valid username in request context"
        );
        let err = SuggestError::Query {
            message: "syntax error".to_string(),
        };
        assert_eq!(err.to_string(), "query failed: syntax error");
    }
}
