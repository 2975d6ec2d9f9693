use thiserror::Error;

/// Failures reported by a completion provider.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompletionError {
    /// Network hiccup, timeout, rate limit or server-side error. Worth retrying.
    #[error("transient completion failure: {0}")]
    Transient(String),

    /// The request itself is bad (context too long, invalid credentials, ...).
    #[error("{0}")]
    Permanent(String),
}

impl CompletionError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, CompletionError::Transient(_))
    }
}

/// Failures at the graph database boundary.
#[derive(Error, Debug)]
pub enum GraphError {
    #[error("malformed record: field `{field}` {reason}")]
    MalformedRecord { field: String, reason: String },

    #[error("graph query failed ({code}): {message}")]
    Query { code: String, message: String },

    #[error("graph transport error: {0}")]
    Transport(String),
}

impl GraphError {
    pub fn missing(field: &str) -> Self {
        GraphError::MalformedRecord {
            field: field.to_string(),
            reason: "is missing".to_string(),
        }
    }

    pub fn wrong_type(field: &str, expected: &str) -> Self {
        GraphError::MalformedRecord {
            field: field.to_string(),
            reason: format!("is not {expected}"),
        }
    }
}

impl From<reqwest::Error> for GraphError {
    fn from(e: reqwest::Error) -> Self {
        GraphError::Transport(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_transient_is_retryable() {
        assert!(CompletionError::Transient("503".into()).is_retryable());
        assert!(!CompletionError::Permanent("bad request".into()).is_retryable());
    }

    #[test]
    fn test_malformed_record_message_names_field() {
        let err = GraphError::missing("embedding");
        assert_eq!(err.to_string(), "malformed record: field `embedding` is missing");

        let err = GraphError::wrong_type("view_count", "an integer");
        assert_eq!(err.to_string(), "malformed record: field `view_count` is not an integer");
    }
}
