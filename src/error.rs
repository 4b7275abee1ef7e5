//! Error types for index-search-rs

use thiserror::Error;

/// Result type alias for search and transform operations
pub type Result<T> = std::result::Result<T, SearchError>;

/// Errors surfaced to callers of the search pipeline
#[derive(Debug, Error)]
pub enum SearchError {
    /// The query text was empty; no request was made
    #[error("search query cannot be empty")]
    EmptyQuery,

    /// The search engine failed to execute the query
    #[error("search operation failed: {source}")]
    SearchFailure {
        #[source]
        source: EngineError,
    },

    /// A field map path did not fit the shape of a result document
    #[error("failed to transform field '{field}' using path '{path}': {source}")]
    DataTransform {
        field: String,
        path: String,
        #[source]
        source: PathError,
    },

    /// Settings or field map are malformed
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl SearchError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Whether retrying the same request could succeed
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::SearchFailure { .. })
    }
}

impl From<EngineError> for SearchError {
    fn from(source: EngineError) -> Self {
        Self::SearchFailure { source }
    }
}

/// Errors raised by a search engine backend
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("search service returned HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("malformed search response: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("search service error: {0}")]
    Service(String),

    #[error("invalid client settings: {0}")]
    InvalidSettings(String),
}

/// Type mismatch met while walking a path in strict mode
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PathError {
    #[error("segment '{segment}' is not a list index")]
    NotAnIndex { segment: String },

    #[error("cannot descend into {kind} with segment '{segment}'")]
    NotTraversable { segment: String, kind: &'static str },
}
