//! In-memory engine over a fixed set of hits
//!
//! Replays captured search responses without a network round-trip. Useful
//! for offline runs and for exercising the pipeline in tests.

use super::traits::*;
use crate::error::{EngineError, SearchError};
use crate::results::RawDocument;
use crate::search::SearchParameters;
use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use serde_json::Value;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Engine that returns the same hits (or the same failure) for every query
#[derive(Debug, Default)]
pub struct StaticEngine {
    documents: Vec<RawDocument>,
    failure: Option<String>,
    calls: AtomicUsize,
}

impl StaticEngine {
    /// Engine returning `documents` in order
    pub fn new(documents: Vec<RawDocument>) -> Self {
        Self {
            documents,
            ..Default::default()
        }
    }

    /// Engine whose every search fails with a service error
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            failure: Some(message.into()),
            ..Default::default()
        }
    }

    /// Load hits from a JSON file holding either an array of hits or a
    /// service response with a `value` array
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, SearchError> {
        let path = path.as_ref();
        let invalid = |reason: String| {
            SearchError::configuration(format!("cannot load hits from {}: {}", path.display(), reason))
        };

        let content = std::fs::read_to_string(path).map_err(|e| invalid(e.to_string()))?;
        let json: Value = serde_json::from_str(&content).map_err(|e| invalid(e.to_string()))?;
        let hits = match json {
            Value::Object(mut body) => body
                .remove("value")
                .ok_or_else(|| invalid("expected a 'value' array of hits".to_string()))?,
            other => other,
        };
        let documents: Vec<RawDocument> =
            serde_json::from_value(hits).map_err(|e| invalid(e.to_string()))?;
        Ok(Self::new(documents))
    }

    /// Number of times `search` has been called
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

#[async_trait]
impl Engine for StaticEngine {
    fn name(&self) -> &str {
        "static"
    }

    async fn search(
        &self,
        _query: &str,
        params: &SearchParameters,
    ) -> Result<DocumentStream, EngineError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(ref message) = self.failure {
            return Err(EngineError::Service(message.clone()));
        }

        let skip = params.skip.unwrap_or(0) as usize;
        let top = params.top.map_or(usize::MAX, |t| t as usize);
        let page: Vec<_> = self
            .documents
            .iter()
            .skip(skip)
            .take(top)
            .cloned()
            .map(Ok::<_, EngineError>)
            .collect();

        Ok(stream::iter(page).boxed())
    }
}
