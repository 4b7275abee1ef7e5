//! Query dispatch to the search engine

use super::models::SearchParameters;
use crate::engines::{DocumentStream, Engine};
use crate::error::{Result, SearchError};
use std::sync::Arc;
use tracing::{debug, error};

/// Validates queries and hands them to the engine
#[derive(Clone)]
pub struct Dispatcher {
    engine: Arc<dyn Engine>,
}

impl Dispatcher {
    pub fn new(engine: Arc<dyn Engine>) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &Arc<dyn Engine> {
        &self.engine
    }

    /// Run `query` against the engine
    ///
    /// Makes exactly one engine call, none for an empty query. The stream is
    /// lazy and can only be consumed once.
    pub async fn dispatch(&self, query: &str, params: &SearchParameters) -> Result<DocumentStream> {
        if query.trim().is_empty() {
            error!("Empty search query received");
            return Err(SearchError::EmptyQuery);
        }

        debug!("Dispatching '{}' to engine {}", query, self.engine.name());

        self.engine.search(query, params).await.map_err(|e| {
            error!("Search operation failed: {}", e);
            SearchError::from(e)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engines::StaticEngine;
    use crate::error::EngineError;
    use std::error::Error as _;

    #[tokio::test]
    async fn test_empty_query_skips_engine() {
        let engine = Arc::new(StaticEngine::new(vec![]));
        let dispatcher = Dispatcher::new(engine.clone());

        for query in ["", "   ", "\n\t"] {
            let result = dispatcher.dispatch(query, &SearchParameters::default()).await;
            assert!(matches!(result, Err(SearchError::EmptyQuery)));
        }
        assert_eq!(engine.calls(), 0);
    }

    #[tokio::test]
    async fn test_engine_failure_wrapped() {
        let engine = Arc::new(StaticEngine::failing("Search failed"));
        let dispatcher = Dispatcher::new(engine.clone());

        let err = match dispatcher.dispatch("test_query", &SearchParameters::default()).await {
            Err(err) => err,
            Ok(_) => panic!("expected search failure"),
        };
        assert!(matches!(
            err,
            SearchError::SearchFailure {
                source: EngineError::Service(_)
            }
        ));
        let cause = err.source().and_then(|e| e.downcast_ref::<EngineError>());
        assert!(matches!(cause, Some(EngineError::Service(m)) if m == "Search failed"));
        assert_eq!(engine.calls(), 1);
    }
}
