//! Search execution: dispatch a query and reshape every hit

use super::dispatcher::Dispatcher;
use super::models::SearchParameters;
use crate::engines::Engine;
use crate::error::{Result, SearchError};
use crate::results::OutputRecord;
use crate::transform::Transformer;
use futures::stream::{BoxStream, StreamExt, TryStreamExt};
use std::sync::Arc;
use tracing::{error, info};

/// Lazy sequence of reshaped hits
pub type RecordStream = BoxStream<'static, Result<OutputRecord>>;

/// Search pipeline combining a dispatcher and a transformer
#[derive(Clone)]
pub struct Search {
    dispatcher: Dispatcher,
    transformer: Arc<Transformer>,
}

impl Search {
    /// Create a new search pipeline
    pub fn new(engine: Arc<dyn Engine>, transformer: Transformer) -> Self {
        Self {
            dispatcher: Dispatcher::new(engine),
            transformer: Arc::new(transformer),
        }
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn transformer(&self) -> &Transformer {
        &self.transformer
    }

    /// Execute a query and collect every reshaped hit in engine order
    ///
    /// The first failing hit aborts the whole search.
    pub async fn execute(&self, query: &str, params: &SearchParameters) -> Result<Vec<OutputRecord>> {
        let records: Vec<OutputRecord> = self.stream(query, params).await?.try_collect().await?;
        info!("Search '{}' returned {} results", query, records.len());
        Ok(records)
    }

    /// Execute a query, reshaping hits as the stream is consumed
    pub async fn stream(&self, query: &str, params: &SearchParameters) -> Result<RecordStream> {
        let documents = self.dispatcher.dispatch(query, params).await?;
        let transformer = self.transformer.clone();

        let records = documents.map(move |document| match document {
            Ok(document) => transformer.transform(&document),
            Err(e) => {
                error!("Search operation failed while reading results: {}", e);
                Err(SearchError::from(e))
            }
        });

        Ok(records.boxed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engines::StaticEngine;
    use crate::results::RawDocument;
    use crate::transform::{FieldMap, PathMode};
    use serde_json::json;

    fn hit(value: serde_json::Value) -> RawDocument {
        RawDocument::try_from(value).unwrap()
    }

    #[tokio::test]
    async fn test_highlight_end_to_end() {
        let engine = Arc::new(StaticEngine::new(vec![hit(json!({
            "id": "1",
            "@search.highlights": {"content": ["Highlighted content"]}
        }))]));
        let map = FieldMap::from_pairs([("content", "/@search.highlights/content/0")]).unwrap();
        let search = Search::new(engine, Transformer::new(map));

        let records = search
            .execute("pets", &SearchParameters::new().with_highlight_field("content"))
            .await
            .unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(
            records[0],
            OutputRecord::from(json!({"content": "Highlighted content"}).as_object().cloned().unwrap())
        );
    }

    #[tokio::test]
    async fn test_order_preserved() {
        let hits = (0..5).map(|i| hit(json!({"id": i, "@search.score": 10 - i}))).collect();
        let engine = Arc::new(StaticEngine::new(hits));
        let map = FieldMap::from_pairs([("id", "/id")]).unwrap();
        let search = Search::new(engine, Transformer::new(map));

        let records = search.execute("q", &SearchParameters::default()).await.unwrap();
        let ids: Vec<_> = records.iter().map(|r| r.get("id").cloned().unwrap()).collect();
        assert_eq!(ids, vec![json!(0), json!(1), json!(2), json!(3), json!(4)]);
    }

    #[tokio::test]
    async fn test_passthrough_search() {
        let raw = hit(json!({"id": "1", "nested": {"a": [1]}}));
        let engine = Arc::new(StaticEngine::new(vec![raw.clone()]));
        let search = Search::new(engine, Transformer::passthrough());

        let records = search.execute("q", &SearchParameters::default()).await.unwrap();
        assert_eq!(records, vec![OutputRecord::from(&raw)]);
    }

    #[tokio::test]
    async fn test_transform_failure_aborts_batch() {
        let engine = Arc::new(StaticEngine::new(vec![
            hit(json!({"meta": {"name": "ok"}})),
            hit(json!({"meta": "flattened"})),
            hit(json!({"meta": {"name": "never reached"}})),
        ]));
        let map = FieldMap::from_pairs([("name", "/meta/name")]).unwrap();
        let search = Search::new(engine, Transformer::new(map).with_mode(PathMode::Strict));

        let err = search.execute("q", &SearchParameters::default()).await.unwrap_err();
        assert!(matches!(err, SearchError::DataTransform { ref field, .. } if field == "name"));
    }

    #[tokio::test]
    async fn test_empty_query_rejected() {
        let engine = Arc::new(StaticEngine::new(vec![hit(json!({"id": "1"}))]));
        let search = Search::new(engine.clone(), Transformer::passthrough());

        let err = search.execute("", &SearchParameters::default()).await.unwrap_err();
        assert!(matches!(err, SearchError::EmptyQuery));
        assert_eq!(engine.calls(), 0);
    }

    #[tokio::test]
    async fn test_stream_is_lazy() {
        let engine = Arc::new(StaticEngine::new(vec![
            hit(json!({"id": "1"})),
            hit(json!({"id": "2"})),
        ]));
        let search = Search::new(engine, Transformer::new(FieldMap::azure_default()));

        let mut records = search.stream("q", &SearchParameters::default()).await.unwrap();
        let first = records.next().await.unwrap().unwrap();
        assert_eq!(first.get_str("id"), Some("1"));
        assert_eq!(first.get("title"), Some(&serde_json::Value::Null));
        assert_eq!(records.count().await, 1);
    }
}
