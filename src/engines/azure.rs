//! Azure AI Search engine implementation
//!
//! Queries the REST `docs/search` endpoint of one index. The first page is
//! fetched when the search is issued; further pages are requested only as
//! the returned stream is consumed.

use super::traits::*;
use crate::config::ServiceSettings;
use crate::error::{EngineError, Result, SearchError};
use crate::network::HttpClient;
use crate::results::RawDocument;
use crate::search::SearchParameters;
use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use std::sync::Arc;
use tracing::debug;
use url::Url;

/// Default REST API version
pub const DEFAULT_API_VERSION: &str = "2023-11-01";

/// Azure AI Search engine bound to a single index
#[derive(Clone)]
pub struct AzureSearch {
    inner: Arc<Inner>,
}

struct Inner {
    client: HttpClient,
    search_url: String,
    api_key: Option<String>,
    api_version: String,
    index_name: String,
}

/// One page of a search response
#[derive(Debug, Deserialize)]
struct SearchPage {
    #[serde(default)]
    value: Vec<Value>,
    #[serde(rename = "@search.nextPageParameters")]
    next_page_parameters: Option<Value>,
}

impl AzureSearch {
    /// Create an engine from service settings
    pub fn new(client: HttpClient, service: &ServiceSettings) -> Result<Self> {
        let endpoint = service
            .endpoint
            .as_deref()
            .ok_or_else(|| SearchError::configuration("service endpoint is not set"))?;
        let endpoint = Url::parse(endpoint).map_err(|e| {
            SearchError::configuration(format!("invalid service endpoint '{}': {}", endpoint, e))
        })?;

        let index_name = service
            .index_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .ok_or_else(|| SearchError::configuration("index name is not set"))?;

        let search_url = format!(
            "{}/indexes/{}/docs/search",
            endpoint.as_str().trim_end_matches('/'),
            urlencoding::encode(index_name)
        );

        Ok(Self {
            inner: Arc::new(Inner {
                client,
                search_url,
                api_key: service.api_key.clone(),
                api_version: service
                    .api_version
                    .clone()
                    .unwrap_or_else(|| DEFAULT_API_VERSION.to_string()),
                index_name: index_name.to_string(),
            }),
        })
    }

    /// Full URL of the search endpoint (without api-version)
    pub fn search_url(&self) -> &str {
        &self.inner.search_url
    }

    /// Build the JSON body for a query
    pub fn request_body(query: &str, params: &SearchParameters) -> Value {
        let mut body = Map::new();
        // Passthrough parameters first so the named options take precedence
        for (key, value) in &params.extra {
            body.insert(key.clone(), value.clone());
        }
        body.insert("search".to_string(), json!(query));
        if let Some(highlight) = params.highlight() {
            body.insert("highlight".to_string(), json!(highlight));
        }
        if let Some(ref pre) = params.highlight_pre_tag {
            body.insert("highlightPreTag".to_string(), json!(pre));
        }
        if let Some(ref post) = params.highlight_post_tag {
            body.insert("highlightPostTag".to_string(), json!(post));
        }
        if let Some(skip) = params.skip {
            body.insert("skip".to_string(), json!(skip));
        }
        if let Some(top) = params.top {
            body.insert("top".to_string(), json!(top));
        }
        Value::Object(body)
    }

    async fn fetch_page(&self, body: Value) -> std::result::Result<SearchPage, EngineError> {
        let mut request = EngineRequest::post(&self.inner.search_url)
            .param("api-version", &self.inner.api_version)
            .json(body);
        if let Some(ref key) = self.inner.api_key {
            request = request.header("api-key", key);
        }

        let response = self.inner.client.execute(request).await?.error_for_status()?;
        let page: SearchPage = response.json()?;
        debug!(
            "Index {} returned {} hits (more: {})",
            self.inner.index_name,
            page.value.len(),
            page.next_page_parameters.is_some()
        );
        Ok(page)
    }
}

/// Paging state carried by the document stream
struct Pager {
    engine: AzureSearch,
    buffer: std::vec::IntoIter<Value>,
    next: Option<Value>,
}

impl Pager {
    async fn next_document(mut self) -> std::result::Result<Option<(RawDocument, Self)>, EngineError> {
        loop {
            if let Some(hit) = self.buffer.next() {
                let document = RawDocument::try_from(hit)?;
                return Ok(Some((document, self)));
            }
            let Some(next) = self.next.take() else {
                return Ok(None);
            };
            let page = self.engine.fetch_page(next).await?;
            self.next = page.next_page_parameters.filter(|_| !page.value.is_empty());
            self.buffer = page.value.into_iter();
        }
    }
}

#[async_trait]
impl Engine for AzureSearch {
    fn name(&self) -> &str {
        "azure"
    }

    async fn search(
        &self,
        query: &str,
        params: &SearchParameters,
    ) -> std::result::Result<DocumentStream, EngineError> {
        let first = self.fetch_page(Self::request_body(query, params)).await?;

        // An empty page ends the results even if the service offers another
        let next = first.next_page_parameters.filter(|_| !first.value.is_empty());
        let pager = Pager {
            engine: self.clone(),
            buffer: first.value.into_iter(),
            next,
        };

        let documents = stream::try_unfold(pager, Pager::next_document);

        Ok(documents.boxed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(endpoint: &str, index: &str) -> ServiceSettings {
        ServiceSettings {
            endpoint: Some(endpoint.to_string()),
            index_name: Some(index.to_string()),
            api_key: Some("key".to_string()),
            api_version: None,
        }
    }

    #[test]
    fn test_search_url() {
        let engine = AzureSearch::new(
            HttpClient::new().unwrap(),
            &service("https://demo.search.windows.net/", "docs-index"),
        )
        .unwrap();
        assert_eq!(
            engine.search_url(),
            "https://demo.search.windows.net/indexes/docs-index/docs/search"
        );
        assert_eq!(engine.name(), "azure");
    }

    #[test]
    fn test_missing_settings_rejected() {
        let client = HttpClient::new().unwrap();
        assert!(AzureSearch::new(client.clone(), &ServiceSettings::default()).is_err());
        assert!(AzureSearch::new(client.clone(), &service("not a url", "idx")).is_err());
        assert!(AzureSearch::new(client, &service("https://demo.search.windows.net", " ")).is_err());
    }

    #[test]
    fn test_request_body() {
        let params = SearchParameters::new()
            .with_highlight_field("content")
            .with_highlight_tag("strong")
            .with_page(0, 10)
            .with_extra("queryType", json!("simple"))
            .with_extra("search", json!("ignored"));

        let body = AzureSearch::request_body("how to bring a pet to canada?", &params);
        assert_eq!(
            body,
            json!({
                "search": "how to bring a pet to canada?",
                "highlight": "content",
                "highlightPreTag": "<strong>",
                "highlightPostTag": "</strong>",
                "skip": 0,
                "top": 10,
                "queryType": "simple"
            })
        );
    }

    #[test]
    fn test_minimal_request_body() {
        let body = AzureSearch::request_body("pets", &SearchParameters::default());
        assert_eq!(body, json!({"search": "pets"}));
    }
}
