//! Engine traits and types

use crate::error::EngineError;
use crate::results::RawDocument;
use crate::search::SearchParameters;
use async_trait::async_trait;
use futures::stream::BoxStream;
use serde_json::Value;
use std::collections::HashMap;

/// Lazy, single-pass sequence of hits in relevance order
pub type DocumentStream = BoxStream<'static, Result<RawDocument, EngineError>>;

/// Search backend that executes a query against an index
#[async_trait]
pub trait Engine: Send + Sync {
    /// Engine name
    fn name(&self) -> &str;

    /// Execute a query
    ///
    /// Called once per search. The returned stream may fetch further pages
    /// as it is consumed; failures while doing so are yielded as items.
    async fn search(
        &self,
        query: &str,
        params: &SearchParameters,
    ) -> Result<DocumentStream, EngineError>;
}

/// JSON POST request to be made by an engine
#[derive(Debug, Clone)]
pub struct EngineRequest {
    /// URL to request
    pub url: String,
    /// Request headers
    pub headers: HashMap<String, String>,
    /// Query parameters
    pub params: HashMap<String, String>,
    /// JSON body
    pub body: Option<Value>,
}

impl EngineRequest {
    /// Create a POST request
    pub fn post(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            headers: HashMap::new(),
            params: HashMap::new(),
            body: None,
        }
    }

    /// Add a header
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Add a query parameter
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Add JSON body
    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// HTTP response from an engine request
#[derive(Debug)]
pub struct EngineResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body as text
    pub text: String,
}

impl EngineResponse {
    /// Parse response as JSON
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T, EngineError> {
        Ok(serde_json::from_str(&self.text)?)
    }

    /// Check if response is successful (2xx)
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Turn a non-2xx response into an error, using the service's message if any
    pub fn error_for_status(self) -> Result<Self, EngineError> {
        if self.is_success() {
            return Ok(self);
        }
        let message = serde_json::from_str::<Value>(&self.text)
            .ok()
            .and_then(|body| {
                body.pointer("/error/message")
                    .and_then(|m| m.as_str())
                    .map(|m| m.to_string())
            })
            .unwrap_or_else(|| self.text.trim().to_string());
        Err(EngineError::Status {
            status: self.status,
            message,
        })
    }
}
