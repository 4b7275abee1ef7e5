//! Search parameter models

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Options passed through to the search engine with each query
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchParameters {
    /// Fields to compute hit highlights for
    pub highlight_fields: Vec<String>,
    /// Markup inserted before each highlighted term
    pub highlight_pre_tag: Option<String>,
    /// Markup inserted after each highlighted term
    pub highlight_post_tag: Option<String>,
    /// Number of hits to skip
    pub skip: Option<u32>,
    /// Maximum number of hits to return
    pub top: Option<u32>,
    /// Engine-specific parameters sent as-is
    pub extra: Map<String, Value>,
}

impl SearchParameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field to highlight
    pub fn with_highlight_field(mut self, field: impl Into<String>) -> Self {
        self.highlight_fields.push(field.into());
        self
    }

    /// Wrap highlights in an HTML element, e.g. `em` gives `<em>`..`</em>`
    pub fn with_highlight_tag(mut self, tag: &str) -> Self {
        self.highlight_pre_tag = Some(format!("<{}>", tag));
        self.highlight_post_tag = Some(format!("</{}>", tag));
        self
    }

    /// Set explicit highlight markup
    pub fn with_highlight_tags(mut self, pre: impl Into<String>, post: impl Into<String>) -> Self {
        self.highlight_pre_tag = Some(pre.into());
        self.highlight_post_tag = Some(post.into());
        self
    }

    /// Set the pagination window
    pub fn with_page(mut self, skip: u32, top: u32) -> Self {
        self.skip = Some(skip);
        self.top = Some(top);
        self
    }

    pub fn with_skip(mut self, skip: u32) -> Self {
        self.skip = Some(skip);
        self
    }

    pub fn with_top(mut self, top: u32) -> Self {
        self.top = Some(top);
        self
    }

    /// Add a passthrough parameter
    pub fn with_extra(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    /// Highlight fields joined the way the service expects them
    pub fn highlight(&self) -> Option<String> {
        if self.highlight_fields.is_empty() {
            None
        } else {
            Some(self.highlight_fields.join(","))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_highlight_tag() {
        let params = SearchParameters::new()
            .with_highlight_field("content")
            .with_highlight_tag("strong");
        assert_eq!(params.highlight_pre_tag.as_deref(), Some("<strong>"));
        assert_eq!(params.highlight_post_tag.as_deref(), Some("</strong>"));
        assert_eq!(params.highlight().as_deref(), Some("content"));
    }

    #[test]
    fn test_builder() {
        let params = SearchParameters::new()
            .with_highlight_field("content")
            .with_highlight_field("title")
            .with_page(20, 10)
            .with_extra("queryType", json!("semantic"));

        assert_eq!(params.highlight().as_deref(), Some("content,title"));
        assert_eq!(params.skip, Some(20));
        assert_eq!(params.top, Some(10));
        assert_eq!(params.extra.get("queryType"), Some(&json!("semantic")));
        assert_eq!(SearchParameters::new().highlight(), None);
    }
}
