//! Settings structures for index-search-rs configuration

use crate::error::{Result, SearchError};
use crate::search::SearchParameters;
use crate::transform::{FieldMap, PathMode, Transformer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use url::Url;

/// Prefix for environment overrides
pub const ENV_PREFIX: &str = "INDEX_SEARCH_";

/// Main settings structure, usually loaded from settings.yml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub service: ServiceSettings,
    pub search: SearchSettings,
    pub transform: TransformSettings,
    pub outgoing: OutgoingSettings,
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            SearchError::configuration(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_yaml_str(&content)
    }

    /// Parse settings from YAML text
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        serde_yaml::from_str(content)
            .map_err(|e| SearchError::configuration(format!("invalid settings: {}", e)))
    }

    /// Merge with environment variables (INDEX_SEARCH_* prefix)
    pub fn merge_env(&mut self) -> Result<()> {
        self.merge_vars(|name| std::env::var(name).ok())
    }

    /// Apply overrides from a variable lookup
    pub fn merge_vars<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(&format!("{}{}", ENV_PREFIX, name));

        if let Some(val) = var("ENDPOINT") {
            self.service.endpoint = Some(val);
        }
        if let Some(val) = var("INDEX_NAME") {
            self.service.index_name = Some(val);
        }
        if let Some(val) = var("API_KEY") {
            self.service.api_key = Some(val);
        }
        if let Some(val) = var("API_VERSION") {
            self.service.api_version = Some(val);
        }
        if let Some(val) = var("TOP") {
            let top = val.trim().parse().map_err(|e| {
                SearchError::configuration(format!("invalid {}TOP '{}': {}", ENV_PREFIX, val, e))
            })?;
            self.search.top = Some(top);
        }
        if let Some(val) = var("FIELD_MAP") {
            self.transform.field_map = FieldMap::from_json_str(&val)?;
            self.transform.field_map_file = None;
        }
        Ok(())
    }

    /// Check settings that can be verified without contacting the service
    pub fn validate(&self) -> Result<()> {
        if let Some(ref endpoint) = self.service.endpoint {
            Url::parse(endpoint).map_err(|e| {
                SearchError::configuration(format!("invalid service endpoint '{}': {}", endpoint, e))
            })?;
        }
        let timeout = self.outgoing.request_timeout;
        if !(timeout.is_finite() && timeout > 0.0) {
            return Err(SearchError::configuration(
                "outgoing.request_timeout must be a positive number of seconds",
            ));
        }
        self.transform.build()?;
        Ok(())
    }
}

/// Connection details for the search service
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceSettings {
    /// Service URL, e.g. https://<name>.search.windows.net
    pub endpoint: Option<String>,
    /// Index to query
    pub index_name: Option<String>,
    /// Query or admin API key
    pub api_key: Option<String>,
    /// REST API version
    pub api_version: Option<String>,
}

/// Default search parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Fields to highlight
    pub highlight_fields: Vec<String>,
    /// HTML element wrapped around highlighted terms
    pub highlight_tag: String,
    /// Explicit pre tag (overrides highlight_tag)
    pub highlight_pre_tag: Option<String>,
    /// Explicit post tag (overrides highlight_tag)
    pub highlight_post_tag: Option<String>,
    /// Hits to skip
    pub skip: Option<u32>,
    /// Maximum hits to return
    pub top: Option<u32>,
    /// Passthrough parameters
    pub extra: Map<String, Value>,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            highlight_fields: vec![],
            highlight_tag: "em".to_string(),
            highlight_pre_tag: None,
            highlight_post_tag: None,
            skip: None,
            top: None,
            extra: Map::new(),
        }
    }
}

impl SearchSettings {
    /// Search parameters described by these settings
    pub fn parameters(&self) -> SearchParameters {
        let mut params = SearchParameters::new().with_highlight_tag(&self.highlight_tag);
        params.highlight_fields = self.highlight_fields.clone();
        if let Some(ref pre) = self.highlight_pre_tag {
            params.highlight_pre_tag = Some(pre.clone());
        }
        if let Some(ref post) = self.highlight_post_tag {
            params.highlight_post_tag = Some(post.clone());
        }
        params.skip = self.skip;
        params.top = self.top;
        params.extra = self.extra.clone();
        params
    }
}

/// Result reshaping settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformSettings {
    /// Path resolution mode
    pub mode: PathMode,
    /// Output field name to path; empty passes hits through unchanged
    pub field_map: FieldMap,
    /// JSON file holding the field map (replaces field_map when set)
    pub field_map_file: Option<PathBuf>,
    /// Values for fields whose path does not resolve
    pub defaults: Map<String, Value>,
}

impl Default for TransformSettings {
    fn default() -> Self {
        Self {
            mode: PathMode::default(),
            field_map: FieldMap::azure_default(),
            field_map_file: None,
            defaults: Map::new(),
        }
    }
}

impl TransformSettings {
    /// Build the transformer these settings describe
    pub fn build(&self) -> Result<Transformer> {
        let field_map = match self.field_map_file {
            Some(ref path) => FieldMap::from_json_file(path)?,
            None => self.field_map.clone(),
        };
        Transformer::new(field_map)
            .with_mode(self.mode)
            .with_defaults(self.defaults.clone())
    }
}

/// Outgoing request settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutgoingSettings {
    /// Default request timeout in seconds
    pub request_timeout: f64,
    /// Pool max size
    pub pool_maxsize: usize,
    /// Verify SSL certificates
    pub verify_ssl: bool,
    /// Proxy settings
    pub proxies: ProxySettings,
    /// Extra headers to send
    pub extra_headers: HashMap<String, String>,
}

impl Default for OutgoingSettings {
    fn default() -> Self {
        Self {
            request_timeout: 5.0,
            pool_maxsize: 20,
            verify_ssl: true,
            proxies: ProxySettings::default(),
            extra_headers: HashMap::new(),
        }
    }
}

/// Proxy settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProxySettings {
    pub http: Option<String>,
    pub https: Option<String>,
    pub all: Option<String>,
}
