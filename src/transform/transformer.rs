//! Reshape raw hits into output records

use super::field_map::FieldMap;
use super::path::{PathExpression, Resolved};
use crate::error::{Result, SearchError};
use crate::results::{OutputRecord, RawDocument};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, error};

/// Output field whose value is stored percent-encoded at the source
pub const TITLE_FIELD: &str = "title";

/// How type mismatches during path resolution are treated
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PathMode {
    /// Every unresolvable path yields `null`
    #[default]
    Lenient,
    /// Descending into a scalar, or indexing a list with a name, is an error
    Strict,
}

/// Applies a field map to raw documents
///
/// Holds no mutable state; one instance can be shared across searches.
#[derive(Debug, Clone, Default)]
pub struct Transformer {
    field_map: FieldMap,
    mode: PathMode,
    defaults: Map<String, Value>,
}

impl Transformer {
    /// Create a lenient transformer over `field_map`
    pub fn new(field_map: FieldMap) -> Self {
        Self {
            field_map,
            mode: PathMode::Lenient,
            defaults: Map::new(),
        }
    }

    /// Transformer that returns documents unchanged
    pub fn passthrough() -> Self {
        Self::default()
    }

    /// Set the path resolution mode
    pub fn with_mode(mut self, mode: PathMode) -> Self {
        self.mode = mode;
        self
    }

    /// Value to use when a field's path does not resolve
    pub fn with_default(mut self, field: impl Into<String>, value: Value) -> Result<Self> {
        let field = field.into();
        if !self.field_map.contains(&field) {
            return Err(SearchError::configuration(format!(
                "default given for unmapped output field '{}'",
                field
            )));
        }
        self.defaults.insert(field, value);
        Ok(self)
    }

    /// Set all field defaults at once
    pub fn with_defaults(mut self, defaults: Map<String, Value>) -> Result<Self> {
        for (field, value) in defaults {
            self = self.with_default(field, value)?;
        }
        Ok(self)
    }

    pub fn field_map(&self) -> &FieldMap {
        &self.field_map
    }

    pub fn mode(&self) -> PathMode {
        self.mode
    }

    /// Reshape one document
    ///
    /// With an empty field map the document's fields are returned as-is.
    pub fn transform(&self, document: &RawDocument) -> Result<OutputRecord> {
        if self.field_map.is_empty() {
            return Ok(OutputRecord::from(document));
        }

        let mut record = OutputRecord::default();
        for (field, path) in self.field_map.iter() {
            let resolved = self.resolve(field, path, document)?;
            let value = match resolved {
                Resolved::Found(value) if field == TITLE_FIELD => decode_title(value),
                Resolved::Found(value) => value.clone(),
                Resolved::Absent => {
                    debug!("Path '{}' for field '{}' did not resolve", path, field);
                    self.defaults.get(field).cloned().unwrap_or(Value::Null)
                }
            };
            record.insert(field, value);
        }
        Ok(record)
    }

    /// Reshape a batch of documents, stopping at the first failure
    pub fn transform_all<'a, I>(&self, documents: I) -> Result<Vec<OutputRecord>>
    where
        I: IntoIterator<Item = &'a RawDocument>,
    {
        documents.into_iter().map(|doc| self.transform(doc)).collect()
    }

    fn resolve<'a>(
        &self,
        field: &str,
        path: &PathExpression,
        document: &'a RawDocument,
    ) -> Result<Resolved<'a>> {
        match self.mode {
            PathMode::Lenient => Ok(path.resolve(document.as_value())),
            PathMode::Strict => path.resolve_strict(document.as_value()).map_err(|source| {
                error!(
                    "Failed to transform field '{}' with path '{}': {}",
                    field, path, source
                );
                SearchError::DataTransform {
                    field: field.to_string(),
                    path: path.to_string(),
                    source,
                }
            }),
        }
    }
}

/// Percent-decode a title; non-string values pass through untouched
fn decode_title(value: &Value) -> Value {
    match value {
        Value::String(encoded) => {
            let bytes = urlencoding::decode_binary(encoded.as_bytes());
            Value::String(String::from_utf8_lossy(&bytes).into_owned())
        }
        other => other.clone(),
    }
}
