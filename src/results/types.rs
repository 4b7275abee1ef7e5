//! Raw hit and output record definitions

use crate::error::EngineError;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// A single search hit before reshaping
///
/// The root is always a JSON object; nested values may be any JSON shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RawDocument(Value);

impl RawDocument {
    /// Create a document from its top-level fields
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(Value::Object(fields))
    }

    /// The document as a JSON tree, rooted at its top-level object
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Look up a top-level field
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Copy of the top-level fields
    pub fn to_fields(&self) -> Map<String, Value> {
        self.0.as_object().cloned().unwrap_or_default()
    }
}

impl TryFrom<Value> for RawDocument {
    type Error = EngineError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(fields) => Ok(Self::new(fields)),
            other => Err(EngineError::Service(format!(
                "search hit is not a JSON object: {}",
                other
            ))),
        }
    }
}

impl<'de> Deserialize<'de> for RawDocument {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let fields = Map::<String, Value>::deserialize(deserializer)?;
        Ok(Self::new(fields))
    }
}

/// Flat record produced from one raw document
///
/// Fields whose path did not resolve are present with a `null` value.
/// Equality ignores field order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OutputRecord(Map<String, Value>);

impl OutputRecord {
    pub(crate) fn insert(&mut self, field: impl Into<String>, value: Value) {
        self.0.insert(field.into(), value);
    }

    /// Get a field value
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Get a field as a string slice, if it holds a string
    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.0.get(field).and_then(|v| v.as_str())
    }

    /// Whether the field is present in the record
    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// Field names in the record
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(|k| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Consume the record, returning its fields
    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

impl From<&RawDocument> for OutputRecord {
    fn from(document: &RawDocument) -> Self {
        Self(document.to_fields())
    }
}

impl From<Map<String, Value>> for OutputRecord {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}
