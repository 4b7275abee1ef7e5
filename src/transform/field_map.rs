//! Declarative mapping from output field names to source paths

use super::path::PathExpression;
use crate::error::{Result, SearchError};
use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::path::Path;

/// Output field layout for Azure AI Search hits over blob-storage indexes
///
/// `content` picks the first highlight snippet; `title` holds the
/// percent-encoded storage name.
pub const DEFAULT_FIELD_MAP: &[(&str, &str)] = &[
    ("id", "/id"),
    ("url", "/url"),
    ("score", "/@search.score"),
    ("title", "/metadata_storage_name"),
    ("content", "/@search.highlights/content/0"),
    ("subtitle", "/subtitle"),
    ("last_updated", "/metadata_last_modified"),
];

/// Ordered map of output field name to path expression
///
/// Field names are unique and non-empty. Entries keep the order in which
/// they were configured.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldMap {
    entries: Vec<(String, PathExpression)>,
}

impl FieldMap {
    /// Create an empty (pass-through) field map
    pub fn new() -> Self {
        Self::default()
    }

    /// The field map built from [`DEFAULT_FIELD_MAP`]
    pub fn azure_default() -> Self {
        Self {
            entries: DEFAULT_FIELD_MAP
                .iter()
                .map(|(field, path)| (field.to_string(), PathExpression::parse(*path)))
                .collect(),
        }
    }

    /// Build a field map from `(field, path)` pairs
    pub fn from_pairs<I, K, P>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, P)>,
        K: Into<String>,
        P: Into<PathExpression>,
    {
        let mut map = Self::new();
        for (field, path) in pairs {
            map.insert(field, path)?;
        }
        Ok(map)
    }

    /// Parse a JSON object of field name to path
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| SearchError::configuration(format!("invalid field map: {}", e)))
    }

    /// Load a JSON field map from disk
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            SearchError::configuration(format!(
                "cannot read field map {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_json_str(&content)
    }

    /// Append a mapping, rejecting empty or duplicate field names
    pub fn insert(
        &mut self,
        field: impl Into<String>,
        path: impl Into<PathExpression>,
    ) -> Result<()> {
        let field = field.into();
        check_field_name(&field, self).map_err(SearchError::Configuration)?;
        self.entries.push((field, path.into()));
        Ok(())
    }

    /// Path configured for a field
    pub fn get(&self, field: &str) -> Option<&PathExpression> {
        self.entries
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, path)| path)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.get(field).is_some()
    }

    /// Mappings in configured order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PathExpression)> {
        self.entries.iter().map(|(field, path)| (field.as_str(), path))
    }

    /// Output field names in configured order
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(field, _)| field.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn check_field_name(field: &str, map: &FieldMap) -> std::result::Result<(), String> {
    if field.trim().is_empty() {
        return Err("field map contains an empty output field name".to_string());
    }
    if map.contains(field) {
        return Err(format!("field map contains duplicate output field '{}'", field));
    }
    Ok(())
}

impl Serialize for FieldMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (field, path) in &self.entries {
            map.serialize_entry(field, path.as_str())?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for FieldMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_map(FieldMapVisitor)
    }
}

struct FieldMapVisitor;

impl<'de> Visitor<'de> for FieldMapVisitor {
    type Value = FieldMap;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a map of output field names to path strings")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> std::result::Result<FieldMap, A::Error> {
        let mut map = FieldMap::new();
        while let Some(field) = access.next_key::<String>()? {
            let path: String = access.next_value()?;
            check_field_name(&field, &map).map_err(de::Error::custom)?;
            map.entries.push((field, PathExpression::parse(path)));
        }
        Ok(map)
    }
}
