//! Path expressions and resolution against JSON documents

use crate::error::PathError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Delimiter between path segments
pub const PATH_DELIMITER: char = '/';

/// One step of a path: a field name, possibly also usable as a list index
#[derive(Debug, Clone, PartialEq, Eq)]
struct Segment {
    name: String,
    index: Option<usize>,
}

impl Segment {
    fn new(name: &str) -> Self {
        // Only plain digit runs count as indices ("+1" or "-0" do not).
        // Overflowing indices are simply out of range.
        let index = if name.bytes().all(|b| b.is_ascii_digit()) {
            Some(name.parse().unwrap_or(usize::MAX))
        } else {
            None
        };
        Self {
            name: name.to_string(),
            index,
        }
    }
}

/// A `/`-delimited route through a nested document
///
/// Empty segments are ignored, so `""`, `"/"` and `"//"` all name the root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct PathExpression {
    raw: String,
    segments: Vec<Segment>,
}

impl PathExpression {
    /// Parse a path expression
    pub fn parse(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let segments = raw
            .split(PATH_DELIMITER)
            .filter(|s| !s.is_empty())
            .map(Segment::new)
            .collect();
        Self { raw, segments }
    }

    /// The path as written
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Whether the path names the document root
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Number of non-empty segments
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    /// Resolve leniently: any step that does not fit yields [`Resolved::Absent`]
    pub fn resolve<'a>(&self, document: &'a Value) -> Resolved<'a> {
        let mut current = document;
        for segment in &self.segments {
            match step(current, segment) {
                Step::Into(next) => current = next,
                Step::Missing | Step::Mismatch(_) => return Resolved::Absent,
            }
        }
        Resolved::Found(current)
    }

    /// Resolve strictly: a type-mismatched step is an error
    ///
    /// Missing keys, out-of-range indices and `null` still resolve to
    /// [`Resolved::Absent`].
    pub fn resolve_strict<'a>(&self, document: &'a Value) -> Result<Resolved<'a>, PathError> {
        let mut current = document;
        for segment in &self.segments {
            match step(current, segment) {
                Step::Into(next) => current = next,
                Step::Missing => return Ok(Resolved::Absent),
                Step::Mismatch(err) => return Err(err),
            }
        }
        Ok(Resolved::Found(current))
    }
}

impl From<String> for PathExpression {
    fn from(raw: String) -> Self {
        Self::parse(raw)
    }
}

impl From<&str> for PathExpression {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}

impl From<PathExpression> for String {
    fn from(path: PathExpression) -> Self {
        path.raw
    }
}

impl fmt::Display for PathExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Outcome of resolving a path
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Resolved<'a> {
    /// The path reached a stored value, which may itself be `null`
    Found(&'a Value),
    /// The path does not exist in this document
    Absent,
}

impl<'a> Resolved<'a> {
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    pub fn value(&self) -> Option<&'a Value> {
        match *self {
            Self::Found(value) => Some(value),
            Self::Absent => None,
        }
    }

    /// Owned value, with `Absent` mapped to `null`
    pub fn to_value(&self) -> Value {
        self.value().cloned().unwrap_or(Value::Null)
    }
}

enum Step<'a> {
    Into(&'a Value),
    Missing,
    Mismatch(PathError),
}

fn step<'a>(current: &'a Value, segment: &Segment) -> Step<'a> {
    match current {
        Value::Array(items) => match segment.index {
            Some(i) => items.get(i).map_or(Step::Missing, Step::Into),
            None => Step::Mismatch(PathError::NotAnIndex {
                segment: segment.name.clone(),
            }),
        },
        Value::Object(fields) => fields.get(&segment.name).map_or(Step::Missing, Step::Into),
        Value::Null => Step::Missing,
        Value::String(_) | Value::Number(_) | Value::Bool(_) => {
            Step::Mismatch(PathError::NotTraversable {
                segment: segment.name.clone(),
                kind: kind_of(current),
            })
        }
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

/// Resolve `path` against `document` leniently
pub fn resolve_path<'a>(document: &'a Value, path: &str) -> Resolved<'a> {
    PathExpression::parse(path).resolve(document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Value {
        json!({"level1": {"list": [1, 2, {"k": "v"}], "empty": null}})
    }

    #[test]
    fn test_nested_list_lookup() {
        let data = sample();
        assert_eq!(
            resolve_path(&data, "/level1/list/2/k"),
            Resolved::Found(&json!("v"))
        );
        assert_eq!(resolve_path(&data, "level1/list/0"), Resolved::Found(&json!(1)));
    }

    #[test]
    fn test_root_paths() {
        let data = sample();
        for path in ["", "/", "//", "///"] {
            assert_eq!(resolve_path(&data, path), Resolved::Found(&data));
        }
        assert!(PathExpression::parse("/").is_root());
    }

    #[test]
    fn test_empty_segments_skipped() {
        let data = sample();
        assert_eq!(
            resolve_path(&data, "//level1///list//2/k/"),
            Resolved::Found(&json!("v"))
        );
        assert_eq!(PathExpression::parse("//a//b/").depth(), 2);
    }

    #[test]
    fn test_lenient_absent_cases() {
        let data = sample();
        assert!(resolve_path(&data, "/level1/list/a").is_absent());
        assert!(resolve_path(&data, "/level1/list/3").is_absent());
        assert!(resolve_path(&data, "/level1/list/99999999999999999999999").is_absent());
        assert!(resolve_path(&data, "/level1/missing").is_absent());
        assert!(resolve_path(&data, "/level1/empty/deeper").is_absent());
        assert!(resolve_path(&data, "/level1/list/0/k").is_absent());
        assert!(resolve_path(&Value::Null, "/anything").is_absent());
    }

    #[test]
    fn test_stored_null_is_found() {
        let data = sample();
        assert_eq!(resolve_path(&data, "/level1/empty"), Resolved::Found(&Value::Null));
        assert!(!resolve_path(&data, "/level1/empty").is_absent());
        assert_eq!(resolve_path(&data, "/nope").to_value(), Value::Null);
    }

    #[test]
    fn test_signed_segments_are_not_indices() {
        let data = json!({"list": ["a", "b"]});
        assert!(resolve_path(&data, "/list/+1").is_absent());
        assert!(resolve_path(&data, "/list/-0").is_absent());
    }

    #[test]
    fn test_digit_keys_on_objects() {
        let data = json!({"map": {"0": "zero"}});
        assert_eq!(resolve_path(&data, "/map/0"), Resolved::Found(&json!("zero")));
    }

    #[test]
    fn test_resolution_is_pure() {
        let data = sample();
        let before = data.clone();
        let path = PathExpression::parse("/level1/list/2");
        let first = path.resolve(&data).to_value();
        let second = path.resolve(&data).to_value();
        assert_eq!(first, second);
        assert_eq!(data, before);
    }

    #[test]
    fn test_strict_mismatches() {
        let data = sample();
        let err = PathExpression::parse("/level1/list/a")
            .resolve_strict(&data)
            .unwrap_err();
        assert_eq!(
            err,
            PathError::NotAnIndex {
                segment: "a".to_string()
            }
        );

        let err = PathExpression::parse("/level1/list/0/k")
            .resolve_strict(&data)
            .unwrap_err();
        assert!(matches!(err, PathError::NotTraversable { kind: "a number", .. }));
    }

    #[test]
    fn test_strict_sparsity_is_absent() {
        let data = sample();
        for path in ["/level1/missing", "/level1/list/7", "/level1/empty/x"] {
            let resolved = PathExpression::parse(path).resolve_strict(&data).unwrap();
            assert!(resolved.is_absent(), "{} should be absent", path);
        }
    }

    #[test]
    fn test_serde_as_string() {
        let path: PathExpression = serde_json::from_str(r#""/a/0""#).unwrap();
        assert_eq!(path.as_str(), "/a/0");
        assert_eq!(serde_json::to_string(&path).unwrap(), r#""/a/0""#);
    }
}
