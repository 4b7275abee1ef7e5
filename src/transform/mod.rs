//! Result transformation module
//!
//! Resolves `/`-delimited paths against nested result documents and
//! remaps the values into flat output records according to a field map.

mod field_map;
mod path;
mod transformer;

pub use field_map::{FieldMap, DEFAULT_FIELD_MAP};
pub use path::{resolve_path, PathExpression, Resolved, PATH_DELIMITER};
pub use transformer::{PathMode, Transformer, TITLE_FIELD};
