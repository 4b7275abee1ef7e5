//! Index-Search-RS: query a managed full-text search index and reshape its hits
//!
//! Raw hits are arbitrarily nested JSON documents. A [`FieldMap`] of output
//! field names to `/`-delimited paths turns each hit into a flat
//! [`OutputRecord`] with a stable schema.

pub mod config;
pub mod engines;
pub mod error;
pub mod network;
pub mod results;
pub mod search;
pub mod transform;

pub use config::Settings;
pub use engines::{AzureSearch, Engine, StaticEngine};
pub use error::{EngineError, PathError, Result, SearchError};
pub use results::{OutputRecord, RawDocument};
pub use search::{Search, SearchParameters};
pub use transform::{resolve_path, FieldMap, PathExpression, PathMode, Resolved, Transformer};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
