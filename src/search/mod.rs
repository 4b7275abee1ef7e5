//! Search orchestration module
//!
//! Dispatches queries to the configured engine and reshapes the hits
//! it returns, preserving the engine's relevance order.

mod dispatcher;
mod executor;
mod models;

pub use dispatcher::Dispatcher;
pub use executor::{RecordStream, Search};
pub use models::*;
