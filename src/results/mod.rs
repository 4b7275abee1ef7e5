//! Document types flowing through the search pipeline
//!
//! A [`RawDocument`] is one hit as returned by the search service. An
//! [`OutputRecord`] is the flat, reshaped record handed back to callers.

mod types;

pub use types::*;
