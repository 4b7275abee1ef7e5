//! HTTP networking module
//!
//! Provides the HTTP client used by engines that talk to remote search services.

mod client;

pub use client::HttpClient;
