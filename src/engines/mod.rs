//! Search engine module
//!
//! Defines the Engine trait implemented by search backends.

mod traits;

pub mod azure;
pub mod memory;

pub use azure::AzureSearch;
pub use memory::StaticEngine;
pub use traits::*;
