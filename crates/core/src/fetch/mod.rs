//! Fetching snapshot fragments from external sources.

mod fetch_model;
mod fetch_traits;

pub use fetch_model::*;
pub use fetch_traits::*;
