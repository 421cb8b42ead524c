//! Monitor configuration: what to watch and how.

mod config_loader;
mod config_model;
mod source_model;

pub use config_loader::*;
pub use config_model::*;
pub use source_model::*;

#[cfg(test)]
mod config_tests;
