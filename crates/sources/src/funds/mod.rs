//! Mutual fund holdings from AMC monthly portfolio disclosures.

mod disclosure;
mod links;
mod profile;
mod sheet;

pub use disclosure::*;
pub use links::*;
pub use profile::*;
pub use sheet::*;

#[cfg(test)]
mod sheet_tests;
