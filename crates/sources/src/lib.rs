//! Holdwatch source adapters.
//!
//! Fetches index constituents (NSE, Nasdaq-100, Vanguard and Invesco ETFs)
//! and mutual fund holdings (AMC monthly disclosure workbooks, optionally
//! located through the investor's inbox), and exposes them to the core as a
//! [`holdwatch_core::fetch::HoldingsSource`] through [`SourceRegistry`].

pub mod errors;
pub mod funds;
pub mod http;
pub mod inbox;
pub mod index;
pub mod registry;
pub mod symbols;

pub use errors::SourceError;
pub use inbox::{DisclosureInbox, ImapInbox};
pub use registry::{FetchDiagnostics, SourceRegistry};
