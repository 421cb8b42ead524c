//! Index constituent adapters.

mod html;
pub mod invesco;
pub mod nasdaq;
pub mod nse;
pub mod vanguard;

pub use invesco::InvescoProvider;
pub use nasdaq::NasdaqProvider;
pub use nse::NseProvider;
pub use vanguard::VanguardProvider;

pub(crate) use html::selector;
