pub mod credentials;

pub use credentials::{clean_credential, clean_optional_credential};
