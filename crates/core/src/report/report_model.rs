use serde::{Deserialize, Serialize};

/// A rendered report, ready for stdout and email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub subject: String,
    pub body: String,
    /// Whether any index or fund changed
    pub has_changes: bool,
}
