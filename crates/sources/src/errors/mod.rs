//! Error types for the source adapters.
//!
//! Every adapter returns [`SourceError`]; the registry folds errors into a
//! failed fetch outcome so no single source can end a run.

use thiserror::Error;

/// Errors raised while fetching or parsing a source.
#[derive(Error, Debug)]
pub enum SourceError {
    /// The remote answered with a non-success status.
    #[error("HTTP {status} from {source_name} ({url})")]
    Http {
        source_name: String,
        status: u16,
        url: String,
    },

    /// The request did not complete in time.
    #[error("Timeout: {source_name}")]
    Timeout { source_name: String },

    /// A transport-level failure.
    #[error("Network error: {0}")]
    Network(reqwest::Error),

    /// The response did not have the expected structure.
    #[error("Parse error: {source_name} - {message}")]
    Parse {
        source_name: String,
        message: String,
    },

    /// Something the adapter needs was not present (link, sheet, columns).
    #[error("Not found: {source_name} - {message}")]
    NotFound {
        source_name: String,
        message: String,
    },

    /// The configured source cannot be fetched automatically.
    #[error("Unsupported: {0}")]
    Unsupported(String),

    /// The downloaded workbook could not be opened.
    #[error("Workbook error: {0}")]
    Workbook(String),

    /// Inbox search failed.
    #[error("Inbox error: {0}")]
    Inbox(String),
}

impl From<reqwest::Error> for SourceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            let source_name = err
                .url()
                .and_then(|u| u.host_str())
                .unwrap_or("unknown")
                .to_string();
            SourceError::Timeout { source_name }
        } else {
            SourceError::Network(err)
        }
    }
}

impl SourceError {
    pub fn parse(source_name: &str, message: impl Into<String>) -> Self {
        SourceError::Parse {
            source_name: source_name.to_string(),
            message: message.into(),
        }
    }

    pub fn not_found(source_name: &str, message: impl Into<String>) -> Self {
        SourceError::NotFound {
            source_name: source_name.to_string(),
            message: message.into(),
        }
    }

    /// Whether trying again later in the same run might succeed.
    ///
    /// Timeouts, connection failures, rate limiting (429) and server errors
    /// (5xx) are transient. Structure drift and missing documents are not.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Timeout { .. } => true,
            Self::Http { status, .. } => *status == 429 || *status >= 500,
            Self::Network(err) => err.is_connect() || err.is_request(),
            Self::Parse { .. }
            | Self::NotFound { .. }
            | Self::Unsupported(_)
            | Self::Workbook(_)
            | Self::Inbox(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn http(status: u16) -> SourceError {
        SourceError::Http {
            source_name: "NSE".to_string(),
            status,
            url: "https://www.nseindia.com/api/equity-stockIndices".to_string(),
        }
    }

    #[test]
    fn test_transient_classification() {
        assert!(http(429).is_transient());
        assert!(http(503).is_transient());
        assert!(!http(403).is_transient());
        assert!(!http(404).is_transient());
        assert!(SourceError::Timeout {
            source_name: "VANGUARD".to_string()
        }
        .is_transient());
        assert!(!SourceError::parse("HDFC", "no % to NAV column").is_transient());
        assert!(!SourceError::Unsupported("manual download".to_string()).is_transient());
    }

    #[test]
    fn test_display() {
        assert_eq!(
            http(403).to_string(),
            "HTTP 403 from NSE (https://www.nseindia.com/api/equity-stockIndices)"
        );
        assert_eq!(
            SourceError::not_found("TATA", "sheet 'TTSF' not in workbook").to_string(),
            "Not found: TATA - sheet 'TTSF' not in workbook"
        );
    }
}
