use rust_decimal::Decimal;

/// Default minimum rebalance magnitude, in percentage points (0.5)
pub const DEFAULT_MF_PERCENTAGE_CHANGE: Decimal = Decimal::from_parts(5, 0, 0, false, 1);

/// Default minimum holding weight an adapter keeps, in percent (0.5)
pub const DEFAULT_MIN_HOLDING_TO_REPORT: Decimal = Decimal::from_parts(5, 0, 0, false, 1);

/// Default SMTP relay
pub const DEFAULT_SMTP_SERVER: &str = "smtp.gmail.com";

/// Default SMTP submission port (STARTTLS)
pub const DEFAULT_SMTP_PORT: u16 = 587;

/// Default pause between successive source fetches
pub const DEFAULT_REQUEST_DELAY_SECS: u64 = 2;

/// Default per-request timeout for source fetches
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Default IMAP server for disclosure email search
pub const DEFAULT_IMAP_SERVER: &str = "imap.gmail.com";

/// Default inbox search window
pub const DEFAULT_INBOX_DAYS_BACK: u32 = 60;

/// Month format used in fund records
pub const MONTH_FORMAT: &str = "%Y-%m";

/// Default language model for ticker name enrichment
pub const DEFAULT_ENRICHMENT_MODEL: &str = "claude-3-5-sonnet-20241022";

/// Default response budget for ticker name enrichment
pub const DEFAULT_ENRICHMENT_MAX_TOKENS: u32 = 2048;

/// File name of the monitor configuration inside the data directory
pub const CONFIG_FILE_NAME: &str = "config.json";

/// File name of the persisted snapshot inside the data directory
pub const STATE_FILE_NAME: &str = "previous_state.json";
