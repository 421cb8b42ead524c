//! Process configuration: command line flags, environment and credentials.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use holdwatch_core::constants::{CONFIG_FILE_NAME, STATE_FILE_NAME};
use holdwatch_core::utils::clean_optional_credential;

/// Monthly index constituent and mutual fund holdings change monitor.
#[derive(Parser, Debug, Clone)]
#[command(name = "holdwatch")]
#[command(version)]
pub struct Cli {
    /// Directory holding the monitor configuration and snapshot
    #[arg(long, env = "HOLDWATCH_DATA_DIR", default_value = "data")]
    pub data_dir: PathBuf,

    /// Monitor configuration file [default: <data-dir>/config.json]
    #[arg(long, env = "HOLDWATCH_CONFIG")]
    pub config: Option<PathBuf>,

    /// Snapshot file [default: <data-dir>/previous_state.json]
    #[arg(long, env = "HOLDWATCH_STATE")]
    pub state: Option<PathBuf>,

    /// Print the report without emailing it
    #[arg(long)]
    pub no_email: bool,

    /// Output written to stdout
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// The rendered report
    Text,
    /// The change sets as JSON
    Json,
}

/// Credentials from the environment, sanitised.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Secrets {
    pub email_sender: Option<String>,
    pub email_password: Option<String>,
    pub email_recipient: Option<String>,
    pub anthropic_api_key: Option<String>,
    /// Model override; not a credential, kept verbatim.
    pub anthropic_model: Option<String>,
}

impl Secrets {
    pub fn from_env() -> Self {
        let read = |name: &str| std::env::var(name).ok();
        Self {
            email_sender: clean_optional_credential(read("EMAIL_SENDER").as_deref()),
            email_password: clean_optional_credential(read("EMAIL_PASSWORD").as_deref()),
            email_recipient: clean_optional_credential(read("EMAIL_RECIPIENT").as_deref()),
            anthropic_api_key: clean_optional_credential(read("ANTHROPIC_API_KEY").as_deref()),
            anthropic_model: read("ANTHROPIC_MODEL")
                .map(|m| m.trim().to_string())
                .filter(|m| !m.is_empty()),
        }
    }

    /// Sender and password, when both are set.
    pub fn email_login(&self) -> Option<(&str, &str)> {
        Some((self.email_sender.as_deref()?, self.email_password.as_deref()?))
    }
}

impl std::fmt::Debug for Secrets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let set = |v: &Option<String>| if v.is_some() { "<set>" } else { "<unset>" };
        f.debug_struct("Secrets")
            .field("email_sender", &self.email_sender)
            .field("email_password", &set(&self.email_password))
            .field("email_recipient", &self.email_recipient)
            .field("anthropic_api_key", &set(&self.anthropic_api_key))
            .field("anthropic_model", &self.anthropic_model)
            .finish()
    }
}

/// Resolved settings for one run.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub config_path: PathBuf,
    pub state_path: PathBuf,
    pub no_email: bool,
    pub format: OutputFormat,
    pub secrets: Secrets,
}

impl AppConfig {
    pub fn from_cli(cli: Cli, secrets: Secrets) -> Self {
        let config_path = cli
            .config
            .unwrap_or_else(|| cli.data_dir.join(CONFIG_FILE_NAME));
        let state_path = cli
            .state
            .unwrap_or_else(|| cli.data_dir.join(STATE_FILE_NAME));
        Self {
            config_path,
            state_path,
            no_email: cli.no_email,
            format: cli.format,
            secrets,
        }
    }
}
