//! Configuration settings structure
//!
//! Defines the main settings structure and loading logic for the bot.
//! Precedence order: defaults < config file < environment < CLI flags
//! (the binary applies the last layer).

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use tracing::{info, warn};

use crate::endpoints::Endpoints;
use crate::error::{Error, Result};

/// Login protocol to use against the service
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoginType {
    /// Direct login on pollev.com
    #[default]
    PollEv,
    /// Federated login through MyUW (SAML2 SSO)
    Uw,
}

impl FromStr for LoginType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "pollev" => Ok(Self::PollEv),
            "uw" => Ok(Self::Uw),
            other => Err(Error::config(format!(
                "'{other}' is not a supported login type. Use 'pollev' or 'uw'."
            ))),
        }
    }
}

impl std::fmt::Display for LoginType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PollEv => write!(f, "pollev"),
            Self::Uw => write!(f, "uw"),
        }
    }
}

/// Main configuration settings for the bot
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Account and host configuration
    pub account: AccountSettings,
    /// Answer selection configuration
    pub answers: AnswerSettings,
    /// Wait/lifetime configuration
    pub timing: TimingSettings,
    /// Remote endpoint bases
    pub endpoints: Endpoints,
}

/// Account, host and authentication configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AccountSettings {
    /// Account username
    pub user: String,
    /// Account password
    pub password: String,
    /// Poll host name, i.e. 'uwpsych'
    pub host: String,
    /// Login protocol
    pub login_type: LoginType,
    /// Pre-captured session cookies; when present the login flow is skipped
    pub session_cookies: Option<HashMap<String, String>>,
    /// Pre-supplied firehose token; when present token acquisition is skipped
    pub firehose_token: Option<String>,
}

/// Answer selection configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnswerSettings {
    /// Minimum option index to select (inclusive, 0-indexed)
    pub min_option: usize,
    /// Maximum option index to select (exclusive); `None` means end of options
    pub max_option: Option<usize>,
}

/// Wait and lifetime configuration, in seconds
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingSettings {
    /// Wait between checks while no poll is open (capped at 1s per cycle)
    pub closed_wait_secs: f64,
    /// Grace period before answering a freshly opened poll
    pub open_wait_secs: f64,
    /// Bot lifetime; `None` runs forever
    pub lifetime_secs: Option<f64>,
    /// Bound on one firehose long-poll round
    pub firehose_timeout_secs: f64,
}

impl Default for TimingSettings {
    fn default() -> Self {
        Self {
            closed_wait_secs: 5.0,
            open_wait_secs: 5.0,
            lifetime_secs: None,
            firehose_timeout_secs: 25.0,
        }
    }
}

impl TimingSettings {
    /// Wait between checks while no poll is open
    pub fn closed_wait(&self) -> Duration {
        Duration::from_secs_f64(self.closed_wait_secs)
    }

    /// Grace period before answering an open poll
    pub fn open_wait(&self) -> Duration {
        Duration::from_secs_f64(self.open_wait_secs)
    }

    /// Bot lifetime; `None` means run forever
    pub fn lifetime(&self) -> Option<Duration> {
        match self.lifetime_secs {
            Some(secs) if secs.is_finite() => Some(Duration::from_secs_f64(secs)),
            _ => None,
        }
    }

    /// Bound on one firehose long-poll round
    pub fn firehose_timeout(&self) -> Duration {
        Duration::from_secs_f64(self.firehose_timeout_secs)
    }
}

impl Settings {
    /// Create new settings with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load settings from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| Error::config(format!("invalid config file {}: {e}", path.display())))
    }

    /// Load settings from environment variables over the current values
    pub fn merge_with_env(mut self) -> Result<Self> {
        if let Ok(user) = std::env::var("POLLEV_USER") {
            self.account.user = user;
        }
        if let Ok(password) = std::env::var("POLLEV_PASSWORD") {
            self.account.password = password;
        }
        if let Ok(host) = std::env::var("POLLEV_HOST") {
            self.account.host = host;
        }
        if let Ok(login_type) = std::env::var("POLLEV_LOGIN_TYPE") {
            self.account.login_type = login_type.parse()?;
        }
        Ok(self)
    }

    /// Load configuration with file < environment precedence.
    ///
    /// A missing file is not an error; it is logged and skipped.
    pub fn load(config_file: Option<&Path>) -> Result<Self> {
        let settings = match config_file {
            Some(path) if path.exists() => {
                info!("Loading configuration from file: {}", path.display());
                Self::from_file(path)?
            }
            Some(path) => {
                warn!(
                    "Configuration file not found: {}, using defaults",
                    path.display()
                );
                Self::default()
            }
            None => Self::default(),
        };
        settings.merge_with_env()
    }

    /// Validate the final configuration before any network call
    pub fn validate(&self) -> Result<()> {
        if self.account.host.trim().is_empty() {
            return Err(Error::config("poll host must not be empty"));
        }
        if self.account.session_cookies.is_none() && self.account.user.trim().is_empty() {
            return Err(Error::config(
                "either a username or session cookies are required",
            ));
        }
        if self.timing.closed_wait_secs < 0.0 || self.timing.open_wait_secs < 0.0 {
            return Err(Error::config("wait times must not be negative"));
        }
        if self.timing.firehose_timeout_secs <= 0.0 {
            return Err(Error::config("firehose timeout must be positive"));
        }
        if let Some(lifetime) = self.timing.lifetime_secs
            && lifetime < 0.0
        {
            return Err(Error::config("lifetime must not be negative"));
        }
        Ok(())
    }
}
