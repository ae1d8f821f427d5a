pub mod expand;

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// Connection settings for one FTP session.
///
/// - `port`: defaults to 21.
/// - `passive`: passive data-channel mode, defaults to `true`.
/// - `connect_timeout_secs`: `None` leaves the timeout to the OS.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FtpConfig {
    pub host: String,
    #[serde(default = "default_ftp_port")]
    pub port: u16,
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default = "default_passive")]
    pub passive: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connect_timeout_secs: Option<u64>,
}

impl Default for FtpConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: default_ftp_port(),
            username: String::new(),
            password: String::new(),
            passive: default_passive(),
            connect_timeout_secs: None,
        }
    }
}

/// A single validation error for a settings field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Name of the offending field (e.g. `"host"`).
    pub field: String,
    /// Human-readable error message.
    pub message: String,
}

impl ValidationError {
    fn new(field: &str, message: &str) -> Self {
        Self {
            field: field.to_string(),
            message: message.to_string(),
        }
    }
}

impl FtpConfig {
    /// Return a copy with all `${env:...}` placeholders expanded.
    pub fn expand(mut self) -> Self {
        self.host = expand::expand_env_placeholders(&self.host);
        self.username = expand::expand_env_placeholders(&self.username);
        self.password = expand::expand_env_placeholders(&self.password);
        self
    }

    /// Check the settings, returning every problem found.
    ///
    /// An empty list means the settings are usable for a connect attempt.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        if self.host.trim().is_empty() {
            errors.push(ValidationError::new("host", "Host must not be empty"));
        }
        if self.port == 0 {
            errors.push(ValidationError::new("port", "Port must be at least 1"));
        }
        if self.username.is_empty() {
            errors.push(ValidationError::new("username", "Username must not be empty"));
        }
        if self.connect_timeout_secs == Some(0) {
            errors.push(ValidationError::new(
                "connectTimeoutSecs",
                "Connect timeout must be at least 1 second",
            ));
        }
        errors
    }

    /// Expand placeholders and validate in one step.
    ///
    /// Every validation problem is folded into a single
    /// [`CoreError::Config`], formatted as `field: message` pairs.
    pub fn resolve(self) -> Result<Self, CoreError> {
        let config = self.expand();
        let errors = config.validate();
        if errors.is_empty() {
            return Ok(config);
        }
        let summary = errors
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect::<Vec<_>>()
            .join("; ");
        Err(CoreError::Config(summary))
    }

    pub fn connect_timeout(&self) -> Option<Duration> {
        self.connect_timeout_secs.map(Duration::from_secs)
    }
}

// --- Default value functions ---

fn default_ftp_port() -> u16 {
    21
}

fn default_passive() -> bool {
    true
}
