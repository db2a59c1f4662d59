//! Adapter and fleet configuration.
//!
//! One [`AdapterConfig`] per physical device; a [`FleetConfig`] is the
//! TOML document the binary loads. Validation happens once, at setup;
//! a config that passes [`AdapterConfig::validate`] never produces a
//! configuration error later.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default number of consecutive failed polls tolerated before a
/// device is marked unavailable.
pub const DEFAULT_RETRY_BUDGET: u32 = 20;

/// Default polling interval in seconds.
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 30;

/// Default per-call timeout in seconds.
pub const DEFAULT_COMMAND_TIMEOUT_SECS: u64 = 5;

/// Configuration for a single device adapter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdapterConfig {
    /// Device IP address or hostname.
    pub host: String,
    /// 32-character hex device token.
    pub token: String,
    /// Human-readable device name, also used as the entity id.
    pub name: String,
    /// Explicit model string. Auto-detected via an `info()` probe when
    /// absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Consecutive failed polls tolerated before availability flips.
    #[serde(default = "default_retry_budget")]
    pub retry_budget: u32,
    /// Polling interval in seconds.
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,
    /// Timeout applied to every blocking device call, in seconds.
    #[serde(default = "default_command_timeout")]
    pub command_timeout_secs: u64,
}

fn default_retry_budget() -> u32 {
    DEFAULT_RETRY_BUDGET
}

fn default_poll_interval() -> u64 {
    DEFAULT_POLL_INTERVAL_SECS
}

fn default_command_timeout() -> u64 {
    DEFAULT_COMMAND_TIMEOUT_SECS
}

impl AdapterConfig {
    /// Create a config with default budget and intervals.
    pub fn new(
        host: impl Into<String>,
        token: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            token: token.into(),
            name: name.into(),
            model: None,
            retry_budget: DEFAULT_RETRY_BUDGET,
            poll_interval_secs: DEFAULT_POLL_INTERVAL_SECS,
            command_timeout_secs: DEFAULT_COMMAND_TIMEOUT_SECS,
        }
    }

    /// Set an explicit model, skipping the auto-detect probe.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Override the retry budget.
    pub fn with_retry_budget(mut self, budget: u32) -> Self {
        self.retry_budget = budget;
        self
    }

    /// Check the config for defects that would otherwise surface as
    /// confusing runtime failures.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::EmptyHost);
        }
        if self.name.trim().is_empty() {
            return Err(ConfigError::EmptyName);
        }
        if self.token.len() != 32 {
            return Err(ConfigError::TokenLength(self.token.len()));
        }
        if !self.token.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ConfigError::TokenFormat);
        }
        if self.retry_budget == 0 {
            return Err(ConfigError::ZeroRetryBudget);
        }
        if self.poll_interval_secs == 0 {
            return Err(ConfigError::ZeroPollInterval);
        }
        Ok(())
    }
}

/// The fleet configuration document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FleetConfig {
    /// One entry per device.
    #[serde(default, rename = "device")]
    pub devices: Vec<AdapterConfig>,
}

impl FleetConfig {
    /// Validate all device entries, also rejecting duplicate names
    /// (the name doubles as the entity id).
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = std::collections::HashSet::new();
        for device in &self.devices {
            device.validate()?;
            if !seen.insert(device.name.as_str()) {
                return Err(ConfigError::DuplicateName(device.name.clone()));
            }
        }
        Ok(())
    }
}
