//! Setup-time configuration errors.

/// Errors raised when validating adapter or fleet configuration.
///
/// These are all fatal at setup: the adapter is not created and the
/// defect is surfaced to the operator.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Host is empty or whitespace
    #[error("device host must not be empty")]
    EmptyHost,

    /// Device name is empty
    #[error("device name must not be empty")]
    EmptyName,

    /// Token has the wrong length
    #[error("device token must be 32 hex characters, got {0}")]
    TokenLength(usize),

    /// Token contains non-hex characters
    #[error("device token must contain only hex characters")]
    TokenFormat,

    /// Retry budget of zero would mark the device unavailable on the
    /// first hiccup
    #[error("retry budget must be a positive integer")]
    ZeroRetryBudget,

    /// Polling interval of zero
    #[error("poll interval must be a positive number of seconds")]
    ZeroPollInterval,

    /// Two devices share a name
    #[error("duplicate device name: {0}")]
    DuplicateName(String),
}
