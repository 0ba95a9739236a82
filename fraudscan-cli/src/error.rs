//! CLI-specific error types and exit code mapping

use fraudscan_core::error::{FraudscanError, SessionError};
use fraudscan_reputation_client::ClientError;

/// CLI-specific error type.
///
/// Each variant carries enough context for a user-friendly message.
/// The `exit_code()` method maps errors to process exit codes.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration loading or validation failure.
    #[error("configuration error: {0}")]
    Config(String),

    /// A subcommand-specific operation failed.
    #[error("{0}")]
    Command(String),

    /// A result reached the `--fail-on` risk threshold.
    #[error("risk threshold reached: {0}")]
    RiskThreshold(String),

    /// One or more lookups ended in a failure card.
    #[error("lookup failed: {0}")]
    Lookup(String),

    /// The scan session refused or could not process an event.
    #[error("session error: {0}")]
    Session(#[from] SessionError),

    /// JSON serialisation failed during output rendering.
    #[error("json output error: {0}")]
    JsonSerialize(#[from] serde_json::Error),

    /// IO error (stdin read, stdout write, etc.).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Wrapped domain error from fraudscan-core.
    #[error("{0}")]
    Core(#[from] FraudscanError),
}

impl CliError {
    /// Map the error to a process exit code.
    ///
    /// | Code | Meaning                                  |
    /// |------|------------------------------------------|
    /// | 0    | Success                                  |
    /// | 1    | General / command error                  |
    /// | 2    | Configuration error                      |
    /// | 4    | A result reached the `--fail-on` level   |
    /// | 5    | A lookup failed                          |
    /// | 10   | IO error                                 |
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::Core(FraudscanError::Config(_)) => 2,
            Self::RiskThreshold(_) => 4,
            Self::Lookup(_) => 5,
            Self::Io(_) | Self::Core(FraudscanError::Io(_)) => 10,
            Self::Command(_) | Self::Session(_) | Self::JsonSerialize(_) | Self::Core(_) => 1,
        }
    }
}

impl From<ClientError> for CliError {
    fn from(e: ClientError) -> Self {
        Self::Config(e.to_string())
    }
}
