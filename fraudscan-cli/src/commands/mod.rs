//! Command handlers -- one module per subcommand

pub mod config;
pub mod lookup;
pub mod scan;

use std::path::Path;

use fraudscan_core::config::FraudscanConfig;
use fraudscan_core::error::{ConfigError, FraudscanError};
use tracing::debug;

use crate::cli::ServiceArgs;
use crate::error::CliError;

/// Load the effective configuration for commands that talk to the service.
///
/// A missing file falls back to defaults plus environment overrides;
/// every other load error is reported.
pub async fn load_effective(config_path: &Path) -> Result<FraudscanConfig, FraudscanError> {
    match FraudscanConfig::load(config_path).await {
        Err(FraudscanError::Config(ConfigError::FileNotFound { path })) => {
            debug!(path = %path, "config file not found, using defaults");
            let mut config = FraudscanConfig::default();
            config.apply_env_overrides();
            config.validate()?;
            Ok(config)
        }
        other => other,
    }
}

/// Apply command-line service overrides on top of the loaded configuration.
pub fn apply_service_args(
    config: &mut FraudscanConfig,
    args: &ServiceArgs,
) -> Result<(), CliError> {
    if let Some(endpoint) = &args.endpoint {
        config.reputation.endpoint_base = endpoint.clone();
        config.reputation.validate()?;
    }
    Ok(())
}
