//! `fraudscan lookup` command handler
//!
//! Wraps a bare user id into a payload and runs it through the same
//! session as `scan`, so both commands share one code path.

use std::path::Path;

use tracing::info;

use fraudscan_core::{ReputationLookup, encode_payload};
use fraudscan_reputation_client::HttpReputationClient;

use crate::cli::LookupArgs;
use crate::commands::scan::{ScanEntry, run_session};
use crate::error::CliError;
use crate::output::OutputWriter;

/// Execute the `lookup` command.
pub async fn execute(
    args: LookupArgs,
    config_path: &Path,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let mut config = super::load_effective(config_path).await?;
    super::apply_service_args(&mut config, &args.service)?;

    let client = HttpReputationClient::from_config(&config.reputation)?;
    info!(user_id = %args.user_id, endpoint = %client.endpoint_base(), "looking up user");

    let entry = lookup_one(client, config.session.permission_granted, &args.user_id).await?;

    writer.render(&entry)?;
    verdict(&entry)
}

/// Look up one user id through a fresh session.
pub async fn lookup_one<L: ReputationLookup>(
    lookup: L,
    permission_granted: bool,
    user_id: &str,
) -> Result<ScanEntry, CliError> {
    let payload = encode_payload(user_id).as_str().to_owned();
    let report = run_session(lookup, permission_granted, [payload]).await?;
    report
        .entries
        .into_iter()
        .next()
        .ok_or_else(|| CliError::Command("session produced no result".to_owned()))
}

/// A failed lookup maps to exit code 5.
pub fn verdict(entry: &ScanEntry) -> Result<(), CliError> {
    match entry.failure() {
        Some(failure) => Err(CliError::Lookup(failure.to_string())),
        None => Ok(()),
    }
}
