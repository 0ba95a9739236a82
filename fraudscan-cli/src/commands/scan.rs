//! `fraudscan scan` command handler
//!
//! Each payload is fed to one [`ScanSession`] as a capture event. The handler
//! waits for the outcome, records it, then resets before the next payload.

use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use tokio::io::AsyncBufReadExt;
use tracing::info;

use fraudscan_core::{
    DisplaySeverity, LookupFailure, Outcome, Phase, ReputationLookup, RiskLevel, ScanPayload,
    ScanSession, SessionState, extract, severity_of,
};
use fraudscan_reputation_client::HttpReputationClient;

use crate::cli::{FailOn, ScanArgs};
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `scan` command.
pub async fn execute(
    args: ScanArgs,
    config_path: &Path,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let mut config = super::load_effective(config_path).await?;
    super::apply_service_args(&mut config, &args.service)?;

    let payloads = if args.payloads.is_empty() {
        read_stdin_payloads().await?
    } else {
        args.payloads
    };

    let client = HttpReputationClient::from_config(&config.reputation)?;
    let report = run_session(client, config.session.permission_granted, payloads).await?;

    writer.render(&report)?;
    report.verdict(args.fail_on)
}

/// One line per payload; blank lines are skipped.
async fn read_stdin_payloads() -> Result<Vec<String>, CliError> {
    let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();
    let mut payloads = Vec::new();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim_end_matches('\r');
        if !line.trim().is_empty() {
            payloads.push(line.to_owned());
        }
    }
    Ok(payloads)
}

/// Drive a single scan session over `payloads` in order.
///
/// # Errors
/// Returns `CliError::Session` when the session refuses a capture (permission denied).
pub async fn run_session<L, I>(
    lookup: L,
    permission_granted: bool,
    payloads: I,
) -> Result<ScanReport, CliError>
where
    L: ReputationLookup,
    I: IntoIterator<Item = String>,
{
    let mut session = ScanSession::new(Arc::new(lookup));
    session.set_permission(permission_granted);

    let mut entries = Vec::new();
    for payload in payloads {
        let state = session.scan(payload.as_str()).await?;
        entries.push(ScanEntry::from_state(&payload, state));
        session.reset();
    }

    info!(
        session_id = session.session_id(),
        scanned = entries.len(),
        "scan session finished"
    );
    session.teardown();
    Ok(ScanReport::new(entries))
}

/// Outcome of one scanned payload.
#[derive(Debug, Serialize)]
pub struct ScanEntry {
    /// Raw payload as captured
    pub payload: String,
    /// Lookup key extracted from the payload
    pub user_id: String,
    /// Phase the session reached (`SHOWING_RESULT` or `SHOWING_ERROR`)
    pub phase: Phase,
    /// Display severity of a successful result
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<DisplaySeverity>,
    /// Record or failure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<Outcome>,
}

impl ScanEntry {
    pub fn from_state(payload: &str, state: &SessionState) -> Self {
        let outcome = state.outcome().cloned();
        let severity = outcome
            .as_ref()
            .and_then(Outcome::record)
            .map(|record| severity_of(record.risk_level()));
        Self {
            payload: payload.to_owned(),
            user_id: extract(&ScanPayload::from(payload)).as_str().to_owned(),
            phase: state.phase(),
            severity,
            outcome,
        }
    }

    pub fn risk_level(&self) -> Option<RiskLevel> {
        self.outcome
            .as_ref()
            .and_then(Outcome::record)
            .map(|record| record.risk_level())
    }

    pub fn failure(&self) -> Option<&LookupFailure> {
        self.outcome.as_ref().and_then(Outcome::failure)
    }
}

impl Render for ScanEntry {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        let label = if self.user_id.is_empty() {
            "(no user id)".to_owned()
        } else {
            self.user_id.clone()
        };

        match self.outcome.as_ref() {
            Some(Outcome::Record(record)) => {
                let severity = self.severity.unwrap_or_default();
                let tag = format!("[{}]", severity.to_string().to_uppercase());
                let tag = match severity {
                    DisplaySeverity::Critical => tag.red().bold(),
                    DisplaySeverity::Warning => tag.yellow().bold(),
                    DisplaySeverity::Nominal => tag.green().bold(),
                };
                writeln!(w, "{} {}", tag, label.bold())?;
                writeln!(w, "  {}", record)?;
                writeln!(w, "  {}", record.message())?;
            }
            Some(Outcome::Failure(failure)) => {
                writeln!(w, "{} {}", "[ERROR]".red().bold(), label.bold())?;
                writeln!(w, "  {}: {}", failure.kind, failure.display_message())?;
            }
            None => {
                writeln!(w, "[{}] {}", self.phase, label)?;
            }
        }
        Ok(())
    }
}

/// Counts across a scan run.
#[derive(Debug, Default, Serialize)]
pub struct ScanSummary {
    pub total: usize,
    pub critical: usize,
    pub warning: usize,
    pub nominal: usize,
    pub failed: usize,
}

/// Full result of `fraudscan scan`.
#[derive(Debug, Serialize)]
pub struct ScanReport {
    pub entries: Vec<ScanEntry>,
    pub summary: ScanSummary,
}

impl ScanReport {
    pub fn new(entries: Vec<ScanEntry>) -> Self {
        let mut summary = ScanSummary {
            total: entries.len(),
            ..ScanSummary::default()
        };
        for entry in &entries {
            match (entry.severity, entry.failure()) {
                (Some(DisplaySeverity::Critical), _) => summary.critical += 1,
                (Some(DisplaySeverity::Warning), _) => summary.warning += 1,
                (Some(DisplaySeverity::Nominal), _) => summary.nominal += 1,
                (None, Some(_)) => summary.failed += 1,
                (None, None) => {}
            }
        }
        Self { entries, summary }
    }

    /// Map the report to the command's exit status.
    ///
    /// A tripped `--fail-on` threshold takes precedence over lookup failures.
    pub fn verdict(&self, fail_on: Option<FailOn>) -> Result<(), CliError> {
        if let Some(fail_on) = fail_on {
            let threshold = fail_on.threshold();
            let hits = self
                .entries
                .iter()
                .filter(|e| e.risk_level().is_some_and(|level| level >= threshold))
                .count();
            if hits > 0 {
                return Err(CliError::RiskThreshold(format!(
                    "{hits} result(s) at or above {threshold}"
                )));
            }
        }

        if self.summary.failed > 0 {
            return Err(CliError::Lookup(format!(
                "{} of {} lookup(s) failed",
                self.summary.failed, self.summary.total
            )));
        }
        Ok(())
    }
}

impl Render for ScanReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        for entry in &self.entries {
            entry.render_text(w)?;
            writeln!(w)?;
        }
        let s = &self.summary;
        writeln!(
            w,
            "{} scanned: {} critical, {} warning, {} nominal, {} failed",
            s.total, s.critical, s.warning, s.nominal, s.failed
        )
    }
}
