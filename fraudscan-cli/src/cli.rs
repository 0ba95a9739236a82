//! CLI argument parsing using clap derive API
//!
//! Purely declarative: no side effects or I/O.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use fraudscan_core::RiskLevel;

/// Fraudscan -- scan user codes and check their transaction reputation.
///
/// Use `fraudscan <COMMAND> --help` for subcommand details.
#[derive(Parser, Debug)]
#[command(name = "fraudscan", version, about, long_about = None)]
pub struct Cli {
    /// Path to the fraudscan.toml configuration file.
    #[arg(short, long, default_value = "fraudscan.toml")]
    pub config: PathBuf,

    /// Override log level (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Output format.
    #[arg(long, global = true, default_value = "text")]
    pub output: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable result cards.
    Text,
    /// Machine-readable JSON.
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scan one or more code payloads (reads stdin lines when none are given).
    Scan(ScanArgs),

    /// Look up a bare user id.
    Lookup(LookupArgs),

    /// Manage configuration.
    Config(ConfigArgs),
}

// ---- shared ----

/// Reputation service overrides.
#[derive(Args, Debug, Default)]
pub struct ServiceArgs {
    /// Override `reputation.endpoint_base`.
    #[arg(long)]
    pub endpoint: Option<String>,
}

// ---- scan ----

/// Drive a scan session over each payload in order.
#[derive(Args, Debug)]
pub struct ScanArgs {
    /// Raw code payloads, e.g. `USER_ID|U-1001`.
    pub payloads: Vec<String>,

    /// Exit with code 4 when any result reaches this risk level.
    #[arg(long)]
    pub fail_on: Option<FailOn>,

    #[command(flatten)]
    pub service: ServiceArgs,
}

/// Risk threshold for `--fail-on`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FailOn {
    /// MEDIUM or HIGH.
    Medium,
    /// HIGH only.
    High,
}

impl FailOn {
    /// Lowest risk level that trips the threshold.
    pub fn threshold(self) -> RiskLevel {
        match self {
            Self::Medium => RiskLevel::Medium,
            Self::High => RiskLevel::High,
        }
    }
}

// ---- lookup ----

/// Look up a single user id.
#[derive(Args, Debug)]
pub struct LookupArgs {
    /// User id without the `USER_ID|` prefix.
    pub user_id: String,

    #[command(flatten)]
    pub service: ServiceArgs,
}

// ---- config ----

/// Manage fraudscan configuration.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Validate the configuration file and report errors.
    Validate,
    /// Show the effective configuration (file + env overrides + defaults).
    Show {
        /// Show only a specific section (general, reputation, session).
        #[arg(long)]
        section: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_verify_structure() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_parse_scan_with_payloads() {
        let cli = Cli::try_parse_from(["fraudscan", "scan", "USER_ID|abc123", "xyz"])
            .expect("should parse scan with payloads");
        match cli.command {
            Commands::Scan(args) => {
                assert_eq!(args.payloads, vec!["USER_ID|abc123", "xyz"]);
                assert!(args.fail_on.is_none(), "fail_on should default to None");
                assert!(args.service.endpoint.is_none());
            }
            _ => panic!("expected Scan command"),
        }
    }

    #[test]
    fn test_cli_parse_scan_without_payloads_reads_stdin() {
        let cli = Cli::try_parse_from(["fraudscan", "scan"]).expect("should parse bare scan");
        match cli.command {
            Commands::Scan(args) => assert!(args.payloads.is_empty()),
            _ => panic!("expected Scan command"),
        }
    }

    #[test]
    fn test_cli_parse_scan_fail_on_and_endpoint() {
        let cli = Cli::try_parse_from([
            "fraudscan",
            "scan",
            "--fail-on",
            "medium",
            "--endpoint",
            "https://risk.example",
            "USER_ID|a",
        ])
        .expect("should parse");
        match cli.command {
            Commands::Scan(args) => {
                assert_eq!(args.fail_on, Some(FailOn::Medium));
                assert_eq!(args.service.endpoint.as_deref(), Some("https://risk.example"));
            }
            _ => panic!("expected Scan command"),
        }
    }

    #[test]
    fn test_cli_parse_scan_invalid_fail_on() {
        let result = Cli::try_parse_from(["fraudscan", "scan", "--fail-on", "low"]);
        assert!(result.is_err(), "low is not a valid threshold");
    }

    #[test]
    fn test_cli_parse_lookup() {
        let cli = Cli::try_parse_from(["fraudscan", "lookup", "U-1001"]).expect("should parse");
        match cli.command {
            Commands::Lookup(args) => assert_eq!(args.user_id, "U-1001"),
            _ => panic!("expected Lookup command"),
        }
    }

    #[test]
    fn test_cli_parse_lookup_requires_user_id() {
        assert!(Cli::try_parse_from(["fraudscan", "lookup"]).is_err());
    }

    #[test]
    fn test_cli_parse_config_show_section() {
        let cli = Cli::try_parse_from(["fraudscan", "config", "show", "--section", "reputation"])
            .expect("should parse");
        match cli.command {
            Commands::Config(ConfigArgs {
                action: ConfigAction::Show { section },
            }) => assert_eq!(section.as_deref(), Some("reputation")),
            _ => panic!("expected Config Show command"),
        }
    }

    #[test]
    fn test_cli_global_flags() {
        let cli = Cli::try_parse_from([
            "fraudscan",
            "-c",
            "/etc/fraudscan/fraudscan.toml",
            "lookup",
            "U-1",
            "--output",
            "json",
            "--log-level",
            "debug",
        ])
        .expect("global flags should be accepted after the subcommand");
        assert_eq!(cli.config, PathBuf::from("/etc/fraudscan/fraudscan.toml"));
        assert_eq!(cli.output, OutputFormat::Json);
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::try_parse_from(["fraudscan", "config", "validate"]).expect("should parse");
        assert_eq!(cli.config, PathBuf::from("fraudscan.toml"));
        assert_eq!(cli.output, OutputFormat::Text);
        assert!(cli.log_level.is_none());
    }

    #[test]
    fn test_fail_on_threshold() {
        assert_eq!(FailOn::High.threshold(), RiskLevel::High);
        assert_eq!(FailOn::Medium.threshold(), RiskLevel::Medium);
    }
}
