use std::process::ExitCode;

use clap::Parser;

use fraudscan_cli::cli::{Cli, Commands};
use fraudscan_cli::commands;
use fraudscan_cli::error::CliError;
use fraudscan_cli::logging;
use fraudscan_cli::output::OutputWriter;
use fraudscan_core::config::GeneralConfig;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Logging settings come from the config file when it loads; commands
    // report config errors themselves.
    let mut general = commands::load_effective(&cli.config)
        .await
        .map(|config| config.general)
        .unwrap_or_else(|_| GeneralConfig::default());
    if let Some(level) = &cli.log_level {
        general.log_level = level.clone();
    }
    if let Err(e) = logging::init_tracing(&general) {
        eprintln!("warning: {e}");
    }
    fraudscan_core::metrics::describe_all();

    let writer = OutputWriter::new(cli.output);
    let result: Result<(), CliError> = match cli.command {
        Commands::Scan(args) => commands::scan::execute(args, &cli.config, &writer).await,
        Commands::Lookup(args) => commands::lookup::execute(args, &cli.config, &writer).await,
        Commands::Config(args) => commands::config::execute(args, &cli.config, &writer).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::from(u8::try_from(e.exit_code()).unwrap_or(1))
        }
    }
}
