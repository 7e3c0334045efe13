use anyhow::Result;
use clap::Parser;
use std::time::Duration;
use tracing::{info, warn};

use scan_relocate::cli::commands::init::InitCommand;
use scan_relocate::cli::commands::lookup::LookupCommand;
use scan_relocate::cli::commands::normalize::NormalizeCommand;
use scan_relocate::cli::commands::replay::ReplayCommand;
use scan_relocate::cli::commands::scan::ScanCommand;
use scan_relocate::cli::commands::show_how_to_get_started;
use scan_relocate::cli::commands::table::TableCommand;
use scan_relocate::cli::{Cli, Commands};
use scan_relocate::config::ScanRelocateConfig;
use scan_relocate::telemetry::{init_telemetry, shutdown_telemetry};

/// Stdin reads run on a blocking thread that cannot be cancelled; don't wait
/// on it after the session has ended.
const RUNTIME_SHUTDOWN_TIMEOUT: Duration = Duration::from_millis(100);

fn main() -> Result<()> {
    let Cli {
        config: config_path,
        table,
        command,
    } = Cli::parse();

    // Loaded before the config so its variables apply; reported once logging is up
    let env_file = ScanRelocateConfig::load_env_file();

    // `init` may be asked to create the file `--config` names
    let mut config = match &command {
        Some(Commands::Init { .. }) => ScanRelocateConfig::default(),
        _ => ScanRelocateConfig::load_from(config_path.as_deref())?,
    };
    if let Some(table) = table {
        config.table.path = table;
    }

    init_telemetry(&config.observability)?;
    match env_file {
        Ok(true) => info!("Loaded environment variables from .env file"),
        Ok(false) => {}
        // A malformed .env is not worth refusing to scan over
        Err(e) => warn!(error = %e, "Ignoring unreadable .env file"),
    }

    let runtime = tokio::runtime::Runtime::new()?;
    let result = runtime.block_on(async move {
        match command {
            // Default behavior: no subcommand - explain how to get started
            None => show_how_to_get_started(&config),
            Some(Commands::Scan { input, json }) => {
                ScanCommand::new(config)
                    .with_input(input)
                    .with_json(json)
                    .execute()
                    .await
            }
            Some(Commands::Replay { file, json }) => {
                ReplayCommand::new(config, file)
                    .with_json(json)
                    .execute()
                    .await
            }
            Some(Commands::Lookup { code, json }) => {
                LookupCommand::new(config, code)
                    .with_json(json)
                    .execute()
                    .await
            }
            Some(Commands::Table { limit }) => TableCommand::new(config, limit).execute().await,
            Some(Commands::Normalize { codes }) => {
                NormalizeCommand::new(&config, codes).execute().await
            }
            Some(Commands::Init { force, dry_run }) => {
                InitCommand::new(config_path, force, dry_run).execute().await
            }
        }
    });
    runtime.shutdown_timeout(RUNTIME_SHUTDOWN_TIMEOUT);

    shutdown_telemetry();
    result
}
