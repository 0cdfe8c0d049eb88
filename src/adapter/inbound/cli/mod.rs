//! CLI module graph and command dispatch.

pub mod analytics;
pub mod anomalies;
pub mod command;
pub mod config;
pub mod detect;
pub mod metrics;
pub mod monitor;
pub mod network;
pub mod output;
pub mod transactions;

use crate::error::Result;
use crate::infrastructure::config::Config;

use command::{Cli, Commands, ConfigCommand};

/// Load the configuration named on the command line and run the command.
///
/// `config validate` requires the file to exist; every other command falls
/// back to defaults when it is missing.
///
/// # Errors
///
/// Returns the first error the command hits.
pub async fn execute(cli: &Cli) -> Result<()> {
    if let Commands::Config(ConfigCommand::Validate) = &cli.command {
        return config::validate(&cli.config);
    }

    let config = Config::load_or_default(&cli.config)?;
    config.init_logging();

    match &cli.command {
        Commands::Monitor(args) => monitor::execute(&config, args).await,
        Commands::Metrics => metrics::execute(&config).await,
        Commands::Transactions(args) => transactions::execute(&config, args).await,
        Commands::Anomalies(args) => anomalies::list(&config, args).await,
        Commands::SetStatus(args) => anomalies::set_status(&config, args).await,
        Commands::Network(args) => network::execute(&config, args).await,
        Commands::Analytics(args) => analytics::execute(&config, args).await,
        Commands::Realtime => analytics::realtime(&config).await,
        Commands::Detect => detect::execute(&config).await,
        Commands::Config(ConfigCommand::Show) => config::show(&cli.config, &config),
        Commands::Config(ConfigCommand::Validate) => config::validate(&cli.config),
    }
}
