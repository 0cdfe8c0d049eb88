//! Command-line interface definitions.
//!
//! Defines the `fraudwatch` CLI using `clap`: a live transaction monitor plus
//! one-shot commands over the backend's REST API.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::domain::{AnomalyStatus, NetworkView, StatusFilter};
use crate::port::{DEFAULT_PAGE_LIMIT, DEFAULT_TREND_DAYS};

/// Default configuration file path.
pub const DEFAULT_CONFIG_PATH: &str = "fraudwatch.toml";

/// Terminal client for a fraud and anomaly detection backend
#[derive(Parser, Debug)]
#[command(name = "fraudwatch")]
#[command(version)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Color output mode [auto, always, never]
    #[arg(
        long,
        global = true,
        default_value = "auto",
        hide_possible_values = true
    )]
    pub color: ColorChoice,

    /// JSON output for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// Decrease output verbosity
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Color output mode for terminal rendering.
#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
pub enum ColorChoice {
    /// Detect automatically
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Stream live transactions and alerts
    Monitor(MonitorArgs),

    /// Show dashboard metrics
    Metrics,

    /// List recent transactions
    Transactions(TransactionsArgs),

    /// List detected anomalies
    Anomalies(AnomaliesArgs),

    /// Change the status of an anomaly
    SetStatus(SetStatusArgs),

    /// Summarize the transaction network
    Network(NetworkArgs),

    /// Show analytics, anomaly trends and detection methods
    Analytics(AnalyticsArgs),

    /// Fetch one realtime snapshot over REST
    Realtime,

    /// Ask the backend to run a detection pass
    Detect,

    /// Manage configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

/// Subcommands for `fraudwatch config`.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Validate the configuration file.
    Validate,
    /// Display the effective configuration with defaults applied.
    Show,
}

#[derive(Parser, Debug)]
pub struct MonitorArgs {
    /// Stop after this many seconds (runs until Ctrl-C otherwise)
    #[arg(short, long)]
    pub duration: Option<u64>,
}

#[derive(Parser, Debug)]
pub struct TransactionsArgs {
    /// Page number, starting at 1
    #[arg(long, default_value_t = 1)]
    pub page: u32,

    /// Records per page
    #[arg(long, default_value_t = DEFAULT_PAGE_LIMIT)]
    pub limit: u32,

    /// Backend status filter, passed through as given
    #[arg(long)]
    pub status: Option<String>,
}

#[derive(Parser, Debug)]
pub struct AnomaliesArgs {
    /// Page number, starting at 1
    #[arg(long, default_value_t = 1)]
    pub page: u32,

    /// Records per page
    #[arg(long, default_value_t = DEFAULT_PAGE_LIMIT)]
    pub limit: u32,

    /// Status filter: all, pending, investigating, confirmed, false_positive
    #[arg(long, default_value = "all")]
    pub status: StatusFilter,
}

#[derive(Parser, Debug)]
pub struct SetStatusArgs {
    /// Anomaly identifier
    pub id: String,

    /// New status: pending, investigating, confirmed, false_positive
    pub status: AnomalyStatus,
}

#[derive(Parser, Debug)]
pub struct NetworkArgs {
    /// Limit to the last N days
    #[arg(long)]
    pub days: Option<u32>,

    /// Subset to show: all, suspicious, anomalies, high-value
    #[arg(long, default_value = "all")]
    pub view: NetworkView,

    /// Case-insensitive search on account label, id or type
    #[arg(long)]
    pub search: Option<String>,

    /// Accounts to list, highest risk first
    #[arg(long, default_value_t = 15)]
    pub top: usize,
}

#[derive(Parser, Debug)]
pub struct AnalyticsArgs {
    /// Look-back window for anomaly trends, in days
    #[arg(long, default_value_t = DEFAULT_TREND_DAYS)]
    pub days: u32,
}
