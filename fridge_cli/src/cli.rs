//! CLI argument definitions and shared statics.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::OnceLock;

pub static FILE_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();
/// Whether the user asked for JSON output (controls structured error output).
pub static JSON_MODE: OnceLock<bool> = OnceLock::new();

#[derive(Parser, Debug)]
#[command(name = "fridge", version, about = "Fridge item-count analyzer")]
pub struct Cli {
    /// Path to config TOML (missing file = built-in defaults)
    #[arg(long, value_name = "FILE", default_value = "etc/fridge.toml")]
    pub config: PathBuf,

    /// Emit events and logs as JSON lines
    #[arg(long, action = ArgAction::SetTrue)]
    pub json: bool,

    /// Console log level (error|warn|info|debug|trace); RUST_LOG wins when set
    #[arg(long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Override filter.window_size
    #[arg(long, value_name = "N")]
    pub window_size: Option<usize>,

    /// Override items.item_weight_kg
    #[arg(long, value_name = "KG")]
    pub item_weight: Option<f64>,

    /// Command to execute
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyze a live `<topic> <payload>` stream and print derived events
    Run {
        /// Read messages from FILE instead of stdin
        #[arg(long, value_name = "FILE")]
        input: Option<PathBuf>,
        /// Do not publish online/offline presence
        #[arg(long, action = ArgAction::SetTrue)]
        no_presence: bool,
    },
    /// Replay a recorded session from CSV (headers: topic,payload)
    Replay {
        #[arg(long, value_name = "FILE")]
        csv: PathBuf,
    },
    /// Drive a simulated session through the full pipeline and verify the counts
    SelfCheck,
}
