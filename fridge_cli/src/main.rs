//! `fridge`: infer item counts from a weighed fridge's bus messages.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use clap::Parser;
use fridge_core::error::FridgeError;

mod cli;
mod error_fmt;
mod logging;
mod session;

use cli::{Cli, Commands, JSON_MODE};
use error_fmt::{exit_code_for_error, format_error_json, humanize};

fn main() {
    let cli = Cli::parse();
    let _ = JSON_MODE.set(cli.json);
    let _ = color_eyre::install();

    if let Err(e) = real_main(cli) {
        if JSON_MODE.get().copied().unwrap_or(false) {
            eprintln!("{}", format_error_json(&e));
        } else {
            eprintln!("{}", humanize(&e));
        }
        std::process::exit(exit_code_for_error(&e));
    }
}

fn real_main(cli: Cli) -> eyre::Result<()> {
    let cfg = load_config(&cli)?;
    logging::init(cli.log_level.as_deref(), cli.json, &cfg.logging)?;
    tracing::debug!(config = %cli.config.display(), "configuration loaded");

    let shutdown = Arc::new(AtomicBool::new(false));
    {
        let flag = shutdown.clone();
        if let Err(e) = ctrlc::set_handler(move || flag.store(true, Ordering::Relaxed)) {
            tracing::warn!(error = %e, "could not install Ctrl-C handler");
        }
    }

    match cli.cmd {
        Commands::Run { input, no_presence } => {
            session::run_live(&cfg, input.as_deref(), no_presence, cli.json, shutdown)?;
        }
        Commands::Replay { csv } => {
            session::run_replay(&cfg, &csv, cli.json, shutdown)?;
        }
        Commands::SelfCheck => session::self_check(&cfg, cli.json)?,
    }
    Ok(())
}

/// Load the TOML, apply flag overrides, validate. Every failure here is a
/// configuration error.
fn load_config(cli: &Cli) -> eyre::Result<fridge_config::Config> {
    let mut cfg = fridge_config::load_file(&cli.config)
        .map_err(|e| FridgeError::Config(format!("{e:#}")))?;
    if let Some(n) = cli.window_size {
        cfg.filter.window_size = n;
    }
    if let Some(kg) = cli.item_weight {
        cfg.items.item_weight_kg = kg;
    }
    cfg.validate()
        .map_err(|e| FridgeError::Config(format!("{e:#}")))?;
    Ok(cfg)
}
