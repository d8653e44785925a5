//! Tracing subscriber setup: console on stderr, optional rolling file.

use std::path::Path;

use eyre::WrapErr;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::cli::FILE_GUARD;

/// Install the global subscriber.
///
/// Filter precedence: `RUST_LOG`, then `--log-level`, then `logging.level`
/// from the config, then `info`.
pub fn init(
    cli_level: Option<&str>,
    json: bool,
    cfg: &fridge_config::Logging,
) -> eyre::Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(f) => f,
        Err(_) => {
            let level = cli_level
                .or(cfg.level.as_deref())
                .unwrap_or("info");
            EnvFilter::try_new(level)
                .map_err(|e| eyre::eyre!("invalid log level {level:?}: {e}"))?
        }
    };

    let console_json = json.then(|| {
        fmt::layer()
            .json()
            .with_target(true)
            .with_writer(std::io::stderr)
    });
    let console_pretty = (!json).then(|| {
        fmt::layer()
            .with_target(false)
            .with_writer(std::io::stderr)
    });

    let file_layer = match cfg.file.as_deref() {
        Some(path) => Some(file_layer(Path::new(path), cfg.rotation.as_deref())?),
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console_json)
        .with(console_pretty)
        .with(file_layer)
        .try_init()
        .map_err(|e| eyre::eyre!("install tracing subscriber: {e}"))?;
    Ok(())
}

fn file_layer<S>(
    path: &Path,
    rotation: Option<&str>,
) -> eyre::Result<impl tracing_subscriber::Layer<S> + Send + Sync + 'static>
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
{
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let name = path
        .file_name()
        .ok_or_else(|| eyre::eyre!("logging.file has no file name: {}", path.display()))?;
    std::fs::create_dir_all(dir)
        .wrap_err_with(|| format!("create log directory {}", dir.display()))?;

    let appender = match rotation.unwrap_or("never") {
        "daily" => tracing_appender::rolling::daily(dir, name),
        "hourly" => tracing_appender::rolling::hourly(dir, name),
        _ => tracing_appender::rolling::never(dir, name),
    };
    let (writer, guard) = tracing_appender::non_blocking(appender);
    // Keep the worker alive for the whole process so buffered lines get written.
    let _ = FILE_GUARD.set(guard);

    Ok(fmt::layer().json().with_ansi(false).with_writer(writer))
}
