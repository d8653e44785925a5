//! Wiring of config, transport adapters and the analyzer for each subcommand.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use eyre::WrapErr;
use fridge_core::{FlushCfg, FridgeAnalyzer, OutboundEvent, RunParams, RunSummary, StopReason};
use fridge_traits::EventSource;
use fridge_transport::{CsvReplaySource, LineFormat, LineSink, LineSource, SimulatedFridge, TopicCodec};

pub fn build_analyzer(cfg: &fridge_config::Config) -> eyre::Result<FridgeAnalyzer> {
    FridgeAnalyzer::builder()
        .with_filter((&cfg.filter).into())
        .with_items((&cfg.items).into())
        .try_build()
}

pub fn run_params(cfg: &fridge_config::Config, presence: bool) -> RunParams {
    RunParams {
        flush: FlushCfg::from(&cfg.flush),
        presence,
        ..RunParams::default()
    }
}

fn format_for(json: bool) -> LineFormat {
    if json { LineFormat::Json } else { LineFormat::Plain }
}

/// `fridge run`: bus lines from stdin (or a file) to stdout.
pub fn run_live(
    cfg: &fridge_config::Config,
    input: Option<&Path>,
    no_presence: bool,
    json: bool,
    shutdown: Arc<AtomicBool>,
) -> eyre::Result<RunSummary> {
    let codec = TopicCodec::from_config(cfg);
    let source: Box<dyn EventSource + Send> = match input {
        Some(path) => {
            let file = File::open(path)
                .wrap_err_with(|| format!("open input {}", path.display()))?;
            Box::new(LineSource::new(BufReader::new(file), codec.clone()))
        }
        None => Box::new(LineSource::new(
            BufReader::new(std::io::stdin()),
            codec.clone(),
        )),
    };

    let mut analyzer = build_analyzer(cfg)?;
    let params = run_params(cfg, cfg.presence.enabled && !no_presence);
    let mut sink = LineSink::new(std::io::stdout(), codec, format_for(json));

    tracing::info!(
        window = cfg.filter.window_size,
        item_kg = cfg.items.item_weight_kg,
        presence = params.presence,
        "analyzer started"
    );
    let summary = fridge_core::run(source, &mut sink, &mut analyzer, &params, shutdown)?;
    report(&summary, &analyzer);
    Ok(summary)
}

/// `fridge replay`: a recorded CSV session to stdout. Presence is never published.
pub fn run_replay(
    cfg: &fridge_config::Config,
    csv: &Path,
    json: bool,
    shutdown: Arc<AtomicBool>,
) -> eyre::Result<RunSummary> {
    let codec = TopicCodec::from_config(cfg);
    let source = CsvReplaySource::from_path(csv, codec.clone())?;
    let mut analyzer = build_analyzer(cfg)?;
    let params = run_params(cfg, false);
    let mut sink = LineSink::new(std::io::stdout(), codec, format_for(json));

    let summary = fridge_core::run(source, &mut sink, &mut analyzer, &params, shutdown)?;
    report(&summary, &analyzer);
    Ok(summary)
}

/// Session driven by `self-check` and the order it must yield.
pub fn self_check_script(cfg: &fridge_config::Config) -> (SimulatedFridge, Vec<OutboundEvent>) {
    let item = cfg.items.item_weight_kg;
    let sim = SimulatedFridge::new(10.0, item, cfg.filter.stable_deviation / 4.0, 0x5eed)
        .with_settle_samples(cfg.filter.window_size * 3)
        .power_on()
        .take(1)
        .put(2)
        .drift(item / 50.0)
        .take(3);
    let expected = vec![
        OutboundEvent::ItemsRemoved(1),
        OutboundEvent::ItemsAdded(2),
        OutboundEvent::ItemsRemoved(3),
    ];
    (sim, expected)
}

/// `fridge self-check`: run the scripted session through the real runner.
pub fn self_check(cfg: &fridge_config::Config, json: bool) -> eyre::Result<()> {
    let (sim, expected) = self_check_script(cfg);
    let mut analyzer = build_analyzer(cfg)?;
    let params = run_params(cfg, false);
    let mut got: Vec<OutboundEvent> = Vec::new();

    let summary = fridge_core::run(
        sim,
        &mut got,
        &mut analyzer,
        &params,
        Arc::new(AtomicBool::new(false)),
    )?;

    if got != expected {
        eyre::bail!("self-check failed: expected {expected:?}, got {got:?}");
    }

    if json {
        println!(
            "{}",
            serde_json::json!({
                "self_check": "ok",
                "events": got.len(),
                "samples": summary.samples,
                "stable_readings": summary.stable_readings,
            })
        );
    } else {
        println!(
            "self-check ok: {} events from {} samples ({} stable readings)",
            got.len(),
            summary.samples,
            summary.stable_readings
        );
    }
    Ok(())
}

fn report(summary: &RunSummary, analyzer: &FridgeAnalyzer) {
    let stop = match summary.stop {
        StopReason::EndOfStream => "end of stream",
        StopReason::Shutdown => "shutdown",
    };
    tracing::info!(
        stop,
        samples = summary.samples,
        door_events = summary.door_events,
        stable_readings = summary.stable_readings,
        ignored = summary.ignored,
        removed = summary.removed_total,
        added = summary.added_total,
        delivered = summary.delivered,
        dropped_on_shutdown = summary.dropped_on_shutdown,
        state = ?analyzer.state(),
        "session summary"
    );
}
