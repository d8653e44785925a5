use crate::analyzer::FridgeAnalyzer;
use crate::config::FlushCfg;
use crate::error::FridgeError;
use crate::pump::{DEFAULT_CAPACITY, Pump, PumpMsg};
use crossbeam_channel::RecvTimeoutError;
use fridge_traits::{EventSink, EventSource, InboundEvent, OutboundEvent};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// Parameters for one run of the ingest/flush loop.
#[derive(Debug, Clone, Copy)]
pub struct RunParams {
    pub flush: FlushCfg,
    /// Publish presence (online/offline) around the run.
    pub presence: bool,
    /// Channel depth between the reader thread and the loop.
    pub capacity: usize,
}

impl Default for RunParams {
    fn default() -> Self {
        Self {
            flush: FlushCfg::default(),
            presence: false,
            capacity: DEFAULT_CAPACITY,
        }
    }
}

/// Why the loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StopReason {
    /// The source reported end of stream.
    #[default]
    EndOfStream,
    /// The shutdown flag was raised.
    Shutdown,
}

/// Counters for one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunSummary {
    pub samples: u64,
    pub door_events: u64,
    pub stable_readings: u64,
    /// Samples rejected before the stability window (non-finite).
    pub ignored: u64,
    pub removed_total: u64,
    pub added_total: u64,
    /// Events accepted by the sink.
    pub delivered: u64,
    /// Inbound events already read but never analyzed because of shutdown.
    pub dropped_on_shutdown: u64,
    pub stop: StopReason,
}

impl RunSummary {
    fn record(&mut self, event: &InboundEvent, ingested: &crate::analyzer::Ingested) {
        match event {
            InboundEvent::RawWeight(_) => self.samples += 1,
            InboundEvent::Door(_) => self.door_events += 1,
        }
        if ingested.stable.is_some() {
            self.stable_readings += 1;
        }
        if ingested.rejected {
            self.ignored += 1;
        }
        match ingested.queued {
            Some(OutboundEvent::ItemsRemoved(n)) => self.removed_total += u64::from(n),
            Some(OutboundEvent::ItemsAdded(n)) => self.added_total += u64::from(n),
            None => {}
        }
    }
}

/// Drive `analyzer` from `source` until end of stream or `shutdown`, flushing
/// derived events to `sink`.
///
/// The analyzer is borrowed, not consumed: calling `run` again with a new
/// source after a disconnect resumes from whatever state it held.
///
/// After every ingested event at most `flush.max_per_flush` events are handed
/// to the sink; the rest wait for the next step or the idle tick. On exit
/// everything still pending is delivered.
pub fn run<Src, Snk>(
    source: Src,
    sink: &mut Snk,
    analyzer: &mut FridgeAnalyzer,
    params: &RunParams,
    shutdown: Arc<AtomicBool>,
) -> Result<RunSummary, FridgeError>
where
    Src: EventSource + Send + 'static,
    Snk: EventSink + ?Sized,
{
    if params.presence {
        sink.presence(true)
            .map_err(|e| FridgeError::Sink(e.to_string()))?;
        tracing::info!("presence: online");
    }

    let outcome = pump_loop(source, sink, analyzer, params, &shutdown);

    let mut summary = match outcome {
        Ok(summary) => summary,
        Err((summary, err)) => {
            // Best effort: deliver what was already derived before bailing.
            if let Err(e) = analyzer.flush_all(sink) {
                tracing::warn!(error = %e, "could not deliver pending events");
            }
            if params.presence
                && let Err(e) = sink.presence(false)
            {
                tracing::warn!(error = %e, "could not publish offline presence");
            }
            tracing::error!(error = %err, ?summary, "run aborted");
            return Err(err);
        }
    };

    summary.delivered += analyzer.flush_all(sink)? as u64;

    if params.presence {
        sink.presence(false)
            .map_err(|e| FridgeError::Sink(e.to_string()))?;
        tracing::info!("presence: offline");
    }
    tracing::info!(?summary, "run finished");
    Ok(summary)
}

fn pump_loop<Src, Snk>(
    source: Src,
    sink: &mut Snk,
    analyzer: &mut FridgeAnalyzer,
    params: &RunParams,
    shutdown: &AtomicBool,
) -> Result<RunSummary, (RunSummary, FridgeError)>
where
    Src: EventSource + Send + 'static,
    Snk: EventSink + ?Sized,
{
    let pump = Pump::spawn(source, params.capacity);
    let idle = Duration::from_millis(params.flush.interval_ms.max(1));
    let max = params.flush.max_per_flush.max(1);
    let mut summary = RunSummary::default();

    loop {
        if shutdown.load(Ordering::Relaxed) {
            summary.stop = StopReason::Shutdown;
            summary.dropped_on_shutdown = pump.stop_and_drain(idle);
            if summary.dropped_on_shutdown > 0 {
                tracing::warn!(
                    dropped = summary.dropped_on_shutdown,
                    "shutdown requested; buffered input events were not analyzed"
                );
            } else {
                tracing::info!("shutdown requested");
            }
            break;
        }

        let flushed = match pump.recv_timeout(idle) {
            Ok(PumpMsg::Event(ev)) => {
                let ingested = analyzer.ingest(ev);
                summary.record(&ev, &ingested);
                analyzer.flush(sink, max)
            }
            Ok(PumpMsg::Failed(msg)) => return Err((summary, FridgeError::Source(msg))),
            Err(RecvTimeoutError::Timeout) => analyzer.flush(sink, max),
            Err(RecvTimeoutError::Disconnected) => {
                summary.stop = StopReason::EndOfStream;
                break;
            }
        };
        match flushed {
            Ok(n) => summary.delivered += n as u64,
            Err(e) => return Err((summary, e)),
        }
    }
    tracing::debug!(forwarded = pump.forwarded(), "pump stopped");
    Ok(summary)
}
