use fridge_core::error::FridgeError;
use fridge_core::mocks::{FailingSource, VecSource, steady};
use fridge_core::{
    DoorState, EventSink, EventSource, FlushCfg, FridgeAnalyzer, FridgeState, InboundEvent,
    OutboundEvent, RunParams, StopReason, run,
};
use rstest::rstest;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

#[derive(Default)]
struct RecordingSink {
    events: Vec<OutboundEvent>,
    presence: Vec<bool>,
}

impl EventSink for RecordingSink {
    fn emit(
        &mut self,
        event: &OutboundEvent,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.events.push(*event);
        Ok(())
    }

    fn presence(&mut self, online: bool) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.presence.push(online);
        Ok(())
    }
}

struct DeadSink;

impl EventSink for DeadSink {
    fn emit(
        &mut self,
        _event: &OutboundEvent,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        Err(Box::new(std::io::Error::other("sink closed")))
    }
}

fn cycle(from: f64, to: f64) -> Vec<InboundEvent> {
    let mut v = vec![InboundEvent::Door(DoorState::Open)];
    v.push(InboundEvent::RawWeight(from - 0.4));
    v.push(InboundEvent::Door(DoorState::Closed));
    v.extend(steady(to, 4));
    v
}

fn session() -> Vec<InboundEvent> {
    let mut v = vec![InboundEvent::Door(DoorState::Closed)];
    v.extend(steady(10.0, 4));
    v.extend(cycle(10.0, 9.12));
    v.extend(cycle(9.12, 10.88));
    v
}

fn no_shutdown() -> Arc<AtomicBool> {
    Arc::new(AtomicBool::new(false))
}

#[rstest]
#[case(1)]
#[case(2)]
#[case(16)]
fn delivers_every_cycle_in_order(#[case] max_per_flush: usize) {
    let mut analyzer = FridgeAnalyzer::builder().try_build().unwrap();
    let mut sink = RecordingSink::default();
    let params = RunParams {
        flush: FlushCfg {
            max_per_flush,
            interval_ms: 5,
        },
        presence: true,
        ..RunParams::default()
    };

    let summary = run(
        VecSource::new(session()),
        &mut sink,
        &mut analyzer,
        &params,
        no_shutdown(),
    )
    .expect("run completes");

    assert_eq!(
        sink.events,
        vec![OutboundEvent::ItemsRemoved(1), OutboundEvent::ItemsAdded(2)]
    );
    assert_eq!(sink.presence, vec![true, false]);
    assert_eq!(summary.stop, StopReason::EndOfStream);
    assert_eq!(summary.door_events, 5);
    assert_eq!(summary.samples, 14);
    assert_eq!(summary.removed_total, 1);
    assert_eq!(summary.added_total, 2);
    assert_eq!(summary.delivered, 2);
    assert_eq!(analyzer.pending(), 0);
}

#[test]
fn presence_is_opt_in() {
    let mut analyzer = FridgeAnalyzer::builder().try_build().unwrap();
    let mut sink = RecordingSink::default();
    run(
        VecSource::new(session()),
        &mut sink,
        &mut analyzer,
        &RunParams::default(),
        no_shutdown(),
    )
    .unwrap();
    assert!(sink.presence.is_empty());
}

#[test]
fn state_survives_source_reconnect() {
    let mut analyzer = FridgeAnalyzer::builder().try_build().unwrap();
    let mut sink = RecordingSink::default();

    let mut first = vec![InboundEvent::Door(DoorState::Closed)];
    first.extend(steady(10.0, 4));
    first.push(InboundEvent::Door(DoorState::Open));
    let err = run(
        FailingSource::after(first),
        &mut sink,
        &mut analyzer,
        &RunParams::default(),
        no_shutdown(),
    )
    .expect_err("source drops");
    assert!(matches!(err, FridgeError::Source(ref m) if m.contains("connection reset")));
    assert_eq!(analyzer.state(), FridgeState::Opened);

    let mut second = vec![InboundEvent::Door(DoorState::Closed)];
    second.extend(steady(9.12, 4));
    run(
        VecSource::new(second),
        &mut sink,
        &mut analyzer,
        &RunParams::default(),
        no_shutdown(),
    )
    .unwrap();
    assert_eq!(sink.events, vec![OutboundEvent::ItemsRemoved(1)]);
}

#[test]
fn shutdown_flag_stops_loop() {
    let mut analyzer = FridgeAnalyzer::builder().try_build().unwrap();
    let mut sink = RecordingSink::default();
    let summary = run(
        VecSource::new(session()),
        &mut sink,
        &mut analyzer,
        &RunParams::default(),
        Arc::new(AtomicBool::new(true)),
    )
    .unwrap();
    assert_eq!(summary.stop, StopReason::Shutdown);
    assert_eq!(summary.samples + summary.door_events, 0);
}

/// Counts every event the reader thread pulled from the wrapped source.
struct CountingSource {
    inner: VecSource,
    read: Arc<AtomicU64>,
}

impl EventSource for CountingSource {
    fn next_event(
        &mut self,
    ) -> Result<Option<InboundEvent>, Box<dyn std::error::Error + Send + Sync>> {
        let ev = self.inner.next_event()?;
        if ev.is_some() {
            self.read.fetch_add(1, Ordering::SeqCst);
        }
        Ok(ev)
    }
}

#[test]
fn shutdown_accounts_for_every_event_read() {
    let mut analyzer = FridgeAnalyzer::builder().try_build().unwrap();
    let mut sink = RecordingSink::default();
    let read = Arc::new(AtomicU64::new(0));
    let source = CountingSource {
        inner: VecSource::new(session()),
        read: read.clone(),
    };
    let params = RunParams {
        flush: FlushCfg {
            max_per_flush: 16,
            interval_ms: 200,
        },
        ..RunParams::default()
    };

    let summary = run(
        source,
        &mut sink,
        &mut analyzer,
        &params,
        Arc::new(AtomicBool::new(true)),
    )
    .unwrap();

    assert_eq!(summary.stop, StopReason::Shutdown);
    assert_eq!(summary.samples + summary.door_events, 0);
    // Nothing read from the source vanishes without being counted.
    assert_eq!(summary.dropped_on_shutdown, read.load(Ordering::SeqCst));
}

#[test]
fn sink_failure_is_reported_and_events_kept() {
    let mut analyzer = FridgeAnalyzer::builder().try_build().unwrap();
    let err = run(
        VecSource::new(session()),
        &mut DeadSink,
        &mut analyzer,
        &RunParams::default(),
        no_shutdown(),
    )
    .expect_err("sink refuses");
    assert!(matches!(err, FridgeError::Sink(_)));
    assert_eq!(analyzer.pending(), 1);
    assert_eq!(
        analyzer.pending_events().next(),
        Some(&OutboundEvent::ItemsRemoved(1))
    );
}
