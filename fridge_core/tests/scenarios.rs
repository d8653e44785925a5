use fridge_core::mocks::steady;
use fridge_core::{
    DoorState, FridgeAnalyzer, FridgeState, InboundEvent, ItemChange, OutboundEvent,
};

fn analyzer() -> FridgeAnalyzer {
    FridgeAnalyzer::builder().try_build().expect("default analyzer")
}

fn feed(a: &mut FridgeAnalyzer, events: impl IntoIterator<Item = InboundEvent>) {
    for ev in events {
        a.ingest(ev);
    }
}

fn close() -> InboundEvent {
    InboundEvent::Door(DoorState::Closed)
}

fn open() -> InboundEvent {
    InboundEvent::Door(DoorState::Open)
}

#[test]
fn one_bottle_taken_in_one_cycle() {
    let mut a = analyzer();
    a.door(DoorState::Closed);
    assert_eq!(a.state(), FridgeState::InitWeight);
    a.stable_weight(10.0);
    assert_eq!(a.state(), FridgeState::ClosedStable);
    assert_eq!(a.current_weight(), Some(10.0));
    a.door(DoorState::Open);
    assert_eq!(a.state(), FridgeState::Opened);
    a.door(DoorState::Closed);
    assert_eq!(a.state(), FridgeState::ClosedUnstable);

    assert_eq!(a.stable_weight(9.12), ItemChange::Removed(1));
    assert_eq!(a.state(), FridgeState::ClosedStable);
    assert_eq!(a.current_weight(), Some(9.12));

    let mut sink = Vec::new();
    assert_eq!(a.flush_all(&mut sink).unwrap(), 1);
    assert_eq!(sink, vec![OutboundEvent::ItemsRemoved(1)]);
}

#[test]
fn drift_while_closed_rebaselines_silently() {
    let mut a = analyzer();
    a.door(DoorState::Closed);
    a.stable_weight(10.0);
    assert_eq!(a.stable_weight(10.05), ItemChange::None);
    assert_eq!(a.state(), FridgeState::ClosedStable);
    assert_eq!(a.current_weight(), Some(10.05));
    assert_eq!(a.pending(), 0);
}

#[test]
fn open_during_init_aborts_and_requires_fresh_close() {
    let mut a = analyzer();
    a.door(DoorState::Closed);
    a.door(DoorState::Open);
    assert_eq!(a.state(), FridgeState::Start);
    assert_eq!(a.current_weight(), None);

    // still in Start: stable readings are ignored
    a.stable_weight(7.0);
    assert_eq!(a.current_weight(), None);

    a.door(DoorState::Closed);
    assert_eq!(a.state(), FridgeState::InitWeight);
    a.stable_weight(8.0);
    assert_eq!(a.current_weight(), Some(8.0));
}

#[test]
fn raw_stream_drives_full_cycle() {
    let mut a = analyzer();
    feed(&mut a, [close()]);
    feed(&mut a, steady(10.0, 4));
    assert_eq!(a.current_weight(), Some(10.0));

    feed(&mut a, [open()]);
    // hand in the shelf: noisy readings
    feed(
        &mut a,
        [9.6, 10.4, 9.1, 9.5].map(InboundEvent::RawWeight),
    );
    feed(&mut a, [close()]);
    feed(&mut a, steady(11.76, 4));

    assert_eq!(a.pending(), 1);
    assert_eq!(
        a.pending_events().copied().collect::<Vec<_>>(),
        vec![OutboundEvent::ItemsAdded(2)]
    );
}

#[test]
fn two_cycles_flush_in_completion_order() {
    let mut a = analyzer();
    a.door(DoorState::Closed);
    a.stable_weight(10.0);

    a.door(DoorState::Open);
    a.door(DoorState::Closed);
    a.stable_weight(9.12);

    a.door(DoorState::Open);
    a.door(DoorState::Closed);
    a.stable_weight(10.88);

    a.door(DoorState::Open);
    a.door(DoorState::Closed);
    a.stable_weight(8.24);

    let mut sink = Vec::new();
    a.flush_all(&mut sink).unwrap();
    assert_eq!(
        sink,
        vec![
            OutboundEvent::ItemsRemoved(1),
            OutboundEvent::ItemsAdded(2),
            OutboundEvent::ItemsRemoved(3),
        ]
    );
}

#[test]
fn independent_analyzers_do_not_share_state() {
    let mut a = analyzer();
    let b = analyzer();
    a.door(DoorState::Closed);
    a.stable_weight(5.0);
    assert_eq!(a.state(), FridgeState::ClosedStable);
    assert_eq!(b.state(), FridgeState::Start);
    assert_eq!(b.current_weight(), None);
}

#[test]
fn non_finite_samples_are_rejected() {
    let mut a = analyzer();
    let r = a.ingest(InboundEvent::RawWeight(f64::NAN));
    assert!(r.rejected);
    assert!(a.filter().is_empty());
}
