//! Scripted fridge simulator.
//!
//! Builds a plausible session (door edges, hand-on-shelf jitter, settled
//! plateaus with small sensor noise) and replays it as an `EventSource`.
//! Deterministic for a given seed.

use std::collections::VecDeque;

use fridge_traits::{DoorState, EventSource, InboundEvent};

#[derive(Debug, Clone)]
pub struct SimulatedFridge {
    events: VecDeque<InboundEvent>,
    level_kg: f64,
    item_kg: f64,
    noise_kg: f64,
    settle_samples: usize,
    rng: u32,
}

impl SimulatedFridge {
    /// `noise_kg` is the half-width of the uniform sensor noise on plateaus.
    pub fn new(start_kg: f64, item_kg: f64, noise_kg: f64, seed: u32) -> Self {
        Self {
            events: VecDeque::new(),
            level_kg: start_kg,
            item_kg,
            noise_kg: noise_kg.abs(),
            settle_samples: 12,
            rng: seed.max(1),
        }
    }

    /// Samples emitted per plateau; must exceed the analyzer's window size.
    pub fn with_settle_samples(mut self, n: usize) -> Self {
        self.settle_samples = n.max(1);
        self
    }

    /// Close the door and let the shelf settle at the current level.
    pub fn power_on(mut self) -> Self {
        self.events.push_back(InboundEvent::Door(DoorState::Closed));
        self.plateau();
        self
    }

    /// One door cycle in which `n` items are taken out.
    pub fn take(self, n: u32) -> Self {
        let change = -f64::from(n) * self.item_kg;
        self.cycle(change)
    }

    /// One door cycle in which `n` items are put in.
    pub fn put(self, n: u32) -> Self {
        let change = f64::from(n) * self.item_kg;
        self.cycle(change)
    }

    /// One door cycle with an arbitrary net change (kg).
    pub fn cycle(mut self, change_kg: f64) -> Self {
        self.events.push_back(InboundEvent::Door(DoorState::Open));
        for _ in 0..6 {
            let jolt = (self.next_unit() * 2.0 - 1.0) * 0.6;
            self.events
                .push_back(InboundEvent::RawWeight(self.level_kg + jolt));
        }
        self.events.push_back(InboundEvent::Door(DoorState::Closed));
        self.level_kg += change_kg;
        self.plateau();
        self
    }

    /// Slow drift while the door stays shut.
    pub fn drift(mut self, change_kg: f64) -> Self {
        self.level_kg += change_kg;
        self.plateau();
        self
    }

    pub fn level_kg(&self) -> f64 {
        self.level_kg
    }

    pub fn remaining(&self) -> usize {
        self.events.len()
    }

    fn plateau(&mut self) {
        for _ in 0..self.settle_samples {
            let noise = (self.next_unit() * 2.0 - 1.0) * self.noise_kg;
            self.events
                .push_back(InboundEvent::RawWeight(self.level_kg + noise));
        }
    }

    // xorshift32
    fn next_unit(&mut self) -> f64 {
        let mut x = self.rng;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.rng = x;
        f64::from(x) / (f64::from(u32::MAX) + 1.0)
    }
}

impl EventSource for SimulatedFridge {
    fn next_event(
        &mut self,
    ) -> Result<Option<InboundEvent>, Box<dyn std::error::Error + Send + Sync>> {
        Ok(self.events.pop_front())
    }
}
