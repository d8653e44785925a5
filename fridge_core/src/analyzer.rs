//! `FridgeAnalyzer`: stability filter and door-cycle machine wired together.
//!
//! One analyzer owns all mutable inference state for one fridge. Feed it
//! inbound events in observation order via [`FridgeAnalyzer::ingest`] and drain
//! derived events with [`FridgeAnalyzer::flush`].

use fridge_traits::{DoorState, EventSink, InboundEvent, OutboundEvent};

use crate::builder::FridgeAnalyzerBuilder;
use crate::config::{FilterCfg, ItemCfg};
use crate::error::{FridgeError, Result};
use crate::machine::{FridgeMachine, FridgeState, Input};
use crate::quantize::ItemChange;
use crate::stability::StabilityFilter;

/// What a single ingested event caused.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Ingested {
    /// Stable weight produced by the filter for this sample, if any.
    pub stable: Option<f64>,
    /// Event queued because this input completed a door cycle.
    pub queued: Option<OutboundEvent>,
    /// The sample was rejected before reaching the window.
    pub rejected: bool,
}

#[derive(Debug, Clone)]
pub struct FridgeAnalyzer {
    filter: StabilityFilter,
    machine: FridgeMachine,
}

impl FridgeAnalyzer {
    pub fn builder() -> FridgeAnalyzerBuilder {
        FridgeAnalyzerBuilder::default()
    }

    pub fn new(filter: FilterCfg, items: ItemCfg) -> Result<Self> {
        Ok(Self {
            filter: StabilityFilter::new(filter)?,
            machine: FridgeMachine::new(items)?,
        })
    }

    /// Apply one inbound event.
    pub fn ingest(&mut self, event: InboundEvent) -> Ingested {
        match event {
            InboundEvent::RawWeight(kg) => self.observe_weight(kg),
            InboundEvent::Door(door) => {
                self.door(door);
                Ingested::default()
            }
        }
    }

    /// Feed a raw sample through the filter and, when stable, into the machine.
    pub fn observe_weight(&mut self, kg: f64) -> Ingested {
        if !kg.is_finite() {
            return Ingested {
                rejected: true,
                ..Ingested::default()
            };
        }
        let Some(stable) = self.filter.observe(kg) else {
            return Ingested::default();
        };
        let change = self.machine.handle(Input::Stable(stable));
        Ingested {
            stable: Some(stable),
            queued: change.event(),
            rejected: false,
        }
    }

    pub fn door(&mut self, door: DoorState) {
        tracing::debug!(%door, "door");
        self.machine.handle(Input::Door(door));
    }

    /// Push an already-stable weight straight into the machine.
    pub fn stable_weight(&mut self, kg: f64) -> ItemChange {
        self.machine.handle(Input::Stable(kg))
    }

    /// Deliver at most `max` pending events to `sink`, oldest first.
    pub fn flush<K: EventSink + ?Sized>(
        &mut self,
        sink: &mut K,
        max: usize,
    ) -> std::result::Result<usize, FridgeError> {
        self.machine.outbox_mut().flush_to(sink, max)
    }

    /// Deliver everything pending.
    pub fn flush_all<K: EventSink + ?Sized>(
        &mut self,
        sink: &mut K,
    ) -> std::result::Result<usize, FridgeError> {
        let n = self.pending();
        self.flush(sink, n)
    }

    #[inline]
    pub fn pending(&self) -> usize {
        self.machine.outbox().len()
    }

    pub fn pending_events(&self) -> impl Iterator<Item = &OutboundEvent> {
        self.machine.outbox().iter()
    }

    #[inline]
    pub fn state(&self) -> FridgeState {
        self.machine.state()
    }

    pub fn current_weight(&self) -> Option<f64> {
        self.machine.current_weight()
    }

    pub fn filter(&self) -> &StabilityFilter {
        &self.filter
    }

    pub fn machine(&self) -> &FridgeMachine {
        &self.machine
    }
}
