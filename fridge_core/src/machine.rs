//! Door-cycle state machine.
//!
//! A weight delta is only trusted when it straddles exactly one open→close
//! cycle: the baseline is the last stable weight before the door opened and
//! the settled weight is the first stable reading after it closed again.
//! Stable readings while the door stays shut only move the baseline.
//!
//! ```text
//!            Close              Stable
//!   Start ─────────▶ InitWeight ───────▶ ClosedStable ◀──┐ Stable (re-baseline)
//!     ▲                  │ Open              │ Open      │
//!     └──────────────────┘                   ▼           │
//!                                         Opened         │
//!                                            │ Close     │ Stable (quantize)
//!                                            ▼           │
//!                                     ClosedUnstable ────┘
//! ```

use fridge_traits::{DoorState, OutboundEvent};

use crate::config::ItemCfg;
use crate::error::Result;
use crate::outbox::Outbox;
use crate::quantize::{ItemChange, quantize, residual};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FridgeState {
    /// No trusted baseline; waiting for the door to close.
    Start,
    /// Door closed, waiting for the first stable reading.
    InitWeight,
    /// Baseline known, door closed.
    ClosedStable,
    /// Door open; readings are ignored.
    Opened,
    /// Door closed again, waiting for the shelf to settle.
    ClosedUnstable,
}

/// Inputs the machine reacts to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Input {
    Door(DoorState),
    /// Stable weight (kg) reported by the stability filter.
    Stable(f64),
}

#[derive(Debug, Clone)]
pub struct FridgeMachine {
    state: FridgeState,
    /// Last settled weight; `None` until the first stable reading in `InitWeight`.
    current_weight: Option<f64>,
    items: ItemCfg,
    outbox: Outbox,
}

impl FridgeMachine {
    pub fn new(items: ItemCfg) -> Result<Self> {
        items.validate().map_err(eyre::Report::new)?;
        Ok(Self {
            state: FridgeState::Start,
            current_weight: None,
            items,
            outbox: Outbox::new(),
        })
    }

    #[inline]
    pub fn state(&self) -> FridgeState {
        self.state
    }

    /// Last settled weight, `None` until a baseline has been established.
    pub fn current_weight(&self) -> Option<f64> {
        self.current_weight
    }

    pub fn items(&self) -> &ItemCfg {
        &self.items
    }

    pub fn outbox(&self) -> &Outbox {
        &self.outbox
    }

    pub fn outbox_mut(&mut self) -> &mut Outbox {
        &mut self.outbox
    }

    pub fn on_door(&mut self, door: DoorState) {
        self.handle(Input::Door(door));
    }

    pub fn on_stable(&mut self, weight: f64) -> ItemChange {
        self.handle(Input::Stable(weight))
    }

    /// Apply one input. Returns the quantized change when the input completed
    /// a door cycle; the corresponding event is already queued in the outbox.
    pub fn handle(&mut self, input: Input) -> ItemChange {
        use DoorState::{Closed, Open};
        use FridgeState::*;

        if let Input::Stable(w) = input
            && !w.is_finite()
        {
            tracing::debug!(weight = w, "non-finite stable weight ignored");
            return ItemChange::None;
        }

        let mut change = ItemChange::None;
        let next = match (self.state, input) {
            (Start, Input::Door(Closed)) => InitWeight,
            (Start, Input::Door(Open) | Input::Stable(_)) => Start,

            (InitWeight, Input::Door(Open)) => Start,
            (InitWeight, Input::Door(Closed)) => InitWeight,
            (InitWeight, Input::Stable(w)) => {
                tracing::info!(weight = w, "initializing fridge weight");
                self.current_weight = Some(w);
                ClosedStable
            }

            (ClosedStable, Input::Door(Open)) => Opened,
            (ClosedStable, Input::Door(Closed)) => ClosedStable,
            (ClosedStable, Input::Stable(w)) => {
                tracing::debug!(from = ?self.current_weight, to = w, "re-baseline");
                self.current_weight = Some(w);
                ClosedStable
            }

            (Opened, Input::Door(Closed)) => ClosedUnstable,
            (Opened, Input::Door(Open) | Input::Stable(_)) => Opened,

            (ClosedUnstable, Input::Door(_)) => ClosedUnstable,
            (ClosedUnstable, Input::Stable(w)) => {
                change = self.settle(w);
                ClosedStable
            }
        };

        if next != self.state {
            tracing::debug!(from = ?self.state, to = ?next, "state transition");
            self.state = next;
        }
        change
    }

    fn settle(&mut self, settled: f64) -> ItemChange {
        let Some(baseline) = self.current_weight else {
            // ClosedUnstable is only reachable through ClosedStable
            self.current_weight = Some(settled);
            return ItemChange::None;
        };
        let change = quantize(baseline, settled, &self.items);
        match change.event() {
            Some(event) => {
                match event {
                    OutboundEvent::ItemsRemoved(n) => tracing::info!(count = n, "items removed"),
                    OutboundEvent::ItemsAdded(n) => tracing::info!(count = n, "items added"),
                }
                self.outbox.push(event);
            }
            None => {
                let delta = baseline - settled;
                tracing::info!(
                    delta,
                    residual = residual(delta.abs(), &self.items),
                    "door cycle did not quantize to whole items"
                );
            }
        }
        self.current_weight = Some(settled);
        change
    }
}
