//! Event vocabulary shared by the core and its adapters.

use std::fmt;

/// Door edge as reported by the door sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DoorState {
    Open,
    Closed,
}

impl fmt::Display for DoorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DoorState::Open => f.write_str("open"),
            DoorState::Closed => f.write_str("closed"),
        }
    }
}

/// One message arriving from the sensor side, in observation order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InboundEvent {
    /// Raw load-cell reading in kilograms.
    RawWeight(f64),
    Door(DoorState),
}

/// One derived count handed to the outbound sink. Counts are always >= 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutboundEvent {
    ItemsRemoved(u32),
    ItemsAdded(u32),
}

impl OutboundEvent {
    /// Number of items carried by this event.
    #[inline]
    pub fn count(&self) -> u32 {
        match *self {
            OutboundEvent::ItemsRemoved(n) | OutboundEvent::ItemsAdded(n) => n,
        }
    }
}
