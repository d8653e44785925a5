//! Topic/payload vocabulary of the fridge bus.
//!
//! Inbound: raw samples are decimal floats, door edges are configurable words
//! (`OPEN` / `CLOSE` by default). Outbound: item counts are decimal integers,
//! presence is `true` / `false`.

use fridge_traits::{DoorState, InboundEvent, OutboundEvent};
use serde::Serialize;

use crate::error::{Result, TransportError};

/// One bus message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    pub topic: String,
    pub payload: String,
}

#[derive(Debug, Clone)]
pub struct TopicCodec {
    raw_samples: String,
    door: String,
    items_out: String,
    items_in: String,
    online: String,
    door_open: String,
    door_close: String,
}

impl Default for TopicCodec {
    fn default() -> Self {
        Self::from_config(&fridge_config::Config::default())
    }
}

impl TopicCodec {
    pub fn from_config(cfg: &fridge_config::Config) -> Self {
        Self {
            raw_samples: cfg.topics.raw_samples.clone(),
            door: cfg.topics.door.clone(),
            items_out: cfg.topics.items_out.clone(),
            items_in: cfg.topics.items_in.clone(),
            online: cfg.topics.online.clone(),
            door_open: cfg.door.open.trim().to_string(),
            door_close: cfg.door.close.trim().to_string(),
        }
    }

    /// Decode one inbound message.
    ///
    /// `Ok(None)` for topics this codec does not consume (including our own
    /// outbound topics when the bus echoes them back).
    pub fn decode(&self, topic: &str, payload: &str) -> Result<Option<InboundEvent>> {
        let payload = payload.trim();
        if topic == self.raw_samples {
            let kg: f64 = payload.parse().map_err(|_| self.malformed(topic, payload, "not a number"))?;
            if !kg.is_finite() {
                return Err(self.malformed(topic, payload, "not finite"));
            }
            Ok(Some(InboundEvent::RawWeight(kg)))
        } else if topic == self.door {
            if payload == self.door_open {
                Ok(Some(InboundEvent::Door(DoorState::Open)))
            } else if payload == self.door_close {
                Ok(Some(InboundEvent::Door(DoorState::Closed)))
            } else {
                Err(self.malformed(topic, payload, "unknown door state"))
            }
        } else {
            Ok(None)
        }
    }

    pub fn encode(&self, event: &OutboundEvent) -> Message {
        let topic = match event {
            OutboundEvent::ItemsRemoved(_) => &self.items_out,
            OutboundEvent::ItemsAdded(_) => &self.items_in,
        };
        Message {
            topic: topic.clone(),
            payload: event.count().to_string(),
        }
    }

    pub fn presence(&self, online: bool) -> Message {
        Message {
            topic: self.online.clone(),
            payload: online.to_string(),
        }
    }

    /// Encode an inbound event, used when recording or simulating sessions.
    pub fn encode_inbound(&self, event: &InboundEvent) -> Message {
        match event {
            InboundEvent::RawWeight(kg) => Message {
                topic: self.raw_samples.clone(),
                payload: format!("{kg:.3}"),
            },
            InboundEvent::Door(DoorState::Open) => Message {
                topic: self.door.clone(),
                payload: self.door_open.clone(),
            },
            InboundEvent::Door(DoorState::Closed) => Message {
                topic: self.door.clone(),
                payload: self.door_close.clone(),
            },
        }
    }

    fn malformed(&self, topic: &str, payload: &str, why: &str) -> TransportError {
        TransportError::Malformed {
            topic: topic.to_string(),
            reason: format!("{why}: {payload:?}"),
        }
    }
}

/// Split a `<topic> <payload>` line. Blank lines and `#` comments yield `None`.
pub fn split_line(line: &str) -> Option<Result<(&str, &str)>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }
    Some(
        line.split_once(char::is_whitespace)
            .map(|(t, p)| (t, p.trim()))
            .filter(|(_, p)| !p.is_empty())
            .ok_or_else(|| TransportError::BadLine(line.to_string())),
    )
}
