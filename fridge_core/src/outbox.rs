//! FIFO of derived events waiting for the outbound sink.

use std::collections::VecDeque;

use fridge_traits::{EventSink, OutboundEvent};

use crate::error::FridgeError;

#[derive(Debug, Default, Clone)]
pub struct Outbox {
    queue: VecDeque<OutboundEvent>,
}

impl Outbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: OutboundEvent) {
        self.queue.push_back(event);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Pending events, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &OutboundEvent> {
        self.queue.iter()
    }

    /// Deliver up to `max` events oldest-first. An event leaves the queue only
    /// after the sink accepted it, so a failing sink loses nothing.
    pub fn flush_to<K: EventSink + ?Sized>(
        &mut self,
        sink: &mut K,
        max: usize,
    ) -> Result<usize, FridgeError> {
        let mut delivered = 0;
        while delivered < max {
            let Some(event) = self.queue.front() else {
                break;
            };
            sink.emit(event)
                .map_err(|e| FridgeError::Sink(e.to_string()))?;
            tracing::debug!(?event, "delivered");
            self.queue.pop_front();
            delivered += 1;
        }
        Ok(delivered)
    }
}
