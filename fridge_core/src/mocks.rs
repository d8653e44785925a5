//! Test and helper mocks for fridge_core

use std::collections::VecDeque;

use fridge_traits::{EventSource, InboundEvent};

/// Replays a fixed list of events, then reports end of stream.
#[derive(Debug, Default, Clone)]
pub struct VecSource {
    events: VecDeque<InboundEvent>,
}

impl VecSource {
    pub fn new(events: impl IntoIterator<Item = InboundEvent>) -> Self {
        Self {
            events: events.into_iter().collect(),
        }
    }
}

impl EventSource for VecSource {
    fn next_event(
        &mut self,
    ) -> Result<Option<InboundEvent>, Box<dyn std::error::Error + Send + Sync>> {
        Ok(self.events.pop_front())
    }
}

/// Yields its events, then fails instead of ending cleanly.
#[derive(Debug, Default, Clone)]
pub struct FailingSource {
    inner: VecSource,
}

impl FailingSource {
    pub fn after(events: impl IntoIterator<Item = InboundEvent>) -> Self {
        Self {
            inner: VecSource::new(events),
        }
    }
}

impl EventSource for FailingSource {
    fn next_event(
        &mut self,
    ) -> Result<Option<InboundEvent>, Box<dyn std::error::Error + Send + Sync>> {
        match self.inner.next_event()? {
            Some(ev) => Ok(Some(ev)),
            None => Err(Box::new(std::io::Error::other("connection reset"))),
        }
    }
}

/// Build `n` identical raw samples; enough of them settle the window.
pub fn steady(kg: f64, n: usize) -> impl Iterator<Item = InboundEvent> {
    std::iter::repeat_n(InboundEvent::RawWeight(kg), n)
}
