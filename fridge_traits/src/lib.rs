pub mod event;

pub use event::{DoorState, InboundEvent, OutboundEvent};

/// Inbound port: yields sensor events in the order they were observed.
///
/// `Ok(None)` means the stream has ended (clean disconnect / EOF).
pub trait EventSource {
    fn next_event(&mut self)
    -> Result<Option<InboundEvent>, Box<dyn std::error::Error + Send + Sync>>;
}

/// Outbound port: accepts derived item-count events.
pub trait EventSink {
    fn emit(&mut self, event: &OutboundEvent)
    -> Result<(), Box<dyn std::error::Error + Send + Sync>>;

    /// Publish host liveness. Sinks without a presence channel ignore it.
    fn presence(&mut self, _online: bool) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        Ok(())
    }
}

impl<T: EventSource + ?Sized> EventSource for Box<T> {
    fn next_event(
        &mut self,
    ) -> Result<Option<InboundEvent>, Box<dyn std::error::Error + Send + Sync>> {
        (**self).next_event()
    }
}

impl<T: EventSink + ?Sized> EventSink for Box<T> {
    fn emit(
        &mut self,
        event: &OutboundEvent,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        (**self).emit(event)
    }

    fn presence(&mut self, online: bool) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        (**self).presence(online)
    }
}

/// Collecting sink, handy for tests and the self-check.
impl EventSink for Vec<OutboundEvent> {
    fn emit(
        &mut self,
        event: &OutboundEvent,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.push(*event);
        Ok(())
    }
}
