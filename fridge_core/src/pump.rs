//! Background event pump.
//!
//! Spawns a thread that owns the `EventSource` and forwards every event, in
//! order, over a bounded channel. The consumer side is the only place that
//! touches analyzer state, so arrival order is preserved end to end.
//!
//! The channel is bounded and `send` blocks: a slow consumer back-pressures the
//! reader instead of dropping events.
use crossbeam_channel as xch;
use fridge_traits::{EventSource, InboundEvent};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

/// Default channel depth between the reader thread and the consumer.
pub const DEFAULT_CAPACITY: usize = 256;

#[derive(Debug, Clone, PartialEq)]
pub enum PumpMsg {
    Event(InboundEvent),
    /// The source failed; the pump thread has exited.
    Failed(String),
}

pub struct Pump {
    rx: xch::Receiver<PumpMsg>,
    forwarded: Arc<AtomicU64>,
    shutdown: Arc<AtomicBool>,
    join_handle: Option<std::thread::JoinHandle<()>>,
}

impl Pump {
    pub fn spawn<S: EventSource + Send + 'static>(mut source: S, capacity: usize) -> Self {
        let (tx, rx) = xch::bounded(capacity.max(1));
        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_clone = shutdown.clone();
        let forwarded = Arc::new(AtomicU64::new(0));
        let forwarded_clone = forwarded.clone();

        let join_handle = std::thread::spawn(move || {
            loop {
                if shutdown_clone.load(Ordering::Relaxed) {
                    tracing::debug!("pump thread received shutdown signal");
                    break;
                }

                match source.next_event() {
                    Ok(Some(ev)) => {
                        // consumer gone
                        if tx.send(PumpMsg::Event(ev)).is_err() {
                            tracing::debug!("pump consumer disconnected, exiting thread");
                            break;
                        }
                        forwarded_clone.fetch_add(1, Ordering::Relaxed);
                    }
                    Ok(None) => {
                        tracing::debug!("event source reached end of stream");
                        break;
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "event source failed");
                        let _ = tx.send(PumpMsg::Failed(e.to_string()));
                        break;
                    }
                }
            }
            tracing::trace!("pump thread exiting cleanly");
        });

        Self {
            rx,
            forwarded,
            shutdown,
            join_handle: Some(join_handle),
        }
    }

    /// Wait up to `timeout` for the next message.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<PumpMsg, xch::RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }

    /// Non-blocking receive.
    pub fn try_recv(&self) -> Result<PumpMsg, xch::TryRecvError> {
        self.rx.try_recv()
    }

    /// Ask the reader thread to stop once its current read returns.
    pub fn stop(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }

    /// Stop the reader and discard what it already forwarded, returning how
    /// many events were discarded. Waits at most `grace` per message, so a
    /// reader blocked in `next_event()` does not hold this up.
    pub fn stop_and_drain(&self, grace: Duration) -> u64 {
        self.stop();
        let mut discarded = 0;
        loop {
            match self.rx.recv_timeout(grace) {
                Ok(PumpMsg::Event(_)) => discarded += 1,
                Ok(PumpMsg::Failed(_)) => break,
                Err(xch::RecvTimeoutError::Timeout | xch::RecvTimeoutError::Disconnected) => break,
            }
        }
        discarded
    }

    /// Events forwarded by the reader thread so far.
    pub fn forwarded(&self) -> u64 {
        self.forwarded.load(Ordering::Relaxed)
    }
}

impl Drop for Pump {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::Relaxed);

        // Drain so a reader blocked in send() can observe the closed channel.
        while self.rx.try_recv().is_ok() {}

        if let Some(handle) = self.join_handle.take() {
            if !handle.is_finished() {
                // Blocked inside next_event() (e.g. stdin); it exits on its own
                // once the read returns and send() fails.
                tracing::debug!("pump thread still reading; detaching");
                return;
            }
            match handle.join() {
                Ok(()) => tracing::trace!("pump thread joined successfully"),
                Err(e) => tracing::warn!(?e, "pump thread panicked during shutdown"),
            }
        }
    }
}
