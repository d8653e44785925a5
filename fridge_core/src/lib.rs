#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! Item-count inference for a weighed fridge (transport-agnostic).
//!
//! All I/O goes through `fridge_traits::EventSource` and
//! `fridge_traits::EventSink`; nothing in this crate touches a socket.
//!
//! ## Architecture
//!
//! - **Stability**: sliding-window stdev gate over raw samples (`stability`)
//! - **Quantization**: weight delta → whole items with tolerance (`quantize`)
//! - **Machine**: five-state door-cycle lifecycle (`machine`)
//! - **Outbox**: FIFO of derived events awaiting delivery (`outbox`)
//! - **Analyzer**: the three wired together, one per fridge (`analyzer`)
//! - **Runner**: reader thread + ingest/flush loop (`pump`, `runner`)
//!
//! ## Units
//!
//! Weights are `f64` kilograms throughout, matching the item weight.

pub mod analyzer;
pub mod builder;
pub mod config;
pub mod conversions;
pub mod error;
pub mod machine;
pub mod mocks;
pub mod outbox;
pub mod pump;
pub mod quantize;
pub mod runner;
pub mod stability;

pub use analyzer::{FridgeAnalyzer, Ingested};
pub use builder::FridgeAnalyzerBuilder;
pub use config::{FilterCfg, FlushCfg, ItemCfg};
pub use error::{BuildError, FridgeError, Result};
pub use machine::{FridgeMachine, FridgeState, Input};
pub use outbox::Outbox;
pub use quantize::{ItemChange, quantize};
pub use runner::{RunParams, RunSummary, StopReason, run};
pub use stability::StabilityFilter;

pub use fridge_traits::{DoorState, EventSink, EventSource, InboundEvent, OutboundEvent};
