//! Boundary adapters between the fridge bus and `fridge_traits` ports.
//!
//! - `codec`: topic/payload vocabulary, boundary validation of payloads
//! - `line`: `<topic> <payload>` line source and sink (stdin/stdout pipes)
//! - `replay`: recorded sessions from CSV
//! - `sim`: deterministic scripted fridge for demos and self-checks
pub mod codec;
pub mod error;
pub mod line;
pub mod replay;
pub mod sim;

pub use codec::{Message, TopicCodec};
pub use error::TransportError;
pub use line::{LineFormat, LineSink, LineSource};
pub use replay::CsvReplaySource;
pub use sim::SimulatedFridge;
