use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub enum FridgeError {
    #[error("configuration error: {0}")]
    Config(String),
    #[error("event source error: {0}")]
    Source(String),
    #[error("event sink error: {0}")]
    Sink(String),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BuildError {
    #[error("invalid config: {0}")]
    InvalidConfig(&'static str),
}

pub type Result<T> = eyre::Result<T>;
pub use eyre::Report;
