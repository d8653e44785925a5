use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed payload on {topic}: {reason}")]
    Malformed { topic: String, reason: String },
    #[error("malformed line: {0:?}")]
    BadLine(String),
    #[error("replay csv: {0}")]
    Csv(String),
    #[error("encode: {0}")]
    Encode(String),
}

pub type Result<T> = std::result::Result<T, TransportError>;
