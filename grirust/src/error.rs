//! High-level error types

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The exchange completed but the response did not decode
    #[error("Protocol error: {0}")]
    Protocol(#[from] grirust_core::Error),

    /// The exchange itself failed
    #[error("Transport error: {0}")]
    Transport(#[from] grirust_transport::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] grirust_types::Error),
}
