//! Transport errors

use std::io;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Not connected")]
    NotConnected,

    #[error("Connection timeout")]
    ConnectionTimeout,

    #[error("Send failed: {0}")]
    Send(io::Error),

    #[error("Receive timeout")]
    ReceiveTimeout,

    #[error("Connection closed by remote")]
    ConnectionClosed,

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),
}

impl Error {
    /// Check if the session survived the failure
    ///
    /// A receive timeout leaves the connection open; every other
    /// transport failure drops it.
    pub fn connection_survives(&self) -> bool {
        matches!(self, Self::ReceiveTimeout)
    }
}
