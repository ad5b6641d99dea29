//! Error types for grirust-core

/// Result type alias for protocol operations
pub type Result<T> = std::result::Result<T, Error>;

/// Decode and vocabulary errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Response buffer is not the exact protocol size
    #[error("Response length mismatch: expected {expected} bytes, got {actual} bytes")]
    ResponseLengthMismatch {
        expected: usize,
        actual: usize,
    },

    /// Response magic does not match the protocol magic
    #[error("Bad response magic: 0x{received:08X}")]
    BadMagic {
        received: u32,
    },

    /// Length field inside the response header is wrong
    #[error("Response header declares wrong length: {declared}")]
    DeclaredLengthMismatch {
        declared: u8,
    },

    /// Unknown action code
    #[error("Unknown action code: {0}")]
    UnknownAction(u8),

    /// Unknown job status code
    #[error("Unknown job status code: {0}")]
    UnknownJobStatus(i32),

    /// Unknown error/warning code
    #[error("Unknown error code: {0}")]
    UnknownErrorCode(i16),
}
