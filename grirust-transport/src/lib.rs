//! Transport layer for the GRI client
//!
//! Provides the TCP session that request/response exchanges run over.

pub mod error;
pub mod tcp;

pub use error::{Error, Result};
pub use tcp::TcpTransport;

use async_trait::async_trait;
use bytes::BytesMut;

/// Byte-stream session driven by the protocol client
///
/// A session carries at most one exchange at a time; `exchange` takes
/// `&mut self`, so requests can never interleave on one session.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Open the connection; a no-op when already connected
    async fn connect(&mut self) -> Result<()>;

    /// Best-effort orderly shutdown; idempotent, always clears the
    /// connection state
    async fn disconnect(&mut self);

    /// Check if connected
    fn is_connected(&self) -> bool;

    /// Write the full request, then read exactly `expected` response
    /// bytes within the session deadline
    async fn exchange(&mut self, request: &[u8], expected: usize) -> Result<BytesMut>;

    /// Get remote address
    fn remote_addr(&self) -> String;
}
