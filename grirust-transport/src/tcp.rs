//! TCP transport

use std::net::SocketAddr;
use std::time::Duration;

use async_trait::async_trait;
use bytes::{BufMut, BytesMut};
use socket2::{SockRef, TcpKeepalive};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::{timeout, Instant};
use tracing::{debug, trace, warn};

use crate::{error::*, Transport};

/// TCP session to a GRI server
///
/// Owns the single stream all exchanges for this session run over.
pub struct TcpTransport {
    addr: String,
    port: u16,
    socket_addr: Option<SocketAddr>,
    stream: Option<TcpStream>,
    connect_timeout: Duration,
    io_timeout: Duration,
}

impl TcpTransport {
    /// Create new TCP transport
    pub fn new(addr: impl Into<String>, port: u16) -> Self {
        Self {
            addr: addr.into(),
            port,
            socket_addr: None,
            stream: None,
            connect_timeout: Duration::from_secs(5),
            io_timeout: Duration::from_secs(5),
        }
    }

    /// Set connection timeout
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set the deadline applied to each exchange
    pub fn with_io_timeout(mut self, timeout: Duration) -> Self {
        self.io_timeout = timeout;
        self
    }

    /// Resolve address to SocketAddr
    async fn resolve_addr(&mut self) -> Result<SocketAddr> {
        if let Some(addr) = self.socket_addr {
            return Ok(addr);
        }

        let addr_str = format!("{}:{}", self.addr, self.port);

        let addrs: Vec<SocketAddr> = tokio::net::lookup_host(&addr_str)
            .await
            .map_err(|e| Error::InvalidAddress(format!("{}: {}", addr_str, e)))?
            .collect();

        let addr = addrs
            .first()
            .ok_or_else(|| Error::InvalidAddress(format!("No addresses found for {}", addr_str)))?;

        self.socket_addr = Some(*addr);
        Ok(*addr)
    }

    fn enable_keepalive(stream: &TcpStream) {
        let keepalive = TcpKeepalive::new()
            .with_time(Duration::from_secs(5))
            .with_interval(Duration::from_secs(5));

        if let Err(e) = SockRef::from(stream).set_tcp_keepalive(&keepalive) {
            warn!("Failed to enable TCP keepalive: {}", e);
        }
    }
}

#[async_trait]
impl Transport for TcpTransport {
    async fn connect(&mut self) -> Result<()> {
        if self.is_connected() {
            debug!("Already connected to {}", self.remote_addr());
            return Ok(());
        }

        let addr = self.resolve_addr().await?;

        debug!("Connecting to {}...", addr);

        let stream = timeout(self.connect_timeout, TcpStream::connect(addr))
            .await
            .map_err(|_| Error::ConnectionTimeout)?
            .map_err(Error::Io)?;

        // Disable Nagle's algorithm for low latency
        stream.set_nodelay(true)?;
        Self::enable_keepalive(&stream);

        debug!("Connected to {}", addr);

        self.stream = Some(stream);
        Ok(())
    }

    async fn disconnect(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            debug!("Disconnecting from {}...", self.remote_addr());

            // Graceful shutdown; the stream may already be broken
            let _ = stream.shutdown().await;
        }

        self.socket_addr = None;
    }

    fn is_connected(&self) -> bool {
        self.stream.is_some()
    }

    async fn exchange(&mut self, request: &[u8], expected: usize) -> Result<BytesMut> {
        // The stream is taken for the duration of the exchange and only
        // put back on success or on a receive timeout. Peer-closed and
        // I/O failures drop it, leaving the session disconnected.
        let mut stream = self.stream.take().ok_or(Error::NotConnected)?;
        let deadline = Instant::now() + self.io_timeout;

        trace!("Sending {} bytes: {}", request.len(), hex::encode(request));

        let sent = async {
            stream.write_all(request).await?;
            stream.flush().await
        }
        .await;
        if let Err(e) = sent {
            warn!("Send failed, dropping connection: {}", e);
            return Err(Error::Send(e));
        }

        let mut buf = BytesMut::with_capacity(expected);
        while buf.len() < expected {
            let Some(remaining) = deadline.checked_duration_since(Instant::now()) else {
                self.stream = Some(stream);
                return Err(Error::ReceiveTimeout);
            };

            // Never read past the message boundary; a burst from the
            // peer must not bleed into the next exchange's buffer.
            let want = expected - buf.len();
            let read = {
                let mut limited = (&mut buf).limit(want);
                timeout(remaining, stream.read_buf(&mut limited)).await
            };
            match read {
                Err(_) => {
                    // The peer may still be computing; keep the session
                    // open and let the caller decide what to do next.
                    self.stream = Some(stream);
                    return Err(Error::ReceiveTimeout);
                }
                Ok(Err(e)) => {
                    warn!("Receive failed, dropping connection: {}", e);
                    return Err(Error::Io(e));
                }
                Ok(Ok(0)) => {
                    warn!("Connection closed by peer during receive");
                    return Err(Error::ConnectionClosed);
                }
                Ok(Ok(n)) => {
                    trace!("Received {} bytes ({}/{})", n, buf.len(), expected);
                }
            }
        }

        trace!("Received {} bytes: {}", buf.len(), hex::encode(&buf));

        self.stream = Some(stream);
        Ok(buf)
    }

    fn remote_addr(&self) -> String {
        self.socket_addr
            .map(|addr| addr.to_string())
            .unwrap_or_else(|| format!("{}:{}", self.addr, self.port))
    }
}

impl Drop for TcpTransport {
    fn drop(&mut self) {
        if self.is_connected() {
            warn!("TCP transport dropped while still connected");
        }
    }
}
