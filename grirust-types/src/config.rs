//! Client configuration

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{Error, Result};

/// Connection settings for a GRI server
///
/// # Examples
///
/// ```
/// use grirust_types::ClientConfig;
///
/// let config = ClientConfig::new("192.168.2.1");
/// assert_eq!(config.port, ClientConfig::DEFAULT_PORT);
/// config.validate().unwrap();
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Host name or IP address of the machine running the GRI server
    pub host: String,

    /// TCP port the server listens on
    pub port: u16,

    /// Timeout applied to socket operations (connect, receive)
    pub timeout: Duration,
}

impl ClientConfig {
    /// Port GRI servers listen on by default
    pub const DEFAULT_PORT: u16 = 7100;

    /// Default socket timeout; vision jobs can take a while to answer
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(65);

    /// Create a configuration with default port and timeout
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: Self::DEFAULT_PORT,
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    /// Set the server port
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the socket timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Check the settings are usable before opening a connection
    pub fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            return Err(Error::Validation("host must not be empty".into()));
        }
        if self.port == 0 {
            return Err(Error::Validation("port must be non-zero".into()));
        }
        if self.timeout.is_zero() {
            return Err(Error::Validation("timeout must be non-zero".into()));
        }
        Ok(())
    }
}

impl FromStr for ClientConfig {
    type Err = Error;

    /// Parse `"host"` or `"host:port"`
    fn from_str(s: &str) -> Result<Self> {
        let config = match s.rsplit_once(':') {
            Some((host, port)) => {
                let port = port
                    .parse::<u16>()
                    .map_err(|e| Error::Parse(format!("invalid port in {s:?}: {e}")))?;
                Self::new(host).with_port(port)
            }
            None => Self::new(s),
        };
        config.validate()?;
        Ok(config)
    }
}

impl fmt::Display for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{} (timeout {}s)",
            self.host,
            self.port,
            self.timeout.as_secs()
        )
    }
}
