//! Server configuration.
//!
//! Every setting comes from a command-line flag, with an environment
//! variable fallback, and ends up in one `ServerConfig` that is handed to
//! the server at startup.

use std::time::Duration;

use clap::Parser;
use thiserror::Error;

/// Default TCP port of the chat relay
pub const DEFAULT_PORT: u16 = 12345;

/// Default number of lines buffered per session before messages are dropped
pub const DEFAULT_OUTBOUND_CAPACITY: usize = 256;

/// Default maximum length of one incoming line, in bytes
pub const DEFAULT_MAX_LINE_LENGTH: usize = 8192;

/// A setting the server cannot run with
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("outbound capacity must be at least 1")]
    ZeroOutboundCapacity,
    #[error("max line length must be at least 1")]
    ZeroMaxLineLength,
    #[error("idle timeout must be at least 1 second")]
    ZeroIdleTimeout,
}

/// Line-based TCP chat relay.
#[derive(Debug, Clone, PartialEq, Eq, Parser)]
#[command(name = "tsudoi-server", version, about, long_about = None)]
pub struct ServerConfig {
    /// Address the chat listener binds to
    #[arg(long, env = "TSUDOI_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// TCP port of the chat listener (0 picks an ephemeral port)
    #[arg(short, long, env = "TSUDOI_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Port of the admin HTTP API; disabled when not set
    #[arg(long, env = "TSUDOI_HTTP_PORT")]
    pub http_port: Option<u16>,

    /// Lines buffered per session before further messages to it are dropped
    #[arg(long, env = "TSUDOI_OUTBOUND_CAPACITY", default_value_t = DEFAULT_OUTBOUND_CAPACITY)]
    pub outbound_capacity: usize,

    /// Longest accepted incoming line in bytes; longer lines end the session
    #[arg(long, env = "TSUDOI_MAX_LINE_LENGTH", default_value_t = DEFAULT_MAX_LINE_LENGTH)]
    pub max_line_length: usize,

    /// Close sessions that send nothing for this many seconds; disabled when not set
    #[arg(long, env = "TSUDOI_IDLE_TIMEOUT_SECS")]
    pub idle_timeout_secs: Option<u64>,
}

impl ServerConfig {
    /// Check settings that parse fine but cannot be served.
    ///
    /// # Errors
    ///
    /// `ConfigError` naming the first offending setting.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.outbound_capacity == 0 {
            return Err(ConfigError::ZeroOutboundCapacity);
        }
        if self.max_line_length == 0 {
            return Err(ConfigError::ZeroMaxLineLength);
        }
        if self.idle_timeout_secs == Some(0) {
            return Err(ConfigError::ZeroIdleTimeout);
        }
        Ok(())
    }

    /// `host:port` of the chat listener
    pub fn chat_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// `host:port` of the admin HTTP API, if enabled
    pub fn http_addr(&self) -> Option<String> {
        self.http_port.map(|port| format!("{}:{}", self.host, port))
    }

    pub fn idle_timeout(&self) -> Option<Duration> {
        self.idle_timeout_secs.map(Duration::from_secs)
    }

    /// Config bound to an ephemeral loopback port, for tests and embedding
    pub fn ephemeral() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 0,
            ..Self::default()
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            http_port: None,
            outbound_capacity: DEFAULT_OUTBOUND_CAPACITY,
            max_line_length: DEFAULT_MAX_LINE_LENGTH,
            idle_timeout_secs: None,
        }
    }
}
