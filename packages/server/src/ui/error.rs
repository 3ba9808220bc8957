//! Errors that are fatal to the whole server.

use std::io;

use thiserror::Error;

use crate::common::ConfigError;

#[derive(Debug, Error)]
pub enum ServerError {
    /// The configuration was rejected before binding
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// The chat or admin endpoint could not be bound
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: io::Error,
    },

    /// The chat listener stopped accepting connections
    #[error("Failed to accept connection: {0}")]
    Accept(#[source] io::Error),

    /// The admin HTTP server stopped
    #[error("Admin HTTP server failed: {0}")]
    Http(#[source] io::Error),
}
