//! Client errors.

use std::io;

use thiserror::Error;
use tokio_util::codec::LinesCodecError;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("failed to connect to {addr}: {source}")]
    Connect {
        addr: String,
        #[source]
        source: io::Error,
    },

    #[error("connection error: {0}")]
    Io(#[from] io::Error),

    #[error("invalid line from server: {0}")]
    Codec(#[from] LinesCodecError),

    #[error("terminal input error: {0}")]
    Readline(#[from] rustyline::error::ReadlineError),
}
