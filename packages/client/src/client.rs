//! Line protocol client.

use futures_util::{SinkExt, StreamExt};
use tokio::{
    io::{AsyncRead, AsyncWrite},
    net::{
        TcpStream,
        tcp::{OwnedReadHalf, OwnedWriteHalf},
    },
    sync::mpsc,
};
use tokio_util::codec::{FramedRead, FramedWrite, LinesCodec};

use crate::error::ClientError;

/// First line the server sends on every connection
pub const USERNAME_PROMPT: &str = "Enter your username:";

/// Line that ends the chat
pub const EXIT_COMMAND: &str = "exit";

/// Why the client stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientExit {
    /// The user sent `exit`
    Exit,
    /// The server closed the connection
    ServerClosed,
    /// Terminal input ended (Ctrl-D / Ctrl-C)
    InputClosed,
}

pub struct ChatClient<R, W> {
    lines: FramedRead<R, LinesCodec>,
    sink: FramedWrite<W, LinesCodec>,
}

impl ChatClient<OwnedReadHalf, OwnedWriteHalf> {
    /// Connect to a chat server
    ///
    /// # Errors
    ///
    /// `ClientError::Connect` if the server cannot be reached.
    pub async fn connect(addr: &str) -> Result<Self, ClientError> {
        let stream = TcpStream::connect(addr)
            .await
            .map_err(|source| ClientError::Connect {
                addr: addr.to_string(),
                source,
            })?;
        let (reader, writer) = stream.into_split();
        Ok(Self::new(reader, writer))
    }
}

impl<R, W> ChatClient<R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            lines: FramedRead::new(reader, LinesCodec::new()),
            sink: FramedWrite::new(writer, LinesCodec::new()),
        }
    }

    /// Relay lines until the user exits or either side closes.
    ///
    /// With a preset `username` the name is sent right away and the server's
    /// prompt is not shown. Otherwise the first input line is the username,
    /// so an `exit` typed there is a name and not a command.
    ///
    /// # Arguments
    ///
    /// * `input` - Lines typed by the user
    /// * `username` - Name to join with, if already known
    /// * `display` - Called with every line from the server
    pub async fn run(
        mut self,
        mut input: mpsc::Receiver<String>,
        username: Option<String>,
        mut display: impl FnMut(&str),
    ) -> Result<ClientExit, ClientError> {
        let mut hide_prompt = username.is_some();
        let mut named = username.is_some();
        if let Some(name) = username {
            self.sink.send(name).await?;
        }

        loop {
            tokio::select! {
                line = self.lines.next() => match line {
                    Some(Ok(line)) => {
                        if hide_prompt {
                            hide_prompt = false;
                            if line == USERNAME_PROMPT {
                                continue;
                            }
                        }
                        display(&line);
                    }
                    Some(Err(e)) => return Err(e.into()),
                    None => return Ok(ClientExit::ServerClosed),
                },
                text = input.recv() => match text {
                    Some(text) => {
                        let exit = named && text.eq_ignore_ascii_case(EXIT_COMMAND);
                        named = true;
                        self.sink.send(text).await?;
                        if exit {
                            SinkExt::<String>::close(&mut self.sink).await?;
                            return Ok(ClientExit::Exit);
                        }
                    }
                    None => {
                        SinkExt::<String>::close(&mut self.sink).await?;
                        return Ok(ClientExit::InputClosed);
                    }
                },
            }
        }
    }
}
