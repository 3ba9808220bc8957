//! Per-connection session.
//!
//! A session owns one TCP connection. Incoming lines are read on the
//! session's own task; outgoing lines go through a bounded queue drained by a
//! separate writer task, so a broadcast never waits on a slow peer.
//!
//! ```text
//! Connecting -> AwaitingUsername -> Active -> Closing -> Closed
//! ```

use std::{io, net::SocketAddr, sync::Arc, time::Duration};

use futures_util::{SinkExt, StreamExt};
use thiserror::Error;
use tokio::{
    net::{
        TcpStream,
        tcp::{OwnedReadHalf, OwnedWriteHalf},
    },
    sync::mpsc::{self, error::TrySendError},
    task::JoinHandle,
};
use tokio_util::codec::{AnyDelimiterCodecError, FramedRead, FramedWrite, LinesCodec};

use crate::{
    common::time::get_utc_timestamp,
    domain::{
        SessionEntry, SessionId, SessionIdFactory, SessionState, Timestamp, USERNAME_PROMPT,
        Username, is_exit_command,
    },
    ui::{codec::ChatLineCodec, state::AppState},
    usecase::{JoinSessionUseCase, LeaveOutcome, LeaveSessionUseCase, RelayMessageUseCase},
};

/// How long the writer gets to flush queued lines once the session closes
const CLOSE_GRACE: Duration = Duration::from_secs(2);

/// Why a session ended
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionEnd {
    #[error("client sent exit")]
    Exit,
    #[error("peer closed the connection")]
    PeerClosed,
    #[error("read failed: {0}")]
    ReadError(io::ErrorKind),
    #[error("line exceeded the maximum length")]
    LineTooLong,
    #[error("no input within the idle timeout")]
    IdleTimeout,
    #[error("writer stopped")]
    WriterGone,
    #[error("session was removed from the registry")]
    Deregistered,
}

/// Server-side state of one connected client.
pub struct Session {
    id: SessionId,
    peer: SocketAddr,
    connected_at: Timestamp,
    state: SessionState,
    username: Option<Username>,
    reader: FramedRead<OwnedReadHalf, ChatLineCodec>,
    outbound: mpsc::Sender<String>,
    writer: Option<JoinHandle<()>>,
    idle_timeout: Option<Duration>,
    join: JoinSessionUseCase,
    relay: RelayMessageUseCase,
    leave: LeaveSessionUseCase,
}

impl Session {
    /// Wrap an accepted connection, start its writer task, and queue the
    /// username prompt.
    ///
    /// The prompt is queued before `entry()` can be registered, so it is
    /// always the first line the client receives.
    pub fn new(stream: TcpStream, peer: SocketAddr, state: &AppState) -> Self {
        let id = SessionIdFactory::generate();
        let config = &state.config;

        let (read_half, write_half) = stream.into_split();
        let reader = FramedRead::new(
            read_half,
            ChatLineCodec::new_with_max_length(config.max_line_length),
        );
        let (outbound, queue) = mpsc::channel(config.outbound_capacity);
        let writer = tokio::spawn(write_loop(
            id,
            FramedWrite::new(write_half, LinesCodec::new()),
            queue,
        ));

        let mut session = Self {
            id,
            peer,
            connected_at: Timestamp::new(get_utc_timestamp()),
            state: SessionState::Connecting,
            username: None,
            reader,
            outbound,
            writer: Some(writer),
            idle_timeout: config.idle_timeout(),
            join: JoinSessionUseCase::new(state.registry.clone()),
            relay: RelayMessageUseCase::new(state.registry.clone()),
            leave: LeaveSessionUseCase::new(state.registry.clone()),
        };
        session.advance(SessionState::AwaitingUsername);
        session.send_message(USERNAME_PROMPT);
        session
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Registry record pointing at this session's outbound queue
    pub fn entry(&self) -> SessionEntry {
        SessionEntry::new(self.id, self.outbound.clone(), self.peer, self.connected_at)
    }

    /// Drive the session to completion: handshake, relay, close.
    pub async fn run(mut self) {
        let end = self.serve().await;
        self.close(end).await;
    }

    /// Queue one line for this client. Never waits.
    pub fn send_message(&self, text: &str) {
        match self.outbound.try_send(text.to_string()) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                tracing::warn!(session_id = %self.id, "Outbound queue full, dropping line");
            }
            Err(TrySendError::Closed(_)) => {
                tracing::debug!(session_id = %self.id, "Writer already stopped");
            }
        }
    }

    async fn serve(&mut self) -> SessionEnd {
        let name = match self.next_line().await {
            Ok(line) => line,
            Err(end) => return end,
        };
        if let Err(end) = self.handshake(Username::from(name)).await {
            return end;
        }

        loop {
            let line = match self.next_line().await {
                Ok(line) => line,
                Err(end) => return end,
            };
            if is_exit_command(&line) {
                return SessionEnd::Exit;
            }
            if let Some(username) = &self.username {
                let delivered = self.relay.execute(self.id, username, &line).await;
                tracing::debug!(session_id = %self.id, delivered, "Relayed chat line");
            }
        }
    }

    async fn handshake(&mut self, username: Username) -> Result<(), SessionEnd> {
        match self.join.execute(self.id, username.clone()).await {
            Ok(notified) => {
                tracing::info!(
                    session_id = %self.id,
                    peer = %self.peer,
                    username = %username,
                    notified,
                    "User joined"
                );
                self.username = Some(username);
                self.advance(SessionState::Active);
                Ok(())
            }
            Err(e) => {
                tracing::warn!(session_id = %self.id, error = %e, "Handshake failed");
                Err(SessionEnd::Deregistered)
            }
        }
    }

    /// Read the next line, or the reason no line will come.
    async fn next_line(&mut self) -> Result<String, SessionEnd> {
        let idle_timeout = self.idle_timeout;
        let reader = &mut self.reader;
        let read = async {
            match idle_timeout {
                Some(limit) => tokio::time::timeout(limit, reader.next())
                    .await
                    .map_err(|_| SessionEnd::IdleTimeout),
                None => Ok(reader.next().await),
            }
        };

        tokio::select! {
            read = read => match read? {
                Some(Ok(line)) => Ok(line),
                Some(Err(AnyDelimiterCodecError::MaxChunkLengthExceeded)) => {
                    Err(SessionEnd::LineTooLong)
                }
                Some(Err(AnyDelimiterCodecError::Io(e))) => Err(SessionEnd::ReadError(e.kind())),
                None => Err(SessionEnd::PeerClosed),
            },
            _ = writer_finished(&mut self.writer) => Err(SessionEnd::WriterGone),
        }
    }

    /// Deregister, announce, and close the connection. Runs once per session.
    async fn close(mut self, end: SessionEnd) {
        self.advance(SessionState::Closing);

        match self.leave.execute(self.id).await {
            LeaveOutcome::Announced { username, notified } => {
                tracing::info!(
                    session_id = %self.id,
                    username = %username,
                    notified,
                    reason = %end,
                    "User left"
                );
            }
            LeaveOutcome::Silent => {
                tracing::info!(session_id = %self.id, reason = %end, "Connection closed before handshake");
            }
            LeaveOutcome::AlreadyGone => {
                tracing::debug!(session_id = %self.id, "Session was already deregistered");
            }
        }

        self.advance(SessionState::Closed);

        let Session {
            id,
            reader,
            outbound,
            writer,
            ..
        } = self;

        // With the registry entry gone this is the last sender, so the writer
        // drains what is queued, shuts down its half, and exits.
        drop(outbound);
        drop(reader);
        if let Some(writer) = writer {
            let abort = writer.abort_handle();
            if tokio::time::timeout(CLOSE_GRACE, writer).await.is_err() {
                tracing::debug!(session_id = %id, "Writer did not finish in time, aborting");
                abort.abort();
            }
        }
    }

    fn advance(&mut self, next: SessionState) {
        match self.state.transition(next) {
            Ok(state) => self.state = state,
            Err(e) => tracing::error!(session_id = %self.id, error = %e, "Ignoring transition"),
        }
    }
}

/// Resolves when the writer task has ended; pending forever once it has.
async fn writer_finished(writer: &mut Option<JoinHandle<()>>) {
    match writer.as_mut() {
        Some(handle) => {
            let _ = handle.await;
        }
        None => std::future::pending::<()>().await,
    }
    *writer = None;
}

/// Drain the outbound queue onto the socket until it closes or a write fails.
async fn write_loop(
    id: SessionId,
    mut sink: FramedWrite<OwnedWriteHalf, LinesCodec>,
    mut queue: mpsc::Receiver<String>,
) {
    while let Some(line) = queue.recv().await {
        if let Err(e) = sink.send(line).await {
            tracing::debug!(session_id = %id, error = %e, "Write failed, stopping writer");
            return;
        }
    }

    // The peer may already be gone.
    if let Err(e) = SinkExt::<String>::close(&mut sink).await {
        tracing::debug!(session_id = %id, error = %e, "Failed to shut down connection");
    }
}
