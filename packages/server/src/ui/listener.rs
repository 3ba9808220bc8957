//! TCP accept loop.

use std::{io, net::SocketAddr, sync::Arc};

use tokio::net::{TcpListener, TcpStream};
use tokio_util::sync::CancellationToken;

use crate::{
    ui::{error::ServerError, session::Session, state::AppState},
    usecase::ConnectSessionUseCase,
};

/// Accepts chat connections and hands each one to its own session task.
pub struct ChatListener {
    listener: TcpListener,
    state: Arc<AppState>,
}

impl ChatListener {
    /// Bind the chat endpoint.
    ///
    /// # Errors
    ///
    /// `ServerError::Bind` if the address cannot be bound.
    pub async fn bind(addr: &str, state: Arc<AppState>) -> Result<Self, ServerError> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| ServerError::Bind {
                addr: addr.to_string(),
                source,
            })?;
        Ok(Self { listener, state })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accept connections until `shutdown` is cancelled.
    ///
    /// Sessions are spawned and never awaited here; cancelling the loop
    /// leaves running sessions alone.
    ///
    /// # Errors
    ///
    /// `ServerError::Accept` on an accept error that is not tied to a single
    /// failed connection.
    pub async fn accept_loop(self, shutdown: CancellationToken) -> Result<(), ServerError> {
        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    tracing::info!("Chat listener stopped");
                    return Ok(());
                }
                result = self.listener.accept() => match result {
                    Ok((stream, peer)) => self.start_session(stream, peer).await,
                    Err(e) if is_transient(&e) => {
                        tracing::warn!(error = %e, "Failed to accept connection");
                    }
                    Err(e) => return Err(ServerError::Accept(e)),
                },
            }
        }
    }

    async fn start_session(&self, stream: TcpStream, peer: SocketAddr) {
        let session = Session::new(stream, peer, &self.state);
        let connect = ConnectSessionUseCase::new(self.state.registry.clone());

        if let Err(e) = connect.execute(session.entry()).await {
            // Dropping the session closes the connection.
            tracing::warn!(peer = %peer, error = %e, "Rejected connection");
            return;
        }

        tracing::info!(session_id = %session.id(), peer = %peer, "New connection");
        tokio::spawn(session.run());
    }
}

/// Errors that only affect the connection being accepted.
fn is_transient(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::ConnectionAborted
            | io::ErrorKind::ConnectionReset
            | io::ErrorKind::ConnectionRefused
            | io::ErrorKind::Interrupted
            | io::ErrorKind::WouldBlock
            | io::ErrorKind::TimedOut
    )
}
