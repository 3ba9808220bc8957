//! Server assembly: registry, chat listener and optional admin API.

use std::{future::Future, io, net::SocketAddr, sync::Arc};

use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use crate::{
    common::ServerConfig,
    infrastructure::repository::InMemorySessionRegistry,
    ui::{
        error::ServerError, handler::admin_router, listener::ChatListener, signal::shutdown_signal,
        state::AppState,
    },
};

/// A bound but not yet running server.
pub struct Server {
    chat: ChatListener,
    http: Option<TcpListener>,
    state: Arc<AppState>,
}

impl Server {
    /// Build the registry and bind every configured endpoint.
    ///
    /// # Errors
    ///
    /// `ServerError::Config` for unusable settings, `ServerError::Bind` if
    /// either endpoint cannot be bound.
    pub async fn bind(config: ServerConfig) -> Result<Self, ServerError> {
        config.validate()?;

        let registry = Arc::new(InMemorySessionRegistry::new());
        let chat_addr = config.chat_addr();
        let http_addr = config.http_addr();
        let state = Arc::new(AppState::new(registry, config));

        let chat = ChatListener::bind(&chat_addr, state.clone()).await?;
        let http = match http_addr {
            Some(addr) => Some(TcpListener::bind(&addr).await.map_err(|source| {
                ServerError::Bind {
                    addr: addr.clone(),
                    source,
                }
            })?),
            None => None,
        };

        Ok(Self { chat, http, state })
    }

    pub fn chat_addr(&self) -> io::Result<SocketAddr> {
        self.chat.local_addr()
    }

    pub fn http_addr(&self) -> Option<SocketAddr> {
        self.http.as_ref().and_then(|l| l.local_addr().ok())
    }

    pub fn state(&self) -> Arc<AppState> {
        self.state.clone()
    }

    /// Serve until `shutdown` resolves or a fatal error occurs.
    ///
    /// # Errors
    ///
    /// Returns the first fatal error from the chat listener or the admin API.
    pub async fn run_until<F>(self, shutdown: F) -> Result<(), ServerError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let Server { chat, http, state } = self;
        let token = CancellationToken::new();

        let trigger = token.clone();
        tokio::spawn(async move {
            shutdown.await;
            trigger.cancel();
        });

        let http_task = http.map(|listener| {
            let router = admin_router(state.clone());
            let token = token.clone();
            tokio::spawn(async move {
                axum::serve(listener, router)
                    .with_graceful_shutdown(token.cancelled_owned())
                    .await
            })
        });

        let result = chat.accept_loop(token.clone()).await;
        token.cancel();

        let http_result = match http_task {
            Some(task) => match task.await {
                Ok(result) => result.map_err(ServerError::Http),
                Err(e) => {
                    tracing::error!("Admin HTTP task failed: {}", e);
                    Ok(())
                }
            },
            None => Ok(()),
        };

        result.and(http_result)
    }
}

/// Run the relay with the given configuration until Ctrl-C / SIGTERM.
///
/// # Errors
///
/// Returns `ServerError` if binding fails or the listener dies.
pub async fn run(config: ServerConfig) -> Result<(), ServerError> {
    let server = Server::bind(config).await?;

    match server.chat_addr() {
        Ok(addr) => tracing::info!("Chat server listening on {}", addr),
        Err(e) => tracing::warn!("Chat server listening (address unavailable: {})", e),
    }
    if let Some(addr) = server.http_addr() {
        tracing::info!("Admin API listening on http://{}", addr);
    }

    server.run_until(shutdown_signal()).await
}
