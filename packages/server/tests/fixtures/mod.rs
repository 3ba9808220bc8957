//! Shared fixtures for integration tests.
//!
//! `TestServer` runs a real server on ephemeral loopback ports inside the test
//! runtime; `TestClient` speaks the line protocol over a plain TCP stream.

#![allow(dead_code)]

use std::{net::SocketAddr, sync::Arc, time::Duration};

use tokio::{
    io::{AsyncBufReadExt, AsyncWriteExt, BufReader},
    net::{
        TcpStream,
        tcp::{OwnedReadHalf, OwnedWriteHalf},
    },
    sync::oneshot,
};
use tsudoi_server::{Server, ServerConfig, ui::state::AppState};

pub const PROMPT: &str = "Enter your username:";

const READ_TIMEOUT: Duration = Duration::from_secs(3);
const QUIET_PERIOD: Duration = Duration::from_millis(200);

pub struct TestServer {
    pub chat_addr: SocketAddr,
    pub http_addr: Option<SocketAddr>,
    state: Arc<AppState>,
    shutdown: Option<oneshot::Sender<()>>,
}

impl TestServer {
    /// Start a server with the admin API enabled
    pub async fn start() -> Self {
        Self::start_with(ServerConfig {
            http_port: Some(0),
            ..ServerConfig::ephemeral()
        })
        .await
    }

    pub async fn start_with(config: ServerConfig) -> Self {
        let server = Server::bind(config).await.expect("Failed to bind server");
        let chat_addr = server.chat_addr().expect("Chat listener has no address");
        let http_addr = server.http_addr();
        let state = server.state();

        let (tx, rx) = oneshot::channel();
        tokio::spawn(server.run_until(async {
            let _ = rx.await;
        }));

        Self {
            chat_addr,
            http_addr,
            state,
            shutdown: Some(tx),
        }
    }

    pub fn base_url(&self) -> String {
        let addr = self.http_addr.expect("Admin API is disabled");
        format!("http://{addr}")
    }

    /// Connect a raw client and consume the username prompt
    pub async fn connect(&self) -> TestClient {
        let mut client = TestClient::connect(self.chat_addr).await;
        client.expect_line(PROMPT).await;
        client
    }

    /// Connect and complete the handshake, waiting until the server has
    /// recorded the name
    pub async fn join(&self, name: &str) -> TestClient {
        let before = self.active_count().await;
        let mut client = self.connect().await;
        client.send_line(name).await;
        self.wait_for_active(before + 1).await;
        client
    }

    pub async fn active_count(&self) -> usize {
        self.state.registry.active_count().await
    }

    pub async fn connected_count(&self) -> usize {
        self.state.registry.count().await
    }

    /// Poll until exactly `expected` sessions completed the handshake
    pub async fn wait_for_active(&self, expected: usize) {
        for _ in 0..100 {
            if self.active_count().await == expected {
                return;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        panic!(
            "Timed out waiting for {expected} active sessions (have {})",
            self.active_count().await
        );
    }

    /// Poll until exactly `expected` sessions are registered
    pub async fn wait_for_connected(&self, expected: usize) {
        for _ in 0..100 {
            if self.connected_count().await == expected {
                return;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        panic!(
            "Timed out waiting for {expected} connected sessions (have {})",
            self.connected_count().await
        );
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}

pub struct TestClient {
    reader: BufReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
}

impl TestClient {
    pub async fn connect(addr: SocketAddr) -> Self {
        let stream = TcpStream::connect(addr)
            .await
            .expect("Failed to connect to chat server");
        let (reader, writer) = stream.into_split();
        Self {
            reader: BufReader::new(reader),
            writer,
        }
    }

    pub async fn send_line(&mut self, line: &str) {
        self.writer
            .write_all(format!("{line}\n").as_bytes())
            .await
            .expect("Failed to send line");
        self.writer.flush().await.expect("Failed to flush");
    }

    /// Next line from the server, `None` on end of stream
    pub async fn read_line(&mut self) -> Option<String> {
        let mut line = String::new();
        let bytes = tokio::time::timeout(READ_TIMEOUT, self.reader.read_line(&mut line))
            .await
            .expect("Timed out waiting for a line")
            .ok()?;
        (bytes > 0).then(|| line.trim_end_matches(['\r', '\n']).to_string())
    }

    pub async fn expect_line(&mut self, expected: &str) {
        let line = self.read_line().await;
        assert_eq!(line.as_deref(), Some(expected));
    }

    /// Assert nothing arrives for a short while
    pub async fn expect_silence(&mut self) {
        let mut line = String::new();
        let result = tokio::time::timeout(QUIET_PERIOD, self.reader.read_line(&mut line)).await;
        match result {
            Err(_) => {}
            Ok(Ok(0)) => panic!("Connection closed while expecting silence"),
            Ok(Ok(_)) => panic!("Unexpected line: {line:?}"),
            Ok(Err(e)) => panic!("Read failed while expecting silence: {e}"),
        }
    }

    /// Assert the server closed the connection
    pub async fn expect_closed(&mut self) {
        assert_eq!(self.read_line().await, None);
    }
}
