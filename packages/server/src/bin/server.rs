//! Line-based TCP chat relay server.
//!
//! Relays every line a client sends to all other connected clients.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin tsudoi-server -- --port 12345
//! ```

use clap::Parser;
use tsudoi_server::ServerConfig;
use tsudoi_shared::setup_logger;

#[tokio::main]
async fn main() {
    let config = ServerConfig::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    // Run the server
    if let Err(e) = tsudoi_server::run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
