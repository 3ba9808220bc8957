//! Tsudoi chat client.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin tsudoi-client -- --port 12345 --username alice
//! ```

use clap::Parser;
use tsudoi_client::{ClientArgs, ClientExit};
use tsudoi_shared::setup_logger;

#[tokio::main]
async fn main() {
    let args = ClientArgs::parse();

    // Chat output goes to stdout too, so keep our own logs quiet by default
    setup_logger(env!("CARGO_BIN_NAME"), "warn");

    match tsudoi_client::run(args).await {
        Ok(ClientExit::ServerClosed) => println!("Connection closed by server."),
        Ok(ClientExit::Exit | ClientExit::InputClosed) => {}
        Err(e) => {
            tracing::error!("Client error: {}", e);
            std::process::exit(1);
        }
    }
}
