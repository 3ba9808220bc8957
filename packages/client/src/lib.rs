//! Interactive terminal client for the Tsudoi line chat.
//!
//! Lines typed at the terminal are sent to the server as-is; every line the
//! server sends is printed. The first line sent is the username.

pub mod args;
pub mod client;
pub mod error;
mod input;

pub use args::ClientArgs;
pub use client::{ChatClient, ClientExit};
pub use error::ClientError;

/// Connect, chat until `exit` or disconnect, and report why the client stopped
pub async fn run(args: ClientArgs) -> Result<ClientExit, ClientError> {
    let addr = args.addr();
    let client = ChatClient::connect(&addr).await?;
    tracing::info!(addr = %addr, "Connected to chat server");

    let input = input::spawn_line_reader().await?;
    client
        .run(input, args.username, |line| println!("{line}"))
        .await
}
