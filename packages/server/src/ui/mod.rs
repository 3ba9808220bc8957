//! UI layer: TCP chat endpoint and admin HTTP API.

mod codec;
pub mod error;
mod handler;
mod listener;
mod runner;
pub mod session;
mod signal;
pub mod state;

pub use error::ServerError;
pub use listener::ChatListener;
pub use runner::{Server, run};
