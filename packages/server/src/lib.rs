//! Line-based TCP chat relay library.
//!
//! Clients connect, send a display name as their first line, and every
//! following line is relayed to all other connected clients.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

// shared library
pub mod common;

// Re-export entry points
pub use common::ServerConfig;
pub use ui::{Server, ServerError, run};
