//! Shared helpers for every layer.

pub mod config;
pub mod time;

pub use config::{ConfigError, ServerConfig};
