//! Shared utilities for the Tsudoi server and client binaries.

pub mod logger;

pub use logger::setup_logger;
