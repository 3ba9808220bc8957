//! Server state shared by the listener, every session and the admin API.

use std::sync::Arc;

use crate::{common::ServerConfig, domain::SessionRegistry};

/// Shared application state
pub struct AppState {
    /// Registry（セッション管理の抽象化）
    pub registry: Arc<dyn SessionRegistry>,
    /// Settings the server was started with
    pub config: ServerConfig,
}

impl AppState {
    pub fn new(registry: Arc<dyn SessionRegistry>, config: ServerConfig) -> Self {
        Self { registry, config }
    }
}
