//! Registry trait for active sessions.
//!
//! The domain defines what it needs from session storage; the
//! infrastructure layer provides the implementation (dependency inversion).

use async_trait::async_trait;

use super::{
    entity::{ChatEvent, SessionEntry, SessionSnapshot},
    error::RegistryError,
    value_object::{SessionId, Username},
};

/// Concurrency-safe set of connected sessions, plus fan-out over it.
///
/// A session is broadcast-reachable if and only if it is in the registry.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionRegistry: Send + Sync {
    /// Insert a session.
    ///
    /// # Errors
    ///
    /// `RegistryError::AlreadyRegistered` if the id is already present.
    async fn add(&self, entry: SessionEntry) -> Result<(), RegistryError>;

    /// Record the name chosen during the handshake.
    ///
    /// # Errors
    ///
    /// `RegistryError::NotRegistered` if the id is unknown.
    async fn assign_username(&self, id: SessionId, username: Username)
    -> Result<(), RegistryError>;

    /// Remove a session. Idempotent: returns `None` when it was already gone.
    async fn remove(&self, id: SessionId) -> Option<SessionSnapshot>;

    /// Deliver `event` to every registered session except `exclude`.
    ///
    /// Recipients are a consistent snapshot taken under the registry lock;
    /// delivery happens after the lock is released. Returns the number of
    /// sessions the line was queued for.
    async fn broadcast(&self, event: ChatEvent, exclude: Option<SessionId>) -> usize;

    /// Number of registered sessions, named or not
    async fn count(&self) -> usize;

    /// Number of sessions that completed the handshake
    async fn active_count(&self) -> usize;

    /// Views of every registered session
    async fn snapshot(&self) -> Vec<SessionSnapshot>;
}
