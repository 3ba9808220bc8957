//! Domain layer error definitions.

use thiserror::Error;

use super::{entity::SessionState, value_object::SessionId};

/// Errors raised by the session state machine
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// The requested state change is not an edge of the lifecycle
    #[error("Invalid session transition: {from:?} -> {to:?}")]
    InvalidTransition { from: SessionState, to: SessionState },
}

/// Errors related to registry membership
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// A session with the same id is already registered
    #[error("Session '{0}' is already registered")]
    AlreadyRegistered(SessionId),

    /// The session is not (or no longer) in the registry
    #[error("Session '{0}' is not registered")]
    NotRegistered(SessionId),
}
