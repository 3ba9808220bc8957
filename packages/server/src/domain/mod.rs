//! Domain layer for the chat relay.
//!
//! This module contains the session lifecycle and message formatting rules,
//! independent of sockets, HTTP DTOs and other infrastructure concerns.

pub mod entity;
pub mod error;
pub mod factory;
pub mod repository;
pub mod value_object;

pub use entity::{
    ChatEvent, EXIT_COMMAND, SessionEntry, SessionSnapshot, SessionState, USERNAME_PROMPT,
    is_exit_command,
};
pub use error::{RegistryError, SessionError};
pub use factory::SessionIdFactory;
pub use repository::SessionRegistry;
pub use value_object::{SessionId, Timestamp, Username};

#[cfg(test)]
pub use repository::MockSessionRegistry;
