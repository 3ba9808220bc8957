//! Core domain models for the chat relay.

use std::{fmt, net::SocketAddr};

use tokio::sync::mpsc;

use super::{
    error::SessionError,
    value_object::{SessionId, Timestamp, Username},
};

/// Line sent to every new connection before anything else
pub const USERNAME_PROMPT: &str = "Enter your username:";

/// Command that ends a session (compared case-insensitively)
pub const EXIT_COMMAND: &str = "exit";

/// Returns true if `line` is the exit command in any letter case.
pub fn is_exit_command(line: &str) -> bool {
    line.eq_ignore_ascii_case(EXIT_COMMAND)
}

/// Something that happened in the chat and has to be fanned out.
///
/// Events are never stored; the kind only selects the rendered text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatEvent {
    /// A chat line typed by `from`
    Chat { from: Username, body: String },
    /// `who` completed the handshake
    Joined { who: Username },
    /// `who` left, for whatever reason
    Left { who: Username },
}

impl ChatEvent {
    pub fn chat(from: Username, body: impl Into<String>) -> Self {
        Self::Chat {
            from,
            body: body.into(),
        }
    }

    pub fn joined(who: Username) -> Self {
        Self::Joined { who }
    }

    pub fn left(who: Username) -> Self {
        Self::Left { who }
    }

    /// Render the event as one wire line (without the terminator).
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ChatEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Chat { from, body } => write!(f, "{from}: {body}"),
            Self::Joined { who } => write!(f, "{who} has joined the chat!"),
            Self::Left { who } => write!(f, "{who} has left the chat."),
        }
    }
}

/// Lifecycle of one connection.
///
/// ```text
/// Connecting -> AwaitingUsername -> Active -> Closing -> Closed
///      \               \______________________^
///       \_______________________________________^
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionState {
    Connecting,
    AwaitingUsername,
    Active,
    Closing,
    Closed,
}

impl SessionState {
    /// Returns true if `next` is a legal successor of `self`.
    pub fn can_transition_to(self, next: SessionState) -> bool {
        use SessionState::*;
        matches!(
            (self, next),
            (Connecting, AwaitingUsername)
                | (Connecting, Closing)
                | (AwaitingUsername, Active)
                | (AwaitingUsername, Closing)
                | (Active, Closing)
                | (Closing, Closed)
        )
    }

    /// Move to `next`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidTransition` if `next` is not reachable
    /// from the current state in one step.
    pub fn transition(self, next: SessionState) -> Result<SessionState, SessionError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(SessionError::InvalidTransition {
                from: self,
                to: next,
            })
        }
    }
}

/// Registry record for one session.
///
/// Holds the sending half of the session's outbound queue; the receiving
/// half belongs to the session's writer task.
#[derive(Debug, Clone)]
pub struct SessionEntry {
    pub id: SessionId,
    pub sender: mpsc::Sender<String>,
    pub peer: SocketAddr,
    pub connected_at: Timestamp,
    /// `None` until the handshake completes
    pub username: Option<Username>,
}

impl SessionEntry {
    /// Create an entry for a session that has not picked a name yet
    pub fn new(
        id: SessionId,
        sender: mpsc::Sender<String>,
        peer: SocketAddr,
        connected_at: Timestamp,
    ) -> Self {
        Self {
            id,
            sender,
            peer,
            connected_at,
            username: None,
        }
    }

    /// Read-only view without the queue handle
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            id: self.id,
            username: self.username.clone(),
            peer: self.peer,
            connected_at: self.connected_at,
        }
    }
}

/// Point-in-time view of a registry entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub id: SessionId,
    pub username: Option<Username>,
    pub peer: SocketAddr,
    pub connected_at: Timestamp,
}

impl SessionSnapshot {
    /// A session is active once it has a name
    pub fn is_active(&self) -> bool {
        self.username.is_some()
    }
}
