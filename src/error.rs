//! Error types for the chat relay
//!
//! Defines application-level errors, rename rejections and message send errors.
//! Uses thiserror for ergonomic error definitions.

use thiserror::Error;

use crate::message::SERVER_PREFIX;
use crate::types::ClientId;

/// Application-level errors
///
/// Covers both fatal errors (connection termination) and
/// business errors (reported privately to the client).
#[derive(Debug, Error)]
pub enum AppError {
    /// IO error (fatal)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Channel send error (fatal - the registry actor is gone)
    #[error("Channel send error")]
    ChannelSend,

    /// Admission refused because the configured client limit is reached
    #[error("Server is full")]
    ServerFull,

    /// Rename rejected by the naming policy
    #[error(transparent)]
    Rename(#[from] RenameError),
}

/// Rename rejections
///
/// Expected user-facing conditions, never logged as errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenameError {
    /// Name lies in the reserved `server` or foreign `user:` namespace
    #[error("nickname {0} is forbidden")]
    Forbidden(String),

    /// Name is held by another client
    #[error("nickname {0} is currently in use")]
    Taken(String),

    /// Requesting client is no longer registered
    #[error("client {0} is not registered")]
    UnknownClient(ClientId),
}

impl RenameError {
    /// The private line sent back to the client that attempted the rename
    pub fn to_client_line(&self) -> String {
        match self {
            RenameError::Forbidden(name) => {
                format!("{SERVER_PREFIX} Your new nickname, {name}, is forbidden.\n")
            }
            RenameError::Taken(name) => {
                format!("{SERVER_PREFIX} Your new nickname, {name}, is currently in use.\n")
            }
            RenameError::UnknownClient(_) => format!("{SERVER_PREFIX} You are not connected.\n"),
        }
    }
}

/// Message send errors
///
/// Occurs when attempting to send lines through a closed client channel.
#[derive(Debug, Error)]
pub enum SendError {
    /// The connection's write task has ended
    #[error("Channel closed")]
    ChannelClosed,
}
