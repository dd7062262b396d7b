//! Client struct definition
//!
//! Represents a connected client with its display name and outbound channel.

use tokio::sync::mpsc;

use crate::error::SendError;
use crate::types::ClientId;

/// Connected client information
///
/// Copies of a `Client` are handed out by registry snapshots. Every copy shares
/// the same outbound channel, which feeds the connection's write task.
#[derive(Debug, Clone)]
pub struct Client {
    /// Unique identifier for this client
    pub id: ClientId,
    /// Current display name
    pub name: String,
    /// Server → Client line channel
    pub sender: mpsc::Sender<String>,
}

impl Client {
    /// Create a new client with its auto-assigned name
    pub fn new(id: ClientId, sender: mpsc::Sender<String>) -> Self {
        Self {
            id,
            name: id.default_name(),
            sender,
        }
    }

    /// Queue a line for this client
    ///
    /// Returns an error if the channel is closed (write task ended).
    pub async fn send(&self, line: impl Into<String>) -> Result<(), SendError> {
        self.sender
            .send(line.into())
            .await
            .map_err(|_| SendError::ChannelClosed)
    }

    /// Whether the client still carries its auto-assigned name
    pub fn has_default_name(&self) -> bool {
        self.name == self.id.default_name()
    }
}
