//! ChatServer Actor implementation
//!
//! The central actor that owns the client registry (clients and their names).
//! Every mutation arrives as a `ServerCommand`, so commands are applied one at a
//! time and renames, connects and disconnects never interleave.

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};

use crate::client::Client;
use crate::error::{AppError, RenameError};
use crate::registry::ClientRegistry;
use crate::types::ClientId;

/// Commands sent from handlers to the ChatServer actor
#[derive(Debug)]
pub enum ServerCommand {
    /// New client connected
    Connect {
        sender: mpsc::Sender<String>,
        reply: oneshot::Sender<Result<Client, AppError>>,
    },
    /// Client disconnected
    Disconnect {
        client_id: ClientId,
        reply: oneshot::Sender<Option<Client>>,
    },
    /// Change a client's display name
    Rename {
        client_id: ClientId,
        name: String,
        reply: oneshot::Sender<Result<String, RenameError>>,
    },
    /// Copy of the current client set
    Snapshot {
        reply: oneshot::Sender<Vec<Client>>,
    },
}

/// The main ChatServer actor
pub struct ChatServer {
    registry: ClientRegistry,
    /// Admission limit; None means unlimited
    max_clients: Option<usize>,
    /// Command receiver channel
    receiver: mpsc::Receiver<ServerCommand>,
}

impl ChatServer {
    /// Create a new ChatServer with the given command receiver
    pub fn new(receiver: mpsc::Receiver<ServerCommand>, max_clients: Option<usize>) -> Self {
        Self {
            registry: ClientRegistry::new(),
            max_clients,
            receiver,
        }
    }

    /// Run the ChatServer event loop
    ///
    /// Continuously receives and processes commands until all senders are dropped.
    pub async fn run(mut self) {
        info!("ChatServer started");

        while let Some(cmd) = self.receiver.recv().await {
            self.handle_command(cmd);
        }

        info!("ChatServer shutting down");
    }

    /// Process a single command
    ///
    /// A dropped reply receiver only means the requesting handler went away.
    fn handle_command(&mut self, cmd: ServerCommand) {
        match cmd {
            ServerCommand::Connect { sender, reply } => {
                let _ = reply.send(self.handle_connect(sender));
            }
            ServerCommand::Disconnect { client_id, reply } => {
                let _ = reply.send(self.handle_disconnect(client_id));
            }
            ServerCommand::Rename {
                client_id,
                name,
                reply,
            } => {
                let _ = reply.send(self.handle_rename(client_id, &name));
            }
            ServerCommand::Snapshot { reply } => {
                let _ = reply.send(self.registry.snapshot());
            }
        }
    }

    /// Handle new client connection
    fn handle_connect(&mut self, sender: mpsc::Sender<String>) -> Result<Client, AppError> {
        if let Some(max) = self.max_clients {
            if self.registry.len() >= max {
                info!(max_clients = max, "Rejecting client: server is full");
                return Err(AppError::ServerFull);
            }
        }

        let client = self.registry.add(sender);
        info!(client = %client.id, name = %client.name, "Client registered");
        debug!("Total clients: {}", self.registry.len());
        Ok(client)
    }

    /// Handle client disconnection
    fn handle_disconnect(&mut self, client_id: ClientId) -> Option<Client> {
        let removed = self.registry.remove(client_id);
        if let Some(client) = &removed {
            info!(client = %client_id, name = %client.name, "Client unregistered");
        }
        debug!("Total clients: {}", self.registry.len());
        removed
    }

    /// Handle rename request
    fn handle_rename(&mut self, client_id: ClientId, name: &str) -> Result<String, RenameError> {
        match self.registry.rename(client_id, name) {
            Ok(old_name) => {
                info!(client = %client_id, from = %old_name, to = %name, "Client renamed");
                Ok(old_name)
            }
            Err(e) => {
                debug!(client = %client_id, "Rename rejected: {}", e);
                Err(e)
            }
        }
    }
}

/// Cloneable front end to the ChatServer actor
///
/// Exposes the registry operations as async calls that wait for the actor's reply.
#[derive(Debug, Clone)]
pub struct ServerHandle {
    commands: mpsc::Sender<ServerCommand>,
}

impl ServerHandle {
    pub fn new(commands: mpsc::Sender<ServerCommand>) -> Self {
        Self { commands }
    }

    /// Spawn a ChatServer actor on the current runtime and return its handle
    pub fn spawn(buffer: usize, max_clients: Option<usize>) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel(buffer);
        tokio::spawn(ChatServer::new(cmd_rx, max_clients).run());
        Self::new(cmd_tx)
    }

    /// Register a connection; the returned client carries its id and default name
    pub async fn connect(&self, sender: mpsc::Sender<String>) -> Result<Client, AppError> {
        self.request(|reply| ServerCommand::Connect { sender, reply })
            .await?
    }

    /// Remove a client and release its name
    pub async fn disconnect(&self, client_id: ClientId) -> Result<Option<Client>, AppError> {
        self.request(|reply| ServerCommand::Disconnect { client_id, reply })
            .await
    }

    /// Rename a client, returning its previous name
    pub async fn rename(&self, client_id: ClientId, name: &str) -> Result<String, AppError> {
        let name = name.to_string();
        let old_name = self
            .request(|reply| ServerCommand::Rename {
                client_id,
                name,
                reply,
            })
            .await??;
        Ok(old_name)
    }

    /// Point-in-time copy of the registered clients
    pub async fn snapshot(&self) -> Result<Vec<Client>, AppError> {
        self.request(|reply| ServerCommand::Snapshot { reply }).await
    }

    async fn request<T>(
        &self,
        command: impl FnOnce(oneshot::Sender<T>) -> ServerCommand,
    ) -> Result<T, AppError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.commands
            .send(command(reply_tx))
            .await
            .map_err(|_| AppError::ChannelSend)?;
        reply_rx.await.map_err(|_| AppError::ChannelSend)
    }
}
