//! MediumChat Relay Library
//!
//! A line-oriented TCP chat relay built on tokio using the Actor pattern for
//! registry state.
//!
//! # Features
//! - Plain newline-delimited text protocol
//! - Auto-assigned `user:<id>` names
//! - `/nick [name]` rename or reset, with reserved namespaces
//! - `/disconnect` graceful close
//! - Broadcast to every other client, tolerant of individual failures
//! - Admin console relaying local input as system messages
//! - Optional admission limit
//!
//! # Architecture
//! - `ChatServer` is the actor that exclusively owns the `ClientRegistry`
//!   (clients and their claimed names)
//! - Each connection runs a `handler` task plus a write task
//! - Broadcasts take a registry snapshot through the actor and deliver
//!   outside it, so slow peers never block registry updates
//!
//! # Example
//! ```ignore
//! use tokio::net::TcpListener;
//! use mediumchat::{serve, ServerHandle};
//!
//! #[tokio::main]
//! async fn main() {
//!     let listener = TcpListener::bind("127.0.0.1:4242").await.unwrap();
//!     let server = ServerHandle::spawn(256, None);
//!     serve(listener, server).await.unwrap();
//! }
//! ```

pub mod broadcast;
pub mod client;
pub mod codec;
pub mod config;
pub mod console;
pub mod error;
pub mod handler;
pub mod message;
pub mod names;
pub mod registry;
pub mod server;
pub mod types;

// Re-export main types for convenience
pub use broadcast::broadcast;
pub use client::Client;
pub use codec::LineCodec;
pub use config::Config;
pub use console::{run_console, spawn_line_reader};
pub use error::{AppError, RenameError, SendError};
pub use handler::{handle_connection, serve};
pub use message::{Command, Message};
pub use names::NameRegistry;
pub use registry::ClientRegistry;
pub use server::{ChatServer, ServerCommand, ServerHandle};
pub use types::ClientId;
