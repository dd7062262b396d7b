//! Connection handler
//!
//! Handles individual client connections: registration, line parsing,
//! command dispatch, and the write task that owns the outgoing half of the
//! stream.

use futures_util::StreamExt;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio_util::codec::{AnyDelimiterCodecError, FramedRead};
use tracing::{debug, error, info, warn};

use crate::broadcast::broadcast;
use crate::client::Client;
use crate::codec::LineCodec;
use crate::error::AppError;
use crate::message::{self, Command, Message, GOODBYE};
use crate::server::ServerHandle;

/// Buffered lines per client before senders wait on the write task
const OUTBOUND_BUFFER: usize = 32;

/// How the read loop ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Exit {
    /// Client sent `/disconnect`
    Requested,
    /// End of stream or read error
    Dropped,
}

/// Accept connections until the listener fails
///
/// Each accepted stream gets its own handler task.
pub async fn serve(listener: TcpListener, server: ServerHandle) -> Result<(), AppError> {
    loop {
        let (stream, addr) = listener.accept().await?;
        info!("New connection from {}", addr);

        let server = server.clone();
        tokio::spawn(async move {
            if let Err(e) = handle_connection(stream, server).await {
                error!("Connection handler error: {}", e);
            }
        });
    }
}

/// Handle one client connection from registration to close
///
/// Lines are read until `/disconnect`, end of stream or a read error. The
/// client is removed from the registry, and its name released, exactly once
/// on every exit path.
pub async fn handle_connection<S>(stream: S, server: ServerHandle) -> Result<(), AppError>
where
    S: AsyncRead + AsyncWrite + Send + 'static,
{
    let (reader, mut writer) = tokio::io::split(stream);

    // Create channel for server -> client lines
    let (line_tx, mut line_rx) = mpsc::channel::<String>(OUTBOUND_BUFFER);

    let mut client = match server.connect(line_tx).await {
        Ok(client) => client,
        Err(AppError::ServerFull) => {
            writer.write_all(message::server_full().as_bytes()).await?;
            writer.shutdown().await?;
            return Ok(());
        }
        Err(e) => return Err(e),
    };
    let client_id = client.id;
    info!(client = %client_id, "Client connected");

    // Spawn write task (lines -> stream)
    let write_task = tokio::spawn(async move {
        while let Some(line) = line_rx.recv().await {
            if let Err(e) = writer.write_all(line.as_bytes()).await {
                warn!(client = %client_id, "Failed to write to client: {}", e);
                break;
            }
        }
        let _ = writer.shutdown().await;
        debug!(client = %client_id, "Write task ended");
    });

    let exit = match run_session(&mut client, reader, &server).await {
        Ok(exit) => exit,
        Err(e) => {
            error!(client = %client_id, "Session aborted: {}", e);
            Exit::Dropped
        }
    };

    server.disconnect(client_id).await?;
    let name = client.name.clone();

    // Dropping the last sender lets the write task flush and close the stream.
    drop(client);
    let _ = write_task.await;

    if exit == Exit::Requested {
        broadcast(&server, Message::disconnected(client_id, &name)).await?;
    }

    info!(client = %client_id, name = %name, "Client disconnected");
    Ok(())
}

/// Greet the client, then read and dispatch lines until the session ends
async fn run_session<R>(
    client: &mut Client,
    reader: R,
    server: &ServerHandle,
) -> Result<Exit, AppError>
where
    R: AsyncRead + Unpin,
{
    let _ = client.send(message::motd(&client.name)).await;
    broadcast(server, Message::joined(client.id, &client.name)).await?;

    let mut lines = FramedRead::new(reader, LineCodec::new());
    loop {
        let line = match lines.next().await {
            Some(Ok(line)) => line,
            None => {
                debug!(client = %client.id, "Client closed the connection");
                return Ok(Exit::Dropped);
            }
            Some(Err(AnyDelimiterCodecError::MaxChunkLengthExceeded)) => {
                warn!(client = %client.id, "Line too long, dropping client");
                return Ok(Exit::Dropped);
            }
            Some(Err(e)) => {
                error!(client = %client.id, "Failed to read from client: {}", e);
                return Ok(Exit::Dropped);
            }
        };

        match Command::parse(&line) {
            Command::Nick(name) => {
                let name = name.map_or_else(|| client.id.default_name(), str::to_string);
                handle_nick(client, &name, server).await?;
            }
            Command::Disconnect => {
                let _ = client.send(GOODBYE).await;
                return Ok(Exit::Requested);
            }
            Command::Chat(text) => {
                broadcast(server, Message::chat(client.id, &client.name, text)).await?;
            }
        }
    }
}

/// Apply `/nick`; rejections are answered privately
async fn handle_nick(
    client: &mut Client,
    name: &str,
    server: &ServerHandle,
) -> Result<(), AppError> {
    match server.rename(client.id, name).await {
        Ok(old_name) => {
            client.name = name.to_string();
            broadcast(server, Message::renamed(&old_name, name)).await?;
            Ok(())
        }
        Err(AppError::Rename(e)) => {
            let _ = client.send(e.to_client_line()).await;
            Ok(())
        }
        Err(e) => Err(e),
    }
}
