//! Admin console
//!
//! Every line typed on the server's local input is relayed to all clients as
//! a system message.
//!
//! Input is read on a plain OS thread rather than through `tokio::io::stdin`,
//! whose pending read would keep the runtime from shutting down.

use std::io::BufRead;
use std::thread;

use tokio::sync::mpsc;
use tracing::{debug, error};

use crate::broadcast::broadcast;
use crate::error::AppError;
use crate::message::Message;
use crate::server::ServerHandle;

/// Console lines buffered between the reader thread and the relay task
const CONSOLE_BUFFER: usize = 16;

/// Read `input` line by line on a detached thread
///
/// The returned receiver closes when input ends or fails. The thread is never
/// joined; at process exit it is simply abandoned.
pub fn spawn_line_reader<R>(mut input: R) -> mpsc::Receiver<String>
where
    R: BufRead + Send + 'static,
{
    let (line_tx, line_rx) = mpsc::channel(CONSOLE_BUFFER);

    thread::spawn(move || {
        let mut buf = Vec::new();
        loop {
            buf.clear();
            match input.read_until(b'\n', &mut buf) {
                Ok(0) => break,
                Ok(_) => {
                    let line = buf.strip_suffix(b"\n").unwrap_or(&buf[..]);
                    let line = line.strip_suffix(b"\r").unwrap_or(line);
                    let line = String::from_utf8_lossy(line).into_owned();
                    if line_tx.blocking_send(line).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    error!("Failed to read from console: {}", e);
                    break;
                }
            }
        }
        debug!("Console input closed");
    });

    line_rx
}

/// Relay console lines until the reader closes
///
/// Returns the number of lines broadcast.
pub async fn run_console(
    mut lines: mpsc::Receiver<String>,
    server: ServerHandle,
) -> Result<usize, AppError> {
    let mut relayed = 0;

    while let Some(line) = lines.recv().await {
        broadcast(&server, Message::system(&line)).await?;
        relayed += 1;
    }

    Ok(relayed)
}
