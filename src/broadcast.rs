//! Message fan-out
//!
//! Delivers one message to every registered client except its sender. The
//! client set is copied from the registry first; sends happen afterwards so a
//! slow peer never holds up connects, renames or disconnects.

use futures_util::future::join_all;
use tracing::{debug, warn};

use crate::client::Client;
use crate::error::AppError;
use crate::message::Message;
use crate::server::ServerHandle;

/// Broadcast `message` to every registered client but its sender
///
/// Returns the number of clients the line was delivered to.
pub async fn broadcast(server: &ServerHandle, message: Message) -> Result<usize, AppError> {
    debug!(from = %message.sender, body = %message.body.trim_end(), "Broadcasting message");
    let clients = server.snapshot().await?;
    Ok(deliver(clients, &message).await)
}

/// Send `message.body` to each client in `clients` whose id differs from the sender
///
/// Sends run concurrently. A failed send is logged and skipped; the recipient
/// stays registered until its own handler notices the broken connection.
pub async fn deliver(clients: Vec<Client>, message: &Message) -> usize {
    let recipients = clients.into_iter().filter(|c| c.id != message.sender);

    let sends = recipients.map(|client| async move {
        match client.send(message.body.clone()).await {
            Ok(()) => true,
            Err(e) => {
                warn!(client = %client.id, "Failed to deliver message: {}", e);
                false
            }
        }
    });

    join_all(sends)
        .await
        .into_iter()
        .filter(|delivered| *delivered)
        .count()
}

#[cfg(test)]
mod tests {
    use tokio::sync::mpsc;

    use super::*;
    use crate::types::ClientId;

    fn client(id: u64) -> (Client, mpsc::Receiver<String>) {
        let (tx, rx) = mpsc::channel(8);
        (Client::new(ClientId(id), tx), rx)
    }

    #[tokio::test]
    async fn test_sender_excluded() {
        let (a, mut rx_a) = client(1);
        let (b, mut rx_b) = client(2);
        let (c, mut rx_c) = client(3);

        let msg = Message::chat(ClientId(1), "user:1", "hi");
        let delivered = deliver(vec![a, b, c], &msg).await;

        assert_eq!(delivered, 2);
        assert!(rx_a.try_recv().is_err());
        assert_eq!(rx_b.try_recv().unwrap(), "user:1> hi\n");
        assert_eq!(rx_c.try_recv().unwrap(), "user:1> hi\n");
        // Exactly once.
        assert!(rx_b.try_recv().is_err());
        assert!(rx_c.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_system_message_reaches_everyone() {
        let (a, mut rx_a) = client(1);
        let (b, mut rx_b) = client(2);

        let delivered = deliver(vec![a, b], &Message::system("maintenance")).await;

        assert_eq!(delivered, 2);
        assert_eq!(rx_a.try_recv().unwrap(), "server! maintenance\n");
        assert_eq!(rx_b.try_recv().unwrap(), "server! maintenance\n");
    }

    #[tokio::test]
    async fn test_failed_delivery_does_not_abort() {
        let (a, rx_a) = client(1);
        let (b, mut rx_b) = client(2);
        let (c, mut rx_c) = client(3);
        drop(rx_a);

        let delivered = deliver(vec![a, b, c], &Message::system("still here")).await;

        assert_eq!(delivered, 2);
        assert_eq!(rx_b.try_recv().unwrap(), "server! still here\n");
        assert_eq!(rx_c.try_recv().unwrap(), "server! still here\n");
    }

    #[tokio::test]
    async fn test_broadcast_uses_registry_snapshot() {
        let server = ServerHandle::spawn(16, None);
        let (tx1, mut rx1) = mpsc::channel(8);
        let (tx2, mut rx2) = mpsc::channel(8);
        let a = server.connect(tx1).await.unwrap();
        let b = server.connect(tx2).await.unwrap();

        let delivered = broadcast(&server, Message::chat(a.id, &a.name, "yo"))
            .await
            .unwrap();
        assert_eq!(delivered, 1);
        assert_eq!(rx2.recv().await.unwrap(), "user:1> yo\n");

        server.disconnect(b.id).await.unwrap();
        let delivered = broadcast(&server, Message::system("bye")).await.unwrap();
        assert_eq!(delivered, 1);
        assert_eq!(rx1.recv().await.unwrap(), "server! bye\n");
    }
}
