//! Client registry
//!
//! Owns the connected clients together with the claimed display names, so that
//! every rename and removal updates both in one step.

use std::collections::HashMap;

use tokio::sync::mpsc;

use crate::client::Client;
use crate::error::RenameError;
use crate::names::NameRegistry;
use crate::types::ClientId;

/// Mapping from `ClientId` to `Client`, plus the names they hold
///
/// Not synchronized itself: the `ChatServer` actor owns it exclusively.
#[derive(Debug)]
pub struct ClientRegistry {
    clients: HashMap<ClientId, Client>,
    names: NameRegistry,
    next_id: u64,
}

impl Default for ClientRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ClientRegistry {
    pub fn new() -> Self {
        Self {
            clients: HashMap::new(),
            names: NameRegistry::new(),
            next_id: 1,
        }
    }

    /// Register a new client under the next id and its `user:<id>` name
    pub fn add(&mut self, sender: mpsc::Sender<String>) -> Client {
        let id = ClientId(self.next_id);
        self.next_id += 1;

        let client = Client::new(id, sender);
        // No one else may claim another client's auto name, so this cannot fail.
        let reserved = self.names.reserve(&client.name);
        debug_assert!(reserved, "auto name {} already claimed", client.name);

        self.clients.insert(id, client.clone());
        client
    }

    /// Remove a client and release its name
    ///
    /// Returns the removed client, or None if it was already gone.
    pub fn remove(&mut self, id: ClientId) -> Option<Client> {
        let client = self.clients.remove(&id)?;
        self.names.release(&client.name);
        Some(client)
    }

    /// Change a client's display name
    ///
    /// On success returns the previous name.
    pub fn rename(&mut self, id: ClientId, new_name: &str) -> Result<String, RenameError> {
        if NameRegistry::is_forbidden(new_name, id) {
            return Err(RenameError::Forbidden(new_name.to_string()));
        }
        let Some(client) = self.clients.get_mut(&id) else {
            return Err(RenameError::UnknownClient(id));
        };
        if !self.names.reserve(new_name) {
            return Err(RenameError::Taken(new_name.to_string()));
        }

        self.names.release(&client.name);
        let old_name = std::mem::replace(&mut client.name, new_name.to_string());
        Ok(old_name)
    }

    /// Point-in-time copy of all registered clients, ordered by id
    pub fn snapshot(&self) -> Vec<Client> {
        let mut clients: Vec<Client> = self.clients.values().cloned().collect();
        clients.sort_by_key(|c| c.id);
        clients
    }

    pub fn get(&self, id: ClientId) -> Option<&Client> {
        self.clients.get(&id)
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }

    /// Whether `name` is currently claimed
    pub fn is_name_taken(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Number of claimed names; equals `len()` whenever the registry is consistent
    pub fn claimed_names(&self) -> usize {
        self.names.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry_with(n: usize) -> (ClientRegistry, Vec<mpsc::Receiver<String>>) {
        let mut registry = ClientRegistry::new();
        let mut receivers = Vec::new();
        for _ in 0..n {
            let (tx, rx) = mpsc::channel(8);
            registry.add(tx);
            receivers.push(rx);
        }
        (registry, receivers)
    }

    fn assert_consistent(registry: &ClientRegistry) {
        assert_eq!(registry.claimed_names(), registry.len());
        for client in registry.snapshot() {
            assert!(registry.is_name_taken(&client.name));
        }
    }

    #[test]
    fn test_add_assigns_monotonic_ids() {
        let (mut registry, _rx) = registry_with(2);
        let ids: Vec<_> = registry.snapshot().iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![ClientId(1), ClientId(2)]);

        registry.remove(ClientId(2));
        let (tx, _rx3) = mpsc::channel(8);
        let client = registry.add(tx);
        assert_eq!(client.id, ClientId(3));
        assert_eq!(client.name, "user:3");
        assert_consistent(&registry);
    }

    #[test]
    fn test_remove_is_idempotent_and_releases_name() {
        let (mut registry, _rx) = registry_with(1);
        registry.rename(ClientId(1), "alice").unwrap();

        assert!(registry.remove(ClientId(1)).is_some());
        assert!(registry.remove(ClientId(1)).is_none());
        assert!(!registry.is_name_taken("alice"));
        assert!(registry.is_empty());
        assert_consistent(&registry);
    }

    #[test]
    fn test_rename_success_releases_old_name() {
        let (mut registry, _rx) = registry_with(1);

        let old = registry.rename(ClientId(1), "alice").unwrap();
        assert_eq!(old, "user:1");
        assert_eq!(registry.get(ClientId(1)).unwrap().name, "alice");
        assert!(!registry.is_name_taken("user:1"));
        assert_consistent(&registry);
    }

    #[test]
    fn test_rename_taken_leaves_both_names() {
        let (mut registry, _rx) = registry_with(2);
        registry.rename(ClientId(1), "alice").unwrap();

        let err = registry.rename(ClientId(2), "alice").unwrap_err();
        assert_eq!(err, RenameError::Taken("alice".into()));
        assert_eq!(registry.get(ClientId(1)).unwrap().name, "alice");
        assert_eq!(registry.get(ClientId(2)).unwrap().name, "user:2");
        assert_consistent(&registry);
    }

    #[test]
    fn test_rename_to_own_name_is_taken() {
        let (mut registry, _rx) = registry_with(1);
        registry.rename(ClientId(1), "alice").unwrap();
        assert!(matches!(
            registry.rename(ClientId(1), "alice"),
            Err(RenameError::Taken(_))
        ));
    }

    #[test]
    fn test_rename_forbidden() {
        let (mut registry, _rx) = registry_with(2);

        assert!(matches!(
            registry.rename(ClientId(1), "server"),
            Err(RenameError::Forbidden(_))
        ));
        assert!(matches!(
            registry.rename(ClientId(1), "user:2"),
            Err(RenameError::Forbidden(_))
        ));
        assert!(matches!(
            registry.rename(ClientId(1), "user:99"),
            Err(RenameError::Forbidden(_))
        ));
        assert_eq!(registry.get(ClientId(1)).unwrap().name, "user:1");
        assert_consistent(&registry);
    }

    #[test]
    fn test_reset_to_default_name() {
        let (mut registry, _rx) = registry_with(1);
        registry.rename(ClientId(1), "alice").unwrap();

        let old = registry.rename(ClientId(1), "user:1").unwrap();
        assert_eq!(old, "alice");
        assert!(registry.get(ClientId(1)).unwrap().has_default_name());
        assert!(!registry.is_name_taken("alice"));
    }

    #[test]
    fn test_rename_unknown_client() {
        let (mut registry, _rx) = registry_with(1);
        assert_eq!(
            registry.rename(ClientId(42), "ghost"),
            Err(RenameError::UnknownClient(ClientId(42)))
        );
        assert!(!registry.is_name_taken("ghost"));
    }

    #[test]
    fn test_name_freed_by_disconnect_is_reusable() {
        let (mut registry, _rx) = registry_with(2);
        registry.rename(ClientId(1), "alice").unwrap();
        registry.remove(ClientId(1));

        registry.rename(ClientId(2), "alice").unwrap();
        assert_eq!(registry.get(ClientId(2)).unwrap().name, "alice");
        assert_consistent(&registry);
    }

    #[test]
    fn test_mixed_operations_keep_names_unique() {
        let (mut registry, _rx) = registry_with(4);
        let candidates = ["alice", "bob", "alice", "user:1", "carol", "bob"];

        for (step, name) in candidates.iter().enumerate() {
            let id = ClientId((step % 4) as u64 + 1);
            let _ = registry.rename(id, name);
            assert_consistent(&registry);
        }
        registry.remove(ClientId(2));
        assert_consistent(&registry);

        let mut names: Vec<_> = registry.snapshot().into_iter().map(|c| c.name).collect();
        let total = names.len();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), total);
    }

    #[test]
    fn test_snapshot_is_a_copy() {
        let (mut registry, _rx) = registry_with(2);
        let snapshot = registry.snapshot();
        registry.remove(ClientId(1));
        registry.rename(ClientId(2), "bob").unwrap();

        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot[1].name, "user:2");
        assert_eq!(registry.len(), 1);
    }
}
