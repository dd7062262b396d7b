//! Display name bookkeeping
//!
//! Tracks which display names are claimed and enforces the naming policy.

use std::collections::HashSet;

use crate::types::ClientId;

/// Prefix reserved for server-originated names
pub const SYSTEM_NAME_PREFIX: &str = "server";

/// Prefix reserved for auto-assigned identities
pub const AUTO_NAME_PREFIX: &str = "user:";

/// Set of currently claimed display names
#[derive(Debug, Default)]
pub struct NameRegistry {
    names: HashSet<String>,
}

impl NameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `name` if it is free
    ///
    /// Returns false without touching the set if the name is already claimed.
    pub fn reserve(&mut self, name: &str) -> bool {
        if self.names.contains(name) {
            return false;
        }
        self.names.insert(name.to_string())
    }

    /// Unclaim `name`; no-op if absent
    pub fn release(&mut self, name: &str) {
        self.names.remove(name);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Check the naming policy for a client requesting `name`
    ///
    /// Anything starting with `server` is reserved for the server. Names in the
    /// `user:` namespace are only allowed when they equal the requester's own
    /// auto-assigned name.
    pub fn is_forbidden(name: &str, requester: ClientId) -> bool {
        if name.starts_with(SYSTEM_NAME_PREFIX) {
            return true;
        }
        name.starts_with(AUTO_NAME_PREFIX) && name != requester.default_name()
    }
}
