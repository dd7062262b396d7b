//! Basic type definitions for the chat relay
//!
//! Provides the `ClientId` newtype used as registry key and message sender.

/// Unique client identifier (newtype pattern)
///
/// Assigned monotonically starting at 1 and never reused.
/// `ClientId::SYSTEM` (0) marks messages originating from the server itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClientId(pub u64);

impl ClientId {
    /// Sender id of server-originated (system) messages
    pub const SYSTEM: ClientId = ClientId(0);

    /// The auto-assigned display name for this id, `user:<id>`
    pub fn default_name(&self) -> String {
        format!("user:{}", self.0)
    }

    pub fn is_system(&self) -> bool {
        *self == Self::SYSTEM
    }
}

impl std::fmt::Display for ClientId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
