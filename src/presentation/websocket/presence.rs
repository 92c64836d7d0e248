//! Presence Registry
//!
//! Maps each identity to its single live connection handle. The registry is
//! last-connect-wins: registering a new session for an identity overwrites
//! the previous mapping without closing the superseded transport. Removal is
//! guarded by handle identity so a stale session's teardown can never evict
//! a newer live session.

use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use super::session::SessionHandle;

/// Concurrent identity -> session handle table.
///
/// DashMap shards give per-key serialization of register/unregister, so a
/// disconnect racing a reconnect of the same identity cannot corrupt the
/// mapping.
#[derive(Default)]
pub struct PresenceRegistry {
    connections: DashMap<String, Arc<SessionHandle>>,
}

impl PresenceRegistry {
    pub fn new() -> Self {
        Self {
            connections: DashMap::new(),
        }
    }

    /// Insert or overwrite the mapping for the handle's identity.
    ///
    /// A prior session for the same identity becomes unreachable through the
    /// registry; its transport is left to die on its own.
    pub fn register(&self, handle: Arc<SessionHandle>) {
        let identity = handle.identity().to_string();
        let replaced = self.connections.insert(identity.clone(), handle).is_some();

        if replaced {
            tracing::info!(user_id = %identity, "Session re-registered, replacing previous connection");
        } else {
            tracing::info!(user_id = %identity, "User connected");
        }
    }

    /// Remove the mapping, but only if the registered handle is this one.
    ///
    /// No-op when the identity is absent or a newer session has already
    /// taken the slot.
    pub fn unregister(&self, handle: &SessionHandle) {
        if let Entry::Occupied(entry) = self.connections.entry(handle.identity().to_string()) {
            if entry.get().session_id() == handle.session_id() {
                entry.remove();
                tracing::info!(user_id = %handle.identity(), "User disconnected");
            } else {
                tracing::debug!(
                    user_id = %handle.identity(),
                    "Stale unregister ignored, identity owned by a newer session"
                );
            }
        }
    }

    /// Whether the identity currently has a live session.
    pub fn is_online(&self, identity: &str) -> bool {
        self.connections.contains_key(identity)
    }

    /// Resolve the identity's current session handle.
    pub fn resolve(&self, identity: &str) -> Option<Arc<SessionHandle>> {
        self.connections.get(identity).map(|h| Arc::clone(&h))
    }

    /// Number of live sessions.
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presentation::websocket::events::OutboundEvent;
    use tokio::sync::mpsc;

    fn handle_for(identity: &str) -> (Arc<SessionHandle>, mpsc::UnboundedReceiver<OutboundEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Arc::new(SessionHandle::new(identity.to_string(), tx)), rx)
    }

    #[test]
    fn test_register_then_online_and_resolvable() {
        let registry = PresenceRegistry::new();
        let (handle, _rx) = handle_for("user_a");

        registry.register(Arc::clone(&handle));

        assert!(registry.is_online("user_a"));
        let resolved = registry.resolve("user_a").unwrap();
        assert_eq!(resolved.session_id(), handle.session_id());
    }

    #[test]
    fn test_unregister_with_matching_handle_goes_offline() {
        let registry = PresenceRegistry::new();
        let (handle, _rx) = handle_for("user_a");

        registry.register(Arc::clone(&handle));
        registry.unregister(&handle);

        assert!(!registry.is_online("user_a"));
        assert!(registry.resolve("user_a").is_none());
    }

    #[test]
    fn test_unregister_unknown_identity_is_noop() {
        let registry = PresenceRegistry::new();
        let (handle, _rx) = handle_for("user_ghost");

        registry.unregister(&handle);

        assert!(!registry.is_online("user_ghost"));
    }

    #[test]
    fn test_last_connect_wins() {
        let registry = PresenceRegistry::new();
        let (first, _rx1) = handle_for("user_a");
        let (second, _rx2) = handle_for("user_a");

        registry.register(Arc::clone(&first));
        registry.register(Arc::clone(&second));

        assert_eq!(registry.connection_count(), 1);
        let resolved = registry.resolve("user_a").unwrap();
        assert_eq!(resolved.session_id(), second.session_id());
    }

    #[test]
    fn test_stale_unregister_does_not_evict_newer_session() {
        let registry = PresenceRegistry::new();
        let (first, _rx1) = handle_for("user_a");
        let (second, _rx2) = handle_for("user_a");

        registry.register(Arc::clone(&first));
        registry.register(Arc::clone(&second));

        // The replaced session tears down after the reconnect.
        registry.unregister(&first);

        assert!(registry.is_online("user_a"));
        let resolved = registry.resolve("user_a").unwrap();
        assert_eq!(resolved.session_id(), second.session_id());
    }
}
