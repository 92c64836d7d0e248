//! Room Membership Table
//!
//! Maps a conversation id to the set of member identities, independent of
//! connection state. Rooms are ephemeral: created implicitly on first join,
//! never persisted, and a reconnecting client must re-issue joins.
//!
//! Membership is intentionally NOT pruned when a member disconnects; the
//! router simply skips offline members during fan-out.

use std::collections::HashSet;

use dashmap::DashMap;

/// Concurrent room id -> member identity set table.
#[derive(Default)]
pub struct RoomTable {
    rooms: DashMap<String, HashSet<String>>,
}

impl RoomTable {
    pub fn new() -> Self {
        Self {
            rooms: DashMap::new(),
        }
    }

    /// Add an identity to a room, creating the room if absent. Idempotent.
    pub fn join(&self, room_id: &str, identity: &str) {
        let inserted = self
            .rooms
            .entry(room_id.to_string())
            .or_default()
            .insert(identity.to_string());

        if inserted {
            tracing::info!(user_id = %identity, room_id = %room_id, "User joined room");
        }
    }

    /// Remove an identity from a room. Idempotent; a no-op for non-members.
    /// Emptied rooms are dropped from the table.
    pub fn leave(&self, room_id: &str, identity: &str) {
        let mut now_empty = false;
        if let Some(mut members) = self.rooms.get_mut(room_id) {
            if members.remove(identity) {
                tracing::info!(user_id = %identity, room_id = %room_id, "User left room");
            }
            now_empty = members.is_empty();
        }

        // Guard must be released before removal to avoid a shard deadlock.
        if now_empty {
            self.rooms.remove_if(room_id, |_, members| members.is_empty());
        }
    }

    /// Snapshot of the room's member identities for broadcast fan-out.
    pub fn members(&self, room_id: &str) -> Vec<String> {
        self.rooms
            .get(room_id)
            .map(|members| members.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Number of members in a room.
    pub fn member_count(&self, room_id: &str) -> usize {
        self.rooms.get(room_id).map(|m| m.len()).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_creates_room() {
        let rooms = RoomTable::new();

        rooms.join("conv_1", "user_a");

        assert_eq!(rooms.members("conv_1"), vec!["user_a".to_string()]);
    }

    #[test]
    fn test_join_is_idempotent() {
        let rooms = RoomTable::new();

        rooms.join("conv_1", "user_a");
        rooms.join("conv_1", "user_a");

        assert_eq!(rooms.member_count("conv_1"), 1);
    }

    #[test]
    fn test_leave_removes_member() {
        let rooms = RoomTable::new();
        rooms.join("conv_1", "user_a");
        rooms.join("conv_1", "user_b");

        rooms.leave("conv_1", "user_a");

        assert_eq!(rooms.members("conv_1"), vec!["user_b".to_string()]);
    }

    #[test]
    fn test_leave_nonmember_is_noop() {
        let rooms = RoomTable::new();
        rooms.join("conv_1", "user_a");

        rooms.leave("conv_1", "user_b");
        rooms.leave("conv_missing", "user_a");

        assert_eq!(rooms.member_count("conv_1"), 1);
    }

    #[test]
    fn test_emptied_room_reports_no_members() {
        let rooms = RoomTable::new();
        rooms.join("conv_1", "user_a");

        rooms.leave("conv_1", "user_a");

        assert!(rooms.members("conv_1").is_empty());
        assert_eq!(rooms.member_count("conv_1"), 0);
    }
}
