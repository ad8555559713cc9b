//! Lobby state: the room directory snapshot and the currently joined room.
//!
//! The directory is replaced wholesale on every list response; there is no
//! per-room diffing and no version number on the wire.  Seat notifications
//! (player joined/left) arrive independently of directory refreshes, so the
//! two race: whichever is processed later wins.  That last-write-wins
//! behaviour is an accepted protocol limitation, not a bug to fix here.

use std::collections::BTreeMap;

use crate::protocol::messages::{RoomEntry, RoomId, UserId};

/// Maximum number of players a room seats.
pub const ROOM_CAPACITY: usize = 2;

/// One room as known from the latest directory snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Room {
    pub id: RoomId,
    pub name: String,
    /// Ordered member list, at most [`ROOM_CAPACITY`] entries.
    pub members: Vec<UserId>,
}

impl Room {
    pub fn is_full(&self) -> bool {
        self.members.len() >= ROOM_CAPACITY
    }
}

impl From<RoomEntry> for Room {
    fn from(entry: RoomEntry) -> Self {
        Self {
            id: entry.room_id,
            name: entry.room_name,
            members: entry.players,
        }
    }
}

/// The full lobby room list, keyed by room id.
///
/// `BTreeMap` keeps iteration order stable so the lobby renders
/// deterministically between refreshes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoomDirectory {
    rooms: BTreeMap<RoomId, Room>,
}

impl RoomDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the entire snapshot with the given list response entries.
    pub fn replace_all(&mut self, entries: Vec<RoomEntry>) {
        self.rooms = entries
            .into_iter()
            .map(|entry| (entry.room_id, Room::from(entry)))
            .collect();
    }

    pub fn get(&self, id: RoomId) -> Option<&Room> {
        self.rooms.get(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Room> {
        self.rooms.values()
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }
}

/// The room the local user currently occupies, tracked separately from the
/// directory snapshot.
///
/// `seats[0]` is the creator's seat, `seats[1]` the opponent's.  Join/leave
/// notifications only ever touch seat 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentRoom {
    pub id: RoomId,
    pub seats: [Option<UserId>; ROOM_CAPACITY],
}

impl CurrentRoom {
    /// A room the local user just created: self in seat 0, seat 1 vacant
    /// pending a join notification.
    pub fn created_by(id: RoomId, creator: UserId) -> Self {
        Self {
            id,
            seats: [Some(creator), None],
        }
    }

    /// A room the local user joined.  The wire does not say who sits where,
    /// so both seats start unknown until a directory refresh fills them in.
    pub fn joined(id: RoomId) -> Self {
        Self {
            id,
            seats: [None, None],
        }
    }

    /// A player-joined notification: fills seat 1.
    pub fn seat_opponent(&mut self, user: UserId) {
        self.seats[1] = Some(user);
    }

    /// A player-left notification: vacates seat 1.
    pub fn vacate_opponent(&mut self) {
        self.seats[1] = None;
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: RoomId, name: &str, players: &[&str]) -> RoomEntry {
        RoomEntry {
            room_id: id,
            room_name: name.to_string(),
            players: players.iter().map(|p| p.to_string()).collect(),
        }
    }

    #[test]
    fn test_replace_all_discards_previous_snapshot() {
        // Arrange
        let mut directory = RoomDirectory::new();
        directory.replace_all(vec![entry(1, "first", &["alice"])]);

        // Act – a later snapshot without room 1
        directory.replace_all(vec![entry(2, "second", &[])]);

        // Assert – no incremental merge; only the latest snapshot survives
        assert_eq!(directory.len(), 1);
        assert!(directory.get(1).is_none());
        assert_eq!(directory.get(2).unwrap().name, "second");
    }

    #[test]
    fn test_replace_all_with_empty_list_clears_directory() {
        let mut directory = RoomDirectory::new();
        directory.replace_all(vec![entry(1, "only", &[])]);

        directory.replace_all(Vec::new());

        assert!(directory.is_empty());
    }

    #[test]
    fn test_room_full_at_capacity() {
        let room = Room::from(entry(5, "busy", &["alice", "bob"]));
        assert!(room.is_full());

        let room = Room::from(entry(6, "open", &["alice"]));
        assert!(!room.is_full());
    }

    #[test]
    fn test_directory_iterates_in_stable_id_order() {
        let mut directory = RoomDirectory::new();
        directory.replace_all(vec![entry(9, "c", &[]), entry(2, "a", &[]), entry(5, "b", &[])]);

        let ids: Vec<RoomId> = directory.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![2, 5, 9]);
    }

    #[test]
    fn test_created_room_seats_creator_first() {
        let room = CurrentRoom::created_by(42, "alice".to_string());
        assert_eq!(room.id, 42);
        assert_eq!(room.seats[0].as_deref(), Some("alice"));
        assert_eq!(room.seats[1], None);
    }

    #[test]
    fn test_opponent_seat_fills_and_vacates() {
        let mut room = CurrentRoom::created_by(42, "alice".to_string());

        room.seat_opponent("bob".to_string());
        assert_eq!(room.seats[1].as_deref(), Some("bob"));

        room.vacate_opponent();
        assert_eq!(room.seats[1], None);
        // Seat 0 is untouched by opponent notifications.
        assert_eq!(room.seats[0].as_deref(), Some("alice"));
    }
}
