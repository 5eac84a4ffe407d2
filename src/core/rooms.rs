//! Room snapshots
//!
//! The live room list belongs to the chat server. The stylesheet only needs a
//! point-in-time view of it, taken fresh on every generation.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Room that never gets per-room selectors
pub const GLOBAL_ROOM: &str = "global";

/// Room kind that carries a user list
pub const CHAT_ROOM_TYPE: &str = "chat";

/// Room as seen by the stylesheet generator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomDescriptor {
    /// Room id
    pub id: String,
    /// Room type ("chat", "battle", ...)
    #[serde(rename = "type")]
    pub kind: String,
    /// Personal (user-owned) room
    #[serde(default, rename = "isPersonal")]
    pub is_personal: bool,
}

impl RoomDescriptor {
    /// Public chat room
    pub fn chat(id: &str) -> Self {
        Self {
            id: id.to_string(),
            kind: CHAT_ROOM_TYPE.to_string(),
            is_personal: false,
        }
    }

    /// Whether the room gets user list selectors
    pub fn is_styled(&self) -> bool {
        self.kind == CHAT_ROOM_TYPE
            && !self.is_personal
            && self.id != GLOBAL_ROOM
            && !self.id.starts_with(|c: char| c.is_ascii_digit())
    }
}

/// Source of room snapshots
pub trait RoomSource: Send + Sync {
    /// Current rooms
    fn snapshot(&self) -> Vec<RoomDescriptor>;
}

/// Fixed room list
#[derive(Debug, Clone, Default)]
pub struct StaticRooms {
    rooms: Vec<RoomDescriptor>,
}

impl StaticRooms {
    pub fn new(rooms: Vec<RoomDescriptor>) -> Self {
        Self { rooms }
    }
}

impl RoomSource for StaticRooms {
    fn snapshot(&self) -> Vec<RoomDescriptor> {
        self.rooms.clone()
    }
}

/// Room list exported by the chat server as a JSON array
///
/// Read on every snapshot. A missing or unreadable file yields no rooms.
#[derive(Debug, Clone)]
pub struct RoomsFile {
    path: PathBuf,
}

impl RoomsFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl RoomSource for RoomsFile {
    fn snapshot(&self) -> Vec<RoomDescriptor> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), "Room list unavailable: {}", e);
                return Vec::new();
            }
        };
        serde_json::from_str(&content).unwrap_or_else(|e| {
            tracing::warn!(path = %self.path.display(), "Room list is malformed: {}", e);
            Vec::new()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_filter() {
        assert!(RoomDescriptor::chat("lobby").is_styled());
        assert!(!RoomDescriptor::chat("global").is_styled());
        assert!(!RoomDescriptor::chat("1v1").is_styled());

        let mut personal = RoomDescriptor::chat("groupchat-bob-fun");
        personal.is_personal = true;
        assert!(!personal.is_styled());

        let battle = RoomDescriptor {
            id: "battle-gen9ou-1".to_string(),
            kind: "battle".to_string(),
            is_personal: false,
        };
        assert!(!battle.is_styled());
    }

    #[test]
    fn test_rooms_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rooms.json");
        std::fs::write(
            &path,
            r#"[{"id": "lobby", "type": "chat"}, {"id": "help", "type": "chat", "isPersonal": true}]"#,
        )
        .unwrap();

        let rooms = RoomsFile::new(&path).snapshot();
        assert_eq!(rooms.len(), 2);
        assert!(!rooms[0].is_personal);
        assert!(rooms[1].is_personal);

        std::fs::write(&path, "not json").unwrap();
        assert!(RoomsFile::new(&path).snapshot().is_empty());
        assert!(RoomsFile::new(dir.path().join("missing.json")).snapshot().is_empty());
    }
}
