//! Entities and domain records.

use super::{
    message_pusher::PusherChannel,
    value_object::{ConnectionId, MessageContent, RoomId, Timestamp},
};

/// One live connection registered in a room.
///
/// The registry stores a clone of the member; the channel is owned by the
/// session that created it and stays usable only while that session runs.
#[derive(Debug, Clone)]
pub struct Member {
    pub id: ConnectionId,
    pub joined_at: Timestamp,
    pub channel: PusherChannel,
}

impl Member {
    pub fn new(id: ConnectionId, joined_at: Timestamp, channel: PusherChannel) -> Self {
        Self {
            id,
            joined_at,
            channel,
        }
    }
}

/// A single history item returned by the message store, kept as JSON text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry(String);

impl HistoryEntry {
    pub fn new(json: String) -> Self {
        Self(json)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// Read-only view of one room
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomSummary {
    pub id: RoomId,
    pub members: Vec<(ConnectionId, Timestamp)>,
}

impl RoomSummary {
    pub fn member_count(&self) -> usize {
        self.members.len()
    }
}

/// How an accepted chat message is rendered for the room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BroadcastFormat {
    /// The inbound text, unchanged
    #[default]
    Raw,
    /// `Message from {room}: {text}`
    Labelled,
}

impl BroadcastFormat {
    pub fn render(&self, room_id: &RoomId, content: &MessageContent) -> String {
        match self {
            Self::Raw => content.as_str().to_string(),
            Self::Labelled => format!("Message from {}: {}", room_id, content.as_str()),
        }
    }
}

/// Outcome of one fan-out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BroadcastReport {
    pub delivered: usize,
    pub failed: usize,
}
