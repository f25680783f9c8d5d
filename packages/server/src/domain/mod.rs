//! Domain layer: value objects, entities and the traits other layers implement.

pub mod entity;
pub mod error;
pub mod message_pusher;
pub mod message_store;
pub mod registry;
pub mod session;
pub mod value_object;

pub use entity::{BroadcastFormat, BroadcastReport, HistoryEntry, Member, RoomSummary};
pub use error::{BackendError, MessagePushError, ValueObjectError};
pub use message_pusher::{MessagePusher, PusherChannel};
pub use message_store::MessageStore;
pub use registry::RoomRegistry;
pub use session::SessionPhase;
pub use value_object::{ConnectionId, MessageContent, RoomId, SessionToken, Timestamp};

#[cfg(test)]
pub use message_store::MockMessageStore;
