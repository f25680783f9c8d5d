//! Real-time chat relay for pay-per-view event rooms.
//!
//! Clients join a room over WebSocket, receive its history from the remote
//! message store, and every message they send is persisted through the store
//! and then broadcast to all members of the room.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
