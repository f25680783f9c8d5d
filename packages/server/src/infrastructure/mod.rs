//! Infrastructure layer: concrete implementations of the domain traits.

pub mod backend;
pub mod dto;
pub mod message_pusher;
pub mod registry;
