//! Data Transfer Objects (DTOs) for the chat relay.
//!
//! DTOs are organized by protocol:
//! - `backend`: request/response bodies of the remote message store
//! - `http`: HTTP API request/response bodies

pub mod backend;
pub mod conversion;
pub mod http;
