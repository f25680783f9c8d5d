//! Utilities shared by the ppvchat binaries.

pub mod logger;
pub mod time;
