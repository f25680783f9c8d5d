//! Remote message store 実装
//!
//! - `http`: reqwest を使った REST クライアント

pub mod http;

pub use http::{BackendConfig, HttpMessageStore};
