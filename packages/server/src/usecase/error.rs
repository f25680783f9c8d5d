//! UseCase error types.

use thiserror::Error;

use crate::domain::BackendError;

/// メッセージ送信のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SendMessageError {
    /// メッセージストアが受け付けなかった（通信失敗を含む）
    #[error("Message was not accepted by the message store")]
    Rejected,
}

/// 新着通知のエラー
#[derive(Debug, Error)]
pub enum NotifyRoomError {
    #[error("Failed to fetch messages: {0}")]
    Backend(#[from] BackendError),
}

/// ルーム詳細取得のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GetRoomDetailError {
    #[error("Room not found")]
    RoomNotFound,
}
