//! MessageStore trait 定義
//!
//! リモートのメッセージストア（履歴取得・メッセージ永続化）へのインターフェース。
//!
//! ## エラーの扱い
//!
//! - `try_*` メソッドは失敗を `BackendError` として返す
//! - `fetch_history` / `submit_message` は失敗をログに記録し、
//!   空の履歴 / `false` に縮退させる（セッションを中断しない）

use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use super::{BackendError, HistoryEntry, MessageContent, RoomId, SessionToken};

/// MessageStore trait
#[cfg_attr(test, automock)]
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// ルームの履歴を取得（失敗時は `BackendError`）
    async fn try_fetch_history(
        &self,
        room_id: &RoomId,
        token: &SessionToken,
    ) -> Result<Vec<HistoryEntry>, BackendError>;

    /// メッセージを永続化（失敗時は `BackendError`）
    async fn try_submit_message(
        &self,
        room_id: &RoomId,
        content: &MessageContent,
        token: &SessionToken,
    ) -> Result<(), BackendError>;

    /// ルームの履歴を取得。失敗は空の履歴として扱う
    async fn fetch_history(&self, room_id: &RoomId, token: &SessionToken) -> Vec<HistoryEntry> {
        match self.try_fetch_history(room_id, token).await {
            Ok(history) => history,
            Err(e) => {
                tracing::warn!("Failed to fetch history for room '{}': {}", room_id, e);
                Vec::new()
            }
        }
    }

    /// メッセージを永続化。成功した場合のみ `true`
    async fn submit_message(
        &self,
        room_id: &RoomId,
        content: &MessageContent,
        token: &SessionToken,
    ) -> bool {
        match self.try_submit_message(room_id, content, token).await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Failed to submit message to room '{}': {}", room_id, e);
                false
            }
        }
    }
}
