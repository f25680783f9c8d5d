//! UseCase: 新着メッセージ通知処理
//!
//! バックエンドから新着の通知を受けたとき、ルームの履歴を取り直して
//! 現在のメンバー全員に配信する。

use std::sync::Arc;

use crate::domain::{
    BroadcastReport, MessagePusher, MessageStore, RoomId, RoomRegistry, SessionToken,
};

use super::error::NotifyRoomError;

/// 新着通知のユースケース
pub struct NotifyRoomUseCase {
    registry: Arc<dyn RoomRegistry>,
    message_store: Arc<dyn MessageStore>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl NotifyRoomUseCase {
    /// 新しい NotifyRoomUseCase を作成
    pub fn new(
        registry: Arc<dyn RoomRegistry>,
        message_store: Arc<dyn MessageStore>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            registry,
            message_store,
            message_pusher,
        }
    }

    /// 新着通知を実行
    ///
    /// 履歴の各エントリを 1 フレームずつ、バックエンドが返した順に配信する。
    ///
    /// # Returns
    ///
    /// * `Ok(BroadcastReport)` - 全エントリの配信結果の合計
    /// * `Err(NotifyRoomError)` - 履歴の取得に失敗（何も配信しない）
    pub async fn execute(
        &self,
        room_id: &RoomId,
        token: &SessionToken,
    ) -> Result<BroadcastReport, NotifyRoomError> {
        let history = self.message_store.try_fetch_history(room_id, token).await?;
        let targets = self.registry.members_of(room_id).await;

        let mut total = BroadcastReport::default();
        for entry in &history {
            let report = self.message_pusher.broadcast(&targets, entry.as_str()).await;
            total.delivered += report.delivered;
            total.failed += report.failed;
        }

        tracing::info!(
            "Pushed {} history message(s) to {} member(s) of room '{}'",
            history.len(),
            targets.len(),
            room_id
        );
        Ok(total)
    }
}
