//! UseCase: メッセージ送信処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SendMessageUseCase::execute() メソッド
//! - メッセージストアへの送信と、成功時のルーム全体へのブロードキャスト
//!
//! ### なぜこのテストが必要か
//! - 送信成功時は送信者を含む全メンバーに 1 回ずつ届く
//! - 送信失敗時は送信者にのみ失敗通知が届き、ブロードキャストされない
//! - 切断済みメンバーがいても他のメンバーへの配信は妨げられない
//!
//! ### どのような状況を想定しているか
//! - 正常系：単独メンバー、複数メンバーへのブロードキャスト
//! - 異常系：メッセージストアが拒否
//! - エッジケース：切断済みメンバーを含むルーム

use std::sync::Arc;

use crate::domain::{
    BroadcastFormat, BroadcastReport, Member, MessageContent, MessagePusher, MessageStore, RoomId,
    RoomRegistry, SessionToken,
};

use super::error::SendMessageError;

/// 送信失敗時に送信者へ返す通知
pub const SEND_FAILURE_NOTICE: &str = "Failed to send message";

/// メッセージ送信のユースケース
pub struct SendMessageUseCase {
    /// Registry（ルームメンバー管理の抽象化）
    registry: Arc<dyn RoomRegistry>,
    /// MessageStore（リモートメッセージストアの抽象化）
    message_store: Arc<dyn MessageStore>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
    /// ブロードキャスト時の表示形式
    format: BroadcastFormat,
}

impl SendMessageUseCase {
    /// 新しい SendMessageUseCase を作成
    pub fn new(
        registry: Arc<dyn RoomRegistry>,
        message_store: Arc<dyn MessageStore>,
        message_pusher: Arc<dyn MessagePusher>,
        format: BroadcastFormat,
    ) -> Self {
        Self {
            registry,
            message_store,
            message_pusher,
            format,
        }
    }

    /// メッセージ送信を実行
    ///
    /// # Arguments
    ///
    /// * `room_id` - 送信先のルーム
    /// * `sender` - 送信者のメンバー
    /// * `token` - バックエンド呼び出しに使うトークン
    /// * `content` - 受信したメッセージ
    ///
    /// # Returns
    ///
    /// * `Ok(BroadcastReport)` - 永続化に成功し、ブロードキャストした
    /// * `Err(SendMessageError::Rejected)` - 永続化に失敗し、送信者に通知した
    pub async fn execute(
        &self,
        room_id: &RoomId,
        sender: &Member,
        token: &SessionToken,
        content: MessageContent,
    ) -> Result<BroadcastReport, SendMessageError> {
        // 1. メッセージストアに送信
        if !self
            .message_store
            .submit_message(room_id, &content, token)
            .await
        {
            // 2a. 失敗: 送信者にのみ通知
            if let Err(e) = self
                .message_pusher
                .push_to(sender, SEND_FAILURE_NOTICE)
                .await
            {
                tracing::warn!("Failed to deliver failure notice: {}", e);
            }
            return Err(SendMessageError::Rejected);
        }

        // 2b. 成功: ルームのスナップショットに対してブロードキャスト（送信者を含む）
        let targets = self.registry.members_of(room_id).await;
        let payload = self.format.render(room_id, &content);
        let report = self.message_pusher.broadcast(&targets, &payload).await;

        tracing::debug!(
            "Broadcasted message in room '{}' to {} member(s) ({} failed)",
            room_id,
            report.delivered,
            report.failed
        );
        Ok(report)
    }
}
