//! WebSocket を使った MessagePusher 実装
//!
//! ## 責務
//!
//! - メンバーの `PusherChannel` へのメッセージ送信（push_to, broadcast）
//!
//! ## 設計ノート
//!
//! WebSocket の受付と送信チャンネルの生成は UI 層（`ui/handler/websocket.rs`）で行われます。
//! チャンネルの受信側はセッションごとの pusher ループが WebSocket に書き出します。
//! 切断済みのセッションのチャンネルは送信に失敗し、その失敗はメンバー単位で扱われます。

use async_trait::async_trait;

use crate::domain::{BroadcastReport, Member, MessagePushError, MessagePusher};

/// WebSocket を使った MessagePusher 実装
#[derive(Debug, Default, Clone, Copy)]
pub struct WebSocketMessagePusher;

impl WebSocketMessagePusher {
    /// 新しい WebSocketMessagePusher を作成
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl MessagePusher for WebSocketMessagePusher {
    async fn push_to(&self, member: &Member, content: &str) -> Result<(), MessagePushError> {
        member
            .channel
            .send(content.to_string())
            .map_err(|_| MessagePushError::ChannelClosed(member.id.to_string()))?;
        tracing::debug!("Pushed message to connection '{}'", member.id);
        Ok(())
    }

    async fn broadcast(&self, targets: &[Member], content: &str) -> BroadcastReport {
        let mut report = BroadcastReport::default();

        for target in targets {
            // ブロードキャストでは一部の送信失敗を許容
            match self.push_to(target, content).await {
                Ok(()) => report.delivered += 1,
                Err(e) => {
                    tracing::warn!("Failed to broadcast to connection '{}': {}", target.id, e);
                    report.failed += 1;
                }
            }
        }

        report
    }
}
