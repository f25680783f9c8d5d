//! MessagePusher trait 定義
//!
//! 接続中のクライアントへフレームを届けるインターフェース。

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{BroadcastReport, Member, MessagePushError};

/// クライアントへの送信チャンネル
pub type PusherChannel = mpsc::UnboundedSender<String>;

/// MessagePusher trait
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// 特定のメンバーにメッセージを送信
    async fn push_to(&self, member: &Member, content: &str) -> Result<(), MessagePushError>;

    /// 複数のメンバーにメッセージを送信
    ///
    /// 一部のメンバーへの送信失敗は他のメンバーへの送信を妨げず、
    /// エラーとして呼び出し元に返さない（結果は `BroadcastReport` に集計）。
    async fn broadcast(&self, targets: &[Member], content: &str) -> BroadcastReport;
}
