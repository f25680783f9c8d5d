//! UseCase: ルーム参加処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - JoinRoomUseCase::execute() メソッド
//! - メンバー登録と履歴取得（Connecting -> Active の副作用）
//!
//! ### どのような状況を想定しているか
//! - 正常系：履歴ありのルームへの参加
//! - エッジケース：メンバーのいないルーム、履歴取得の失敗（空の履歴として続行）

use std::sync::Arc;

use crate::domain::{
    ConnectionId, HistoryEntry, Member, MessageStore, PusherChannel, RoomId, RoomRegistry,
    SessionToken, Timestamp,
};

/// 参加結果
#[derive(Debug)]
pub struct JoinedRoom {
    /// 登録されたメンバー
    pub member: Member,
    /// バックエンドが返した順序の履歴（失敗時は空）
    pub history: Vec<HistoryEntry>,
}

/// ルーム参加のユースケース
pub struct JoinRoomUseCase {
    /// Registry（ルームメンバー管理の抽象化）
    registry: Arc<dyn RoomRegistry>,
    /// MessageStore（リモートメッセージストアの抽象化）
    message_store: Arc<dyn MessageStore>,
}

impl JoinRoomUseCase {
    /// 新しい JoinRoomUseCase を作成
    pub fn new(registry: Arc<dyn RoomRegistry>, message_store: Arc<dyn MessageStore>) -> Self {
        Self {
            registry,
            message_store,
        }
    }

    /// ルーム参加を実行
    ///
    /// メンバーを登録してから履歴を取得する。登録が先なので、履歴取得中に
    /// 送られたメッセージも `channel` に届く。
    ///
    /// # Arguments
    ///
    /// * `room_id` - 参加するルーム
    /// * `token` - バックエンド呼び出しに使うトークン
    /// * `channel` - このメンバーへの送信チャンネル
    pub async fn execute(
        &self,
        room_id: RoomId,
        token: &SessionToken,
        channel: PusherChannel,
    ) -> JoinedRoom {
        // 1. Registry にメンバーを登録
        let member = Member::new(ConnectionId::generate(), Timestamp::now(), channel);
        self.registry.join(room_id.clone(), member.clone()).await;

        // 2. 履歴を取得（失敗時は空）
        let history = self.message_store.fetch_history(&room_id, token).await;

        JoinedRoom { member, history }
    }
}
