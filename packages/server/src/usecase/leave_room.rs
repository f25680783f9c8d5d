//! UseCase: ルーム退出処理

use std::sync::Arc;

use crate::domain::{ConnectionId, RoomId, RoomRegistry};

/// ルーム退出のユースケース
pub struct LeaveRoomUseCase {
    /// Registry（ルームメンバー管理の抽象化）
    registry: Arc<dyn RoomRegistry>,
}

impl LeaveRoomUseCase {
    /// 新しい LeaveRoomUseCase を作成
    pub fn new(registry: Arc<dyn RoomRegistry>) -> Self {
        Self { registry }
    }

    /// ルーム退出を実行
    ///
    /// 参加が完了していない場合や既に退出済みの場合も安全に呼び出せる。
    ///
    /// # Returns
    ///
    /// メンバーを削除した場合 `true`、何もしなかった場合 `false`
    pub async fn execute(&self, room_id: &RoomId, connection_id: &ConnectionId) -> bool {
        self.registry.leave(room_id, connection_id).await
    }
}
