//! UseCase: ルーム情報の取得（読み取り専用）

use std::sync::Arc;

use crate::domain::{RoomId, RoomRegistry, RoomSummary};

use super::error::GetRoomDetailError;

/// ルーム一覧取得のユースケース
pub struct GetRoomsUseCase {
    registry: Arc<dyn RoomRegistry>,
}

impl GetRoomsUseCase {
    pub fn new(registry: Arc<dyn RoomRegistry>) -> Self {
        Self { registry }
    }

    /// メンバーが存在するルームの一覧（ルーム ID 順）
    pub async fn execute(&self) -> Vec<RoomSummary> {
        self.registry.rooms().await
    }
}

/// ルーム詳細取得のユースケース
pub struct GetRoomDetailUseCase {
    registry: Arc<dyn RoomRegistry>,
}

impl GetRoomDetailUseCase {
    pub fn new(registry: Arc<dyn RoomRegistry>) -> Self {
        Self { registry }
    }

    /// ルーム詳細を取得。メンバーがいないルームは `RoomNotFound`
    pub async fn execute(&self, room_id: &RoomId) -> Result<RoomSummary, GetRoomDetailError> {
        let members = self.registry.members_of(room_id).await;
        if members.is_empty() {
            return Err(GetRoomDetailError::RoomNotFound);
        }
        Ok(RoomSummary {
            id: room_id.clone(),
            members: members.iter().map(|m| (m.id, m.joined_at)).collect(),
        })
    }
}
