//! Conversion logic between DTOs and domain entities.

use ppvchat_shared::time::timestamp_to_rfc3339;

use crate::domain::{HistoryEntry, RoomSummary};
use crate::infrastructure::dto::http::{MemberDetailDto, RoomDetailDto, RoomSummaryDto};

// ========================================
// Backend JSON → Domain Entity
// ========================================

impl From<serde_json::Value> for HistoryEntry {
    fn from(value: serde_json::Value) -> Self {
        HistoryEntry::new(value.to_string())
    }
}

// ========================================
// Domain Entity → DTO
// ========================================

impl From<&RoomSummary> for RoomSummaryDto {
    fn from(room: &RoomSummary) -> Self {
        Self {
            id: room.id.as_str().to_string(),
            member_count: room.member_count(),
        }
    }
}

impl From<RoomSummary> for RoomDetailDto {
    fn from(room: RoomSummary) -> Self {
        Self {
            id: room.id.into_string(),
            members: room
                .members
                .into_iter()
                .map(|(id, joined_at)| MemberDetailDto {
                    connection_id: id.to_string(),
                    joined_at: timestamp_to_rfc3339(joined_at.value()),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ConnectionId, RoomId, Timestamp};

    #[test]
    fn test_json_value_to_history_entry() {
        // テスト項目: バックエンドの JSON オブジェクトがそのまま JSON テキストとして保持される
        // given (前提条件):
        let value = serde_json::json!({"id": 1, "message": "hi"});

        // when (操作):
        let entry = HistoryEntry::from(value.clone());

        // then (期待する結果):
        let parsed: serde_json::Value = serde_json::from_str(entry.as_str()).unwrap();
        assert_eq!(parsed, value);
    }

    #[test]
    fn test_room_summary_to_dtos() {
        // テスト項目: RoomSummary から一覧用・詳細用 DTO に変換できる
        // given (前提条件):
        let connection_id = ConnectionId::generate();
        let summary = RoomSummary {
            id: RoomId::new("42".to_string()).unwrap(),
            members: vec![(connection_id, Timestamp::new(1_704_067_200_000))],
        };

        // when (操作):
        let list_dto = RoomSummaryDto::from(&summary);
        let detail_dto = RoomDetailDto::from(summary);

        // then (期待する結果):
        assert_eq!(
            list_dto,
            RoomSummaryDto {
                id: "42".to_string(),
                member_count: 1
            }
        );
        assert_eq!(detail_dto.id, "42");
        assert_eq!(detail_dto.members.len(), 1);
        assert_eq!(detail_dto.members[0].connection_id, connection_id.to_string());
        assert_eq!(detail_dto.members[0].joined_at, "2024-01-01T00:00:00.000Z");
    }
}
