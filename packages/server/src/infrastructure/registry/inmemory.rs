//! InMemory Room Registry 実装
//!
//! ドメイン層が定義する RoomRegistry trait の具体的な実装。
//! `DashMap` をシャード化された並行マップとして使用します。
//!
//! ## ロックの粒度
//!
//! ルームごとのメンバー一覧は DashMap のシャードロックで保護されます。
//! 同じルームへの操作は排他になり、別シャードのルームは互いにブロックしません。
//! ロックは同期的な短い区間でのみ保持し、`.await` をまたいで保持しません。

use async_trait::async_trait;
use dashmap::DashMap;

use crate::domain::{ConnectionId, Member, RoomId, RoomRegistry, RoomSummary};

/// インメモリ Room Registry 実装
#[derive(Debug, Default)]
pub struct InMemoryRoomRegistry {
    /// Key: RoomId, Value: 登録順のメンバー一覧
    rooms: DashMap<RoomId, Vec<Member>>,
}

impl InMemoryRoomRegistry {
    /// 新しい InMemoryRoomRegistry を作成
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RoomRegistry for InMemoryRoomRegistry {
    async fn join(&self, room_id: RoomId, member: Member) {
        tracing::debug!("Connection '{}' joined room '{}'", member.id, room_id);
        self.rooms.entry(room_id).or_default().push(member);
    }

    async fn leave(&self, room_id: &RoomId, connection_id: &ConnectionId) -> bool {
        let removed = match self.rooms.get_mut(room_id) {
            Some(mut members) => {
                let before = members.len();
                members.retain(|m| m.id != *connection_id);
                members.len() != before
            }
            None => false,
        };

        // 空になったルームは削除（シャードロックは上のブロックで解放済み）
        self.rooms.remove_if(room_id, |_, members| members.is_empty());

        if removed {
            tracing::debug!("Connection '{}' left room '{}'", connection_id, room_id);
        }
        removed
    }

    async fn members_of(&self, room_id: &RoomId) -> Vec<Member> {
        self.rooms
            .get(room_id)
            .map(|members| members.value().clone())
            .unwrap_or_default()
    }

    async fn rooms(&self) -> Vec<RoomSummary> {
        let mut rooms: Vec<RoomSummary> = self
            .rooms
            .iter()
            .filter(|entry| !entry.value().is_empty())
            .map(|entry| RoomSummary {
                id: entry.key().clone(),
                members: entry.value().iter().map(|m| (m.id, m.joined_at)).collect(),
            })
            .collect();
        rooms.sort_by(|a, b| a.id.cmp(&b.id));
        rooms
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::domain::Timestamp;
    use tokio::sync::mpsc;

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - InMemoryRoomRegistry の join / leave / members_of / rooms
    // - leave の冪等性（存在しないルーム・メンバー）
    // - ルーム間の独立性と並行アクセス時の整合性
    //
    // 【なぜこのテストが必要か】
    // - Registry はプロセス全体で共有される唯一の可変状態
    // - members_of はアクティブなセッションを過不足なく返す必要がある
    // ========================================

    fn create_member() -> (Member, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Member::new(ConnectionId::generate(), Timestamp::new(1000), tx),
            rx,
        )
    }

    fn room(id: &str) -> RoomId {
        RoomId::new(id.to_string()).unwrap()
    }

    #[tokio::test]
    async fn test_join_creates_room() {
        // テスト項目: 最初のメンバーの join でルームが作成される
        // given (前提条件):
        let registry = InMemoryRoomRegistry::new();
        let (alice, _rx) = create_member();

        // when (操作):
        registry.join(room("42"), alice.clone()).await;

        // then (期待する結果):
        let members = registry.members_of(&room("42")).await;
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].id, alice.id);
    }

    #[tokio::test]
    async fn test_members_of_keeps_join_order() {
        // テスト項目: members_of は登録順でメンバーを返す
        // given (前提条件):
        let registry = InMemoryRoomRegistry::new();
        let (alice, _rx1) = create_member();
        let (bob, _rx2) = create_member();
        let (charlie, _rx3) = create_member();

        // when (操作):
        registry.join(room("42"), alice.clone()).await;
        registry.join(room("42"), bob.clone()).await;
        registry.join(room("42"), charlie.clone()).await;

        // then (期待する結果):
        let ids: Vec<ConnectionId> = registry
            .members_of(&room("42"))
            .await
            .into_iter()
            .map(|m| m.id)
            .collect();
        assert_eq!(ids, vec![alice.id, bob.id, charlie.id]);
    }

    #[tokio::test]
    async fn test_leave_removes_member() {
        // テスト項目: leave したメンバーは members_of に含まれない
        // given (前提条件):
        let registry = InMemoryRoomRegistry::new();
        let (alice, _rx1) = create_member();
        let (bob, _rx2) = create_member();
        registry.join(room("42"), alice.clone()).await;
        registry.join(room("42"), bob.clone()).await;

        // when (操作):
        let removed = registry.leave(&room("42"), &alice.id).await;

        // then (期待する結果):
        assert!(removed);
        let members = registry.members_of(&room("42")).await;
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].id, bob.id);
    }

    #[tokio::test]
    async fn test_leave_unknown_room_is_noop() {
        // テスト項目: 存在しないルームからの leave はエラーにならない（冪等性）
        // given (前提条件):
        let registry = InMemoryRoomRegistry::new();

        // when (操作):
        let removed = registry.leave(&room("missing"), &ConnectionId::generate()).await;

        // then (期待する結果):
        assert!(!removed);
        assert!(registry.rooms().await.is_empty());
    }

    #[tokio::test]
    async fn test_leave_twice_is_noop() {
        // テスト項目: 同じメンバーを 2 回 leave しても問題ない
        // given (前提条件):
        let registry = InMemoryRoomRegistry::new();
        let (alice, _rx) = create_member();
        let (bob, _rx2) = create_member();
        registry.join(room("42"), alice.clone()).await;
        registry.join(room("42"), bob.clone()).await;

        // when (操作):
        assert!(registry.leave(&room("42"), &alice.id).await);
        let second = registry.leave(&room("42"), &alice.id).await;

        // then (期待する結果):
        assert!(!second);
        assert_eq!(registry.members_of(&room("42")).await.len(), 1);
    }

    #[tokio::test]
    async fn test_last_leave_drops_room() {
        // テスト項目: 最後のメンバーが leave するとルームが消える
        // given (前提条件):
        let registry = InMemoryRoomRegistry::new();
        let (alice, _rx) = create_member();
        registry.join(room("42"), alice.clone()).await;

        // when (操作):
        registry.leave(&room("42"), &alice.id).await;

        // then (期待する結果):
        assert!(registry.members_of(&room("42")).await.is_empty());
        assert!(registry.rooms().await.is_empty());
    }

    #[tokio::test]
    async fn test_rooms_are_isolated() {
        // テスト項目: 別ルームのメンバーは互いに影響しない
        // given (前提条件):
        let registry = InMemoryRoomRegistry::new();
        let (alice, _rx1) = create_member();
        let (bob, _rx2) = create_member();
        registry.join(room("42"), alice.clone()).await;
        registry.join(room("7"), bob.clone()).await;

        // when (操作): 別ルームの ID で leave しても削除されない
        let removed = registry.leave(&room("7"), &alice.id).await;

        // then (期待する結果):
        assert!(!removed);
        assert_eq!(registry.members_of(&room("42")).await.len(), 1);
        assert_eq!(registry.members_of(&room("7")).await.len(), 1);

        let rooms = registry.rooms().await;
        assert_eq!(rooms.len(), 2);
        assert_eq!(rooms[0].id.as_str(), "42");
        assert_eq!(rooms[1].id.as_str(), "7");
        assert_eq!(rooms[0].member_count(), 1);
    }

    #[tokio::test]
    async fn test_snapshot_is_unaffected_by_later_leave() {
        // テスト項目: 取得済みのスナップショットは後続の leave の影響を受けない
        // given (前提条件):
        let registry = InMemoryRoomRegistry::new();
        let (alice, _rx1) = create_member();
        let (bob, _rx2) = create_member();
        registry.join(room("42"), alice.clone()).await;
        registry.join(room("42"), bob.clone()).await;
        let snapshot = registry.members_of(&room("42")).await;

        // when (操作):
        registry.leave(&room("42"), &bob.id).await;

        // then (期待する結果):
        assert_eq!(snapshot.len(), 2);
        assert_eq!(registry.members_of(&room("42")).await.len(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_join_and_leave() {
        // テスト項目: 並行して join / leave してもアクティブなメンバーだけが残る
        // given (前提条件):
        let registry = Arc::new(InMemoryRoomRegistry::new());
        let mut handles = Vec::new();

        // when (操作): 偶数番目は join のみ、奇数番目は join 後に leave
        for i in 0..64 {
            let registry = registry.clone();
            handles.push(tokio::spawn(async move {
                let (member, rx) = create_member();
                let room_id = room(if i % 2 == 0 { "42" } else { "7" });
                registry.join(room_id.clone(), member.clone()).await;
                let _ = registry.members_of(&room_id).await;
                if i % 4 == 1 || i % 4 == 2 {
                    registry.leave(&room_id, &member.id).await;
                }
                (member, rx)
            }));
        }
        let mut kept = Vec::new();
        for handle in handles {
            kept.push(handle.await.unwrap());
        }

        // then (期待する結果): 各ルームに 16 人ずつ残る
        assert_eq!(registry.members_of(&room("42")).await.len(), 16);
        assert_eq!(registry.members_of(&room("7")).await.len(), 16);
    }
}
