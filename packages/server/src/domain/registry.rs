//! Room registry trait 定義
//!
//! ルーム ID から接続中メンバーへの対応を管理するインターフェース。
//! プロセス全体で共有される唯一の可変状態であり、具体的な実装は
//! Infrastructure 層が提供します（依存性の逆転）。

use async_trait::async_trait;

use super::{ConnectionId, Member, RoomId, RoomSummary};

/// Room Registry trait
///
/// ## 並行性
///
/// - 同じルームへの変更とスナップショット取得は互いに排他
/// - 異なるルームへの操作は互いにブロックしない
/// - `members_of` はコピーを返すため、ブロードキャスト中に join / leave が
///   並行しても安全にイテレートできる
#[async_trait]
pub trait RoomRegistry: Send + Sync {
    /// メンバーをルームに登録（ルームが無ければ作成）
    ///
    /// 1 つの接続につき 1 回だけ呼ばれる前提。
    async fn join(&self, room_id: RoomId, member: Member);

    /// メンバーをルームから削除
    ///
    /// ルームやメンバーが存在しない場合は何もしない。削除した場合 `true`。
    async fn leave(&self, room_id: &RoomId, connection_id: &ConnectionId) -> bool;

    /// ルームのメンバー一覧のスナップショットを取得（登録順）
    async fn members_of(&self, room_id: &RoomId) -> Vec<Member>;

    /// メンバーが存在する全ルームの概要を取得（ルーム ID 順）
    async fn rooms(&self) -> Vec<RoomSummary>;
}
