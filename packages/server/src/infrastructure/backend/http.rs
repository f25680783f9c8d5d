//! HTTP client for the remote message store.
//!
//! - `GET  {base}/ppv/{room_id}/messages` with bearer auth -> JSON array
//! - `POST {base}/ppv/{room_id}/message`  with bearer auth and `{"message": ...}`
//!
//! Any 2xx status is success. No retries are performed here.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, Url};

use crate::domain::{
    BackendError, HistoryEntry, MessageContent, MessageStore, RoomId, SessionToken,
};
use crate::infrastructure::dto::backend::SubmitMessageRequest;

/// Connection settings for the message store
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// e.g. `https://api.example.com/api`
    pub base_url: String,
    pub timeout: Duration,
}

impl BackendConfig {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            base_url: base_url.into(),
            timeout,
        }
    }
}

/// reqwest-backed `MessageStore`
#[derive(Clone)]
pub struct HttpMessageStore {
    client: Client,
    base_url: Url,
}

impl std::fmt::Debug for HttpMessageStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpMessageStore")
            .field("client", &"<reqwest::Client>")
            .field("base_url", &self.base_url.as_str())
            .finish()
    }
}

impl HttpMessageStore {
    /// Create a new client for the given backend
    pub fn new(config: BackendConfig) -> Result<Self, BackendError> {
        let base_url = Url::parse(config.base_url.trim_end_matches('/'))
            .map_err(|e| BackendError::InvalidBaseUrl(format!("{}: {}", config.base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(BackendError::InvalidBaseUrl(config.base_url));
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| BackendError::Transport(e.to_string()))?;

        Ok(Self { client, base_url })
    }

    /// `{base}/ppv/{room_id}/{leaf}` with the room id as a single encoded segment
    fn room_url(&self, room_id: &RoomId, leaf: &str) -> Url {
        let mut url = self.base_url.clone();
        // cannot_be_a_base() was rejected in new()
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend(["ppv", room_id.as_str(), leaf]);
        }
        url
    }

    async fn ensure_success(response: Response) -> Result<Response, BackendError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable body>".to_string());
        Err(BackendError::Status {
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl MessageStore for HttpMessageStore {
    async fn try_fetch_history(
        &self,
        room_id: &RoomId,
        token: &SessionToken,
    ) -> Result<Vec<HistoryEntry>, BackendError> {
        let url = self.room_url(room_id, "messages");
        tracing::debug!("Fetching history from {}", url);

        let response = self
            .client
            .get(url)
            .bearer_auth(token.as_str())
            .send()
            .await
            .map_err(|e| BackendError::Transport(e.to_string()))?;
        let response = Self::ensure_success(response).await?;

        let messages: Vec<serde_json::Value> = response
            .json()
            .await
            .map_err(|e| BackendError::Decode(e.to_string()))?;

        tracing::debug!(
            "Fetched {} history messages for room '{}'",
            messages.len(),
            room_id
        );
        Ok(messages.into_iter().map(HistoryEntry::from).collect())
    }

    async fn try_submit_message(
        &self,
        room_id: &RoomId,
        content: &MessageContent,
        token: &SessionToken,
    ) -> Result<(), BackendError> {
        let url = self.room_url(room_id, "message");
        tracing::debug!("Submitting message to {}", url);

        let response = self
            .client
            .post(url)
            .bearer_auth(token.as_str())
            .json(&SubmitMessageRequest {
                message: content.as_str(),
            })
            .send()
            .await
            .map_err(|e| BackendError::Transport(e.to_string()))?;
        Self::ensure_success(response).await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{body_json, header, method, path},
    };

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - 履歴取得・メッセージ送信のリクエスト形式（パス、Bearer 認証、JSON ボディ）
    // - 2xx 以外・通信失敗・不正な JSON の扱い
    // - fetch_history / submit_message が失敗を空の履歴 / false に縮退させること
    // ========================================

    fn room(id: &str) -> RoomId {
        RoomId::new(id.to_string()).unwrap()
    }

    fn token() -> SessionToken {
        SessionToken::new("T".to_string()).unwrap()
    }

    fn store_for(server: &MockServer) -> HttpMessageStore {
        HttpMessageStore::new(BackendConfig::new(
            format!("{}/api/", server.uri()),
            Duration::from_secs(5),
        ))
        .unwrap()
    }

    #[tokio::test]
    async fn test_fetch_history_preserves_order() {
        // テスト項目: バックエンドが返した順序のまま履歴を取得できる
        // given (前提条件):
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/ppv/42/messages"))
            .and(header("authorization", "Bearer T"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"message": "h1"},
                {"message": "h2"},
                {"message": "h3"}
            ])))
            .expect(1)
            .mount(&server)
            .await;
        let store = store_for(&server);

        // when (操作):
        let history = store.fetch_history(&room("42"), &token()).await;

        // then (期待する結果):
        let messages: Vec<String> = history
            .iter()
            .map(|h| {
                let v: serde_json::Value = serde_json::from_str(h.as_str()).unwrap();
                v["message"].as_str().unwrap().to_string()
            })
            .collect();
        assert_eq!(messages, vec!["h1", "h2", "h3"]);
    }

    #[tokio::test]
    async fn test_fetch_history_non_success_is_empty() {
        // テスト項目: 2xx 以外のレスポンスは空の履歴として扱われる
        // given (前提条件):
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/ppv/42/messages"))
            .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorized"))
            .mount(&server)
            .await;
        let store = store_for(&server);

        // when (操作):
        let strict = store.try_fetch_history(&room("42"), &token()).await;
        let lenient = store.fetch_history(&room("42"), &token()).await;

        // then (期待する結果):
        assert!(matches!(
            strict,
            Err(BackendError::Status { status: 401, ref body }) if body == "Unauthorized"
        ));
        assert!(lenient.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_history_invalid_json_is_decode_error() {
        // テスト項目: 配列でないレスポンスはデコードエラーになる
        // given (前提条件):
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"data": []})),
            )
            .mount(&server)
            .await;
        let store = store_for(&server);

        // when (操作):
        let result = store.try_fetch_history(&room("42"), &token()).await;

        // then (期待する結果):
        assert!(matches!(result, Err(BackendError::Decode(_))));
    }

    #[tokio::test]
    async fn test_fetch_history_transport_failure_is_empty() {
        // テスト項目: 接続できないバックエンドは空の履歴として扱われる
        // given (前提条件): リッスンしていないポートの URL
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);
        let store = HttpMessageStore::new(BackendConfig::new(
            format!("http://127.0.0.1:{}/api", port),
            Duration::from_secs(5),
        ))
        .unwrap();

        // when (操作):
        let strict = store.try_fetch_history(&room("42"), &token()).await;
        let lenient = store.fetch_history(&room("42"), &token()).await;

        // then (期待する結果):
        assert!(matches!(strict, Err(BackendError::Transport(_))));
        assert!(lenient.is_empty());
    }

    #[tokio::test]
    async fn test_submit_message_success_on_2xx() {
        // テスト項目: 2xx（201 を含む）は送信成功として扱われる
        // given (前提条件):
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/ppv/42/message"))
            .and(header("authorization", "Bearer T"))
            .and(body_json(serde_json::json!({"message": "hi"})))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;
        let store = store_for(&server);

        // when (操作):
        let sent = store
            .submit_message(&room("42"), &MessageContent::new("hi".to_string()), &token())
            .await;

        // then (期待する結果):
        assert!(sent);
    }

    #[tokio::test]
    async fn test_submit_message_failure_is_false() {
        // テスト項目: 2xx 以外のレスポンスは false になる
        // given (前提条件):
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/ppv/42/message"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
        let store = store_for(&server);

        // when (操作):
        let sent = store
            .submit_message(&room("42"), &MessageContent::new("hi".to_string()), &token())
            .await;

        // then (期待する結果):
        assert!(!sent);
    }

    #[tokio::test]
    async fn test_room_id_is_a_single_path_segment() {
        // テスト項目: ルーム ID に含まれる "/" はパス区切りとして扱われない
        // given (前提条件):
        let server = MockServer::start().await;
        let store = store_for(&server);

        // when (操作):
        let url = store.room_url(&room("a/b"), "messages");

        // then (期待する結果):
        assert_eq!(url.path(), "/api/ppv/a%2Fb/messages");
    }

    #[test]
    fn test_invalid_base_url_is_rejected() {
        // テスト項目: 不正なベース URL はエラーになる
        let result = HttpMessageStore::new(BackendConfig::new(
            "not a url",
            Duration::from_secs(1),
        ));
        assert!(matches!(result, Err(BackendError::InvalidBaseUrl(_))));
    }
}
