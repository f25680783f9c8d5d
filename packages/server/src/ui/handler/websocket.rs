//! WebSocket connection handlers.
//!
//! Each accepted connection runs one [`ConnectionSession`]:
//! `Connecting -> Active -> Closed`. Every exit path (client close, read error,
//! protocol violation, failed write, panic in the relay loop) goes through
//! [`ConnectionSession::close`], which deregisters the member exactly once.

use std::{sync::Arc, time::Duration};

use axum::{
    extract::{
        Path, State,
        ws::{CloseFrame, Message, WebSocket, WebSocketUpgrade, close_code},
    },
    http::StatusCode,
    response::IntoResponse,
};
use futures_util::{
    sink::SinkExt,
    stream::{SplitSink, SplitStream, StreamExt},
};
use tokio::sync::{mpsc, oneshot};

use crate::{
    domain::{Member, MessageContent, PusherChannel, RoomId, SessionPhase, SessionToken},
    ui::state::AppState,
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Path((room_id, token)): Path<(String, String)>,
) -> Result<impl IntoResponse, StatusCode> {
    let room_id = match RoomId::try_from(room_id) {
        Ok(id) => id,
        Err(e) => {
            tracing::warn!("Rejecting connection: {}", e);
            return Err(StatusCode::BAD_REQUEST);
        }
    };
    let token = match SessionToken::try_from(token) {
        Ok(token) => token,
        Err(e) => {
            tracing::warn!("Rejecting connection to room '{}': {}", room_id, e);
            return Err(StatusCode::BAD_REQUEST);
        }
    };

    Ok(ws.on_upgrade(move |socket| handle_socket(socket, state, room_id, token)))
}

/// Per-connection lifecycle state
struct ConnectionSession {
    state: Arc<AppState>,
    room_id: RoomId,
    token: SessionToken,
    phase: SessionPhase,
    /// Present exactly while the session is `Active`
    member: Option<Member>,
}

impl ConnectionSession {
    fn new(state: Arc<AppState>, room_id: RoomId, token: SessionToken) -> Self {
        Self {
            state,
            room_id,
            token,
            phase: SessionPhase::Connecting,
            member: None,
        }
    }

    /// `Connecting -> Active`: register in the room, then replay history
    /// directly on the socket before anything queued on `channel` is written.
    async fn activate(
        &mut self,
        sender: &mut SplitSink<WebSocket, Message>,
        channel: PusherChannel,
    ) -> Result<Member, axum::Error> {
        let joined = self
            .state
            .join_room_usecase
            .execute(self.room_id.clone(), &self.token, channel)
            .await;
        self.member = Some(joined.member.clone());
        self.phase = self.phase.activate();
        tracing::info!(
            "Connection '{}' joined room '{}' ({} history message(s))",
            joined.member.id,
            self.room_id,
            joined.history.len()
        );

        for entry in joined.history {
            sender.send(Message::Text(entry.into_string().into())).await?;
        }

        Ok(joined.member)
    }

    /// `Active -> Closed`. Safe to call more than once.
    async fn close(&mut self) {
        if self.phase.is_closed() {
            return;
        }
        self.phase = self.phase.close();

        if let Some(member) = self.member.take() {
            self.state
                .leave_room_usecase
                .execute(&self.room_id, &member.id)
                .await;
            tracing::info!("Connection '{}' left room '{}'", member.id, self.room_id);
        }
    }
}

/// Spawns a task that receives messages from the rx channel and pushes them to the WebSocket sender.
///
/// Ends when every channel sender is gone, the socket write fails, or a
/// close frame arrives on `close_rx`.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut close_rx: oneshot::Receiver<CloseFrame>,
    mut sender: SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            tokio::select! {
                msg = rx.recv() => {
                    let Some(msg) = msg else { break };
                    if sender.send(Message::Text(msg.into())).await.is_err() {
                        break;
                    }
                }
                frame = &mut close_rx => {
                    if let Ok(frame) = frame {
                        let _ = sender.send(Message::Close(Some(frame))).await;
                    }
                    break;
                }
            }
        }
        let _ = sender.close().await;
    })
}

/// Reads client frames until close, relaying each text frame through the message store.
///
/// Returns the close frame to send back when the client broke the protocol.
fn relay_loop(
    state: Arc<AppState>,
    room_id: RoomId,
    member: Member,
    token: SessionToken,
    mut receiver: SplitStream<WebSocket>,
) -> tokio::task::JoinHandle<Option<CloseFrame>> {
    tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::warn!("WebSocket error on connection '{}': {}", member.id, e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    let content = MessageContent::new(text.to_string());
                    if let Err(e) = state
                        .send_message_usecase
                        .execute(&room_id, &member, &token, content)
                        .await
                    {
                        tracing::info!(
                            "Message from connection '{}' not relayed: {}",
                            member.id,
                            e
                        );
                    }
                }
                Message::Binary(_) => {
                    tracing::warn!(
                        "Connection '{}' sent a binary frame, closing session",
                        member.id
                    );
                    return Some(CloseFrame {
                        code: close_code::UNSUPPORTED,
                        reason: "binary frames are not supported".into(),
                    });
                }
                Message::Ping(_) | Message::Pong(_) => {
                    // Ping/pong is handled automatically by the WebSocket protocol
                }
                Message::Close(_) => {
                    tracing::info!("Connection '{}' requested close", member.id);
                    break;
                }
            }
        }
        None
    })
}

const CLOSE_FRAME_GRACE: Duration = Duration::from_secs(1);

async fn handle_socket(
    socket: WebSocket,
    state: Arc<AppState>,
    room_id: RoomId,
    token: SessionToken,
) {
    let (mut sender, receiver) = socket.split();
    let (tx, rx) = mpsc::unbounded_channel();
    let (close_tx, close_rx) = oneshot::channel();
    let mut session = ConnectionSession::new(state.clone(), room_id.clone(), token.clone());

    let member = match session.activate(&mut sender, tx).await {
        Ok(member) => member,
        Err(e) => {
            tracing::warn!("Failed to replay history in room '{}': {}", room_id, e);
            session.close().await;
            return;
        }
    };

    let mut send_task = pusher_loop(rx, close_rx, sender);
    let mut recv_task = relay_loop(state, room_id, member, token, receiver);

    // If any one of the tasks completes, abort the other
    tokio::select! {
        result = &mut recv_task => {
            match result {
                Ok(Some(frame)) => {
                    // Let the pusher write the close frame before tearing it down
                    let _ = close_tx.send(frame);
                    if tokio::time::timeout(CLOSE_FRAME_GRACE, &mut send_task).await.is_err() {
                        send_task.abort();
                    }
                }
                Ok(None) => send_task.abort(),
                Err(e) => {
                    tracing::error!("Relay loop terminated abnormally: {}", e);
                    send_task.abort();
                }
            }
        }
        _ = &mut send_task => recv_task.abort(),
    };

    session.close().await;
}
