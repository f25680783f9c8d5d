//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};

use crate::{
    domain::{RoomId, SessionToken},
    infrastructure::dto::http::{MessageResponse, NotifyRequest, RoomDetailDto, RoomSummaryDto},
    ui::state::AppState,
    usecase::GetRoomDetailError,
};

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Get list of rooms with at least one member
pub async fn get_rooms(State(state): State<Arc<AppState>>) -> Json<Vec<RoomSummaryDto>> {
    let rooms = state.get_rooms_usecase.execute().await;

    // Domain Model から DTO への変換
    Json(rooms.iter().map(RoomSummaryDto::from).collect())
}

/// Get room detail by ID
pub async fn get_room_detail(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
) -> Result<Json<RoomDetailDto>, StatusCode> {
    let room_id = RoomId::try_from(room_id).map_err(|_| StatusCode::NOT_FOUND)?;

    match state.get_room_detail_usecase.execute(&room_id).await {
        Ok(room) => Ok(Json(RoomDetailDto::from(room))),
        Err(GetRoomDetailError::RoomNotFound) => Err(StatusCode::NOT_FOUND),
    }
}

/// Called by the message store when a room has new messages.
///
/// Re-fetches the room history and pushes it to every member of the room.
pub async fn notify_new_messages(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<NotifyRequest>, JsonRejection>,
) -> (StatusCode, Json<MessageResponse>) {
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(e) => {
            tracing::warn!("Rejecting malformed notify body: {}", e);
            return (
                StatusCode::BAD_REQUEST,
                Json(MessageResponse::new("Invalid request body")),
            );
        }
    };
    let Some(room_id) = request.payperview_id.and_then(|id| RoomId::try_from(id).ok()) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(MessageResponse::new("payperviewId is required")),
        );
    };
    let Some(token) = request.token.and_then(|t| SessionToken::try_from(t).ok()) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(MessageResponse::new("token is required")),
        );
    };

    match state.notify_room_usecase.execute(&room_id, &token).await {
        Ok(_) => (
            StatusCode::OK,
            Json(MessageResponse::new("Data updated successfully.")),
        ),
        Err(e) => {
            tracing::error!("Error fetching messages for room '{}': {}", room_id, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(MessageResponse::new("Failed to fetch messages.")),
            )
        }
    }
}
