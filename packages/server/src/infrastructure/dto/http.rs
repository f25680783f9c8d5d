//! HTTP API DTOs.

use serde::{Deserialize, Serialize};

/// Body of `POST /notify-new-messages`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NotifyRequest {
    #[serde(rename = "payperviewId", default)]
    pub payperview_id: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
}

/// `{"message": "..."}` response body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Element of `GET /api/rooms`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomSummaryDto {
    pub id: String,
    pub member_count: usize,
}

/// Response of `GET /api/rooms/{room_id}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomDetailDto {
    pub id: String,
    pub members: Vec<MemberDetailDto>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberDetailDto {
    pub connection_id: String,
    /// RFC 3339 (UTC)
    pub joined_at: String,
}
