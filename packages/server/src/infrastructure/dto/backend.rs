//! Message store DTOs.

use serde::Serialize;

/// Body of `POST {base}/ppv/{room_id}/message`
#[derive(Debug, Clone, Serialize)]
pub struct SubmitMessageRequest<'a> {
    pub message: &'a str,
}
