// Update Use Case
//
// Only the status content is mutable. The window, the owner, and the
// scheduled delivery are never touched: an update after the delivery fired
// changes the stored record but triggers no re-delivery.

use serde::{Deserialize, Serialize};

use crate::domain::{EmojiRef, StatusEvent};
use crate::error::{AppError, Result};
use crate::port::StatusEventRepository;

/// Update request (content fields only, by design)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateStatusEvent {
    pub status_event_id: String,
    pub status_text: String,
    pub status_emoji: Option<EmojiRef>,
}

/// Execute the update use case
pub async fn execute(
    status_events: &dyn StatusEventRepository,
    req: UpdateStatusEvent,
) -> Result<StatusEvent> {
    super::validate_content(&req.status_text, req.status_emoji.as_ref())?;

    let mut event = status_events
        .find_by_id(&req.status_event_id)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!("Status event {} not found", req.status_event_id))
        })?;

    status_events
        .update_content(&event.id, &req.status_text, req.status_emoji.as_ref())
        .await?;

    event.apply_content(req.status_text, req.status_emoji);
    Ok(event)
}
