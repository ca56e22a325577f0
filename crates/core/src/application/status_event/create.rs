// Create Use Case
//
// Two-phase persist-then-schedule: the record is written first with the
// pending-schedule marker set, then exactly one delivery is enqueued at the
// window start, then the returned handle is written back. A crash between
// those writes leaves a flagged record for the external reconciliation
// sweep; there is no transactional outbox here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::application::scheduler::DeliveryScheduler;
use crate::domain::{DeliveryRecord, EmojiRef, EventWindow, StatusEvent};
use crate::error::Result;
use crate::port::{DeliveryRepository, IdProvider, StatusEventRepository, TimeProvider};

/// Create request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateStatusEvent {
    pub owner_id: String,
    pub calendar_id: String,
    pub source_event_id: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub status_text: String,
    pub status_emoji: Option<EmojiRef>,
}

/// Execute the create use case
pub async fn execute(
    status_events: &dyn StatusEventRepository,
    deliveries: &dyn DeliveryRepository,
    scheduler: &DeliveryScheduler,
    id_provider: &dyn IdProvider,
    time_provider: &dyn TimeProvider,
    req: CreateStatusEvent,
) -> Result<StatusEvent> {
    // Window invariant (start <= end) and content limits, before anything
    // touches the store
    let window = EventWindow::new(req.start, req.end)?;
    super::validate_content(&req.status_text, req.status_emoji.as_ref())?;

    let id = id_provider.generate_id();
    let now = time_provider.now_millis();

    let mut event = StatusEvent::new(
        id,
        now,
        req.owner_id,
        req.calendar_id,
        req.source_event_id,
        window,
        req.status_text,
        req.status_emoji,
    );

    status_events.insert(&event).await?;

    // Scheduling failure is fatal to the create: the caller must never
    // believe a status exists that will not fire. The persisted record keeps
    // pending_schedule set so the reconciliation sweep can find it.
    let handle = match scheduler.schedule(&event.id, window.start()).await {
        Ok(handle) => handle,
        Err(e) => {
            warn!(
                status_event_id = %event.id,
                error = %e,
                "Scheduling failed; record left flagged for reconciliation"
            );
            return Err(e);
        }
    };

    status_events.set_delivery_handle(&event.id, &handle).await?;

    let record = DeliveryRecord::new(
        handle.clone(),
        event.id.clone(),
        event.owner_id.clone(),
        window.start().timestamp_millis(),
        now,
    );
    deliveries.insert(&record).await?;

    event.delivery_handle = Some(handle);
    event.pending_schedule = false;

    info!(
        status_event_id = %event.id,
        owner_id = %event.owner_id,
        fires_at = %window.start().to_rfc3339(),
        "Status event created and delivery scheduled"
    );

    Ok(event)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::status_event::validate_content;
    use crate::error::AppError;

    #[test]
    fn test_validate_empty_text() {
        let result = validate_content("   ", None);
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn test_validate_text_too_long() {
        let result = validate_content(&"a".repeat(101), None);
        assert!(result.unwrap_err().to_string().contains("too long"));
    }

    #[test]
    fn test_validate_text_at_limit() {
        assert!(validate_content(&"a".repeat(100), None).is_ok());
    }

    #[test]
    fn test_validate_emoji_name_invalid_chars() {
        let emoji = EmojiRef::new("no colons:allowed");
        let result = validate_content("ok", Some(&emoji));
        assert!(result.unwrap_err().to_string().contains("alphanumeric"));
    }

    #[test]
    fn test_validate_emoji_name_empty() {
        let emoji = EmojiRef::new("");
        assert!(validate_content("ok", Some(&emoji)).is_err());
    }

    #[test]
    fn test_validate_valid_request() {
        let emoji = EmojiRef::new("calendar");
        assert!(validate_content("In a meeting", Some(&emoji)).is_ok());
    }
}
