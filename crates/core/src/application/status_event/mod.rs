// Status Event Service - lifecycle orchestration for status events
//
// Owns the invariant: every live status event has at most one outstanding
// delivery handle.

pub mod create;
pub mod delete;
pub mod update;


pub use create::CreateStatusEvent;
pub use update::UpdateStatusEvent;

use std::sync::Arc;

use crate::application::scheduler::DeliveryScheduler;
use crate::domain::{EmojiRef, StatusEvent, StatusEventId};
use crate::error::{AppError, Result};
use crate::port::{DeliveryRepository, IdProvider, StatusEventRepository, TimeProvider};

/// Presence APIs cap status text around this length; reject early instead of
/// failing at delivery time.
pub const MAX_STATUS_TEXT_LEN: usize = 100;

/// Status Event Service
pub struct StatusEventService {
    status_events: Arc<dyn StatusEventRepository>,
    deliveries: Arc<dyn DeliveryRepository>,
    scheduler: Arc<DeliveryScheduler>,
    id_provider: Arc<dyn IdProvider>,
    time_provider: Arc<dyn TimeProvider>,
}

impl StatusEventService {
    pub fn new(
        status_events: Arc<dyn StatusEventRepository>,
        deliveries: Arc<dyn DeliveryRepository>,
        scheduler: Arc<DeliveryScheduler>,
        id_provider: Arc<dyn IdProvider>,
        time_provider: Arc<dyn TimeProvider>,
    ) -> Self {
        Self {
            status_events,
            deliveries,
            scheduler,
            id_provider,
            time_provider,
        }
    }

    /// Create a status event and schedule its delivery
    pub async fn create(&self, req: CreateStatusEvent) -> Result<StatusEvent> {
        create::execute(
            self.status_events.as_ref(),
            self.deliveries.as_ref(),
            &self.scheduler,
            self.id_provider.as_ref(),
            self.time_provider.as_ref(),
            req,
        )
        .await
    }

    /// Update the content of a status event (never the window)
    pub async fn update(&self, req: UpdateStatusEvent) -> Result<StatusEvent> {
        update::execute(self.status_events.as_ref(), req).await
    }

    /// Delete a status event, cancelling its pending delivery if any
    pub async fn delete(&self, status_event_id: &StatusEventId) -> Result<()> {
        delete::execute(
            self.status_events.as_ref(),
            self.deliveries.as_ref(),
            &self.scheduler,
            self.time_provider.as_ref(),
            status_event_id,
        )
        .await
    }

    /// All status events for an owner
    pub async fn list(&self, owner_id: &str) -> Result<Vec<StatusEvent>> {
        self.status_events.find_by_owner(owner_id).await
    }
}

/// Shared validation of the mutable content fields (create and update)
pub(crate) fn validate_content(status_text: &str, status_emoji: Option<&EmojiRef>) -> Result<()> {
    if status_text.trim().is_empty() {
        return Err(AppError::Validation("Status text is empty".to_string()));
    }
    if status_text.chars().count() > MAX_STATUS_TEXT_LEN {
        return Err(AppError::Validation(format!(
            "Status text too long (max {} characters)",
            MAX_STATUS_TEXT_LEN
        )));
    }
    if let Some(emoji) = status_emoji {
        if emoji.name.is_empty()
            || !emoji
                .name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '+'))
        {
            return Err(AppError::Validation(format!(
                "Emoji name must be alphanumeric with _-+ only: {:?}",
                emoji.name
            )));
        }
    }
    Ok(())
}
