//! Delivery Handler - inbound endpoint invoked by the external scheduler at
//! delivery time.
//!
//! Delivery is at-least-once: the same trigger may arrive more than once, so
//! everything here is a pure function of the stored state. A missing status
//! event (deleted after scheduling, before firing) is a normal race and
//! resolves as a no-op success - propagating an error would put the external
//! scheduler into an infinite redelivery loop.

use std::sync::Arc;
use tracing::{info, warn};

use crate::domain::{DeliveryState, StatusEvent};
use crate::error::{AppError, Result};
use crate::port::{
    CredentialStore, DeliveryRepository, PresenceClient, PresenceStatus, StatusEventRepository,
    TimeProvider,
};

/// Outcome of one delivery invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryOutcome {
    /// The status was pushed to the presence profile
    Applied,
    /// The status event no longer exists; nothing to do
    AlreadyGone,
}

/// Handles the external scheduler's delivery callback
pub struct DeliveryHandler {
    status_events: Arc<dyn StatusEventRepository>,
    deliveries: Arc<dyn DeliveryRepository>,
    credentials: Arc<dyn CredentialStore>,
    presence: Arc<dyn PresenceClient>,
    time_provider: Arc<dyn TimeProvider>,
}

impl DeliveryHandler {
    pub fn new(
        status_events: Arc<dyn StatusEventRepository>,
        deliveries: Arc<dyn DeliveryRepository>,
        credentials: Arc<dyn CredentialStore>,
        presence: Arc<dyn PresenceClient>,
        time_provider: Arc<dyn TimeProvider>,
    ) -> Self {
        Self {
            status_events,
            deliveries,
            credentials,
            presence,
            time_provider,
        }
    }

    /// Resolve the status event and push its content to the owner's presence
    /// profile. Safe to call more than once for the same id.
    pub async fn deliver(&self, status_event_id: &str) -> Result<DeliveryOutcome> {
        let Some(event) = self.status_events.find_by_id(&status_event_id.to_string()).await?
        else {
            info!(
                status_event_id = %status_event_id,
                "Status event missing at delivery time (deleted before firing), treating as no-op"
            );
            return Ok(DeliveryOutcome::AlreadyGone);
        };

        let credential = self
            .credentials
            .find_presence_credential(&event.owner_id)
            .await?;

        let Some(credential) = credential else {
            self.transition_record(&event.id, DeliveryState::Failed).await;
            return Err(AppError::NotAuthenticated(format!(
                "Owner {} has no linked presence credential",
                event.owner_id
            )));
        };

        let status = Self::presence_payload(&event);

        match self.presence.set_status(&credential, &status).await {
            Ok(()) => {
                self.transition_record(&event.id, DeliveryState::Delivered)
                    .await;
                self.status_events.clear_delivery_handle(&event.id).await?;
                info!(
                    status_event_id = %event.id,
                    owner_id = %event.owner_id,
                    expires_at = status.expires_at_unix,
                    "Status delivered to presence profile"
                );
                Ok(DeliveryOutcome::Applied)
            }
            Err(err @ AppError::DeliveryRejected(_)) => {
                self.transition_record(&event.id, DeliveryState::Failed).await;
                Err(err)
            }
            // Transport-level failures stay unmarked: the external scheduler
            // redelivers and the next attempt may succeed.
            Err(err) => Err(err),
        }
    }

    fn presence_payload(event: &StatusEvent) -> PresenceStatus {
        PresenceStatus {
            text: event.status_text.clone(),
            emoji: event.status_emoji.as_ref().map(|e| e.presence_code()),
            expires_at_unix: event.expires_at(),
        }
    }

    /// Move the audit record forward. The record can legitimately be absent
    /// (handle write lost in the create crash window) or already terminal
    /// (redelivery); neither failure may block the delivery itself.
    async fn transition_record(&self, status_event_id: &str, state: DeliveryState) {
        let now = self.time_provider.now_millis();
        let record = match self
            .deliveries
            .find_by_status_event(&status_event_id.to_string())
            .await
        {
            Ok(Some(record)) => record,
            Ok(None) => {
                warn!(
                    status_event_id = %status_event_id,
                    "No delivery record for status event, skipping audit transition"
                );
                return;
            }
            Err(e) => {
                warn!(
                    status_event_id = %status_event_id,
                    error = %e,
                    "Failed to load delivery record, skipping audit transition"
                );
                return;
            }
        };

        let mut record = record;
        let transitioned = match state {
            DeliveryState::Delivered => record.mark_delivered(now),
            DeliveryState::Failed => record.mark_failed(now),
            DeliveryState::Cancelled => record.mark_cancelled(now),
            DeliveryState::Queued => Ok(()),
        };

        if let Err(e) = transitioned {
            warn!(
                status_event_id = %status_event_id,
                error = %e,
                "Delivery record transition rejected"
            );
            return;
        }

        if let Err(e) = self
            .deliveries
            .update_state(&record.handle, record.state, record.finished_at)
            .await
        {
            warn!(
                status_event_id = %status_event_id,
                handle = %record.handle,
                error = %e,
                "Failed to persist delivery record state"
            );
        }
    }
}
