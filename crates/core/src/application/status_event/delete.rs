// Delete Use Case
//
// A user-facing delete must never block on scheduler-state races: the
// cancellation call is bounded by a timeout and its failure is swallowed.
// The record is removed regardless of the cancellation outcome.

use std::time::Duration;
use tracing::{debug, info, warn};

use crate::application::scheduler::DeliveryScheduler;
use crate::domain::{DeliveryState, StatusEventId};
use crate::error::{AppError, Result};
use crate::port::{DeliveryRepository, StatusEventRepository, TimeProvider};

/// Upper bound on the external cancellation call during delete
pub const CANCEL_TIMEOUT_MS: u64 = 5_000;

/// Execute the delete use case
pub async fn execute(
    status_events: &dyn StatusEventRepository,
    deliveries: &dyn DeliveryRepository,
    scheduler: &DeliveryScheduler,
    time_provider: &dyn TimeProvider,
    status_event_id: &StatusEventId,
) -> Result<()> {
    let event = status_events
        .find_by_id(status_event_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Status event {} not found", status_event_id)))?;

    // A present handle means a delivery may still be pending. Past the
    // window start it may already have fired or be in flight; cancellation
    // is attempted anyway and its failure is not escalated.
    if let Some(handle) = &event.delivery_handle {
        match tokio::time::timeout(
            Duration::from_millis(CANCEL_TIMEOUT_MS),
            scheduler.cancel(handle),
        )
        .await
        {
            Ok(Ok(())) => {
                let now = time_provider.now_millis();
                if let Err(e) = deliveries
                    .update_state(handle, DeliveryState::Cancelled, Some(now))
                    .await
                {
                    warn!(handle = %handle, error = %e, "Failed to mark delivery cancelled");
                }
            }
            Ok(Err(e)) => {
                // Unknown handle: the delivery already fired or was already
                // cancelled. Treated as idempotent success for a delete.
                debug!(
                    status_event_id = %event.id,
                    handle = %handle,
                    error = %e,
                    "Cancellation failed, continuing delete"
                );
            }
            Err(_) => {
                warn!(
                    status_event_id = %event.id,
                    handle = %handle,
                    "Cancellation timed out, continuing delete"
                );
            }
        }
    }

    status_events.delete(status_event_id).await?;

    info!(
        status_event_id = %status_event_id,
        owner_id = %event.owner_id,
        "Status event deleted"
    );

    Ok(())
}
