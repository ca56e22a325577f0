//! Delivery Scheduler - translates a status event's start instant into one
//! future delivery request against the external task-delivery service.
//!
//! No local state is mutated here and no in-process timer ever runs; the
//! external service is the system of record for timing.

use chrono::{DateTime, Utc};
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, info};

use crate::error::{AppError, Result};
use crate::port::{TaskQueue, TimeProvider};

/// Schedules and cancels deliveries via the external task-delivery service
pub struct DeliveryScheduler {
    task_queue: Arc<dyn TaskQueue>,
    time_provider: Arc<dyn TimeProvider>,
    /// Base URL of our own inbound surface; the delivery callback targets
    /// `{base}/deliveries/{status_event_id}`
    callback_base_url: String,
}

impl DeliveryScheduler {
    pub fn new(
        task_queue: Arc<dyn TaskQueue>,
        time_provider: Arc<dyn TimeProvider>,
        callback_base_url: impl Into<String>,
    ) -> Self {
        Self {
            task_queue,
            time_provider,
            callback_base_url: callback_base_url.into(),
        }
    }

    /// Enqueue exactly one delivery for `status_event_id` at `fires_at`.
    ///
    /// A target instant that is not strictly in the future is a hard
    /// `Scheduling` error; the caller decides whether that kills the whole
    /// operation (create does).
    pub async fn schedule(
        &self,
        status_event_id: &str,
        fires_at: DateTime<Utc>,
    ) -> Result<String> {
        let now = self.time_provider.now_millis();
        if fires_at.timestamp_millis() <= now {
            return Err(AppError::Scheduling(format!(
                "Delivery instant {} is not in the future",
                fires_at.to_rfc3339()
            )));
        }

        let target_url = self.delivery_target(status_event_id);
        let payload = json!({ "status_event_id": status_event_id });

        debug!(
            status_event_id = %status_event_id,
            fires_at = %fires_at.to_rfc3339(),
            target_url = %target_url,
            "Enqueueing delivery"
        );

        let handle = self
            .task_queue
            .enqueue(&target_url, &payload, fires_at)
            .await?;

        info!(
            status_event_id = %status_event_id,
            handle = %handle,
            "Delivery scheduled"
        );

        Ok(handle)
    }

    /// Best-effort cancellation of a scheduled delivery.
    ///
    /// `Cancellation` errors mean the handle is unknown to the external
    /// service (already fired or already cancelled); callers deleting the
    /// event treat that as success.
    pub async fn cancel(&self, handle: &str) -> Result<()> {
        debug!(handle = %handle, "Cancelling scheduled delivery");
        self.task_queue.cancel(handle).await
    }

    fn delivery_target(&self, status_event_id: &str) -> String {
        format!(
            "{}/deliveries/{}",
            self.callback_base_url.trim_end_matches('/'),
            status_event_id
        )
    }
}
