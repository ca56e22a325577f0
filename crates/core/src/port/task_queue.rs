// Task Queue Port - the external at-least-once task-delivery service

use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Interface to the external task-delivery service.
///
/// All waiting for a future delivery instant is delegated here; the core
/// runs no timers of its own. The caller identity the service binds to its
/// callback is adapter configuration, not a per-call argument.
#[async_trait]
pub trait TaskQueue: Send + Sync {
    /// Request that `target_url` be invoked with `payload` at `fires_at`.
    /// Returns the service's opaque task handle.
    ///
    /// Fails with `AppError::Scheduling` when the external call fails.
    async fn enqueue(
        &self,
        target_url: &str,
        payload: &serde_json::Value,
        fires_at: DateTime<Utc>,
    ) -> Result<String>;

    /// Best-effort cancellation of a previously enqueued task.
    ///
    /// Fails with `AppError::Cancellation` when the handle is unknown to the
    /// service (already fired or already cancelled). Callers deleting the
    /// owning record treat that as idempotent success.
    async fn cancel(&self, handle: &str) -> Result<()>;
}
