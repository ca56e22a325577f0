// DeliveryRecord Repository Port (Interface)

use crate::domain::{DeliveryRecord, DeliveryState, StatusEventId};
use crate::error::Result;
use async_trait::async_trait;

/// Repository interface for delivery audit records
#[async_trait]
pub trait DeliveryRepository: Send + Sync {
    /// Insert a new delivery record
    async fn insert(&self, record: &DeliveryRecord) -> Result<()>;

    /// Find the delivery record for a status event (at most one outstanding
    /// delivery per live event)
    async fn find_by_status_event(
        &self,
        status_event_id: &StatusEventId,
    ) -> Result<Option<DeliveryRecord>>;

    /// Update the state of a delivery record by its handle
    async fn update_state(
        &self,
        handle: &str,
        state: DeliveryState,
        finished_at: Option<i64>,
    ) -> Result<()>;
}
