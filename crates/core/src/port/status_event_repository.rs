// StatusEvent Repository Port (Interface)

use crate::domain::{EmojiRef, StatusEvent, StatusEventId};
use crate::error::Result;
use async_trait::async_trait;

/// Repository interface for StatusEvent persistence
///
/// The durable store is the single source of truth; implementations must not
/// cache records in memory across requests (a stale copy could make the
/// delivery handler act on a window that no longer exists).
#[async_trait]
pub trait StatusEventRepository: Send + Sync {
    /// Insert a new status event
    async fn insert(&self, event: &StatusEvent) -> Result<()>;

    /// Find status event by ID
    async fn find_by_id(&self, id: &StatusEventId) -> Result<Option<StatusEvent>>;

    /// All status events owned by a user
    async fn find_by_owner(&self, owner_id: &str) -> Result<Vec<StatusEvent>>;

    /// Update only the mutable content fields (text + emoji)
    async fn update_content(
        &self,
        id: &StatusEventId,
        status_text: &str,
        status_emoji: Option<&EmojiRef>,
    ) -> Result<()>;

    /// Store the scheduled delivery handle and clear the pending-schedule
    /// marker in one write
    async fn set_delivery_handle(&self, id: &StatusEventId, handle: &str) -> Result<()>;

    /// Clear the delivery handle (delivery fired or was cancelled)
    async fn clear_delivery_handle(&self, id: &StatusEventId) -> Result<()>;

    /// Delete a status event. Returns false if it did not exist.
    async fn delete(&self, id: &StatusEventId) -> Result<bool>;
}
