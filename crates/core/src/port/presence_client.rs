// Presence Client Port - the external chat-presence API

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A user's linked credential for the external presence API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresenceCredential {
    pub owner_id: String,
    pub access_token: String,
}

/// The status payload pushed to the presence profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PresenceStatus {
    pub text: String,
    /// Colon-delimited emoji code (`:calendar:`), if any
    pub emoji: Option<String>,
    /// Unix seconds after which the remote profile clears the status itself
    pub expires_at_unix: i64,
}

/// Interface to the external presence API.
///
/// The remote API is idempotent on identical input, which is what makes
/// at-least-once redelivery safe without a local dedup ledger.
#[async_trait]
pub trait PresenceClient: Send + Sync {
    /// Push a status to the owner's presence profile.
    ///
    /// A rejection by the remote API is `AppError::DeliveryRejected`
    /// (non-retryable); transport failures map to `AppError::Internal` and
    /// are left to the external scheduler's redelivery.
    async fn set_status(
        &self,
        credential: &PresenceCredential,
        status: &PresenceStatus,
    ) -> Result<()>;
}
