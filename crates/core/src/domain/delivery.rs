// DeliveryRecord Domain Model (sync-audit entity)

use serde::{Deserialize, Serialize};

use crate::domain::error::{DomainError, Result};
use crate::domain::status_event::{OwnerId, StatusEventId};

/// Delivery State
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeliveryState {
    Queued,
    Delivered,
    Failed,
    Cancelled,
}

impl std::fmt::Display for DeliveryState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeliveryState::Queued => write!(f, "QUEUED"),
            DeliveryState::Delivered => write!(f, "DELIVERED"),
            DeliveryState::Failed => write!(f, "FAILED"),
            DeliveryState::Cancelled => write!(f, "CANCELLED"),
        }
    }
}

impl std::str::FromStr for DeliveryState {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "QUEUED" => Ok(DeliveryState::Queued),
            "DELIVERED" => Ok(DeliveryState::Delivered),
            "FAILED" => Ok(DeliveryState::Failed),
            "CANCELLED" => Ok(DeliveryState::Cancelled),
            other => Err(DomainError::ValidationError(format!(
                "Unknown delivery state: {}",
                other
            ))),
        }
    }
}

/// DeliveryRecord Entity
///
/// Audit record for one scheduled delivery. Created alongside the scheduling
/// call, transitioned by the delivery handler or the orchestrator, never
/// deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryRecord {
    /// The external scheduler's task identifier. Unique.
    pub handle: String,
    pub status_event_id: StatusEventId,
    pub owner_id: OwnerId,
    /// The instant the delivery is set to fire, epoch ms.
    pub scheduled_at: i64,
    pub state: DeliveryState,
    pub created_at: i64,
    pub finished_at: Option<i64>,
}

impl DeliveryRecord {
    pub fn new(
        handle: impl Into<String>,
        status_event_id: impl Into<String>,
        owner_id: impl Into<String>,
        scheduled_at: i64,
        created_at: i64,
    ) -> Self {
        Self {
            handle: handle.into(),
            status_event_id: status_event_id.into(),
            owner_id: owner_id.into(),
            scheduled_at,
            state: DeliveryState::Queued,
            created_at,
            finished_at: None,
        }
    }

    /// Transition to Delivered. Re-marking an already delivered record is a
    /// no-op: the external scheduler may redeliver the same trigger.
    pub fn mark_delivered(&mut self, now_millis: i64) -> Result<()> {
        match self.state {
            DeliveryState::Queued => {
                self.state = DeliveryState::Delivered;
                self.finished_at = Some(now_millis);
                Ok(())
            }
            DeliveryState::Delivered => Ok(()),
            other => Err(DomainError::InvalidStateTransition {
                from: other.to_string(),
                to: "DELIVERED".to_string(),
            }),
        }
    }

    /// Transition to Failed. Idempotent for redelivered triggers that fail
    /// the same way twice.
    pub fn mark_failed(&mut self, now_millis: i64) -> Result<()> {
        match self.state {
            DeliveryState::Queued => {
                self.state = DeliveryState::Failed;
                self.finished_at = Some(now_millis);
                Ok(())
            }
            DeliveryState::Failed => Ok(()),
            other => Err(DomainError::InvalidStateTransition {
                from: other.to_string(),
                to: "FAILED".to_string(),
            }),
        }
    }

    /// Transition to Cancelled (delete-before-fire path).
    pub fn mark_cancelled(&mut self, now_millis: i64) -> Result<()> {
        match self.state {
            DeliveryState::Queued => {
                self.state = DeliveryState::Cancelled;
                self.finished_at = Some(now_millis);
                Ok(())
            }
            other => Err(DomainError::InvalidStateTransition {
                from: other.to_string(),
                to: "CANCELLED".to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> DeliveryRecord {
        DeliveryRecord::new("task-1", "ev-1", "user-1", 5000, 1000)
    }

    #[test]
    fn test_new_record_is_queued() {
        let r = record();
        assert_eq!(r.state, DeliveryState::Queued);
        assert_eq!(r.finished_at, None);
    }

    #[test]
    fn test_mark_delivered_is_idempotent() {
        let mut r = record();
        r.mark_delivered(2000).unwrap();
        assert_eq!(r.state, DeliveryState::Delivered);
        assert_eq!(r.finished_at, Some(2000));

        // Redelivery of the same trigger must not error
        r.mark_delivered(3000).unwrap();
        assert_eq!(r.finished_at, Some(2000));
    }

    #[test]
    fn test_cancelled_record_cannot_be_delivered() {
        let mut r = record();
        r.mark_cancelled(2000).unwrap();
        let err = r.mark_delivered(3000).unwrap_err();
        assert!(matches!(err, DomainError::InvalidStateTransition { .. }));
    }

    #[test]
    fn test_delivered_record_cannot_be_cancelled() {
        let mut r = record();
        r.mark_delivered(2000).unwrap();
        assert!(r.mark_cancelled(3000).is_err());
    }

    #[test]
    fn test_state_round_trips_through_display() {
        for state in [
            DeliveryState::Queued,
            DeliveryState::Delivered,
            DeliveryState::Failed,
            DeliveryState::Cancelled,
        ] {
            let parsed: DeliveryState = state.to_string().parse().unwrap();
            assert_eq!(parsed, state);
        }
    }
}
