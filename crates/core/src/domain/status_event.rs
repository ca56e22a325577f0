// StatusEvent Domain Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::error::{DomainError, Result};

/// Status event ID (UUID v4)
pub type StatusEventId = String;

/// Owner (user) identifier
pub type OwnerId = String;

/// Symbolic emoji reference: a name plus an optional display asset path.
///
/// The name is what the presence API understands (`:calendar:`); the asset
/// path is only carried through for clients that render a preview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmojiRef {
    pub name: String,
    pub asset_path: Option<String>,
}

impl EmojiRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            asset_path: None,
        }
    }

    /// Render the colon-delimited code the presence API expects.
    pub fn presence_code(&self) -> String {
        format!(":{}:", self.name)
    }
}

/// The time window a status is bound to. Invariant: `start <= end`.
///
/// Both instants are absolute UTC; normalization from whatever the caller
/// sent happens at the parse boundary (see [`crate::domain::time`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventWindow {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl EventWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self> {
        if start > end {
            return Err(DomainError::InvalidWindow {
                start: start.to_rfc3339(),
                end: end.to_rfc3339(),
            });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// The window end as unix seconds, used as the presence profile's
    /// self-expiry hint.
    pub fn expires_at_unix(&self) -> i64 {
        self.end.timestamp()
    }
}

/// StatusEvent Entity
///
/// A user's chat-presence status bound to a calendar event's time window.
/// Identity and window fields are immutable after creation; only the status
/// content and the delivery bookkeeping fields ever change, and only through
/// the lifecycle orchestrator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusEvent {
    pub id: StatusEventId,
    pub owner_id: OwnerId,
    pub calendar_id: String,
    pub source_event_id: String,

    pub window: EventWindow,

    pub status_text: String,
    pub status_emoji: Option<EmojiRef>,

    /// Handle of the outstanding scheduled delivery. Present iff a delivery
    /// is pending; cleared once the delivery fires or is cancelled.
    pub delivery_handle: Option<String>,

    /// Set between persist and successful scheduling. A record left with
    /// this flag (crash or scheduling failure) is an orphan for the external
    /// reconciliation sweep to pick up.
    pub pending_schedule: bool,

    pub created_at: i64, // epoch ms
}

impl StatusEvent {
    /// Create a new StatusEvent
    ///
    /// # Arguments
    ///
    /// * `id` - Unique event ID (injected, not generated)
    /// * `created_at` - Creation timestamp in epoch ms (injected, not system time)
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: impl Into<String>,
        created_at: i64,
        owner_id: impl Into<String>,
        calendar_id: impl Into<String>,
        source_event_id: impl Into<String>,
        window: EventWindow,
        status_text: impl Into<String>,
        status_emoji: Option<EmojiRef>,
    ) -> Self {
        Self {
            id: id.into(),
            owner_id: owner_id.into(),
            calendar_id: calendar_id.into(),
            source_event_id: source_event_id.into(),
            window,
            status_text: status_text.into(),
            status_emoji,
            delivery_handle: None,
            pending_schedule: true,
            created_at,
        }
    }

    /// The absolute instant the presence status should expire, as unix
    /// seconds. Always derived from the window end.
    pub fn expires_at(&self) -> i64 {
        self.window.expires_at_unix()
    }

    /// Replace the status content. The window and identity fields are
    /// deliberately untouchable here.
    pub fn apply_content(&mut self, status_text: impl Into<String>, status_emoji: Option<EmojiRef>) {
        self.status_text = status_text.into();
        self.status_emoji = status_emoji;
    }
}
