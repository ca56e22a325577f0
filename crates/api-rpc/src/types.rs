//! RPC Request/Response Types
//!
//! Defines the JSON-RPC method parameters and results. Instants travel as
//! strings and are normalized to UTC at this boundary.

use serde::{Deserialize, Serialize};

use presync_core::domain::StatusEvent;

/// Emoji reference as it appears on the wire
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmojiDto {
    pub name: String,
    #[serde(default)]
    pub asset_path: Option<String>,
}

/// status.create.v1 - Create a status event
#[derive(Debug, Deserialize)]
pub struct CreateRequest {
    pub owner_id: String,
    pub calendar_id: String,
    pub event_id: String,
    pub start: String,
    pub end: String,
    pub status_text: String,
    #[serde(default)]
    pub status_emoji: Option<EmojiDto>,
}

/// status.update.v1 - Update a status event's content
#[derive(Debug, Deserialize)]
pub struct UpdateRequest {
    pub status_event_id: String,
    pub status_text: String,
    #[serde(default)]
    pub status_emoji: Option<EmojiDto>,
}

/// status.delete.v1 - Delete a status event
#[derive(Debug, Deserialize)]
pub struct DeleteRequest {
    pub status_event_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeleteResponse {
    pub status_event_id: String,
    pub deleted: bool,
}

/// status.list.v1 - List an owner's status events
#[derive(Debug, Deserialize)]
pub struct ListRequest {
    pub owner_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ListResponse {
    pub events: Vec<StatusEventDto>,
}

/// delivery.fire.v1 - Scheduler-only delivery callback
#[derive(Debug, Deserialize)]
pub struct DeliverRequest {
    pub status_event_id: String,
    pub service_token: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeliverResponse {
    pub status_event_id: String,
    pub outcome: String,
}

/// StatusEvent as returned to clients
#[derive(Debug, Clone, Serialize)]
pub struct StatusEventDto {
    pub id: String,
    pub owner_id: String,
    pub calendar_id: String,
    pub event_id: String,
    pub start: String,
    pub end: String,
    pub status_text: String,
    pub status_emoji: Option<EmojiDto>,
    pub expires_at: i64,
    pub delivery_handle: Option<String>,
}

impl From<StatusEvent> for StatusEventDto {
    fn from(event: StatusEvent) -> Self {
        Self {
            expires_at: event.expires_at(),
            id: event.id,
            owner_id: event.owner_id,
            calendar_id: event.calendar_id,
            event_id: event.source_event_id,
            start: event.window.start().to_rfc3339(),
            end: event.window.end().to_rfc3339(),
            status_text: event.status_text,
            status_emoji: event.status_emoji.map(|e| EmojiDto {
                name: e.name,
                asset_path: e.asset_path,
            }),
            delivery_handle: event.delivery_handle,
        }
    }
}
