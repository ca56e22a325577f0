// Domain Layer - Pure business logic and entities

pub mod delivery;
pub mod error;
pub mod status_event;
pub mod time;

// Re-exports
pub use delivery::{DeliveryRecord, DeliveryState};
pub use error::DomainError;
pub use status_event::{EmojiRef, EventWindow, OwnerId, StatusEvent, StatusEventId};
pub use time::parse_instant;
