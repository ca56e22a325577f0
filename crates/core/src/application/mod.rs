// Application Layer - Use Cases and Business Logic

pub mod delivery;
pub mod scheduler;
pub mod status_event;

// Re-exports
pub use delivery::{DeliveryHandler, DeliveryOutcome};
pub use scheduler::DeliveryScheduler;
pub use status_event::StatusEventService;
