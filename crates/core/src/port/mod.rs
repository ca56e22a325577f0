// Port Layer - Interfaces for external dependencies

pub mod credential_store;
pub mod delivery_repository;
pub mod id_provider; // For deterministic testing
pub mod presence_client;
pub mod scheduler_identity;
pub mod status_event_repository;
pub mod task_queue;
pub mod time_provider;

// Re-exports
pub use credential_store::CredentialStore;
pub use delivery_repository::DeliveryRepository;
pub use id_provider::IdProvider;
pub use presence_client::{PresenceClient, PresenceCredential, PresenceStatus};
pub use scheduler_identity::{SchedulerIdentityVerifier, StaticTokenVerifier};
pub use status_event_repository::StatusEventRepository;
pub use task_queue::TaskQueue;
pub use time_provider::TimeProvider;
