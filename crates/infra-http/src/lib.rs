// Presync Infrastructure - HTTP Adapters
// Implements: TaskQueue (external task-delivery service), PresenceClient

mod presence_client;
mod task_queue_client;

pub use presence_client::SlackPresenceClient;
pub use task_queue_client::{HttpTaskQueue, TaskQueueConfig};
