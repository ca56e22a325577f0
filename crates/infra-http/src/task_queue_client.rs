// HTTP TaskQueue Implementation
//
// Talks to the external at-least-once task-delivery service. The service
// invokes our delivery endpoint later with a credential bound to
// `caller_identity`; the api layer verifies that identity on the way in.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::debug;

use presync_core::error::{AppError, Result};
use presync_core::port::TaskQueue;

/// Connection settings for the task-delivery service
#[derive(Debug, Clone)]
pub struct TaskQueueConfig {
    /// Service base URL, e.g. `https://tasks.example.com/v2`
    pub base_url: String,
    /// Queue name deliveries are enqueued on
    pub queue: String,
    /// Bearer token authenticating us to the service
    pub auth_token: String,
    /// Service identity the delivery callback will carry
    pub caller_identity: String,
}

pub struct HttpTaskQueue {
    client: reqwest::Client,
    config: TaskQueueConfig,
}

#[derive(Serialize)]
struct EnqueueBody<'a> {
    target_url: &'a str,
    http_method: &'a str,
    payload: &'a serde_json::Value,
    schedule_time: String,
    caller_identity: &'a str,
}

#[derive(Deserialize)]
struct EnqueueResponse {
    /// The service's task identifier; our delivery handle
    name: String,
}

impl HttpTaskQueue {
    pub fn new(config: TaskQueueConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    fn tasks_url(&self) -> String {
        format!(
            "{}/queues/{}/tasks",
            self.config.base_url.trim_end_matches('/'),
            self.config.queue
        )
    }

    fn task_url(&self, handle: &str) -> String {
        format!("{}/{}", self.tasks_url(), handle)
    }
}

#[async_trait]
impl TaskQueue for HttpTaskQueue {
    async fn enqueue(
        &self,
        target_url: &str,
        payload: &serde_json::Value,
        fires_at: DateTime<Utc>,
    ) -> Result<String> {
        let body = EnqueueBody {
            target_url,
            http_method: "POST",
            payload,
            // The service expects UTC; fires_at is already normalized
            schedule_time: fires_at.to_rfc3339(),
            caller_identity: &self.config.caller_identity,
        };

        debug!(target_url = %target_url, schedule_time = %body.schedule_time, "Enqueueing task");

        let response = self
            .client
            .post(self.tasks_url())
            .bearer_auth(&self.config.auth_token)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::Scheduling(format!("Task service unreachable: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = response.text().await.unwrap_or_default();
            return Err(AppError::Scheduling(format!(
                "Task service rejected enqueue ({}): {}",
                status, detail
            )));
        }

        let parsed: EnqueueResponse = response
            .json()
            .await
            .map_err(|e| AppError::Scheduling(format!("Bad task service response: {}", e)))?;

        Ok(parsed.name)
    }

    async fn cancel(&self, handle: &str) -> Result<()> {
        let response = self
            .client
            .delete(self.task_url(handle))
            .bearer_auth(&self.config.auth_token)
            .send()
            .await
            .map_err(|e| AppError::Cancellation(format!("Task service unreachable: {}", e)))?;

        match response.status() {
            status if status.is_success() => Ok(()),
            StatusCode::NOT_FOUND => Err(AppError::Cancellation(format!(
                "Task {} unknown to the service (already fired or cancelled)",
                handle
            ))),
            status => {
                let detail = response.text().await.unwrap_or_default();
                Err(AppError::Cancellation(format!(
                    "Task service rejected cancel ({}): {}",
                    status, detail
                )))
            }
        }
    }
}
