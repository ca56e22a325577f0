// Slack PresenceClient Implementation
//
// Pushes a status to the user's Slack profile via `users.profile.set`.
// Slack's API is idempotent on identical input, which is what lets the
// delivery handler stay redelivery-safe without a dedup ledger.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use presync_core::error::{AppError, Result};
use presync_core::port::{PresenceClient, PresenceCredential, PresenceStatus};

const DEFAULT_BASE_URL: &str = "https://slack.com/api";

pub struct SlackPresenceClient {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Deserialize)]
struct SlackResponse {
    ok: bool,
    error: Option<String>,
}

impl SlackPresenceClient {
    pub fn new(base_url: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        }
    }

    fn profile_set_url(&self) -> String {
        format!("{}/users.profile.set", self.base_url.trim_end_matches('/'))
    }

    fn profile_body(status: &PresenceStatus) -> serde_json::Value {
        json!({
            "profile": {
                "status_text": status.text,
                // Slack clears the emoji on empty string, never null
                "status_emoji": status.emoji.as_deref().unwrap_or(""),
                "status_expiration": status.expires_at_unix,
            }
        })
    }
}

#[async_trait]
impl PresenceClient for SlackPresenceClient {
    async fn set_status(
        &self,
        credential: &PresenceCredential,
        status: &PresenceStatus,
    ) -> Result<()> {
        debug!(owner_id = %credential.owner_id, "Pushing status to presence profile");

        let response = self
            .client
            .post(self.profile_set_url())
            .bearer_auth(&credential.access_token)
            .json(&Self::profile_body(status))
            .send()
            .await
            .map_err(|e| AppError::Internal(format!("Presence API unreachable: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::Internal(format!(
                "Presence API returned HTTP {}",
                response.status()
            )));
        }

        let parsed: SlackResponse = response
            .json()
            .await
            .map_err(|e| AppError::Internal(format!("Bad presence API response: {}", e)))?;

        if !parsed.ok {
            return Err(AppError::DeliveryRejected(
                parsed.error.unwrap_or_else(|| "unknown_error".to_string()),
            ));
        }

        Ok(())
    }
}
