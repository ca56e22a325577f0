// Scheduler Identity Port - verifies inbound delivery callbacks

use crate::error::{AppError, Result};

/// Verifies that an inbound delivery callback really originates from the
/// external task-delivery service, as opposed to an end user.
pub trait SchedulerIdentityVerifier: Send + Sync {
    fn verify(&self, token: &str) -> Result<()>;
}

/// Shared-token verifier (production default).
///
/// The task-delivery service is configured to send this token with every
/// callback; an OIDC-style verifier can replace this behind the same port.
pub struct StaticTokenVerifier {
    expected: String,
}

impl StaticTokenVerifier {
    pub fn new(expected: impl Into<String>) -> Self {
        Self {
            expected: expected.into(),
        }
    }
}

impl SchedulerIdentityVerifier for StaticTokenVerifier {
    fn verify(&self, token: &str) -> Result<()> {
        if token == self.expected {
            Ok(())
        } else {
            Err(AppError::NotAuthenticated(
                "Delivery callback token does not match the scheduler identity".to_string(),
            ))
        }
    }
}
