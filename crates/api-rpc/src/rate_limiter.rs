//! Rate Limiter (Token Bucket)
//!
//! Bounds the request rate of the whole RPC surface. The bucket holds at
//! most `max_tokens`; `refill_rate` tokens come back per second.

use std::sync::Mutex;
use std::time::Instant;

pub struct RateLimiter {
    state: Mutex<BucketState>,
    max_tokens: f64,
    refill_rate: f64, // tokens per second
}

struct BucketState {
    tokens: f64,
    last_refill: Instant,
}

impl RateLimiter {
    pub fn new(max_tokens: u32, refill_rate: u32) -> Self {
        Self {
            state: Mutex::new(BucketState {
                tokens: f64::from(max_tokens),
                last_refill: Instant::now(),
            }),
            max_tokens: f64::from(max_tokens),
            refill_rate: f64::from(refill_rate),
        }
    }

    /// Consume one token. Returns false when the bucket is empty.
    pub fn check(&self) -> bool {
        let mut state = match self.state.lock() {
            Ok(state) => state,
            // A poisoned lock means a panic mid-check; failing open here
            // would defeat the limiter, so fail closed.
            Err(_) => return false,
        };

        let now = Instant::now();
        let elapsed = now.duration_since(state.last_refill).as_secs_f64();
        state.tokens = (state.tokens + elapsed * self.refill_rate).min(self.max_tokens);
        state.last_refill = now;

        if state.tokens >= 1.0 {
            state.tokens -= 1.0;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_allows_within_burst() {
        let limiter = RateLimiter::new(10, 10);
        for _ in 0..10 {
            assert!(limiter.check());
        }
        assert!(!limiter.check());
    }

    #[test]
    fn test_refills_over_time() {
        let limiter = RateLimiter::new(5, 100); // fast refill for the test
        for _ in 0..5 {
            assert!(limiter.check());
        }
        assert!(!limiter.check());

        std::thread::sleep(Duration::from_millis(50));
        assert!(limiter.check());
    }

    #[test]
    fn test_never_exceeds_burst() {
        let limiter = RateLimiter::new(3, 1000);
        std::thread::sleep(Duration::from_millis(20));
        let mut allowed = 0;
        for _ in 0..10 {
            if limiter.check() {
                allowed += 1;
            }
        }
        assert!(allowed <= 4, "burst cap respected, got {}", allowed);
    }
}
