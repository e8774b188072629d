//! Outbound request pacing.

use governor::{DefaultDirectRateLimiter, Quota};
use std::num::NonZeroU32;
use std::sync::Arc;
use tracing::warn;

/// Token bucket shared by every request to one provider.
#[derive(Clone)]
pub struct RequestPacer {
    limiter: Option<Arc<DefaultDirectRateLimiter>>,
    requests_per_minute: u32,
}

impl RequestPacer {
    /// Allow `requests_per_minute` requests; zero disables pacing.
    pub fn per_minute(requests_per_minute: u32) -> Self {
        let limiter = match NonZeroU32::new(requests_per_minute) {
            Some(rate) => Some(Arc::new(DefaultDirectRateLimiter::direct(
                Quota::per_minute(rate),
            ))),
            None => {
                warn!("Request pacing disabled (requests_per_minute = 0)");
                None
            }
        };
        Self {
            limiter,
            requests_per_minute,
        }
    }

    /// No pacing at all.
    pub fn unlimited() -> Self {
        Self {
            limiter: None,
            requests_per_minute: 0,
        }
    }

    /// Wait until a request is allowed.
    pub async fn wait(&self) {
        if let Some(limiter) = &self.limiter {
            limiter.until_ready().await;
        }
    }

    /// Check without waiting.
    pub fn check(&self) -> bool {
        self.limiter
            .as_ref()
            .map(|limiter| limiter.check().is_ok())
            .unwrap_or(true)
    }

    pub fn requests_per_minute(&self) -> u32 {
        self.requests_per_minute
    }
}

impl std::fmt::Debug for RequestPacer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestPacer")
            .field("requests_per_minute", &self.requests_per_minute)
            .finish()
    }
}
