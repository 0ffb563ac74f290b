//! Per-API request gates

use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use std::num::NonZeroU32;
use std::sync::Arc;
use tracing::trace;

type SharedRateLimiter = Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>;

/// Token-bucket gate guarding one external API
///
/// Requests are spread evenly over the minute (burst of one), so a gate of
/// 60/min lets one call through per second. Clones share the same bucket.
#[derive(Clone)]
pub struct RateGate {
    name: Arc<str>,
    limiter: Option<SharedRateLimiter>,
}

impl RateGate {
    /// Gate allowing `requests_per_minute` calls; 0 means unlimited
    pub fn per_minute(name: &str, requests_per_minute: u32) -> Self {
        let limiter = NonZeroU32::new(requests_per_minute).map(|rpm| {
            let quota = Quota::per_minute(rpm).allow_burst(NonZeroU32::MIN);
            Arc::new(RateLimiter::direct(quota))
        });

        Self {
            name: Arc::from(name),
            limiter,
        }
    }

    /// Gate that never waits
    pub fn unlimited(name: &str) -> Self {
        Self::per_minute(name, 0)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Wait until the next request may go out
    pub async fn wait(&self) {
        if let Some(limiter) = &self.limiter {
            limiter.until_ready().await;
            trace!(gate = %self.name, "rate gate passed");
        }
    }
}

impl std::fmt::Debug for RateGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateGate")
            .field("name", &self.name)
            .field("limited", &self.limiter.is_some())
            .finish()
    }
}
