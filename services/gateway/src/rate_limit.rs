//! Per-account token buckets for the write endpoints
//!
//! Each authenticated principal gets one bucket per endpoint class.
//! Buckets refill continuously; a bucket idle long enough to be full
//! again carries no state worth keeping, so idle entries are evicted
//! once the map grows past a threshold.

use crate::error::AppError;
use dashmap::DashMap;
use std::time::{Duration, Instant};
use types::ids::AccountId;

/// A bucket idle this long has fully refilled and can be dropped
const IDLE_EVICTION: Duration = Duration::from_secs(300);

/// Map size at which a check also sweeps idle buckets
const EVICTION_SCAN_THRESHOLD: usize = 4096;

/// Endpoint classes that consume rate-limit tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiClass {
    PlaceOrder,
    CancelOrder,
}

impl ApiClass {
    /// Burst capacity in requests
    fn capacity(self) -> u32 {
        match self {
            ApiClass::PlaceOrder => 20,
            ApiClass::CancelOrder => 50,
        }
    }

    /// Sustained throughput in requests per second
    fn refill_per_sec(self) -> f64 {
        match self {
            ApiClass::PlaceOrder => 20.0,
            ApiClass::CancelOrder => 50.0,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            ApiClass::PlaceOrder => "order placement",
            ApiClass::CancelOrder => "order cancellation",
        }
    }
}

struct Bucket {
    tokens: f64,
    last_refill: Instant,
}

impl Bucket {
    fn full(class: ApiClass) -> Self {
        Self {
            tokens: class.capacity() as f64,
            last_refill: Instant::now(),
        }
    }

    fn try_take(&mut self, class: ApiClass) -> bool {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_refill).as_secs_f64();
        self.tokens = f64::min(
            class.capacity() as f64,
            self.tokens + elapsed * class.refill_per_sec(),
        );
        self.last_refill = now;

        if self.tokens >= 1.0 {
            self.tokens -= 1.0;
            true
        } else {
            false
        }
    }

    fn is_idle(&self, now: Instant) -> bool {
        now.duration_since(self.last_refill) >= IDLE_EVICTION
    }
}

/// Token-bucket rate limiter keyed by (principal, endpoint class)
pub struct RateLimiter {
    buckets: DashMap<(AccountId, ApiClass), Bucket>,
}

impl RateLimiter {
    pub fn new() -> Self {
        Self {
            buckets: DashMap::new(),
        }
    }

    pub fn check(&self, account: AccountId, class: ApiClass) -> Result<(), AppError> {
        let allowed = {
            let mut bucket = self
                .buckets
                .entry((account, class))
                .or_insert_with(|| Bucket::full(class));
            bucket.try_take(class)
        };
        self.evict_idle();

        if allowed {
            Ok(())
        } else {
            Err(AppError::RateLimitExceeded(format!(
                "too many {} requests",
                class.as_str()
            )))
        }
    }

    /// Drop fully-refilled idle buckets so one-off principals cannot
    /// grow the map without bound
    fn evict_idle(&self) {
        if self.buckets.len() < EVICTION_SCAN_THRESHOLD {
            return;
        }
        let now = Instant::now();
        self.buckets.retain(|_, bucket| !bucket.is_idle(now));
    }
}
