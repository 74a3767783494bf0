//! Per-requester token bucket rate limiting

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::RequesterId;

/// Token bucket that refills to full capacity once the refill interval
/// has elapsed since the last refill. Partial refills are not granted.
#[derive(Debug, Clone)]
pub struct TokenBucket {
    capacity: u32,
    refill_interval: Duration,
    tokens: u32,
    last_refill: Instant,
}

impl TokenBucket {
    pub fn new(capacity: u32, refill_interval: Duration) -> Self {
        Self::new_at(capacity, refill_interval, Instant::now())
    }

    pub(crate) fn new_at(capacity: u32, refill_interval: Duration, now: Instant) -> Self {
        Self {
            capacity,
            refill_interval,
            tokens: capacity,
            last_refill: now,
        }
    }

    /// Take one token, refilling first if the interval has passed.
    pub fn try_consume(&mut self) -> bool {
        self.try_consume_at(Instant::now())
    }

    pub(crate) fn try_consume_at(&mut self, now: Instant) -> bool {
        if now.duration_since(self.last_refill) >= self.refill_interval {
            self.tokens = self.capacity;
            self.last_refill = now;
        }
        if self.tokens > 0 {
            self.tokens -= 1;
            true
        } else {
            false
        }
    }

    pub fn remaining(&self) -> u32 {
        self.tokens
    }
}

/// Lazily populated map of token buckets keyed by requester.
#[derive(Debug)]
pub struct RateLimiter {
    capacity: u32,
    refill_interval: Duration,
    buckets: HashMap<RequesterId, TokenBucket>,
}

impl RateLimiter {
    pub fn new(capacity: u32, refill_interval: Duration) -> Self {
        Self {
            capacity,
            refill_interval,
            buckets: HashMap::new(),
        }
    }

    pub fn try_consume(&mut self, requester: &RequesterId) -> bool {
        let bucket = self
            .buckets
            .entry(requester.clone())
            .or_insert_with(|| TokenBucket::new(self.capacity, self.refill_interval));
        bucket.try_consume()
    }

    /// Drop the bucket for a requester that went away.
    pub fn remove(&mut self, requester: &RequesterId) {
        self.buckets.remove(requester);
    }
}
