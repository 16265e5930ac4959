//! Request counter shared by all introspection requests.

use std::sync::atomic::{AtomicU64, Ordering};

/// Monotonic, zero-based request counter.
#[derive(Debug, Default)]
pub struct RequestCounter(AtomicU64);

impl RequestCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the next request number; returns the value before incrementing.
    pub fn next(&self) -> u64 {
        self.0.fetch_add(1, Ordering::Relaxed)
    }

    /// Number of requests counted so far.
    pub fn current(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }
}
