//! Simulated-time observer.
//!
//! The stepping thread publishes its step counter after every step; any
//! thread can sample the clock without taking the environment lock. Time is
//! always derived as `steps * timestep`, so a sample can never disagree with
//! itself.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Cloneable, lock-free view of simulated time.
#[derive(Debug, Clone, Default)]
pub struct SimClock {
    inner: Arc<ClockInner>,
}

#[derive(Debug, Default)]
struct ClockInner {
    steps: AtomicU64,
    timestep_bits: AtomicU64,
}

impl SimClock {
    /// Clock reading zero with a zero timestep.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulated seconds.
    #[must_use]
    #[allow(clippy::cast_precision_loss)] // exact below 2^53 steps
    pub fn now(&self) -> f64 {
        self.steps() as f64 * self.timestep()
    }

    /// Steps taken since load.
    #[must_use]
    pub fn steps(&self) -> u64 {
        self.inner.steps.load(Ordering::Acquire)
    }

    /// Fixed step duration in seconds (zero before load).
    #[must_use]
    pub fn timestep(&self) -> f64 {
        f64::from_bits(self.inner.timestep_bits.load(Ordering::Acquire))
    }

    pub(crate) fn start(&self, timestep: f64, steps: u64) {
        self.inner.timestep_bits.store(timestep.to_bits(), Ordering::Release);
        self.inner.steps.store(steps, Ordering::Release);
    }

    pub(crate) fn publish(&self, steps: u64) {
        self.inner.steps.store(steps, Ordering::Release);
    }
}
