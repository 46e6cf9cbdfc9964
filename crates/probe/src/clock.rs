//! Clock seam for waits and polls.
//!
//! Every wait in the framework reads time and sleeps through [`Clock`], so
//! tests can swap in [`FakeClock`] and exercise multi-minute polling bounds
//! instantly and deterministically.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Source of monotonic time and blocking sleep
pub trait Clock: Send + Sync + fmt::Debug {
    /// Time elapsed since the clock's origin
    fn now(&self) -> Duration;

    /// Block the calling flow for `duration`
    fn sleep(&self, duration: Duration);
}

/// Shared clock handle
pub type SharedClock = Arc<dyn Clock>;

/// Wall clock backed by [`Instant`] and [`std::thread::sleep`]
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    /// Create a clock whose origin is now
    #[must_use]
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }

    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Fake clock for deterministic testing
///
/// `sleep` returns immediately after advancing the fake time. Total slept
/// time and the number of sleeps are recorded for assertions.
#[derive(Debug, Default)]
pub struct FakeClock {
    /// Current fake time in milliseconds since origin
    current_ms: AtomicU64,
    /// Sum of all sleeps in milliseconds
    slept_ms: AtomicU64,
    /// Number of sleep calls
    sleeps: AtomicU64,
}

impl FakeClock {
    /// Create a fake clock at time zero
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a shared fake clock
    #[must_use]
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Get current fake time in milliseconds
    #[must_use]
    pub fn now_ms(&self) -> u64 {
        self.current_ms.load(Ordering::SeqCst)
    }

    /// Fast-forward time by duration without counting it as a sleep
    pub fn fast_forward(&self, duration: Duration) {
        let _ = self
            .current_ms
            .fetch_add(duration.as_millis() as u64, Ordering::SeqCst);
    }

    /// Fast-forward time by milliseconds
    pub fn fast_forward_ms(&self, ms: u64) {
        self.fast_forward(Duration::from_millis(ms));
    }

    /// Total time spent in `sleep`
    #[must_use]
    pub fn slept(&self) -> Duration {
        Duration::from_millis(self.slept_ms.load(Ordering::SeqCst))
    }

    /// Number of `sleep` calls
    #[must_use]
    pub fn sleep_count(&self) -> u64 {
        self.sleeps.load(Ordering::SeqCst)
    }
}

impl Clock for FakeClock {
    fn now(&self) -> Duration {
        Duration::from_millis(self.now_ms())
    }

    fn sleep(&self, duration: Duration) {
        let ms = duration.as_millis() as u64;
        let _ = self.current_ms.fetch_add(ms, Ordering::SeqCst);
        let _ = self.slept_ms.fetch_add(ms, Ordering::SeqCst);
        let _ = self.sleeps.fetch_add(1, Ordering::SeqCst);
    }
}
