//! Wait mechanisms
//!
//! Two primitives, both synchronous and bounded:
//!
//! - [`Wait::until`]: the short synchronization barrier used by load waits,
//!   visibility waits and post-action micro-waits.
//! - [`Poller::poll_until`]: the long refresh-observe-sleep loop against
//!   server-side state that settles eventually (auto-approval of a version).
//!
//! Both report the last observed state when they give up.

use crate::clock::SharedClock;
use crate::result::{ProbeError, ProbeResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default timeout for wait operations (10 seconds)
pub const DEFAULT_WAIT_TIMEOUT_MS: u64 = 10_000;

/// Default polling interval for waits (100ms)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 100;

/// Default interval between approval polls (30 seconds)
pub const DEFAULT_APPROVAL_INTERVAL_MS: u64 = 30_000;

/// Default ceiling for approval polls (7 minutes)
pub const DEFAULT_APPROVAL_CEILING_MS: u64 = 420_000;

const NOTHING_OBSERVED: &str = "nothing observed";

/// Shortest sleep between polls; a zero interval is raised to this
const MIN_INTERVAL_MS: u64 = 1;

const fn floor_interval(ms: u64) -> Duration {
    Duration::from_millis(if ms < MIN_INTERVAL_MS { MIN_INTERVAL_MS } else { ms })
}

// =============================================================================
// WAIT OPTIONS
// =============================================================================

/// Options for wait operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaitConfig {
    /// Timeout for explicit waits in milliseconds
    pub timeout_ms: u64,
    /// Polling interval in milliseconds
    pub poll_interval_ms: u64,
    /// How long a plain `find` keeps retrying before `NotFound` (0 = one try)
    pub implicit_ms: u64,
}

impl Default for WaitConfig {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_WAIT_TIMEOUT_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            implicit_ms: 0,
        }
    }
}

impl WaitConfig {
    /// Create new wait options with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set timeout in milliseconds
    #[must_use]
    pub const fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Set polling interval in milliseconds
    #[must_use]
    pub const fn with_poll_interval(mut self, poll_interval_ms: u64) -> Self {
        self.poll_interval_ms = poll_interval_ms;
        self
    }

    /// Set the implicit lookup wait in milliseconds
    #[must_use]
    pub const fn with_implicit(mut self, implicit_ms: u64) -> Self {
        self.implicit_ms = implicit_ms;
        self
    }

    /// Get timeout as Duration
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Get poll interval as Duration, never zero
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        floor_interval(self.poll_interval_ms)
    }

    /// The options a plain lookup runs with
    #[must_use]
    pub const fn implicit(&self) -> Self {
        Self {
            timeout_ms: self.implicit_ms,
            poll_interval_ms: self.poll_interval_ms,
            implicit_ms: self.implicit_ms,
        }
    }
}

// =============================================================================
// OBSERVATIONS
// =============================================================================

/// One probe of a wait condition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Observation<T> {
    /// Condition holds; carries the value the wait returns
    Ready(T),
    /// Condition does not hold yet; carries what was seen instead
    Pending(String),
}

impl<T> Observation<T> {
    /// Ready if `value` is `Some`, pending with `observed` otherwise
    pub fn from_option(value: Option<T>, observed: impl Into<String>) -> Self {
        match value {
            Some(v) => Self::Ready(v),
            None => Self::Pending(observed.into()),
        }
    }
}

// =============================================================================
// WAITER
// =============================================================================

/// Bounded synchronization barrier
#[derive(Debug, Clone)]
pub struct Wait {
    clock: SharedClock,
    config: WaitConfig,
}

impl Wait {
    /// Create a wait with explicit options
    #[must_use]
    pub fn new(clock: SharedClock, config: WaitConfig) -> Self {
        Self { clock, config }
    }

    /// Override the timeout for this wait only
    #[must_use]
    pub fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.config.timeout_ms = timeout_ms;
        self
    }

    /// Get the options
    #[must_use]
    pub const fn config(&self) -> &WaitConfig {
        &self.config
    }

    /// Poll `probe` until it reports ready or the timeout elapses.
    ///
    /// The probe always runs at least once. Absence errors (`NotFound`,
    /// stale handles) count as pending observations; any other error stops
    /// the wait and propagates.
    pub fn until<T, F>(&self, waited_for: impl Into<String>, mut probe: F) -> ProbeResult<T>
    where
        F: FnMut() -> ProbeResult<Observation<T>>,
    {
        let waited_for = waited_for.into();
        let timeout = self.config.timeout();
        let interval = self.config.poll_interval();
        let start = self.clock.now();
        let mut last_observed = String::from(NOTHING_OBSERVED);

        loop {
            match probe() {
                Ok(Observation::Ready(value)) => return Ok(value),
                Ok(Observation::Pending(observed)) => last_observed = observed,
                Err(e) if e.is_absence() => last_observed = e.to_string(),
                Err(e) => return Err(e),
            }

            let elapsed = self.clock.now().saturating_sub(start);
            if elapsed >= timeout {
                tracing::trace!(%waited_for, %last_observed, "wait timed out");
                return Err(ProbeError::Timeout {
                    waited_for,
                    ms: self.config.timeout_ms,
                    last_observed,
                });
            }
            self.clock.sleep(interval.min(timeout - elapsed));
        }
    }

    /// Poll a boolean condition, observing `false` as `pending`
    pub fn until_true<F>(
        &self,
        waited_for: impl Into<String>,
        pending: &str,
        mut condition: F,
    ) -> ProbeResult<()>
    where
        F: FnMut() -> ProbeResult<bool>,
    {
        self.until(waited_for, || {
            Ok(if condition()? {
                Observation::Ready(())
            } else {
                Observation::Pending(pending.to_string())
            })
        })
    }
}

// =============================================================================
// BOUNDED POLLING
// =============================================================================

/// Options for the refresh-observe-sleep loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollConfig {
    /// Sleep between polls in milliseconds
    pub interval_ms: u64,
    /// Total time allowed in milliseconds
    pub ceiling_ms: u64,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval_ms: DEFAULT_APPROVAL_INTERVAL_MS,
            ceiling_ms: DEFAULT_APPROVAL_CEILING_MS,
        }
    }
}

impl PollConfig {
    /// Create options from interval and ceiling
    #[must_use]
    pub const fn new(interval_ms: u64, ceiling_ms: u64) -> Self {
        Self {
            interval_ms,
            ceiling_ms,
        }
    }

    /// Get interval as Duration, never zero
    #[must_use]
    pub const fn interval(&self) -> Duration {
        floor_interval(self.interval_ms)
    }

    /// Get ceiling as Duration
    #[must_use]
    pub const fn ceiling(&self) -> Duration {
        Duration::from_millis(self.ceiling_ms)
    }
}

/// Successful poll result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollOutcome {
    /// The observed value that satisfied the predicate
    pub value: String,
    /// Number of refresh-observe rounds, including the successful one
    pub attempts: usize,
    /// Time from the first refresh to success
    pub elapsed: Duration,
}

/// Refresh-observe-sleep loop with a hard ceiling
#[derive(Debug, Clone)]
pub struct Poller {
    clock: SharedClock,
    config: PollConfig,
}

impl Poller {
    /// Create a poller
    #[must_use]
    pub fn new(clock: SharedClock, config: PollConfig) -> Self {
        Self { clock, config }
    }

    /// Get the options
    #[must_use]
    pub const fn config(&self) -> &PollConfig {
        &self.config
    }

    /// Poll until `predicate` accepts an observed value.
    ///
    /// Each round refreshes, then observes, then checks. Rounds continue
    /// while the elapsed time is under the ceiling, sleeping one interval
    /// after every rejected observation. An absent element observes as its
    /// error text. Refresh failures and other errors propagate.
    pub fn poll_until<R, O, P>(
        &self,
        waited_for: impl Into<String>,
        mut refresh: R,
        mut observe: O,
        predicate: P,
    ) -> ProbeResult<PollOutcome>
    where
        R: FnMut() -> ProbeResult<()>,
        O: FnMut() -> ProbeResult<String>,
        P: Fn(&str) -> bool,
    {
        let waited_for = waited_for.into();
        let ceiling = self.config.ceiling();
        let start = self.clock.now();
        let mut attempts = 0;
        let mut last_observed: Option<String> = None;

        while self.clock.now().saturating_sub(start) < ceiling {
            refresh()?;
            attempts += 1;

            let value = match observe() {
                Ok(value) => value,
                Err(e) if e.is_absence() => e.to_string(),
                Err(e) => return Err(e),
            };

            if predicate(&value) {
                let elapsed = self.clock.now().saturating_sub(start);
                tracing::debug!(%waited_for, attempts, ?elapsed, "poll satisfied");
                return Ok(PollOutcome {
                    value,
                    attempts,
                    elapsed,
                });
            }

            tracing::trace!(%waited_for, attempt = attempts, observed = %value, "poll pending");
            last_observed = Some(value);
            self.clock.sleep(self.config.interval());
        }

        let last_observed = last_observed.unwrap_or_else(|| NOTHING_OBSERVED.to_string());
        tracing::warn!(%waited_for, attempts, %last_observed, "poll ceiling reached");
        Err(ProbeError::Timeout {
            waited_for,
            ms: self.config.ceiling_ms,
            last_observed,
        })
    }
}
