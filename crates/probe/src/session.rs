//! Shared browser session.
//!
//! A [`Session`] bundles the driver, the configuration and the clock that
//! every page and region of one test works against. It is cheap to clone;
//! clones share the same browser and the same navigation generation.
//!
//! The generation counter is how stale page objects are detected: each
//! instance records the generation it was created at, and every navigation
//! issued through the session bumps it.

use crate::clock::{SharedClock, SystemClock};
use crate::config::SessionConfig;
use crate::driver::BrowserDriver;
use crate::result::ProbeResult;
use crate::wait::{Poller, Wait, WaitConfig};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

struct SessionInner {
    driver: Arc<dyn BrowserDriver>,
    config: SessionConfig,
    clock: SharedClock,
    generation: AtomicU64,
}

/// Handle to the browser session shared by a test's page objects
#[derive(Clone)]
pub struct Session {
    inner: Arc<SessionInner>,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("base_url", &self.inner.config.base_url)
            .field("generation", &self.generation())
            .field("driver", &self.inner.driver)
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Create a session using the system clock
    pub fn new(driver: Arc<dyn BrowserDriver>, config: SessionConfig) -> Self {
        Self::with_clock(driver, config, Arc::new(SystemClock::new()))
    }

    /// Create a session with an explicit clock
    pub fn with_clock(
        driver: Arc<dyn BrowserDriver>,
        config: SessionConfig,
        clock: SharedClock,
    ) -> Self {
        Self {
            inner: Arc::new(SessionInner {
                driver,
                config,
                clock,
                generation: AtomicU64::new(0),
            }),
        }
    }

    /// The driver
    #[must_use]
    pub fn driver(&self) -> &dyn BrowserDriver {
        self.inner.driver.as_ref()
    }

    /// The configuration
    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.inner.config
    }

    /// The clock
    #[must_use]
    pub fn clock(&self) -> &SharedClock {
        &self.inner.clock
    }

    /// Current navigation generation
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.inner.generation.load(Ordering::SeqCst)
    }

    /// Record that the browser has moved to a new document
    ///
    /// Called for navigations the session did not issue itself, such as a
    /// link click. Returns the new generation.
    pub fn mark_navigated(&self) -> u64 {
        self.inner.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Navigate to an absolute URL or a path relative to the base URL
    ///
    /// Does not wait for the destination to be ready.
    pub fn navigate(&self, url_or_path: &str) -> ProbeResult<()> {
        let url = self.url_for(url_or_path);
        tracing::debug!(%url, "navigate");
        self.driver().navigate(&url)?;
        let _ = self.mark_navigated();
        Ok(())
    }

    /// Reload the current document
    pub fn refresh(&self) -> ProbeResult<()> {
        tracing::trace!("refresh");
        self.driver().refresh()?;
        let _ = self.mark_navigated();
        Ok(())
    }

    /// Current URL
    pub fn current_url(&self) -> ProbeResult<String> {
        Ok(self.driver().current_url()?)
    }

    /// Current document title
    pub fn title(&self) -> ProbeResult<String> {
        Ok(self.driver().title()?)
    }

    /// Join a path onto the configured base URL
    #[must_use]
    pub fn url_for(&self, path: &str) -> String {
        self.inner.config.url_for(path)
    }

    /// A wait using the configured default bounds
    #[must_use]
    pub fn wait(&self) -> Wait {
        self.wait_with(self.inner.config.wait)
    }

    /// A wait with explicit bounds
    #[must_use]
    pub fn wait_with(&self, config: WaitConfig) -> Wait {
        Wait::new(self.inner.clock.clone(), config)
    }

    /// A poller using the configured approval bounds
    #[must_use]
    pub fn approval_poller(&self) -> Poller {
        Poller::new(self.inner.clock.clone(), self.inner.config.approval)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockDriver;

    fn session() -> (Arc<MockDriver>, Session) {
        let driver = Arc::new(MockDriver::new("https://amo.test"));
        let session = Session::new(driver.clone(), SessionConfig::new("https://amo.test"));
        (driver, session)
    }

    #[test]
    fn test_navigation_bumps_generation() {
        let (_, session) = session();
        assert_eq!(session.generation(), 0);
        session.navigate("/en-US/developers/").unwrap();
        assert_eq!(session.generation(), 1);
        session.refresh().unwrap();
        assert_eq!(session.generation(), 2);
        assert_eq!(session.mark_navigated(), 3);
    }

    #[test]
    fn test_navigate_resolves_against_base_url() {
        let (driver, session) = session();
        session.navigate("/en-US/developers/").unwrap();
        assert_eq!(
            session.current_url().unwrap(),
            "https://amo.test/en-US/developers/"
        );
        assert!(driver.was_called("navigate:https://amo.test/en-US/developers/"));
    }

    #[test]
    fn test_clones_share_generation() {
        let (_, session) = session();
        let other = session.clone();
        other.navigate("/").unwrap();
        assert_eq!(session.generation(), 1);
    }
}
