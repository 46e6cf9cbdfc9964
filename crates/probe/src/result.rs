//! Result and error types for amo-probe.

use thiserror::Error;

/// Result type for probe operations
pub type ProbeResult<T> = Result<T, ProbeError>;

/// Result type for raw driver calls
pub type DriverResult<T> = Result<T, DriverError>;

/// Errors that can occur while driving pages and regions.
///
/// `NotFound`, `Timeout` and `AssertionFailed` are the failures a test
/// observes; the remaining variants cover driver and setup problems.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// A required element resolved to zero matches
    #[error("Element {locator} not found in {scope}")]
    NotFound {
        /// Locator that was resolved
        locator: String,
        /// Scope the lookup ran in (page, region, stale marker)
        scope: String,
    },

    /// A wait's condition never held within its bound
    #[error("Timed out after {ms}ms waiting for {waited_for}; last observed: {last_observed}")]
    Timeout {
        /// What was waited for
        waited_for: String,
        /// Bound in milliseconds
        ms: u64,
        /// Last state seen before giving up
        last_observed: String,
    },

    /// An expected value or state did not match
    #[error("Assertion failed: {message}")]
    AssertionFailed {
        /// Error message
        message: String,
    },

    /// Driver-level failure
    #[error("Driver error: {0}")]
    Driver(#[from] DriverError),

    /// Configuration could not be loaded
    #[error("Configuration error: {message}")]
    Config {
        /// Error message
        message: String,
    },

    /// Fixture error (addon archive could not be built)
    #[error("Fixture error: {message}")]
    FixtureError {
        /// Error message
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}

impl ProbeError {
    /// Build an `AssertionFailed` error
    pub fn assertion(message: impl Into<String>) -> Self {
        Self::AssertionFailed {
            message: message.into(),
        }
    }

    /// Whether this error means "element absent right now"
    ///
    /// Waits treat these as pending observations rather than failures.
    #[must_use]
    pub const fn is_absence(&self) -> bool {
        matches!(
            self,
            Self::NotFound { .. } | Self::Driver(DriverError::StaleElement { .. })
        )
    }
}

/// Errors reported by a [`crate::BrowserDriver`] implementation
#[derive(Debug, Error)]
pub enum DriverError {
    /// The element handle no longer refers to an attached element
    #[error("Stale element reference: {element}")]
    StaleElement {
        /// Handle id
        element: String,
    },

    /// The driver cannot resolve this locator strategy
    #[error("Unsupported locator strategy: {strategy}")]
    UnsupportedLocator {
        /// Strategy name
        strategy: String,
    },

    /// The selector string could not be parsed
    #[error("Invalid selector {selector:?}: {message}")]
    InvalidSelector {
        /// Selector text
        selector: String,
        /// Parse error
        message: String,
    },

    /// Navigation failed
    #[error("Navigation to {url} failed: {message}")]
    Navigation {
        /// Target URL
        url: String,
        /// Error message
        message: String,
    },

    /// Anything else the driver reports
    #[error("{message}")]
    Other {
        /// Error message
        message: String,
    },
}
