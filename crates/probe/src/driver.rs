//! BrowserDriver - abstract browser capability set
//!
//! Page objects never talk to a concrete automation engine. Everything they
//! need goes through [`BrowserDriver`], so the engine can be swapped (a
//! WebDriver client, a CDP client, or the in-memory [`crate::MockDriver`]).
//!
//! Calls are synchronous: a test has a single thread of control and waits
//! are blocking polls built on top of these primitives in [`crate::wait`].

use crate::locator::Locator;
use crate::result::DriverResult;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque handle to an element in the current document
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementHandle {
    /// Driver-specific identifier
    pub id: String,
}

impl ElementHandle {
    /// Create a new element handle
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

impl fmt::Display for ElementHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}

/// Abstract driver trait for browser automation
///
/// Implementations must resolve `find_elements` relative to `scope` when one
/// is given, returning only descendants of that element, and must report
/// handles into a replaced document or a detached subtree as
/// [`crate::DriverError::StaleElement`].
pub trait BrowserDriver: Send + Sync + fmt::Debug {
    /// Navigate to URL
    fn navigate(&self, url: &str) -> DriverResult<()>;

    /// Reload the current page
    fn refresh(&self) -> DriverResult<()>;

    /// Get current URL
    fn current_url(&self) -> DriverResult<String>;

    /// Get the document title
    fn title(&self) -> DriverResult<String>;

    /// Find all elements matching `locator`, beneath `scope` if given
    fn find_elements(
        &self,
        scope: Option<&ElementHandle>,
        locator: &Locator,
    ) -> DriverResult<Vec<ElementHandle>>;

    /// Click element
    fn click(&self, element: &ElementHandle) -> DriverResult<()>;

    /// Type text into element
    fn send_keys(&self, element: &ElementHandle, text: &str) -> DriverResult<()>;

    /// Rendered text of the element and its descendants
    fn text(&self, element: &ElementHandle) -> DriverResult<String>;

    /// Attribute value, `None` when absent
    fn attribute(&self, element: &ElementHandle, name: &str) -> DriverResult<Option<String>>;

    /// Whether the element is rendered visibly
    fn is_displayed(&self, element: &ElementHandle) -> DriverResult<bool>;

    /// Whether a checkbox, radio or option is selected
    fn is_selected(&self, element: &ElementHandle) -> DriverResult<bool>;

    /// Whether the element is enabled
    fn is_enabled(&self, element: &ElementHandle) -> DriverResult<bool>;
}
