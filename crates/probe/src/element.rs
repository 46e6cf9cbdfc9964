//! Element interaction wrapper.
//!
//! An [`Element`] is a resolved handle plus the session it came from.
//! Interactions are fire-and-return: nothing here waits. A handle into a
//! replaced or detached subtree reports `NotFound`; re-query through the
//! page or region instead of holding on to elements across navigations.

use crate::driver::ElementHandle;
use crate::locator::Locator;
use crate::result::{DriverError, DriverResult, ProbeError, ProbeResult};
use crate::session::Session;
use std::fmt;

/// A located element
#[derive(Clone)]
pub struct Element {
    session: Session,
    handle: ElementHandle,
    locator: Locator,
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Element")
            .field("handle", &self.handle)
            .field("locator", &self.locator)
            .finish_non_exhaustive()
    }
}

impl Element {
    /// Wrap a driver handle found through `locator`
    #[must_use]
    pub fn new(session: Session, handle: ElementHandle, locator: Locator) -> Self {
        Self {
            session,
            handle,
            locator,
        }
    }

    /// The driver handle
    #[must_use]
    pub const fn handle(&self) -> &ElementHandle {
        &self.handle
    }

    /// The locator this element was found with
    #[must_use]
    pub const fn locator(&self) -> &Locator {
        &self.locator
    }

    /// The owning session
    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.session
    }

    fn lift<T>(&self, result: DriverResult<T>) -> ProbeResult<T> {
        result.map_err(|e| match e {
            DriverError::StaleElement { element } => ProbeError::NotFound {
                locator: self.locator.to_string(),
                scope: format!("stale element {element}"),
            },
            other => ProbeError::Driver(other),
        })
    }

    /// Click the element
    pub fn click(&self) -> ProbeResult<()> {
        tracing::trace!(locator = %self.locator, "click");
        self.lift(self.session.driver().click(&self.handle))
    }

    /// Type text into the element
    pub fn send_keys(&self, text: &str) -> ProbeResult<()> {
        self.lift(self.session.driver().send_keys(&self.handle, text))
    }

    /// Rendered text
    pub fn text(&self) -> ProbeResult<String> {
        self.lift(self.session.driver().text(&self.handle))
    }

    /// Attribute value, `None` when absent
    pub fn attribute(&self, name: &str) -> ProbeResult<Option<String>> {
        self.lift(self.session.driver().attribute(&self.handle, name))
    }

    /// Whether the element is visible
    pub fn is_displayed(&self) -> ProbeResult<bool> {
        self.lift(self.session.driver().is_displayed(&self.handle))
    }

    /// Whether a checkbox, radio or option is selected
    pub fn is_selected(&self) -> ProbeResult<bool> {
        self.lift(self.session.driver().is_selected(&self.handle))
    }

    /// Whether the element is enabled
    pub fn is_enabled(&self) -> ProbeResult<bool> {
        self.lift(self.session.driver().is_enabled(&self.handle))
    }

    /// Visible and enabled
    pub fn is_clickable(&self) -> ProbeResult<bool> {
        Ok(self.is_displayed()? && self.is_enabled()?)
    }

    /// Click, then record that the browser moved to a new document
    pub fn click_and_navigate(&self) -> ProbeResult<()> {
        self.click()?;
        let _ = self.session.mark_navigated();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SessionConfig;
    use crate::mock::{MockDriver, Node};
    use crate::page_object::PageObject;
    use crate::scope::Scope;
    use std::sync::Arc;

    const EMAIL: Locator = Locator::name("email");
    const AGREE: Locator = Locator::id("agree");
    const HIDDEN: Locator = Locator::id("hidden-button");
    const NEXT: Locator = Locator::link_text("Next");

    fn form_session() -> (Arc<MockDriver>, Session) {
        let driver = Arc::new(MockDriver::new("https://amo.test"));
        driver.route(
            "/form",
            Node::new("form").children([
                Node::new("input").attr("name", "email").attr("value", "dev"),
                Node::new("input").id("agree").attr("type", "checkbox"),
                Node::new("button").id("hidden-button").hidden().text("Go"),
                Node::new("a").attr("href", "/next").text("Next"),
            ]),
        );
        driver.route("/next", Node::new("body").child(Node::new("h1").text("Next page")));
        let session = Session::new(driver.clone(), SessionConfig::new("https://amo.test"));
        session.navigate("/form").unwrap();
        (driver, session)
    }

    #[test]
    fn test_send_keys_and_attribute() {
        let (driver, session) = form_session();
        let email = PageObject::new(&session, "Form").find(&EMAIL).unwrap();
        email.send_keys("@example.com").unwrap();
        assert_eq!(email.attribute("value").unwrap().as_deref(), Some("dev@example.com"));
        assert_eq!(email.attribute("placeholder").unwrap(), None);
        assert!(driver.was_called("send_keys:input"));
    }

    #[test]
    fn test_click_toggles_selection() {
        let (_, session) = form_session();
        let agree = PageObject::new(&session, "Form").find(&AGREE).unwrap();
        assert!(!agree.is_selected().unwrap());
        agree.click().unwrap();
        assert!(agree.is_selected().unwrap());
        assert!(agree.is_clickable().unwrap());
    }

    #[test]
    fn test_hidden_element_is_not_interactable() {
        let (_, session) = form_session();
        let button = PageObject::new(&session, "Form").find(&HIDDEN).unwrap();
        assert!(!button.is_clickable().unwrap());
        let err = button.click().unwrap_err();
        assert!(matches!(err, ProbeError::Driver(DriverError::Other { .. })));
        assert!(err.to_string().contains("not interactable"));
    }

    #[test]
    fn test_click_and_navigate_marks_session() {
        let (driver, session) = form_session();
        let before = session.generation();
        let next = PageObject::new(&session, "Form").find(&NEXT).unwrap();
        next.click_and_navigate().unwrap();

        assert_eq!(session.generation(), before + 1);
        assert_eq!(session.current_url().unwrap(), "https://amo.test/next");
        assert_eq!(driver.document_count(), 2);
    }

    #[test]
    fn test_old_handle_is_stale_after_navigation() {
        let (_, session) = form_session();
        let email = PageObject::new(&session, "Form").find(&EMAIL).unwrap();
        session.refresh().unwrap();

        match email.text().unwrap_err() {
            ProbeError::NotFound { locator, scope } => {
                assert_eq!(locator, "name=email");
                assert!(scope.starts_with("stale element"), "{scope}");
            }
            other => panic!("expected NotFound, got {other:?}"),
        }
        assert!(email.is_displayed().unwrap_err().is_absence());
    }
}
