//! Lookup scopes: the whole document or a region beneath a root element.
//!
//! [`Scope`] carries the lookup contract shared by pages and regions:
//!
//! - `find` requires a match and fails with `NotFound` once the implicit
//!   wait (`WaitConfig::implicit_ms`) is spent
//! - `find_all` returns an empty list when nothing matches
//! - `find_optional` is the explicit "may be absent" lookup
//!
//! A scope created before the session's last navigation is stale; every
//! lookup through it fails with `NotFound` instead of touching whatever
//! document the browser shows now.

use crate::driver::ElementHandle;
use crate::element::Element;
use crate::locator::Locator;
use crate::result::{DriverError, ProbeError, ProbeResult};
use crate::session::Session;
use crate::wait::Observation;

const NO_MATCHES: &str = "no matches";

/// Shared lookup contract of pages and regions
pub trait Scope {
    /// The session this scope belongs to
    fn session(&self) -> &Session;

    /// Root element, `None` for the whole document
    fn root_handle(&self) -> Option<&ElementHandle>;

    /// Navigation generation the scope was created at
    fn generation(&self) -> u64;

    /// Human-readable scope name for messages
    fn describe(&self) -> String;

    /// Fail with `NotFound` if the session navigated since creation
    fn check_fresh(&self, locator: &Locator) -> ProbeResult<()> {
        let current = self.session().generation();
        if current == self.generation() {
            Ok(())
        } else {
            Err(ProbeError::NotFound {
                locator: locator.to_string(),
                scope: format!(
                    "stale {} (generation {}, session at {current})",
                    self.describe(),
                    self.generation()
                ),
            })
        }
    }

    /// One lookup attempt, no waiting
    fn lookup(&self, locator: &Locator) -> ProbeResult<Vec<Element>> {
        self.check_fresh(locator)?;
        let handles = self
            .session()
            .driver()
            .find_elements(self.root_handle(), locator)
            .map_err(|e| match e {
                DriverError::StaleElement { element } => ProbeError::NotFound {
                    locator: locator.to_string(),
                    scope: format!("{} with stale root {element}", self.describe()),
                },
                other => ProbeError::Driver(other),
            })?;
        Ok(handles
            .into_iter()
            .map(|h| Element::new(self.session().clone(), h, *locator))
            .collect())
    }

    /// Find the first match, retrying for the implicit wait
    fn find(&self, locator: &Locator) -> ProbeResult<Element> {
        self.check_fresh(locator)?;
        let implicit = self.session().config().wait.implicit();
        self.session()
            .wait_with(implicit)
            .until(format!("{locator} in {}", self.describe()), || {
                Ok(Observation::from_option(
                    self.lookup(locator)?.into_iter().next(),
                    NO_MATCHES,
                ))
            })
            .map_err(|e| match e {
                ProbeError::Timeout { last_observed, .. } => ProbeError::NotFound {
                    locator: locator.to_string(),
                    scope: if last_observed == NO_MATCHES {
                        self.describe()
                    } else {
                        format!("{} ({last_observed})", self.describe())
                    },
                },
                other => other,
            })
    }

    /// All matches; empty when nothing matches
    fn find_all(&self, locator: &Locator) -> ProbeResult<Vec<Element>> {
        let found = self.lookup(locator)?;
        let implicit = self.session().config().wait.implicit();
        if !found.is_empty() || implicit.timeout_ms == 0 {
            return Ok(found);
        }
        match self
            .session()
            .wait_with(implicit)
            .until(format!("any {locator} in {}", self.describe()), || {
                let found = self.lookup(locator)?;
                Ok(if found.is_empty() {
                    Observation::Pending(NO_MATCHES.to_string())
                } else {
                    Observation::Ready(found)
                })
            }) {
            Ok(found) => Ok(found),
            Err(ProbeError::Timeout { .. }) => Ok(Vec::new()),
            Err(e) => Err(e),
        }
    }

    /// First match or `None`; a stale scope is still an error
    fn find_optional(&self, locator: &Locator) -> ProbeResult<Option<Element>> {
        Ok(self.lookup(locator)?.into_iter().next())
    }

    /// Present and visible; absence is `false`
    fn is_element_displayed(&self, locator: &Locator) -> ProbeResult<bool> {
        match self.find_optional(locator)? {
            Some(element) => element.is_displayed(),
            None => Ok(false),
        }
    }

    /// Block until the first match is visible
    fn wait_for_visible(&self, locator: &Locator) -> ProbeResult<Element> {
        self.session()
            .wait()
            .until(format!("{locator} visible in {}", self.describe()), || {
                Ok(match self.lookup(locator)?.into_iter().next() {
                    Some(element) if element.is_displayed()? => Observation::Ready(element),
                    Some(_) => Observation::Pending("present but hidden".to_string()),
                    None => Observation::Pending(NO_MATCHES.to_string()),
                })
            })
    }

    /// Block until the first match is visible and enabled
    fn wait_for_clickable(&self, locator: &Locator) -> ProbeResult<Element> {
        self.session()
            .wait()
            .until(format!("{locator} clickable in {}", self.describe()), || {
                Ok(match self.lookup(locator)?.into_iter().next() {
                    Some(element) if element.is_clickable()? => Observation::Ready(element),
                    Some(_) => Observation::Pending("present but not clickable".to_string()),
                    None => Observation::Pending(NO_MATCHES.to_string()),
                })
            })
    }

    /// Block until any match is visible
    fn wait_for_any_visible(&self, locator: &Locator) -> ProbeResult<Vec<Element>> {
        self.session()
            .wait()
            .until(format!("any {locator} visible in {}", self.describe()), || {
                let found = self.lookup(locator)?;
                for element in &found {
                    if element.is_displayed()? {
                        return Ok(Observation::Ready(found));
                    }
                }
                Ok(Observation::Pending(format!("{} hidden matches", found.len())))
            })
    }

    /// Block until `element` is hidden or gone
    fn wait_for_element_hidden(&self, element: &Element) -> ProbeResult<()> {
        self.session()
            .wait()
            .until(format!("{} hidden", element.locator()), || {
                match element.is_displayed() {
                    Ok(false) => Ok(Observation::Ready(())),
                    Ok(true) => Ok(Observation::Pending("still visible".to_string())),
                    Err(e) if e.is_absence() => Ok(Observation::Ready(())),
                    Err(e) => Err(e),
                }
            })
    }
}

/// How a region's root was obtained
#[derive(Debug, Clone)]
enum Anchor {
    /// Found through the root locator beneath `parent` (`None`: the document);
    /// the barrier re-resolves the locator
    Located { parent: Option<ElementHandle> },
    /// Handed over as an element (list items); only that element is the root
    Bound,
}

/// A scoped sub-tree of the page bound to a root element
#[derive(Debug, Clone)]
pub struct Region {
    root: Element,
    name: &'static str,
    generation: u64,
    anchor: Anchor,
}

impl Region {
    /// Resolve `root_locator` inside `parent` and bind a region to it
    pub fn locate<S: Scope + ?Sized>(
        parent: &S,
        root_locator: &Locator,
        name: &'static str,
    ) -> ProbeResult<Self> {
        let root = parent.find(root_locator)?;
        Ok(Self::anchored(root, name, parent.root_handle().cloned()))
    }

    /// Wait until `root_locator` resolves to a visible element inside
    /// `parent`, then bind a region to it
    pub fn wait_for<S: Scope + ?Sized>(
        parent: &S,
        root_locator: &Locator,
        name: &'static str,
    ) -> ProbeResult<Self> {
        let root = parent.wait_for_visible(root_locator)?;
        Ok(Self::anchored(root, name, parent.root_handle().cloned()))
    }

    fn anchored(root: Element, name: &'static str, parent: Option<ElementHandle>) -> Self {
        Self {
            anchor: Anchor::Located { parent },
            ..Self::from_element(root, name)
        }
    }

    /// Bind a region to an already located element (list items)
    #[must_use]
    pub fn from_element(root: Element, name: &'static str) -> Self {
        let generation = root.session().generation();
        Self {
            root,
            name,
            generation,
            anchor: Anchor::Bound,
        }
    }

    /// The root element
    #[must_use]
    pub const fn root(&self) -> &Element {
        &self.root
    }

    /// Region name
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Whether the root is visible
    pub fn is_displayed(&self) -> ProbeResult<bool> {
        self.check_fresh(self.root.locator())?;
        self.root.is_displayed()
    }

    /// Block until the root is visible.
    ///
    /// A located region re-resolves its root locator on every poll and
    /// rebinds to the visible match, so a root rendered late or replaced
    /// while waiting is picked up. A bound region can only wait on its own
    /// element.
    pub fn wait_until_visible(mut self) -> ProbeResult<Self> {
        let parent = match &self.anchor {
            Anchor::Located { parent } => Some(parent.clone()),
            Anchor::Bound => None,
        };
        if let Some(parent) = parent {
            let root = ParentScope {
                region: &self,
                handle: parent.as_ref(),
            }
            .wait_for_visible(self.root.locator())?;
            self.root = root;
            return Ok(self);
        }

        self.session()
            .wait()
            .until(format!("{} visible", self.describe()), || {
                self.check_fresh(self.root.locator())?;
                Ok(if self.root.is_displayed()? {
                    Observation::Ready(())
                } else {
                    Observation::Pending("root hidden".to_string())
                })
            })?;
        Ok(self)
    }
}

/// The scope a located region's root is resolved in
struct ParentScope<'a> {
    region: &'a Region,
    handle: Option<&'a ElementHandle>,
}

impl Scope for ParentScope<'_> {
    fn session(&self) -> &Session {
        self.region.session()
    }

    fn root_handle(&self) -> Option<&ElementHandle> {
        self.handle
    }

    fn generation(&self) -> u64 {
        self.region.generation
    }

    fn describe(&self) -> String {
        format!("parent of {}", self.region.describe())
    }
}

impl Scope for Region {
    fn session(&self) -> &Session {
        self.root.session()
    }

    fn root_handle(&self) -> Option<&ElementHandle> {
        Some(self.root.handle())
    }

    fn generation(&self) -> u64 {
        self.generation
    }

    fn describe(&self) -> String {
        format!("region {} [{}]", self.name, self.root.locator())
    }
}
