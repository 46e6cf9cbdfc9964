//! Page Object Model Support
//!
//! A page is the top-level navigable unit: the whole document as a
//! [`Scope`], a URL, and an explicit load barrier.
//!
//! ```ignore
//! struct DevHubHome {
//!     base: PageObject,
//! }
//!
//! impl Page for DevHubHome {
//!     const NAME: &'static str = "DevHubHome";
//!
//!     fn path() -> Option<&'static str> {
//!         Some("/en-US/developers/")
//!     }
//!     fn from_base(base: PageObject) -> Self {
//!         Self { base }
//!     }
//!     fn base(&self) -> &PageObject {
//!         &self.base
//!     }
//!     fn wait_for_page_to_load(self) -> ProbeResult<Self> {
//!         self.base.wait_for_visible(&Self::SITE_HEADER)?;
//!         Ok(self)
//!     }
//! }
//!
//! let home = DevHubHome::open(&session)?;
//! ```
//!
//! Navigation edges return their destination through [`Page::wait_for_page`]
//! or [`PageObject::follow`], so a destination is never handed out before its
//! barrier ran.

use crate::driver::ElementHandle;
use crate::result::{ProbeError, ProbeResult};
use crate::scope::Scope;
use crate::session::Session;
use crate::wait::Observation;
use std::collections::HashMap;

// =============================================================================
// DOCUMENT SCOPE
// =============================================================================

/// The document-wide scope every page is built on
#[derive(Debug, Clone)]
pub struct PageObject {
    session: Session,
    name: &'static str,
    generation: u64,
}

impl PageObject {
    /// Bind to the document the session currently shows
    #[must_use]
    pub fn new(session: &Session, name: &'static str) -> Self {
        Self {
            session: session.clone(),
            name,
            generation: session.generation(),
        }
    }

    /// Page name
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Navigate this page to a URL or site path without waiting
    pub fn navigate(&mut self, url_or_path: &str) -> ProbeResult<()> {
        self.session.navigate(url_or_path)?;
        self.generation = self.session.generation();
        Ok(())
    }

    /// Reload the document and re-bind to it
    pub fn refresh(&mut self) -> ProbeResult<()> {
        self.session.refresh()?;
        self.generation = self.session.generation();
        Ok(())
    }

    /// Current URL
    pub fn current_url(&self) -> ProbeResult<String> {
        self.session.current_url()
    }

    /// Document title
    pub fn title(&self) -> ProbeResult<String> {
        self.session.title()
    }

    /// Block until the URL contains `fragment`; returns the URL
    pub fn wait_for_current_url(&self, fragment: &str) -> ProbeResult<String> {
        self.session
            .wait()
            .until(format!("URL containing {fragment:?}"), || {
                let url = self.session.current_url()?;
                Ok(if url.contains(fragment) {
                    Observation::Ready(url)
                } else {
                    Observation::Pending(url)
                })
            })
    }

    /// Block until the title contains `fragment`; returns the title
    pub fn wait_for_title_update(&self, fragment: &str) -> ProbeResult<String> {
        self.session
            .wait()
            .until(format!("title containing {fragment:?}"), || {
                let title = self.session.title()?;
                Ok(if title.contains(fragment) {
                    Observation::Ready(title)
                } else {
                    Observation::Pending(title)
                })
            })
    }

    /// Traverse a navigation edge the caller already triggered
    ///
    /// Marks the session as navigated, then builds `P` and runs its barrier.
    pub fn follow<P: Page>(&self) -> ProbeResult<P> {
        let generation = self.session.mark_navigated();
        tracing::debug!(from = self.name, to = P::NAME, generation, "follow");
        P::wait_for_page(&self.session)
    }
}

impl Scope for PageObject {
    fn session(&self) -> &Session {
        &self.session
    }

    fn root_handle(&self) -> Option<&ElementHandle> {
        None
    }

    fn generation(&self) -> u64 {
        self.generation
    }

    fn describe(&self) -> String {
        format!("page {}", self.name)
    }
}

// =============================================================================
// PAGE TRAIT
// =============================================================================

/// A navigable page with an explicit load barrier
pub trait Page: Sized {
    /// Name used in logs and registry lookups
    const NAME: &'static str;

    /// Site path `open` navigates to, `None` for pages only reachable by edges
    fn path() -> Option<&'static str> {
        None
    }

    /// Wrap a document scope
    fn from_base(base: PageObject) -> Self;

    /// The document scope
    fn base(&self) -> &PageObject;

    /// Page-specific barrier; returns the page once it is usable
    fn wait_for_page_to_load(self) -> ProbeResult<Self>;

    /// Build the page for the current document and run its barrier
    fn wait_for_page(session: &Session) -> ProbeResult<Self> {
        let page = Self::from_base(PageObject::new(session, Self::NAME)).wait_for_page_to_load()?;
        tracing::debug!(page = Self::NAME, "page loaded");
        Ok(page)
    }

    /// Navigate to [`Page::path`] and wait for the page
    fn open(session: &Session) -> ProbeResult<Self> {
        let path = Self::path().ok_or_else(|| ProbeError::Config {
            message: format!("{} has no fixed path; use open_at", Self::NAME),
        })?;
        Self::open_at(session, path)
    }

    /// Navigate to an explicit URL or path and wait for the page
    fn open_at(session: &Session, url_or_path: &str) -> ProbeResult<Self> {
        session.navigate(url_or_path)?;
        Self::wait_for_page(session)
    }
}

// =============================================================================
// PAGE REGISTRY
// =============================================================================

/// Maps URL patterns to page names
#[derive(Debug, Default, Clone)]
pub struct PageRegistry {
    pages: Vec<(&'static str, UrlMatcher)>,
}

impl PageRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a page under a URL pattern; earlier registrations win
    #[must_use]
    pub fn with_page(mut self, name: &'static str, pattern: &str) -> Self {
        self.register(name, pattern);
        self
    }

    /// Register a page under a URL pattern
    pub fn register(&mut self, name: &'static str, pattern: &str) {
        self.pages.push((name, UrlMatcher::new(pattern)));
    }

    /// Page name whose pattern matches `url`
    #[must_use]
    pub fn identify(&self, url: &str) -> Option<&'static str> {
        self.pages
            .iter()
            .find(|(_, matcher)| matcher.matches(url))
            .map(|(name, _)| *name)
    }

    /// Matcher registered for `name`
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&UrlMatcher> {
        self.pages
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, matcher)| matcher)
    }

    /// List registered page names
    #[must_use]
    pub fn list(&self) -> Vec<&'static str> {
        self.pages.iter().map(|(name, _)| *name).collect()
    }

    /// Number of registered pages
    #[must_use]
    pub fn count(&self) -> usize {
        self.pages.len()
    }
}

// =============================================================================
// URL MATCHING
// =============================================================================

/// URL pattern matcher for page objects
#[derive(Debug, Clone)]
pub struct UrlMatcher {
    pattern: String,
    segments: Vec<UrlSegment>,
}

#[derive(Debug, Clone)]
enum UrlSegment {
    Literal(String),
    Wildcard,
    Parameter(String),
}

impl UrlMatcher {
    /// Create a new URL matcher from a pattern
    ///
    /// Patterns support:
    /// - Literal segments: `/developers`
    /// - Wildcards: `/:locale/firefox/*`
    /// - Named parameters: `/:locale/developers/addon/:slug/versions`
    #[must_use]
    pub fn new(pattern: &str) -> Self {
        let segments = split_path(pattern)
            .map(|s| {
                if s == "*" {
                    UrlSegment::Wildcard
                } else if let Some(name) = s.strip_prefix(':') {
                    UrlSegment::Parameter(name.to_string())
                } else {
                    UrlSegment::Literal(s.to_string())
                }
            })
            .collect();

        Self {
            pattern: pattern.to_string(),
            segments,
        }
    }

    /// Check if a URL or path matches the pattern
    ///
    /// Scheme, host, query and fragment are ignored.
    #[must_use]
    pub fn matches(&self, url: &str) -> bool {
        let url_segments: Vec<&str> = split_path(path_of(url)).collect();

        // wildcards and parameters each consume exactly one segment
        if url_segments.len() != self.segments.len() {
            return false;
        }

        self.segments
            .iter()
            .zip(&url_segments)
            .all(|(segment, actual)| match segment {
                UrlSegment::Literal(lit) => lit == actual,
                UrlSegment::Wildcard | UrlSegment::Parameter(_) => true,
            })
    }

    /// Extract named parameters from a matching URL
    #[must_use]
    pub fn extract_params(&self, url: &str) -> HashMap<String, String> {
        let mut params = HashMap::new();
        if !self.matches(url) {
            return params;
        }
        for (segment, value) in self.segments.iter().zip(split_path(path_of(url))) {
            if let UrlSegment::Parameter(name) = segment {
                let _ = params.insert(name.clone(), value.to_string());
            }
        }
        params
    }

    /// Get the original pattern
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }
}

fn split_path(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

/// Path component of an absolute URL or a bare path
fn path_of(url: &str) -> &str {
    let without_scheme = url.split_once("://").map_or(url, |(_, rest)| rest);
    let path = if url.contains("://") {
        without_scheme
            .find('/')
            .map_or("", |i| &without_scheme[i..])
    } else {
        without_scheme
    };
    let end = path.find(['?', '#']).unwrap_or(path.len());
    &path[..end]
}
