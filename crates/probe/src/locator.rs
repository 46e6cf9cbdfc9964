//! Locators: static (strategy, selector) pairs.
//!
//! A locator only describes how to find elements. Nothing is resolved when it
//! is defined; failures surface when a page or region performs the lookup.
//!
//! Page and region types declare their locators with [`locators!`](crate::locators),
//! which produces associated constants plus a [`LocatorSet`] registry so a
//! logical name can be mapped back to its locator.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Selector strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum By {
    /// `id` attribute
    Id,
    /// CSS selector
    Css,
    /// Class name (dots join several classes, e.g. `delete-button.delete-addon`)
    ClassName,
    /// Exact link text of an anchor
    LinkText,
    /// Substring of an anchor's link text
    PartialLinkText,
    /// `name` attribute
    Name,
    /// Tag name
    TagName,
    /// XPath expression
    XPath,
}

impl By {
    /// Short name used in messages (`css=...`)
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Css => "css",
            Self::ClassName => "class",
            Self::LinkText => "link",
            Self::PartialLinkText => "partial-link",
            Self::Name => "name",
            Self::TagName => "tag",
            Self::XPath => "xpath",
        }
    }
}

impl fmt::Display for By {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An immutable (strategy, selector) pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Locator {
    by: By,
    selector: &'static str,
}

impl Locator {
    /// Create a locator from a strategy and selector
    #[must_use]
    pub const fn new(by: By, selector: &'static str) -> Self {
        Self { by, selector }
    }

    /// Locate by `id`
    #[must_use]
    pub const fn id(selector: &'static str) -> Self {
        Self::new(By::Id, selector)
    }

    /// Locate by CSS selector
    #[must_use]
    pub const fn css(selector: &'static str) -> Self {
        Self::new(By::Css, selector)
    }

    /// Locate by class name
    #[must_use]
    pub const fn class_name(selector: &'static str) -> Self {
        Self::new(By::ClassName, selector)
    }

    /// Locate an anchor by its exact text
    #[must_use]
    pub const fn link_text(selector: &'static str) -> Self {
        Self::new(By::LinkText, selector)
    }

    /// Locate an anchor by part of its text
    #[must_use]
    pub const fn partial_link_text(selector: &'static str) -> Self {
        Self::new(By::PartialLinkText, selector)
    }

    /// Locate by `name` attribute
    #[must_use]
    pub const fn name(selector: &'static str) -> Self {
        Self::new(By::Name, selector)
    }

    /// Locate by tag name
    #[must_use]
    pub const fn tag_name(selector: &'static str) -> Self {
        Self::new(By::TagName, selector)
    }

    /// Locate by XPath
    #[must_use]
    pub const fn xpath(selector: &'static str) -> Self {
        Self::new(By::XPath, selector)
    }

    /// Get the strategy
    #[must_use]
    pub const fn by(&self) -> By {
        self.by
    }

    /// Get the selector string
    #[must_use]
    pub const fn selector(&self) -> &'static str {
        self.selector
    }

    /// Equivalent CSS selector, when the strategy has one
    ///
    /// Link text and XPath have no CSS form and return `None`.
    #[must_use]
    pub fn to_css(&self) -> Option<String> {
        match self.by {
            By::Css | By::TagName => Some(self.selector.to_string()),
            By::Id => Some(format!("#{}", self.selector)),
            By::ClassName => Some(format!(".{}", self.selector)),
            By::Name => Some(format!("[name=\"{}\"]", self.selector)),
            By::LinkText | By::PartialLinkText | By::XPath => None,
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.by, self.selector)
    }
}

/// A per-page or per-region locator registry
pub trait LocatorSet {
    /// Logical name to locator, in declaration order
    const LOCATORS: &'static [(&'static str, Locator)];

    /// Look up a locator by logical name (case-insensitive)
    fn locator(name: &str) -> Option<Locator> {
        Self::LOCATORS
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, l)| *l)
    }

    /// All logical names
    fn locator_names() -> Vec<&'static str> {
        Self::LOCATORS.iter().map(|(n, _)| *n).collect()
    }
}

/// Declare the locators of a page or region type.
///
/// ```ignore
/// locators! {
///     ManageVersions {
///         VERSION_LIST = id("version-list"),
///         DELETE_BUTTON = class_name("delete-button.delete-addon"),
///     }
/// }
/// // ManageVersions::VERSION_LIST, ManageVersions::locator("version_list")
/// ```
#[macro_export]
macro_rules! locators {
    ($ty:ty { $($name:ident = $ctor:ident($sel:expr)),* $(,)? }) => {
        #[allow(dead_code)]
        impl $ty {
            $(
                pub(crate) const $name: $crate::Locator = $crate::Locator::$ctor($sel);
            )*
        }

        impl $crate::LocatorSet for $ty {
            const LOCATORS: &'static [(&'static str, $crate::Locator)] = &[
                $((stringify!($name), $crate::Locator::$ctor($sel)),)*
            ];
        }
    };
}
