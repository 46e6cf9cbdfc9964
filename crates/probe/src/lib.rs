//! amo-probe: page objects for browser tests of an add-ons marketplace
//!
//! Tests describe the site as pages and regions instead of raw selectors.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐   ┌───────────────┐   ┌──────────────┐   ┌───────────────┐
//! │ Test         │   │ Page / Region │   │ Session      │   │ BrowserDriver │
//! │ scenario     │──►│ locators,     │──►│ config,      │──►│ (WebDriver,   │
//! │              │   │ load barrier  │   │ clock, gen.  │   │  MockDriver)  │
//! └──────────────┘   └───────────────┘   └──────────────┘   └───────────────┘
//! ```
//!
//! - Locators are static data declared with [`locators!`].
//! - [`Page`]s are reached through `open` or a navigation edge, both of
//!   which run the page's load barrier before returning it.
//! - [`Region`]s scope lookups beneath a root element.
//! - Waits ([`Wait`]) and the approval poll ([`Poller`]) are bounded and
//!   report the last observed state when they give up.

#![cfg_attr(test, allow(clippy::large_stack_arrays, clippy::large_stack_frames))]

pub mod clock;
pub mod config;
mod driver;
mod element;
mod locator;
pub mod logging;
pub mod mock;
mod page_object;
mod result;
mod scope;
mod session;
pub mod wait;

pub use clock::{Clock, FakeClock, SharedClock, SystemClock};
pub use config::{Credentials, SessionConfig};
pub use driver::{BrowserDriver, ElementHandle};
pub use element::Element;
pub use locator::{By, Locator, LocatorSet};
pub use logging::{init_json_tracing, init_test_tracing, init_tracing};
pub use mock::{Document, DomNode, MockDriver, Node, NodeId};
pub use page_object::{Page, PageObject, PageRegistry, UrlMatcher};
pub use result::{DriverError, DriverResult, ProbeError, ProbeResult};
pub use scope::{Region, Scope};
pub use session::Session;
pub use wait::{
    Observation, PollConfig, PollOutcome, Poller, Wait, WaitConfig, DEFAULT_APPROVAL_CEILING_MS,
    DEFAULT_APPROVAL_INTERVAL_MS, DEFAULT_POLL_INTERVAL_MS, DEFAULT_WAIT_TIMEOUT_MS,
};
