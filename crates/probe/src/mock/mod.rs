//! In-memory browser for testing page objects without a real browser.
//!
//! [`MockDriver`] serves registered routes as [`Document`]s and implements
//! enough of a browser for page objects to run end to end: scoped lookups,
//! clicks that follow links or toggle form controls, typing, visibility,
//! and stale handles after navigation or subtree replacement.
//!
//! ```ignore
//! let driver = Arc::new(MockDriver::new("https://amo.test"));
//! driver.route("/en-US/developers/", Node::new("body").child(
//!     Node::new("div").class("DevHub-Navigation"),
//! ));
//! driver.on_click("#submit-upload-file-finish", |_, _| {
//!     Some("/en-US/developers/addon/submit/source-listed".into())
//! })?;
//! ```

mod dom;
mod selector;

pub use dom::{Document, DomNode, Node, NodeId};
pub use selector::SelectorList;

use crate::driver::{BrowserDriver, ElementHandle};
use crate::locator::Locator;
use crate::result::{DriverError, DriverResult};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fmt;

/// Hook run when a matching element is clicked; may return a URL to load
pub type ClickHook = Box<dyn FnMut(&mut Document, NodeId) -> Option<String> + Send>;

/// Hook run after a route's document is built
pub type LoadHook = Box<dyn FnMut(&mut Document) + Send>;

struct MockState {
    url: String,
    document: Document,
    document_gen: u64,
    routes: HashMap<String, Node>,
    click_hooks: Vec<(SelectorList, ClickHook)>,
    load_hooks: Vec<(String, LoadHook)>,
    call_history: Vec<String>,
}

/// Mock driver for unit testing
pub struct MockDriver {
    base_url: String,
    state: Mutex<MockState>,
}

impl fmt::Debug for MockDriver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("MockDriver")
            .field("base_url", &self.base_url)
            .field("url", &state.url)
            .field("document_gen", &state.document_gen)
            .field("routes", &state.routes.len())
            .finish_non_exhaustive()
    }
}

impl MockDriver {
    /// Create a driver serving paths relative to `base_url`
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            state: Mutex::new(MockState {
                url: "about:blank".to_string(),
                document: Document::default(),
                document_gen: 0,
                routes: HashMap::new(),
                click_hooks: Vec::new(),
                load_hooks: Vec::new(),
                call_history: Vec::new(),
            }),
        }
    }

    /// Serve `document` at `path` (host ignored, trailing slash optional)
    pub fn route(&self, path: &str, document: Node) {
        let _ = self
            .state
            .lock()
            .routes
            .insert(route_key(path), document);
    }

    /// Run `hook` when an element matching `css` (or inside one) is clicked
    ///
    /// Hooks replace the default click behavior. The first hook returning a
    /// URL wins and that URL is loaded.
    pub fn on_click<F>(&self, css: &str, hook: F) -> DriverResult<()>
    where
        F: FnMut(&mut Document, NodeId) -> Option<String> + Send + 'static,
    {
        let selector =
            SelectorList::parse(css).map_err(|message| DriverError::InvalidSelector {
                selector: css.to_string(),
                message,
            })?;
        self.state.lock().click_hooks.push((selector, Box::new(hook)));
        Ok(())
    }

    /// Run `hook` every time the document for `path` is loaded
    pub fn on_load<F>(&self, path: &str, hook: F)
    where
        F: FnMut(&mut Document) + Send + 'static,
    {
        self.state
            .lock()
            .load_hooks
            .push((route_key(path), Box::new(hook)));
    }

    /// Mutate the current document in place
    pub fn with_document<R>(&self, f: impl FnOnce(&mut Document) -> R) -> R {
        f(&mut self.state.lock().document)
    }

    /// Detach every subtree matching `css`; returns how many were removed
    pub fn detach(&self, css: &str) -> DriverResult<usize> {
        self.with_document(|doc| {
            let found = doc.select(css)?;
            for &id in &found {
                doc.detach(id);
            }
            Ok(found.len())
        })
    }

    /// Replace the first subtree matching `css`
    pub fn replace(&self, css: &str, with: Node) -> DriverResult<bool> {
        self.with_document(|doc| match doc.select(css)?.first() {
            Some(&id) => Ok(doc.replace(id, with).is_some()),
            None => Ok(false),
        })
    }

    /// Number of documents loaded so far
    #[must_use]
    pub fn document_count(&self) -> u64 {
        self.state.lock().document_gen
    }

    /// Get call history
    #[must_use]
    pub fn call_history(&self) -> Vec<String> {
        self.state.lock().call_history.clone()
    }

    /// Check if method was called
    #[must_use]
    pub fn was_called(&self, method: &str) -> bool {
        self.state
            .lock()
            .call_history
            .iter()
            .any(|c| c.starts_with(method))
    }

    /// Count recorded calls starting with `method`
    #[must_use]
    pub fn call_count(&self, method: &str) -> usize {
        self.state
            .lock()
            .call_history
            .iter()
            .filter(|c| c.starts_with(method))
            .count()
    }

    fn absolute(&self, url: &str) -> String {
        if url.contains("://") || url.starts_with("about:") {
            url.to_string()
        } else if url.starts_with('/') {
            format!("{}{url}", self.base_url)
        } else {
            format!("{}/{url}", self.base_url)
        }
    }

    fn load(&self, state: &mut MockState, url: &str) {
        let url = self.absolute(url);
        let key = route_key(&url);
        let mut document = state
            .routes
            .get(&key)
            .cloned()
            .map_or_else(Document::default, Document::from_node);
        for (path, hook) in &mut state.load_hooks {
            if *path == key {
                hook(&mut document);
            }
        }
        state.document = document;
        state.document_gen += 1;
        state.url = url;
    }

    fn resolve(state: &MockState, handle: &ElementHandle) -> DriverResult<NodeId> {
        let stale = || DriverError::StaleElement {
            element: handle.id.clone(),
        };
        let (generation, node) = handle.id.split_once(':').ok_or_else(stale)?;
        let generation: u64 = generation.parse().map_err(|_| stale())?;
        let node: NodeId = node.parse().map_err(|_| stale())?;
        if generation != state.document_gen || !state.document.is_attached(node) {
            return Err(stale());
        }
        Ok(node)
    }

    fn handle(state: &MockState, node: NodeId) -> ElementHandle {
        ElementHandle::new(format!("{}:{node}", state.document_gen))
    }

    fn describe(state: &MockState, node: NodeId) -> String {
        state
            .document
            .node(node)
            .map(dom::DomNode::describe)
            .unwrap_or_default()
    }

    /// Default browser behavior for a click on an enabled element
    fn activate(&self, state: &mut MockState, node: NodeId) {
        let doc = &mut state.document;
        let Some(element) = doc.node(node).cloned() else {
            return;
        };
        let input_type = element.attr("type").unwrap_or_default().to_string();
        match (element.tag.as_str(), input_type.as_str()) {
            ("input", "checkbox") => {
                if element.attr("checked").is_some() {
                    doc.remove_attr(node, "checked");
                } else {
                    doc.set_attr(node, "checked", "checked");
                }
            }
            ("input", "radio") => {
                if let Some(group) = element.attr("name") {
                    for other in doc.descendants(doc.root()) {
                        let same_group = doc.node(other).is_some_and(|n| {
                            n.tag == "input" && n.attr("type") == Some("radio") && n.attr("name") == Some(group)
                        });
                        if same_group {
                            doc.remove_attr(other, "checked");
                        }
                    }
                }
                doc.set_attr(node, "checked", "checked");
            }
            ("option", _) => {
                if let Some(parent) = doc.parent(node) {
                    let siblings = doc.node(parent).map(|p| p.children.clone()).unwrap_or_default();
                    for sibling in siblings {
                        doc.remove_attr(sibling, "selected");
                    }
                }
                doc.set_attr(node, "selected", "selected");
            }
            _ => {
                let link = std::iter::once(node)
                    .chain(doc.ancestors(node))
                    .find_map(|n| {
                        let n = doc.node(n)?;
                        (n.tag == "a").then(|| n.attr("href").map(str::to_string))?
                    });
                if let Some(href) = link {
                    self.load(state, &href);
                }
            }
        }
    }
}

fn route_key(url: &str) -> String {
    let without_scheme = url.split_once("://").map_or(url, |(_, rest)| rest);
    let path = if url.contains("://") {
        without_scheme.find('/').map_or("/", |i| &without_scheme[i..])
    } else {
        without_scheme
    };
    let end = path.find(['?', '#']).unwrap_or(path.len());
    let trimmed = path[..end].trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    }
}

impl BrowserDriver for MockDriver {
    fn navigate(&self, url: &str) -> DriverResult<()> {
        let mut state = self.state.lock();
        let url = self.absolute(url);
        state.call_history.push(format!("navigate:{url}"));
        self.load(&mut state, &url);
        Ok(())
    }

    fn refresh(&self) -> DriverResult<()> {
        let mut state = self.state.lock();
        state.call_history.push("refresh".to_string());
        let url = state.url.clone();
        self.load(&mut state, &url);
        Ok(())
    }

    fn current_url(&self) -> DriverResult<String> {
        Ok(self.state.lock().url.clone())
    }

    fn title(&self) -> DriverResult<String> {
        Ok(self.state.lock().document.title())
    }

    fn find_elements(
        &self,
        scope: Option<&ElementHandle>,
        locator: &Locator,
    ) -> DriverResult<Vec<ElementHandle>> {
        let state = self.state.lock();
        let scope = scope.map(|h| Self::resolve(&state, h)).transpose()?;
        Ok(state
            .document
            .find(scope, locator)?
            .into_iter()
            .map(|n| Self::handle(&state, n))
            .collect())
    }

    fn click(&self, element: &ElementHandle) -> DriverResult<()> {
        let mut state = self.state.lock();
        let node = Self::resolve(&state, element)?;
        let label = Self::describe(&state, node);
        state.call_history.push(format!("click:{label}"));

        if !state.document.is_displayed(node) {
            return Err(DriverError::Other {
                message: format!("element not interactable: {label}"),
            });
        }
        if state
            .document
            .node(node)
            .is_some_and(|n| n.attr("disabled").is_some())
        {
            return Ok(());
        }

        let targets: Vec<NodeId> = std::iter::once(node)
            .chain(state.document.ancestors(node))
            .collect();
        let MockState {
            document,
            click_hooks,
            ..
        } = &mut *state;
        let mut navigate_to = None;
        let mut handled = false;
        for (selector, hook) in click_hooks.iter_mut() {
            if let Some(&hit) = targets.iter().find(|&&t| selector.matches(document, t)) {
                handled = true;
                if let Some(url) = hook(document, hit) {
                    navigate_to = Some(url);
                    break;
                }
            }
        }

        if let Some(url) = navigate_to {
            self.load(&mut state, &url);
        } else if !handled && state.document.is_attached(node) {
            self.activate(&mut state, node);
        }
        Ok(())
    }

    fn send_keys(&self, element: &ElementHandle, text: &str) -> DriverResult<()> {
        let mut state = self.state.lock();
        let node = Self::resolve(&state, element)?;
        let label = Self::describe(&state, node);
        state.call_history.push(format!("send_keys:{label}:{text}"));
        let doc = &mut state.document;
        let value = match doc.node(node) {
            Some(n) if n.attr("type") == Some("file") => text.to_string(),
            Some(n) => format!("{}{text}", n.attr("value").unwrap_or_default()),
            None => return Ok(()),
        };
        doc.set_attr(node, "value", &value);
        Ok(())
    }

    fn text(&self, element: &ElementHandle) -> DriverResult<String> {
        let state = self.state.lock();
        let node = Self::resolve(&state, element)?;
        Ok(state.document.text_of(node))
    }

    fn attribute(&self, element: &ElementHandle, name: &str) -> DriverResult<Option<String>> {
        let state = self.state.lock();
        let node = Self::resolve(&state, element)?;
        if name == "textContent" {
            return Ok(Some(state.document.text_content(node)));
        }
        Ok(state
            .document
            .node(node)
            .and_then(|n| n.attr(name))
            .map(str::to_string))
    }

    fn is_displayed(&self, element: &ElementHandle) -> DriverResult<bool> {
        let state = self.state.lock();
        let node = Self::resolve(&state, element)?;
        Ok(state.document.is_displayed(node))
    }

    fn is_selected(&self, element: &ElementHandle) -> DriverResult<bool> {
        let state = self.state.lock();
        let node = Self::resolve(&state, element)?;
        Ok(state
            .document
            .node(node)
            .is_some_and(|n| n.attr("checked").is_some() || n.attr("selected").is_some()))
    }

    fn is_enabled(&self, element: &ElementHandle) -> DriverResult<bool> {
        let state = self.state.lock();
        let node = Self::resolve(&state, element)?;
        Ok(state
            .document
            .node(node)
            .is_some_and(|n| n.attr("disabled").is_none()))
    }
}
