//! In-memory document tree.
//!
//! [`Node`] is the builder form used to describe routes; a [`Document`] is
//! the live arena the mock driver queries and mutates. Node ids are only
//! meaningful within one document. Detached subtrees keep their ids but are
//! unreachable from the root.

use super::selector::SelectorList;
use crate::locator::{By, Locator};
use crate::result::{DriverError, DriverResult};
use std::collections::BTreeMap;

/// Index of a node inside a [`Document`]
pub type NodeId = usize;

// =============================================================================
// NODE BUILDER
// =============================================================================

/// Element description used to build documents
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Node {
    tag: String,
    attributes: BTreeMap<String, String>,
    text: Option<String>,
    hidden: bool,
    children: Vec<Node>,
}

impl Node {
    /// Create an element with the given tag
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    /// Set the `id` attribute
    #[must_use]
    pub fn id(self, id: impl Into<String>) -> Self {
        self.attr("id", id)
    }

    /// Add a class
    #[must_use]
    pub fn class(mut self, class: &str) -> Self {
        let classes = self.attributes.entry("class".to_string()).or_default();
        if !classes.is_empty() {
            classes.push(' ');
        }
        classes.push_str(class);
        self
    }

    /// Set an attribute
    #[must_use]
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let _ = self.attributes.insert(name.into(), value.into());
        self
    }

    /// Set the element's own text
    #[must_use]
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Render the element (and its subtree) invisible
    #[must_use]
    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    /// Append a child
    #[must_use]
    pub fn child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    /// Append several children
    #[must_use]
    pub fn children(mut self, children: impl IntoIterator<Item = Node>) -> Self {
        self.children.extend(children);
        self
    }
}

// =============================================================================
// DOCUMENT
// =============================================================================

/// A live element in a [`Document`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomNode {
    /// Tag name
    pub tag: String,
    /// Attributes
    pub attributes: BTreeMap<String, String>,
    /// Own text
    pub text: Option<String>,
    /// Explicitly hidden
    pub hidden: bool,
    /// Parent, `None` for the root and detached subtrees
    pub parent: Option<NodeId>,
    /// Children in document order
    pub children: Vec<NodeId>,
}

impl DomNode {
    /// Attribute value
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Whether the `class` attribute contains `class`
    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.attr("class")
            .is_some_and(|c| c.split_whitespace().any(|c| c == class))
    }

    /// Short description such as `button#submit.primary`
    #[must_use]
    pub fn describe(&self) -> String {
        let mut out = self.tag.clone();
        if let Some(id) = self.attr("id") {
            out.push('#');
            out.push_str(id);
        }
        if let Some(classes) = self.attr("class") {
            for class in classes.split_whitespace() {
                out.push('.');
                out.push_str(class);
            }
        }
        out
    }
}

/// Arena-backed document tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    nodes: Vec<DomNode>,
}

impl Default for Document {
    fn default() -> Self {
        Self::from_node(Node::new("body"))
    }
}

impl Document {
    /// Build a document whose root is `root`
    #[must_use]
    pub fn from_node(root: Node) -> Self {
        let mut doc = Self { nodes: Vec::new() };
        let _ = doc.insert(root, None);
        doc
    }

    fn insert(&mut self, node: Node, parent: Option<NodeId>) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(DomNode {
            tag: node.tag,
            attributes: node.attributes,
            text: node.text,
            hidden: node.hidden,
            parent,
            children: Vec::new(),
        });
        for child in node.children {
            let child_id = self.insert(child, Some(id));
            self.nodes[id].children.push(child_id);
        }
        id
    }

    /// The root node
    #[must_use]
    pub const fn root(&self) -> NodeId {
        0
    }

    /// Node by id
    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&DomNode> {
        self.nodes.get(id)
    }

    /// Mutable node by id
    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut DomNode> {
        self.nodes.get_mut(id)
    }

    /// Parent of a node
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(|n| n.parent)
    }

    /// Ancestors, nearest first
    #[must_use]
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut current = self.parent(id);
        while let Some(p) = current {
            out.push(p);
            current = self.parent(p);
        }
        out
    }

    /// Whether the node is reachable from the root
    #[must_use]
    pub fn is_attached(&self, id: NodeId) -> bool {
        id == self.root() || self.ancestors(id).last() == Some(&self.root())
    }

    /// `id` and its descendants in document order
    #[must_use]
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(n) = stack.pop() {
            out.push(n);
            if let Some(node) = self.node(n) {
                stack.extend(node.children.iter().rev());
            }
        }
        out
    }

    /// 1-based position among siblings (optionally of the same tag)
    #[must_use]
    pub fn sibling_position(&self, id: NodeId, same_tag: bool) -> Option<usize> {
        let tag = &self.node(id)?.tag;
        let Some(parent) = self.parent(id) else {
            return Some(1);
        };
        self.node(parent)?
            .children
            .iter()
            .filter(|&&c| !same_tag || self.node(c).is_some_and(|n| &n.tag == tag))
            .position(|&c| c == id)
            .map(|p| p + 1)
    }

    /// Append a subtree under `parent`
    pub fn append_child(&mut self, parent: NodeId, child: Node) -> NodeId {
        let id = self.insert(child, Some(parent));
        if let Some(p) = self.nodes.get_mut(parent) {
            p.children.push(id);
        }
        id
    }

    /// Detach a subtree from its parent
    pub fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.parent(id) {
            if let Some(p) = self.nodes.get_mut(parent) {
                p.children.retain(|&c| c != id);
            }
            if let Some(n) = self.nodes.get_mut(id) {
                n.parent = None;
            }
        }
    }

    /// Replace a subtree in place; the old nodes become detached
    pub fn replace(&mut self, id: NodeId, with: Node) -> Option<NodeId> {
        let parent = self.parent(id)?;
        let position = self.node(parent)?.children.iter().position(|&c| c == id)?;
        let new_id = self.insert(with, Some(parent));
        if let Some(p) = self.nodes.get_mut(parent) {
            p.children[position] = new_id;
        }
        if let Some(n) = self.nodes.get_mut(id) {
            n.parent = None;
        }
        Some(new_id)
    }

    /// Set an attribute
    pub fn set_attr(&mut self, id: NodeId, name: &str, value: &str) {
        if let Some(n) = self.nodes.get_mut(id) {
            let _ = n.attributes.insert(name.to_string(), value.to_string());
        }
    }

    /// Remove an attribute
    pub fn remove_attr(&mut self, id: NodeId, name: &str) {
        if let Some(n) = self.nodes.get_mut(id) {
            let _ = n.attributes.remove(name);
        }
    }

    /// Replace the node's own text
    pub fn set_text(&mut self, id: NodeId, text: &str) {
        if let Some(n) = self.nodes.get_mut(id) {
            n.text = Some(text.to_string());
        }
    }

    /// Show or hide a node
    pub fn set_hidden(&mut self, id: NodeId, hidden: bool) {
        if let Some(n) = self.nodes.get_mut(id) {
            n.hidden = hidden;
        }
    }

    /// Visible: attached, not inside `head`, no hidden ancestor-or-self
    #[must_use]
    pub fn is_displayed(&self, id: NodeId) -> bool {
        if !self.is_attached(id) {
            return false;
        }
        std::iter::once(id)
            .chain(self.ancestors(id))
            .all(|n| {
                self.node(n)
                    .is_some_and(|n| !n.hidden && n.tag != "head" && n.tag != "title")
            })
    }

    /// Rendered text: visible text of the subtree joined with spaces
    #[must_use]
    pub fn text_of(&self, id: NodeId) -> String {
        if !self.is_displayed(id) {
            return String::new();
        }
        self.collect_text(id, true)
    }

    /// Raw text of the subtree, visible or not
    #[must_use]
    pub fn text_content(&self, id: NodeId) -> String {
        self.collect_text(id, false)
    }

    fn collect_text(&self, id: NodeId, visible_only: bool) -> String {
        self.descendants(id)
            .into_iter()
            .filter(|&n| !visible_only || self.is_displayed(n))
            .filter_map(|n| self.node(n)?.text.as_deref())
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Text of the first `title` element
    #[must_use]
    pub fn title(&self) -> String {
        self.descendants(self.root())
            .into_iter()
            .find(|&n| self.node(n).is_some_and(|n| n.tag == "title"))
            .map(|n| self.text_content(n))
            .unwrap_or_default()
    }

    /// Attached nodes under `scope` (exclusive) or in the whole document
    /// (inclusive of the root) matching `locator`
    pub fn find(&self, scope: Option<NodeId>, locator: &Locator) -> DriverResult<Vec<NodeId>> {
        let candidates = match scope {
            Some(s) => self.descendants(s).into_iter().skip(1).collect(),
            None => self.descendants(self.root()),
        };
        let selector = match locator.by() {
            By::Css => Some(parse_css(locator.selector())?),
            By::XPath => {
                return Err(DriverError::UnsupportedLocator {
                    strategy: By::XPath.to_string(),
                })
            }
            _ => None,
        };
        let wanted = locator.selector();
        Ok(candidates
            .into_iter()
            .filter(|&id| {
                let Some(node) = self.node(id) else {
                    return false;
                };
                match locator.by() {
                    By::Css => selector.as_ref().is_some_and(|s| s.matches(self, id)),
                    By::Id => node.attr("id") == Some(wanted),
                    By::Name => node.attr("name") == Some(wanted),
                    By::TagName => node.tag.eq_ignore_ascii_case(wanted),
                    By::ClassName => wanted.split('.').all(|c| node.has_class(c)),
                    By::LinkText => node.tag == "a" && self.text_of(id) == wanted,
                    By::PartialLinkText => node.tag == "a" && self.text_of(id).contains(wanted),
                    By::XPath => false,
                }
            })
            .collect())
    }

    /// Attached nodes matching a CSS selector, in document order
    pub fn select(&self, css: &str) -> DriverResult<Vec<NodeId>> {
        let list = parse_css(css)?;
        Ok(self
            .descendants(self.root())
            .into_iter()
            .filter(|&n| list.matches(self, n))
            .collect())
    }
}

fn parse_css(css: &str) -> DriverResult<SelectorList> {
    SelectorList::parse(css).map_err(|message| DriverError::InvalidSelector {
        selector: css.to_string(),
        message,
    })
}
