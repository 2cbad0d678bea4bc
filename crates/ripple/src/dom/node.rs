//! Nodes of the host tree.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use ripple_core::Signal;
use ripple_core::logging::targets;

use super::document::{Document, DocumentInner};
use super::events::{AnimationEvent, ClickEvent};
use crate::error::{DomError, Result};

/// A unique identifier for a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u64);

impl NodeId {
    /// Get the raw u64 value of this node ID.
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

static NEXT_NODE_ID: AtomicU64 = AtomicU64::new(1);

fn next_node_id() -> NodeId {
    NodeId(NEXT_NODE_ID.fetch_add(1, Ordering::Relaxed))
}

/// What kind of node this is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// An element with a (lower-case) tag name.
    Element { tag: String },
    /// A text node.
    Text,
}

#[derive(Default)]
struct NodeData {
    attributes: BTreeMap<String, String>,
    class_name: String,
    inline_style: BTreeMap<String, String>,
    computed_style: BTreeMap<String, String>,
    children: Vec<Node>,
    parent: Option<Weak<NodeInner>>,
    hidden: bool,
    text: String,
}

pub(crate) struct NodeInner {
    id: NodeId,
    kind: NodeKind,
    document: Weak<DocumentInner>,
    data: Mutex<NodeData>,
    click_capture: Signal<ClickEvent>,
    click: Signal<ClickEvent>,
    animation_start: Signal<AnimationEvent>,
    animation_end: Signal<AnimationEvent>,
}

/// A handle to a node of the host tree.
///
/// Handles are cheap to clone; two handles are equal when they refer to the
/// same node. Text nodes have no attributes, classes or styles: reads return
/// nothing and writes are ignored.
#[derive(Clone)]
pub struct Node {
    inner: Arc<NodeInner>,
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for Node {}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

impl Node {
    pub(crate) fn new(kind: NodeKind, document: Weak<DocumentInner>) -> Self {
        Self {
            inner: Arc::new(NodeInner {
                id: next_node_id(),
                kind,
                document,
                data: Mutex::new(NodeData::default()),
                click_capture: Signal::new(),
                click: Signal::new(),
                animation_start: Signal::new(),
                animation_end: Signal::new(),
            }),
        }
    }

    fn from_inner(inner: Arc<NodeInner>) -> Self {
        Self { inner }
    }

    /// Short human-readable description, e.g. `<button#12>`.
    pub fn describe(&self) -> String {
        match &self.inner.kind {
            NodeKind::Element { tag } => format!("<{tag}#{}>", self.inner.id.0),
            NodeKind::Text => format!("#text#{}", self.inner.id.0),
        }
    }

    // =========================================================================
    // Identity
    // =========================================================================

    /// The node's unique ID.
    pub fn id(&self) -> NodeId {
        self.inner.id
    }

    /// The node's kind.
    pub fn kind(&self) -> &NodeKind {
        &self.inner.kind
    }

    /// Whether this is an element (as opposed to a text node).
    pub fn is_element(&self) -> bool {
        matches!(self.inner.kind, NodeKind::Element { .. })
    }

    /// The tag name of an element, empty for text nodes.
    pub fn tag_name(&self) -> &str {
        match &self.inner.kind {
            NodeKind::Element { tag } => tag,
            NodeKind::Text => "",
        }
    }

    /// Whether this element takes free-form text input.
    pub fn is_text_input(&self) -> bool {
        let tag = self.tag_name();
        tag.eq_ignore_ascii_case("input") || tag.eq_ignore_ascii_case("textarea")
    }

    /// The document that created this node, if it is still alive.
    pub fn owner_document(&self) -> Option<Document> {
        self.inner.document.upgrade().map(Document::from_inner)
    }

    // =========================================================================
    // Attributes
    // =========================================================================

    /// Read an attribute.
    pub fn attribute(&self, name: &str) -> Option<String> {
        if !self.is_element() {
            return None;
        }
        self.inner.data.lock().attributes.get(name).cloned()
    }

    /// Whether an attribute is present (with any value, including empty).
    pub fn has_attribute(&self, name: &str) -> bool {
        self.is_element() && self.inner.data.lock().attributes.contains_key(name)
    }

    /// Write an attribute. Ignored on text nodes.
    pub fn set_attribute(&self, name: &str, value: impl Into<String>) {
        if !self.is_element() {
            return;
        }
        let value = value.into();
        tracing::trace!(target: targets::DOM, node = %self.describe(), name, value = %value, "set attribute");
        self.inner
            .data
            .lock()
            .attributes
            .insert(name.to_string(), value);
    }

    /// Remove an attribute, returning its previous value.
    pub fn remove_attribute(&self, name: &str) -> Option<String> {
        if !self.is_element() {
            return None;
        }
        self.inner.data.lock().attributes.remove(name)
    }

    // =========================================================================
    // Classes
    // =========================================================================

    /// The raw class attribute text.
    pub fn class_name(&self) -> String {
        if !self.is_element() {
            return String::new();
        }
        self.inner.data.lock().class_name.clone()
    }

    /// Replace the class attribute text.
    pub fn set_class_name(&self, class_name: impl Into<String>) {
        if self.is_element() {
            self.inner.data.lock().class_name = class_name.into();
        }
    }

    /// Whether the whitespace-separated class list contains `token`.
    pub fn has_class_token(&self, token: &str) -> bool {
        self.inner
            .data
            .lock()
            .class_name
            .split_whitespace()
            .any(|class| class == token)
    }

    /// Whether the class attribute text contains `fragment` anywhere.
    ///
    /// Matches partial tokens: `"btn-disabled"` contains `"disabled"`.
    pub fn class_contains(&self, fragment: &str) -> bool {
        self.inner.data.lock().class_name.contains(fragment)
    }

    // =========================================================================
    // Styles
    // =========================================================================

    /// Read an inline style property.
    pub fn style_property(&self, property: &str) -> Option<String> {
        if !self.is_element() {
            return None;
        }
        self.inner.data.lock().inline_style.get(property).cloned()
    }

    /// Write an inline style property.
    pub fn set_style_property(&self, property: &str, value: impl Into<String>) {
        if self.is_element() {
            self.inner
                .data
                .lock()
                .inline_style
                .insert(property.to_string(), value.into());
        }
    }

    /// Read a computed style property; empty when the property is not set.
    ///
    /// Inline styles win over values supplied by the layout engine.
    pub fn computed_style(&self, property: &str) -> String {
        if !self.is_element() {
            return String::new();
        }
        let data = self.inner.data.lock();
        data.inline_style
            .get(property)
            .or_else(|| data.computed_style.get(property))
            .cloned()
            .unwrap_or_default()
    }

    /// Supply a computed style value, as the layout engine would.
    pub fn set_computed_style(&self, property: &str, value: impl Into<String>) {
        if self.is_element() {
            self.inner
                .data
                .lock()
                .computed_style
                .insert(property.to_string(), value.into());
        }
    }

    // =========================================================================
    // Visibility
    // =========================================================================

    /// Hide or show the node (`display: none`).
    pub fn set_hidden(&self, hidden: bool) {
        self.inner.data.lock().hidden = hidden;
    }

    /// Whether the node itself is hidden.
    pub fn is_hidden(&self) -> bool {
        self.inner.data.lock().hidden
    }

    /// Whether the node has a layout box: it is attached to its document's
    /// body and neither it nor any ancestor is hidden.
    pub fn is_rendered(&self) -> bool {
        let Some(document) = self.owner_document() else {
            return false;
        };
        let body = document.body();
        let mut current = Some(self.clone());
        while let Some(node) = current {
            if node.is_hidden() {
                return false;
            }
            if node == body {
                return true;
            }
            current = node.parent();
        }
        false
    }

    // =========================================================================
    // Tree structure
    // =========================================================================

    /// The parent node, if any.
    pub fn parent(&self) -> Option<Node> {
        self.inner
            .data
            .lock()
            .parent
            .as_ref()
            .and_then(Weak::upgrade)
            .map(Node::from_inner)
    }

    /// A snapshot of the child list.
    pub fn children(&self) -> Vec<Node> {
        self.inner.data.lock().children.clone()
    }

    /// Number of children.
    pub fn child_count(&self) -> usize {
        self.inner.data.lock().children.len()
    }

    /// Whether `other` is this node or one of its descendants.
    pub fn contains(&self, other: &Node) -> bool {
        let mut current = Some(other.clone());
        while let Some(node) = current {
            if node == *self {
                return true;
            }
            current = node.parent();
        }
        false
    }

    /// Append `child` as the last child, moving it from its old parent.
    pub fn append_child(&self, child: &Node) -> Result<()> {
        self.insert_before(child, None)
    }

    /// Insert `child` before `reference`, or last when `reference` is `None`.
    ///
    /// The child is first removed from its old parent. `reference` must be a
    /// child of this node.
    pub fn insert_before(&self, child: &Node, reference: Option<&Node>) -> Result<()> {
        if !self.is_element() {
            return Err(DomError::hierarchy(
                self.describe(),
                child.describe(),
                "text nodes cannot have children",
            ));
        }
        if child.contains(self) {
            return Err(DomError::hierarchy(
                self.describe(),
                child.describe(),
                "a node cannot be inserted into itself or its descendants",
            ));
        }
        if let Some(reference) = reference {
            if reference.parent().as_ref() != Some(self) {
                return Err(DomError::not_a_child(self.describe(), reference.describe()));
            }
            if reference == child {
                return Ok(());
            }
        }

        if let Some(old_parent) = child.parent() {
            old_parent.inner.data.lock().children.retain(|c| c != child);
        }
        {
            let mut data = self.inner.data.lock();
            let index = reference
                .and_then(|reference| data.children.iter().position(|c| c == reference))
                .unwrap_or(data.children.len());
            data.children.insert(index, child.clone());
        }
        child.inner.data.lock().parent = Some(Arc::downgrade(&self.inner));
        Ok(())
    }

    /// Remove a direct child.
    pub fn remove_child(&self, child: &Node) -> Result<()> {
        {
            let mut data = self.inner.data.lock();
            let pos = data
                .children
                .iter()
                .position(|c| c == child)
                .ok_or_else(|| DomError::not_a_child(self.describe(), child.describe()))?;
            data.children.remove(pos);
        }
        child.inner.data.lock().parent = None;
        Ok(())
    }

    /// Detach this node from its parent, if it has one.
    pub fn remove(&self) {
        if let Some(parent) = self.parent() {
            // The parent link was just read, so the child is present.
            let _ = parent.remove_child(self);
        }
    }

    /// Concatenated text of this node and its descendants.
    pub fn text_content(&self) -> String {
        match self.inner.kind {
            NodeKind::Text => self.inner.data.lock().text.clone(),
            NodeKind::Element { .. } => self
                .children()
                .iter()
                .map(Node::text_content)
                .collect::<String>(),
        }
    }

    /// Replace the text of a text node, or all children of an element with a
    /// single text node (none when `text` is empty).
    pub fn set_text_content(&self, text: impl Into<String>) {
        let text = text.into();
        match self.inner.kind {
            NodeKind::Text => self.inner.data.lock().text = text,
            NodeKind::Element { .. } => {
                for child in self.children() {
                    let _ = self.remove_child(&child);
                }
                if !text.is_empty() {
                    let text_node = Node::new(NodeKind::Text, self.inner.document.clone());
                    text_node.inner.data.lock().text = text;
                    // Fresh text node under an element: always a valid insertion.
                    let _ = self.append_child(&text_node);
                }
            }
        }
    }

    pub(crate) fn set_text(&self, text: String) {
        self.inner.data.lock().text = text;
    }

    /// The path from the root down to this node, inclusive.
    fn ancestry(&self) -> Vec<Node> {
        let mut path = Vec::new();
        let mut current = Some(self.clone());
        while let Some(node) = current {
            current = node.parent();
            path.push(node);
        }
        path.reverse();
        path
    }

    // =========================================================================
    // Events
    // =========================================================================

    /// Click listeners that run during the capture phase.
    pub fn click_capture(&self) -> &Signal<ClickEvent> {
        &self.inner.click_capture
    }

    /// Click listeners that run during the bubble phase.
    pub fn click(&self) -> &Signal<ClickEvent> {
        &self.inner.click
    }

    /// Animation-start listeners.
    pub fn animation_start(&self) -> &Signal<AnimationEvent> {
        &self.inner.animation_start
    }

    /// Animation-end listeners.
    pub fn animation_end(&self) -> &Signal<AnimationEvent> {
        &self.inner.animation_end
    }

    /// Deliver a click on this node: capture root→target, then bubble
    /// target→root.
    pub fn dispatch_click(&self) {
        let path = self.ancestry();
        let event = ClickEvent::new(self.clone());
        tracing::trace!(target: targets::DOM, target_node = %self.describe(), depth = path.len(), "dispatch click");
        for node in &path {
            node.click_capture().emit(event.clone());
        }
        for node in path.iter().rev() {
            node.click().emit(event.clone());
        }
    }

    /// Deliver an `animationstart` for this node, bubbling to the root.
    pub fn dispatch_animation_start(&self, animation_name: &str) {
        let event = AnimationEvent::new(self.clone(), animation_name);
        for node in self.ancestry().iter().rev() {
            node.animation_start().emit(event.clone());
        }
    }

    /// Deliver an `animationend` for this node, bubbling to the root.
    pub fn dispatch_animation_end(&self, animation_name: &str) {
        let event = AnimationEvent::new(self.clone(), animation_name);
        for node in self.ancestry().iter().rev() {
            node.animation_end().emit(event.clone());
        }
    }
}

static_assertions::assert_impl_all!(Node: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicU32;

    fn mounted(document: &Document, tag: &str) -> Node {
        let node = document.create_element(tag);
        document.body().append_child(&node).unwrap();
        node
    }

    #[test]
    fn attributes_round_trip_on_elements() {
        let document = Document::new();
        let node = document.create_element("button");

        assert_eq!(node.attribute("disabled"), None);
        node.set_attribute("disabled", "");
        assert!(node.has_attribute("disabled"));
        assert_eq!(node.attribute("disabled").as_deref(), Some(""));
        assert_eq!(node.remove_attribute("disabled").as_deref(), Some(""));
        assert!(!node.has_attribute("disabled"));
    }

    #[test]
    fn text_nodes_ignore_attribute_writes() {
        let document = Document::new();
        let text = document.create_text("hello");

        text.set_attribute("title", "x");
        text.set_class_name("btn");
        assert_eq!(text.attribute("title"), None);
        assert_eq!(text.class_name(), "");
        assert!(!text.is_element());
        assert_eq!(text.text_content(), "hello");
    }

    #[test]
    fn class_queries() {
        let document = Document::new();
        let node = document.create_element("button");
        node.set_class_name("ant-btn ant-btn-disabled");

        assert!(node.has_class_token("ant-btn"));
        assert!(!node.has_class_token("disabled"));
        assert!(node.class_contains("disabled"));
    }

    #[test]
    fn inline_style_wins_over_computed() {
        let document = Document::new();
        let node = document.create_element("div");

        assert_eq!(node.computed_style("border-color"), "");
        node.set_computed_style("border-color", "red");
        assert_eq!(node.computed_style("border-color"), "red");
        node.set_style_property("border-color", "blue");
        assert_eq!(node.computed_style("border-color"), "blue");
    }

    #[test]
    fn append_moves_and_remove_detaches() {
        let document = Document::new();
        let a = mounted(&document, "div");
        let b = mounted(&document, "div");
        let child = document.create_element("span");

        a.append_child(&child).unwrap();
        assert_eq!(child.parent(), Some(a.clone()));
        b.append_child(&child).unwrap();
        assert_eq!(a.child_count(), 0);
        assert_eq!(b.children(), vec![child.clone()]);

        b.remove_child(&child).unwrap();
        assert_eq!(child.parent(), None);
        assert!(matches!(b.remove_child(&child), Err(DomError::NotAChild { .. })));
    }

    #[test]
    fn cycles_are_rejected() {
        let document = Document::new();
        let outer = document.create_element("div");
        let inner = document.create_element("div");
        outer.append_child(&inner).unwrap();

        assert!(matches!(
            inner.append_child(&outer),
            Err(DomError::HierarchyRequest { .. })
        ));
        assert!(outer.append_child(&outer).is_err());

        let text = document.create_text("t");
        assert!(text.append_child(&inner).is_err());
    }

    #[test]
    fn insert_before_places_child() {
        let document = Document::new();
        let parent = document.create_element("div");
        let first = document.create_element("i");
        let second = document.create_element("span");
        parent.append_child(&second).unwrap();
        parent.insert_before(&first, Some(&second)).unwrap();
        assert_eq!(parent.children(), vec![first.clone(), second.clone()]);

        let stranger = document.create_element("b");
        assert!(matches!(
            parent.insert_before(&stranger, Some(&stranger)),
            Err(DomError::NotAChild { .. })
        ));
        parent.insert_before(&second, Some(&second)).unwrap();
        assert_eq!(parent.child_count(), 2);
    }

    #[test]
    fn contains_is_inclusive() {
        let document = Document::new();
        let outer = mounted(&document, "div");
        let inner = document.create_element("span");
        outer.append_child(&inner).unwrap();

        assert!(outer.contains(&outer));
        assert!(outer.contains(&inner));
        assert!(!inner.contains(&outer));
        assert!(document.body().contains(&inner));
    }

    #[test]
    fn rendering_requires_connection_and_visibility() {
        let document = Document::new();
        let detached = document.create_element("div");
        assert!(!detached.is_rendered());

        let parent = mounted(&document, "div");
        let child = document.create_element("span");
        parent.append_child(&child).unwrap();
        assert!(child.is_rendered());

        parent.set_hidden(true);
        assert!(!child.is_rendered());
        parent.set_hidden(false);
        child.remove();
        assert!(!child.is_rendered());
    }

    #[test]
    fn text_content_replaces_children() {
        let document = Document::new();
        let node = document.create_element("style");
        node.set_text_content("a { }");
        assert_eq!(node.text_content(), "a { }");
        node.set_text_content("");
        assert_eq!(node.text_content(), "");
        assert_eq!(node.child_count(), 0);
    }

    #[test]
    fn click_captures_down_then_bubbles_up() {
        let document = Document::new();
        let outer = mounted(&document, "div");
        let inner = document.create_element("button");
        outer.append_child(&inner).unwrap();

        let log = Arc::new(Mutex::new(Vec::new()));
        for (node, label) in [(&outer, "outer"), (&inner, "inner")] {
            let capture_log = log.clone();
            node.click_capture()
                .connect(move |_| capture_log.lock().push(format!("capture {label}")));
            let bubble_log = log.clone();
            node.click()
                .connect(move |_| bubble_log.lock().push(format!("bubble {label}")));
        }

        inner.dispatch_click();
        assert_eq!(
            *log.lock(),
            vec!["capture outer", "capture inner", "bubble inner", "bubble outer"]
        );
    }

    #[test]
    fn animation_events_bubble_with_their_target() {
        let document = Document::new();
        let host = mounted(&document, "button");
        let nested = document.create_element("span");
        host.append_child(&nested).unwrap();

        let hits = Arc::new(AtomicU32::new(0));
        let seen_target = Arc::new(Mutex::new(None));
        {
            let hits = hits.clone();
            let seen_target = seen_target.clone();
            host.animation_end().connect(move |event| {
                hits.fetch_add(1, Ordering::SeqCst);
                *seen_target.lock() = Some((event.target.clone(), event.animation_name.clone()));
            });
        }

        nested.dispatch_animation_end("fadeEffect");
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert_eq!(
            *seen_target.lock(),
            Some((nested.clone(), "fadeEffect".to_string()))
        );
    }
}
