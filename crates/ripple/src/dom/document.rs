//! The document that owns a host tree.

use std::sync::{Arc, OnceLock};

use super::node::{Node, NodeKind};
use crate::style_registry::StyleRegistry;

pub(crate) struct DocumentInner {
    body: Node,
    style_registry: OnceLock<StyleRegistry>,
}

/// A host document: a `body` element plus document-wide resources.
///
/// Cloning yields another handle to the same document.
#[derive(Clone)]
pub struct Document {
    inner: Arc<DocumentInner>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("body", &self.inner.body)
            .finish_non_exhaustive()
    }
}

impl Document {
    /// Create an empty document.
    pub fn new() -> Self {
        let inner = Arc::new_cyclic(|weak| DocumentInner {
            body: Node::new(
                NodeKind::Element {
                    tag: "body".to_string(),
                },
                weak.clone(),
            ),
            style_registry: OnceLock::new(),
        });
        Self { inner }
    }

    pub(crate) fn from_inner(inner: Arc<DocumentInner>) -> Self {
        Self { inner }
    }

    /// The root element that rendered content hangs from.
    pub fn body(&self) -> Node {
        self.inner.body.clone()
    }

    /// Create a detached element. Tag names are stored in lower case.
    pub fn create_element(&self, tag: &str) -> Node {
        Node::new(
            NodeKind::Element {
                tag: tag.to_ascii_lowercase(),
            },
            Arc::downgrade(&self.inner),
        )
    }

    /// Create a detached text node.
    pub fn create_text(&self, text: impl Into<String>) -> Node {
        let node = Node::new(NodeKind::Text, Arc::downgrade(&self.inner));
        node.set_text(text.into());
        node
    }

    /// Whether `node` is attached under this document's body.
    pub fn contains(&self, node: &Node) -> bool {
        self.inner.body.contains(node)
    }

    /// The document's style registry, created on first access.
    ///
    /// There is exactly one registry per document.
    pub fn style_registry(&self) -> &StyleRegistry {
        self.inner
            .style_registry
            .get_or_init(|| StyleRegistry::new(Arc::downgrade(&self.inner)))
    }

    /// Whether two handles refer to the same document.
    pub fn ptr_eq(&self, other: &Document) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}
