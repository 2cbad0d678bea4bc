//! The per-document style slot used by the pseudo-element effect.
//!
//! A document owns at most one registry, and a registry owns at most one
//! `<style>` element. The element is created the first time a rule is
//! published and then lives as long as the document. It holds a single rule:
//! publishing overwrites it, clearing empties it.
//!
//! Because the slot is shared, two hosts that activate colored effects at
//! the same time contend for it; the most recent publication wins.

use std::sync::Weak;

use parking_lot::Mutex;
use ripple_core::logging::targets;

use crate::dom::{Document, DocumentInner, Node};

/// Attribute carrying the content-security-policy nonce.
pub const NONCE_ATTRIBUTE: &str = "nonce";

/// The single-slot style rule holder of a document.
///
/// Obtain it with [`Document::style_registry`].
pub struct StyleRegistry {
    document: Weak<DocumentInner>,
    style: Mutex<Option<Node>>,
}

impl StyleRegistry {
    pub(crate) fn new(document: Weak<DocumentInner>) -> Self {
        Self {
            document,
            style: Mutex::new(None),
        }
    }

    fn document(&self) -> Option<Document> {
        self.document.upgrade().map(Document::from_inner)
    }

    /// Replace the slot's rule, creating and installing the style element on
    /// first use.
    ///
    /// When `nonce` is given it is stamped on the style element so that a
    /// content security policy admits the injected rule. The element is
    /// appended to the body only if it is not already there.
    pub fn publish(&self, rule: &str, nonce: Option<&str>) {
        let Some(document) = self.document() else {
            return;
        };
        let style = self
            .style
            .lock()
            .get_or_insert_with(|| {
                tracing::debug!(target: targets::STYLE_REGISTRY, "creating shared style element");
                document.create_element("style")
            })
            .clone();

        if let Some(nonce) = nonce {
            style.set_attribute(NONCE_ATTRIBUTE, nonce);
        }
        style.set_text_content(rule);

        let body = document.body();
        if !body.contains(&style)
            && let Err(err) = body.append_child(&style)
        {
            tracing::warn!(
                target: targets::STYLE_REGISTRY,
                error = %err,
                "failed to install shared style element"
            );
        }
        tracing::trace!(target: targets::STYLE_REGISTRY, rule, "published rule");
    }

    /// Empty the slot. The style element stays installed.
    pub fn clear(&self) {
        if let Some(style) = self.style.lock().as_ref() {
            style.set_text_content("");
        }
    }

    /// The current rule text; empty when cleared or never published.
    pub fn current_rule(&self) -> String {
        self.style
            .lock()
            .as_ref()
            .map(Node::text_content)
            .unwrap_or_default()
    }

    /// The style element, once it has been created.
    pub fn style_node(&self) -> Option<Node> {
        self.style.lock().clone()
    }

    /// Whether the style element is attached to the document body.
    pub fn is_installed(&self) -> bool {
        match (self.document(), self.style_node()) {
            (Some(document), Some(style)) => document.contains(&style),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nothing_is_created_until_first_publish() {
        let document = Document::new();
        let registry = document.style_registry();

        registry.clear();
        assert!(registry.style_node().is_none());
        assert!(!registry.is_installed());
        assert_eq!(registry.current_rule(), "");
    }

    #[test]
    fn publish_installs_once_and_overwrites() {
        let document = Document::new();
        let registry = document.style_registry();

        registry.publish("a { }", None);
        registry.publish("b { }", None);

        assert_eq!(registry.current_rule(), "b { }");
        let styles: Vec<_> = document
            .body()
            .children()
            .into_iter()
            .filter(|node| node.tag_name() == "style")
            .collect();
        assert_eq!(styles.len(), 1);
        assert!(registry.is_installed());
    }

    #[test]
    fn clear_keeps_the_element() {
        let document = Document::new();
        let registry = document.style_registry();

        registry.publish("a { }", None);
        registry.clear();
        registry.clear();

        assert_eq!(registry.current_rule(), "");
        assert!(registry.is_installed());
    }

    #[test]
    fn nonce_is_stamped_on_the_element() {
        let document = Document::new();
        let registry = document.style_registry();

        registry.publish("a { }", Some("abc123"));
        let style = registry.style_node().unwrap();
        assert_eq!(style.attribute(NONCE_ATTRIBUTE).as_deref(), Some("abc123"));
    }

    #[test]
    fn removed_element_is_reinstalled() {
        let document = Document::new();
        let registry = document.style_registry();

        registry.publish("a { }", None);
        registry.style_node().unwrap().remove();
        assert!(!registry.is_installed());

        registry.publish("b { }", None);
        assert!(registry.is_installed());
    }

    #[test]
    fn publish_reinstalls_after_body_was_nested_in_style() {
        let document = Document::new();
        let registry = document.style_registry();

        registry.publish("a { }", None);
        let style = registry.style_node().unwrap();
        style.remove();
        style.append_child(&document.body()).unwrap();

        registry.publish("b { }", None);
        assert_eq!(registry.current_rule(), "b { }");
        assert_eq!(document.body().parent(), None);
        assert!(registry.is_installed());
    }

    #[test]
    fn documents_have_separate_slots() {
        let first = Document::new();
        let second = Document::new();

        first.style_registry().publish("a { }", None);
        assert_eq!(second.style_registry().current_rule(), "");
    }
}
