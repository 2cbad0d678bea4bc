//! The host tree that widgets and effects attach to.
//!
//! A deliberately small document model: elements with attributes, a class
//! list, inline and computed styles, children, a visibility flag, and the
//! events the click effect depends on (capture/bubble clicks and bubbling
//! animation lifecycle events).
//!
//! # Example
//!
//! ```
//! use ripple::dom::Document;
//!
//! let document = Document::new();
//! let button = document.create_element("button");
//! document.body().append_child(&button).unwrap();
//!
//! button.set_attribute("type", "button");
//! button.set_computed_style("border-top-color", "rgb(24, 144, 255)");
//!
//! assert!(button.is_rendered());
//! assert_eq!(button.attribute("type").as_deref(), Some("button"));
//! ```

mod document;
mod events;
mod node;

pub use document::Document;
pub(crate) use document::DocumentInner;
pub use events::{AnimationEvent, ClickEvent};
pub use node::{Node, NodeId, NodeKind};
