//! Events delivered through the host tree.

use super::Node;

/// A pointer click.
///
/// Dispatched in two phases: capture listeners run from the root down to the
/// target, then bubble listeners run from the target back up to the root.
#[derive(Debug, Clone)]
pub struct ClickEvent {
    /// The node that was clicked.
    pub target: Node,
}

impl ClickEvent {
    /// Create a click on `target`.
    pub fn new(target: Node) -> Self {
        Self { target }
    }
}

/// A CSS animation lifecycle notification (`animationstart` / `animationend`).
///
/// Animation events bubble from the animated node to the root, so a listener
/// on an ancestor also hears about animations of its descendants.
#[derive(Debug, Clone)]
pub struct AnimationEvent {
    /// The node whose animation started or ended.
    pub target: Node,
    /// The `@keyframes` name of the animation.
    pub animation_name: String,
}

impl AnimationEvent {
    /// Create an animation event for `target`.
    pub fn new(target: Node, animation_name: impl Into<String>) -> Self {
        Self {
            target,
            animation_name: animation_name.into(),
        }
    }
}
