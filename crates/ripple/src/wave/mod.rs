//! The click "wave" effect.
//!
//! A [`WaveController`] watches clicks on one host element and marks the host
//! so that stylesheet animations can play a ripple. Two variants exist:
//!
//! - the pseudo-element variant (the default) animates the host's `:after`
//!   and is marked with [`ATTR_WITHOUT_EXTRA_NODE`]; its color is published
//!   as a rule in the document's [`StyleRegistry`](crate::StyleRegistry);
//! - the helper-node variant appends a `div.ant-click-animating-node` to the
//!   host, colors it inline, and marks the host with [`ATTR_WITH_EXTRA_NODE`].
//!
//! Activation is deferred by one turn of the event loop so that the click
//! handler can restyle the host first. For [`WATCHDOG_FRAMES`] frames after a
//! click, animations starting on the host are taken to be the effect itself;
//! afterwards an unrelated animation start clears the effect.

mod controller;

pub use controller::{
    ATTR_WITH_EXTRA_NODE, ATTR_WITHOUT_EXTRA_NODE, FADE_ANIMATION, HELPER_CLASS, WATCHDOG_FRAMES,
    WaveConfig, WaveController,
};
