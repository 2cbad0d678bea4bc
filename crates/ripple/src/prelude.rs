//! Prelude module for Ripple.
//!
//! ```ignore
//! use ripple::prelude::*;
//! ```

// ============================================================================
// Environment
// ============================================================================

pub use ripple_core::{EventLoop, RippleConfig, Scheduler, Signal};

// ============================================================================
// Host Tree
// ============================================================================

pub use crate::StyleRegistry;
pub use crate::dom::{AnimationEvent, ClickEvent, Document, Node};

// ============================================================================
// Widgets and Effects
// ============================================================================

pub use crate::button::{Button, ButtonHandle, Loading};
pub use crate::wave::{WaveConfig, WaveController};
