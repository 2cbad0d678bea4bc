//! Styling helpers for Ripple's click effect.
//!
//! This crate holds the pure, host-independent parts of the effect's styling:
//!
//! - **Color derivation**: the border/background fallback chain
//! - **Color classification**: white, grey and transparent detection
//! - **Rule text**: the attribute-keyed `:after` rule used by the
//!   pseudo-element variant
//!
//! # Example
//!
//! ```
//! use ripple_style::prelude::*;
//!
//! let color = wave_color_from("", "rgb(10, 20, 30)", "#ffffff");
//! assert_eq!(color, "rgb(10, 20, 30)");
//! assert!(should_override(color));
//! assert!(!should_override("rgb(217, 217, 217)"));
//! ```

pub mod color;
pub mod rule;

mod error;

pub use color::{RgbTriple, is_grey, is_transparent, should_override, wave_color_from};
pub use error::{Error, Result};
pub use rule::{marker_selector, pseudo_rule};

/// Prelude module with commonly used items.
pub mod prelude {
    pub use crate::color::{
        BACKGROUND_COLOR, BORDER_COLOR, BORDER_TOP_COLOR, RgbTriple, WAVE_COLOR_PROPERTIES,
        is_grey, is_transparent, should_override, wave_color_from,
    };
    pub use crate::rule::{marker_selector, pseudo_rule};
}
