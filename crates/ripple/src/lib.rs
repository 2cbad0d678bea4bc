//! Ripple - click wave feedback for interactive elements.
//!
//! This crate attaches a short-lived "wave" effect to pressable elements of a
//! DOM-like host tree and provides a [`Button`](button::Button) that uses it.
//!
//! - [`dom`]: the host tree (`Document`, `Node`) with click and animation
//!   lifecycle events
//! - [`wave`]: the [`WaveController`](wave::WaveController) state machine
//! - [`StyleRegistry`]: the per-document slot for the effect's color rule
//! - [`button`]: a button with loading state, icon and label rendering
//!
//! Timing comes from a [`Scheduler`](ripple_core::Scheduler); tests and
//! headless hosts drive an [`EventLoop`](ripple_core::EventLoop) by hand.
//!
//! # Example
//!
//! ```
//! use ripple::prelude::*;
//!
//! let event_loop = EventLoop::new();
//! let document = Document::new();
//! let host = document.create_element("button");
//! host.set_computed_style("border-top-color", "rgb(24, 144, 255)");
//! document.body().append_child(&host).unwrap();
//!
//! let wave = WaveController::attach(&host, WaveConfig::new(), event_loop.scheduler());
//! host.dispatch_click();
//! event_loop.run_pending_tasks();
//!
//! assert_eq!(
//!     document.style_registry().current_rule(),
//!     r#"[ant-click-animating-without-extra-node="true"]:after { border-color: rgb(24, 144, 255); }"#
//! );
//!
//! host.dispatch_animation_end("fadeEffect");
//! assert_eq!(document.style_registry().current_rule(), "");
//! wave.detach();
//! ```

pub mod button;
pub mod dom;
mod error;
pub mod prelude;
mod style_registry;
pub mod wave;

pub use error::{DomError, Result};
pub use style_registry::{NONCE_ATTRIBUTE, StyleRegistry};

pub use ripple_core;
pub use ripple_style;
