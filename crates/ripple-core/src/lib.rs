//! Core systems for Ripple.
//!
//! This crate provides the environment that Ripple widgets run in:
//!
//! - **Event Loop**: A cooperative, manually pumped loop ([`EventLoop`])
//!   behind the [`Scheduler`] trait
//! - **Tasks**: Next-turn deferral of work
//! - **Frame Requests**: Callbacks after a number of rendered frames
//! - **Timers**: One-shot timers on a virtual clock
//! - **Signal/Slot System**: Subscriptions to host and widget events
//! - **Configuration**: The ambient [`RippleConfig`]
//!
//! # Example
//!
//! ```
//! use ripple_core::{EventLoop, Scheduler, Signal};
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicU32, Ordering};
//!
//! let event_loop = EventLoop::new();
//! let frames_seen = Arc::new(AtomicU32::new(0));
//!
//! let seen = frames_seen.clone();
//! event_loop.request_frames(3, Box::new(move || {
//!     seen.fetch_add(1, Ordering::SeqCst);
//! }));
//!
//! event_loop.advance_frames(2);
//! assert_eq!(frames_seen.load(Ordering::SeqCst), 0);
//! event_loop.advance_frame();
//! assert_eq!(frames_seen.load(Ordering::SeqCst), 1);
//! ```

mod config;
mod error;
mod event_loop;
mod frame;
pub mod logging;
pub mod signal;
mod task;
mod timer;

pub use config::{CspConfig, RippleConfig};
pub use error::{ConfigError, Result, RippleError, SchedulerError};
pub use event_loop::{Callback, EventLoop, FRAME_INTERVAL, Scheduler};
pub use frame::FrameRequestId;
pub use signal::{ConnectionId, Signal};
pub use task::TaskId;
pub use timer::TimerId;
