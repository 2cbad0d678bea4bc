//! Logging facilities for Ripple.
//!
//! Ripple uses the `tracing` crate for instrumentation. Nothing is printed
//! unless the application installs a subscriber:
//!
//! ```ignore
//! fn main() {
//!     tracing_subscriber::fmt()
//!         .with_env_filter("ripple=debug,ripple_core=trace")
//!         .init();
//!
//!     // Your application code...
//! }
//! ```
//!
//! The constants in [`targets`] name the subsystems so that directives can
//! select them individually.

/// Span names used throughout Ripple for tracing.
pub mod span_names {
    /// Event loop pumping span.
    pub const EVENT_LOOP: &str = "ripple::event_loop";
    /// Click handling span of a wave controller.
    pub const WAVE_CLICK: &str = "ripple::wave::click";
    /// Deferred activation span of a wave controller.
    pub const WAVE_ACTIVATE: &str = "ripple::wave::activate";
}

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Core framework target.
    pub const CORE: &str = "ripple_core";
    /// Event loop target.
    pub const EVENT_LOOP: &str = "ripple_core::event_loop";
    /// Deferred task queue target.
    pub const TASK: &str = "ripple_core::task";
    /// Animation frame queue target.
    pub const FRAME: &str = "ripple_core::frame";
    /// Timer system target.
    pub const TIMER: &str = "ripple_core::timer";
    /// Signal/slot system target.
    pub const SIGNAL: &str = "ripple_core::signal";
    /// Configuration loading target.
    pub const CONFIG: &str = "ripple_core::config";
    /// Host tree target.
    pub const DOM: &str = "ripple::dom";
    /// Shared style registry target.
    pub const STYLE_REGISTRY: &str = "ripple::style_registry";
    /// Wave controller target.
    pub const WAVE: &str = "ripple::wave";
    /// Button widget target.
    pub const BUTTON: &str = "ripple::button";
}

/// Install a `tracing` subscriber that writes through the test harness.
///
/// Safe to call from every test; only the first call installs anything.
/// The filter honours `RUST_LOG` and defaults to `warn`.
#[cfg(test)]
pub(crate) fn init_test_logging() {
    use tracing_subscriber::EnvFilter;

    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_test_writer()
        .try_init();
}
