//! The per-host click effect controller.

use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use ripple_core::logging::{span_names, targets};
use ripple_core::{ConnectionId, FrameRequestId, RippleConfig, Scheduler, TaskId};
use ripple_style::color::{BORDER_COLOR, WAVE_COLOR_PROPERTIES};
use ripple_style::{pseudo_rule, should_override, wave_color_from};

use crate::dom::{AnimationEvent, ClickEvent, Node};

/// Marker attribute used when a helper node carries the effect.
pub const ATTR_WITH_EXTRA_NODE: &str = "ant-click-animating";

/// Marker attribute used when the host's own `:after` carries the effect.
pub const ATTR_WITHOUT_EXTRA_NODE: &str = "ant-click-animating-without-extra-node";

/// Class of the helper node.
pub const HELPER_CLASS: &str = "ant-click-animating-node";

/// Name of the fade animation whose end clears the marker.
pub const FADE_ANIMATION: &str = "fadeEffect";

/// Frames after a click during which the host's own animation start is
/// treated as the effect starting.
pub const WATCHDOG_FRAMES: u32 = 10;

/// Class fragment of hosts that are transitioning out.
const LEAVE_CLASS_FRAGMENT: &str = "-leave";

/// Attribute and class fragment that make a host ineligible.
const DISABLED: &str = "disabled";

/// Options fixed at attach time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WaveConfig {
    /// Render the effect in a helper child instead of the host's `:after`.
    pub insert_extra_node: bool,
    /// Nonce stamped on the shared style element.
    pub nonce: Option<String>,
}

impl WaveConfig {
    /// Pseudo-element effect, no nonce.
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the nonce from the shared configuration.
    pub fn from_ripple_config(config: &RippleConfig) -> Self {
        Self {
            insert_extra_node: false,
            nonce: config.nonce().map(str::to_string),
        }
    }

    /// Choose between the helper-node and pseudo-element variants.
    pub fn with_extra_node(mut self, insert_extra_node: bool) -> Self {
        self.insert_extra_node = insert_extra_node;
        self
    }

    /// Set the style element nonce.
    pub fn with_nonce(mut self, nonce: impl Into<String>) -> Self {
        self.nonce = Some(nonce.into());
        self
    }

    /// The marker attribute for this variant.
    pub fn attribute_name(&self) -> &'static str {
        if self.insert_extra_node {
            ATTR_WITH_EXTRA_NODE
        } else {
            ATTR_WITHOUT_EXTRA_NODE
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct LifecycleConnections {
    start: ConnectionId,
    end: ConnectionId,
}

#[derive(Default)]
struct WaveState {
    /// Set by a click, cleared by the watchdog.
    animation_starting: bool,
    pending_activation: Option<TaskId>,
    pending_watchdog: Option<FrameRequestId>,
    helper: Option<Node>,
    click: Option<ConnectionId>,
    lifecycle: Option<LifecycleConnections>,
    destroyed: bool,
}

struct WaveInner {
    host: Node,
    config: WaveConfig,
    scheduler: Arc<dyn Scheduler>,
    state: Mutex<WaveState>,
}

/// Drives the click effect of one host element.
///
/// A click on the host resets any running effect, samples the host's
/// color, and activates a fresh effect on the next turn of the loop.
/// Activation sets the marker attribute, optionally inserts a helper node,
/// and, for saturated colors, publishes a color rule to the document's
/// style registry. The marker is cleared again when the fade animation
/// ends, when another click arrives, or when an unrelated animation starts
/// on the host after the watchdog has expired.
///
/// Dropping the controller releases its listeners and pending callbacks
/// like [`WaveController::detach`].
///
/// # Example
///
/// ```
/// use ripple::dom::Document;
/// use ripple::wave::{WaveConfig, WaveController};
/// use ripple_core::EventLoop;
///
/// let event_loop = EventLoop::new();
/// let document = Document::new();
/// let button = document.create_element("button");
/// document.body().append_child(&button).unwrap();
///
/// let wave = WaveController::attach(&button, WaveConfig::new(), event_loop.scheduler());
/// button.dispatch_click();
/// event_loop.run_pending_tasks();
///
/// assert_eq!(
///     button.attribute(wave.attribute_name()).as_deref(),
///     Some("true")
/// );
/// ```
pub struct WaveController {
    inner: Arc<WaveInner>,
}

impl std::fmt::Debug for WaveController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.inner.state.lock();
        f.debug_struct("WaveController")
            .field("host", &self.inner.host)
            .field("config", &self.inner.config)
            .field("animation_starting", &state.animation_starting)
            .field("listening", &state.click.is_some())
            .field("destroyed", &state.destroyed)
            .finish()
    }
}

impl WaveController {
    /// Attach the effect to `host`.
    ///
    /// Text nodes and disabled hosts (a `disabled` attribute, or a class
    /// name containing `disabled`) are accepted but never receive a click
    /// listener.
    pub fn attach(host: &Node, config: WaveConfig, scheduler: Arc<dyn Scheduler>) -> Self {
        let inner = Arc::new(WaveInner {
            host: host.clone(),
            config,
            scheduler,
            state: Mutex::new(WaveState::default()),
        });

        if !host.is_element() || host.has_attribute(DISABLED) || host.class_contains(DISABLED) {
            tracing::debug!(
                target: targets::WAVE,
                host = %host.describe(),
                "host not eligible, no click listener"
            );
            return Self { inner };
        }

        let weak = Arc::downgrade(&inner);
        let click = host.click_capture().connect(move |event: &ClickEvent| {
            if let Some(inner) = weak.upgrade() {
                inner.on_click(event);
            }
        });
        inner.state.lock().click = Some(click);
        tracing::debug!(
            target: targets::WAVE,
            host = %host.describe(),
            attribute = inner.config.attribute_name(),
            "attached"
        );

        Self { inner }
    }

    /// The host element.
    pub fn host(&self) -> &Node {
        &self.inner.host
    }

    /// The options this controller was attached with.
    pub fn config(&self) -> &WaveConfig {
        &self.inner.config
    }

    /// The marker attribute this controller toggles.
    pub fn attribute_name(&self) -> &'static str {
        self.inner.config.attribute_name()
    }

    /// Remove the click listener. Pending work still runs.
    pub fn cancel(&self) {
        let mut state = self.inner.state.lock();
        if let Some(id) = state.click.take() {
            self.inner.host.click_capture().disconnect(id);
        }
    }

    /// Tear the controller down.
    ///
    /// Cancels the pending activation and watchdog, removes every listener,
    /// and marks the controller destroyed so late callbacks do nothing.
    /// Safe to call more than once, and on controllers that never listened.
    pub fn detach(&self) {
        let mut state = self.inner.state.lock();
        if state.destroyed {
            return;
        }
        self.inner.release(&mut state);
        state.destroyed = true;
        tracing::debug!(target: targets::WAVE, host = %self.inner.host.describe(), "detached");
    }

    /// Clear the effect from `node`.
    ///
    /// Does nothing for text nodes, the helper node, or after
    /// [`detach`](Self::detach).
    pub fn reset(&self, node: &Node) {
        let mut state = self.inner.state.lock();
        if state.destroyed {
            return;
        }
        self.inner.reset(&mut state, node);
    }

    /// Whether a click happened less than [`WATCHDOG_FRAMES`] frames ago.
    pub fn is_animation_starting(&self) -> bool {
        self.inner.state.lock().animation_starting
    }

    /// Whether [`detach`](Self::detach) has run.
    pub fn is_destroyed(&self) -> bool {
        self.inner.state.lock().destroyed
    }

    /// Whether the click listener is connected.
    pub fn is_listening(&self) -> bool {
        self.inner.state.lock().click.is_some()
    }

    /// Whether animation lifecycle listeners are connected.
    pub fn is_tracking_animations(&self) -> bool {
        self.inner.state.lock().lifecycle.is_some()
    }

    /// Whether an activation is waiting for the next turn of the loop.
    pub fn has_pending_activation(&self) -> bool {
        self.inner.state.lock().pending_activation.is_some()
    }

    /// The helper node of the current effect, if one is inserted.
    pub fn helper_node(&self) -> Option<Node> {
        self.inner.state.lock().helper.clone()
    }
}

impl Drop for WaveController {
    fn drop(&mut self) {
        self.detach();
    }
}

impl WaveInner {
    fn on_click(self: &Arc<Self>, event: &ClickEvent) {
        let mut state = self.state.lock();
        if state.destroyed {
            return;
        }
        let target = &event.target;
        if target.is_text_input() || !target.is_rendered() {
            return;
        }

        let _span = tracing::trace_span!(target: targets::WAVE, span_names::WAVE_CLICK).entered();
        self.reset(&mut state, &self.host);

        let [border_top, border, background] =
            WAVE_COLOR_PROPERTIES.map(|property| self.host.computed_style(property));
        let color = wave_color_from(&border_top, &border, &background).to_string();
        tracing::trace!(target: targets::WAVE, color = %color, "sampled wave color");

        if let Some(id) = state.pending_activation.take() {
            self.scheduler.cancel_task(id);
        }
        let weak = Arc::downgrade(self);
        state.pending_activation = Some(self.scheduler.post_task(Box::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.activate(&color);
            }
        })));

        if let Some(id) = state.pending_watchdog.take() {
            self.scheduler.cancel_frames(id);
        }
        state.animation_starting = true;
        let weak = Arc::downgrade(self);
        state.pending_watchdog = Some(self.scheduler.request_frames(
            WATCHDOG_FRAMES,
            Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    inner.watchdog_elapsed();
                }
            }),
        ));
    }

    fn activate(self: &Arc<Self>, color: &str) {
        let mut state = self.state.lock();
        if state.destroyed {
            return;
        }
        state.pending_activation = None;

        let host = &self.host;
        if !host.is_rendered() || host.class_contains(LEAVE_CLASS_FRAGMENT) {
            tracing::trace!(target: targets::WAVE, host = %host.describe(), "activation skipped");
            return;
        }
        let Some(document) = host.owner_document() else {
            return;
        };
        let _span =
            tracing::trace_span!(target: targets::WAVE, span_names::WAVE_ACTIVATE, color).entered();

        if let Some(stale) = state.helper.take() {
            stale.remove();
        }
        let helper = self.config.insert_extra_node.then(|| {
            let helper = document.create_element("div");
            helper.set_class_name(HELPER_CLASS);
            helper
        });

        host.set_attribute(self.config.attribute_name(), "true");

        if should_override(color) {
            if let Some(helper) = &helper {
                helper.set_style_property(BORDER_COLOR, color);
            }
            match pseudo_rule(ATTR_WITHOUT_EXTRA_NODE, color) {
                Ok(rule) => document
                    .style_registry()
                    .publish(&rule, self.config.nonce.as_deref()),
                Err(err) => {
                    tracing::warn!(target: targets::WAVE, error = %err, "could not build color rule")
                }
            }
        }

        if let Some(helper) = helper {
            match host.append_child(&helper) {
                Ok(()) => state.helper = Some(helper),
                Err(err) => {
                    tracing::warn!(target: targets::WAVE, error = %err, "could not insert helper node")
                }
            }
        }

        if state.lifecycle.is_none() {
            state.lifecycle = Some(self.subscribe_lifecycle());
        }
        tracing::trace!(target: targets::WAVE, host = %host.describe(), "activated");
    }

    fn subscribe_lifecycle(self: &Arc<Self>) -> LifecycleConnections {
        let weak: Weak<Self> = Arc::downgrade(self);
        let start = self
            .host
            .animation_start()
            .connect(move |event: &AnimationEvent| {
                if let Some(inner) = weak.upgrade() {
                    inner.on_animation_start(event);
                }
            });
        let weak: Weak<Self> = Arc::downgrade(self);
        let end = self
            .host
            .animation_end()
            .connect(move |event: &AnimationEvent| {
                if let Some(inner) = weak.upgrade() {
                    inner.on_animation_end(event);
                }
            });
        LifecycleConnections { start, end }
    }

    fn on_animation_start(&self, event: &AnimationEvent) {
        let mut state = self.state.lock();
        if state.destroyed || event.target != self.host {
            return;
        }
        if !state.animation_starting {
            self.reset(&mut state, &self.host);
        }
    }

    fn on_animation_end(&self, event: &AnimationEvent) {
        let mut state = self.state.lock();
        if state.destroyed || event.animation_name != FADE_ANIMATION {
            return;
        }
        self.reset(&mut state, &event.target);
    }

    fn watchdog_elapsed(&self) {
        let mut state = self.state.lock();
        if state.destroyed {
            return;
        }
        state.pending_watchdog = None;
        state.animation_starting = false;
    }

    fn reset(&self, state: &mut WaveState, node: &Node) {
        if !node.is_element() || state.helper.as_ref() == Some(node) {
            return;
        }
        node.set_attribute(self.config.attribute_name(), "false");

        if let Some(document) = self.host.owner_document() {
            document.style_registry().clear();
        }

        if let Some(helper) = state.helper.take_if(|helper| node.contains(helper)) {
            helper.remove();
        }

        if *node == self.host {
            self.disconnect_lifecycle(state);
        }
        tracing::trace!(target: targets::WAVE, node = %node.describe(), "reset");
    }

    fn disconnect_lifecycle(&self, state: &mut WaveState) {
        if let Some(connections) = state.lifecycle.take() {
            self.host.animation_start().disconnect(connections.start);
            self.host.animation_end().disconnect(connections.end);
        }
    }

    /// Cancel pending work and drop every listener.
    fn release(&self, state: &mut WaveState) {
        if let Some(id) = state.click.take() {
            self.host.click_capture().disconnect(id);
        }
        if let Some(id) = state.pending_activation.take() {
            self.scheduler.cancel_task(id);
        }
        if let Some(id) = state.pending_watchdog.take() {
            self.scheduler.cancel_frames(id);
        }
        self.disconnect_lifecycle(state);
    }
}

static_assertions::assert_impl_all!(WaveController: Send, Sync);
