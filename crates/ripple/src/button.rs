//! A pressable button with the click wave and a loading state.
//!
//! [`Button`] describes the button; [`Button::mount`] renders it into the host
//! tree and returns a [`ButtonHandle`] that owns the live element.
//!
//! # Rendering
//!
//! A button renders as `<button type="...">`, or as `<a href="...">` when an
//! `href` is given. Its children are an optional icon (`<i class="anticon
//! anticon-{name}">`, replaced by the `loading` icon while loading) followed
//! by the label wrapped in a `<span>`. Link buttons get no wave.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicU32, Ordering};
//!
//! use ripple::button::Button;
//! use ripple::dom::Document;
//! use ripple_core::{EventLoop, RippleConfig};
//!
//! let event_loop = EventLoop::new();
//! let document = Document::new();
//! let button = Button::new("Save")
//!     .with_icon("save")
//!     .mount(&document.body(), &RippleConfig::default(), event_loop.scheduler())
//!     .unwrap();
//!
//! let clicks = Arc::new(AtomicU32::new(0));
//! let counter = clicks.clone();
//! button.clicked().connect(move |_| {
//!     counter.fetch_add(1, Ordering::SeqCst);
//! });
//!
//! button.node().dispatch_click();
//! assert_eq!(clicks.load(Ordering::SeqCst), 1);
//! assert_eq!(button.node().class_name(), "ant-btn");
//! ```

use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::Mutex;
use ripple_core::logging::targets;
use ripple_core::{ConnectionId, RippleConfig, Scheduler, Signal, TimerId};

use crate::dom::{ClickEvent, Node};
use crate::error::{DomError, Result};
use crate::wave::{WaveConfig, WaveController};

/// Component suffix joined to the configured prefix.
pub const BUTTON_SUFFIX: &str = "btn";

/// Icon shown while loading.
pub const LOADING_ICON: &str = "loading";

/// Default `type` of a native button.
const DEFAULT_HTML_TYPE: &str = "button";

/// Loading state requested for a button.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Loading {
    /// Not loading.
    #[default]
    Idle,
    /// Loading now.
    Active,
    /// Start loading once the delay has elapsed. A zero delay loads now.
    Delayed(Duration),
}

impl From<bool> for Loading {
    fn from(loading: bool) -> Self {
        if loading { Self::Active } else { Self::Idle }
    }
}

/// Description of a button.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Button {
    label: Option<String>,
    icon: Option<String>,
    loading: Loading,
    html_type: Option<String>,
    href: Option<String>,
    class_name: Option<String>,
    prefix_cls: Option<String>,
    block: bool,
    ghost: bool,
    disabled: bool,
}

impl Button {
    /// A button with a text label.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            ..Self::default()
        }
    }

    /// An icon-only button.
    pub fn icon_only(icon: impl Into<String>) -> Self {
        Self {
            icon: Some(icon.into()),
            ..Self::default()
        }
    }

    /// Get the label.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Set the label using builder pattern.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Get the icon name.
    pub fn icon(&self) -> Option<&str> {
        self.icon.as_deref()
    }

    /// Set the icon using builder pattern.
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    /// Get the initial loading state.
    pub fn loading(&self) -> Loading {
        self.loading
    }

    /// Set the initial loading state using builder pattern.
    pub fn with_loading(mut self, loading: impl Into<Loading>) -> Self {
        self.loading = loading.into();
        self
    }

    /// The `type` attribute of a native button.
    pub fn html_type(&self) -> &str {
        self.html_type.as_deref().unwrap_or(DEFAULT_HTML_TYPE)
    }

    /// Set the `type` attribute using builder pattern.
    pub fn with_html_type(mut self, html_type: impl Into<String>) -> Self {
        self.html_type = Some(html_type.into());
        self
    }

    /// Get the link target.
    pub fn href(&self) -> Option<&str> {
        self.href.as_deref()
    }

    /// Render as a link using builder pattern.
    pub fn with_href(mut self, href: impl Into<String>) -> Self {
        self.href = Some(href.into());
        self
    }

    /// Add a custom class using builder pattern.
    pub fn with_class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }

    /// Override the class prefix (normally `{prefix_cls}-btn`) using builder
    /// pattern.
    pub fn with_prefix_cls(mut self, prefix_cls: impl Into<String>) -> Self {
        self.prefix_cls = Some(prefix_cls.into());
        self
    }

    /// Stretch to the parent's width using builder pattern.
    pub fn with_block(mut self, block: bool) -> Self {
        self.block = block;
        self
    }

    /// Use a transparent background using builder pattern.
    pub fn with_ghost(mut self, ghost: bool) -> Self {
        self.ghost = ghost;
        self
    }

    /// Disable the button using builder pattern.
    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    fn has_label(&self) -> bool {
        self.label.as_deref().is_some_and(|label| !label.is_empty())
    }

    /// The class list for the given prefix and loading state.
    pub fn class_list(&self, prefix: &str, loading: bool) -> String {
        let custom = self.class_name.as_deref().filter(|class| !class.is_empty());
        let modifiers = [
            ("icon-only", !self.has_label() && self.icon.is_some()),
            ("loading", loading),
            ("background-ghost", self.ghost),
            ("block", self.block),
        ];

        let mut classes = vec![prefix.to_string()];
        classes.extend(custom.map(str::to_string));
        classes.extend(
            modifiers
                .into_iter()
                .filter(|(_, enabled)| *enabled)
                .map(|(modifier, _)| format!("{prefix}-{modifier}")),
        );
        classes.join(" ")
    }

    /// Render the button as the last child of `parent`.
    ///
    /// Native buttons get a [`WaveController`] configured from `config`.
    pub fn mount(
        self,
        parent: &Node,
        config: &RippleConfig,
        scheduler: Arc<dyn Scheduler>,
    ) -> Result<ButtonHandle> {
        let document = parent
            .owner_document()
            .ok_or_else(|| DomError::orphaned(parent.describe()))?;
        let prefix = config.prefix_for(BUTTON_SUFFIX, self.prefix_cls.as_deref());

        let node = match &self.href {
            Some(href) => {
                let link = document.create_element("a");
                link.set_attribute("href", href.as_str());
                link
            }
            None => {
                let button = document.create_element("button");
                button.set_attribute("type", self.html_type());
                button
            }
        };
        if self.disabled {
            node.set_attribute("disabled", "");
        }
        node.set_class_name(self.class_list(&prefix, false));

        if let Some(label) = self.label.as_deref().filter(|label| !label.is_empty()) {
            let span = document.create_element("span");
            span.set_text_content(label);
            node.append_child(&span)?;
        }
        parent.append_child(&node)?;

        let wave = self.href.is_none().then(|| {
            WaveController::attach(
                &node,
                WaveConfig::from_ripple_config(config),
                scheduler.clone(),
            )
        });

        let initial = self.loading;
        let inner = Arc::new(ButtonInner {
            node,
            prefix,
            props: self,
            scheduler,
            wave,
            clicked: Signal::new(),
            state: Mutex::new(ButtonState::default()),
        });

        let weak = Arc::downgrade(&inner);
        let click = inner.node.click().connect(move |event: &ClickEvent| {
            if let Some(inner) = weak.upgrade() {
                inner.on_click(event);
            }
        });

        {
            let mut state = inner.state.lock();
            state.click = Some(click);
            inner.render_icon(&mut state);
            inner.set_loading(&mut state, initial);
        }
        tracing::debug!(
            target: targets::BUTTON,
            node = %inner.node.describe(),
            prefix = %inner.prefix,
            wave = inner.wave.is_some(),
            "mounted button"
        );

        Ok(ButtonHandle { inner })
    }
}

#[derive(Default)]
struct ButtonState {
    loading: bool,
    delay_timer: Option<TimerId>,
    icon: Option<Node>,
    click: Option<ConnectionId>,
    unmounted: bool,
}

struct ButtonInner {
    node: Node,
    prefix: String,
    props: Button,
    scheduler: Arc<dyn Scheduler>,
    wave: Option<WaveController>,
    clicked: Signal<ClickEvent>,
    state: Mutex<ButtonState>,
}

/// A mounted button.
///
/// Dropping the handle unmounts the button.
pub struct ButtonHandle {
    inner: Arc<ButtonInner>,
}

impl std::fmt::Debug for ButtonHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.inner.state.lock();
        f.debug_struct("ButtonHandle")
            .field("node", &self.inner.node)
            .field("props", &self.inner.props)
            .field("loading", &state.loading)
            .field("unmounted", &state.unmounted)
            .finish()
    }
}

impl ButtonHandle {
    /// The rendered `<button>` or `<a>` element.
    pub fn node(&self) -> &Node {
        &self.inner.node
    }

    /// The description the button was mounted from.
    pub fn props(&self) -> &Button {
        &self.inner.props
    }

    /// The resolved class prefix, e.g. `ant-btn`.
    pub fn prefix(&self) -> &str {
        &self.inner.prefix
    }

    /// Whether this button renders as a link.
    pub fn is_link(&self) -> bool {
        self.inner.props.href.is_some()
    }

    /// The wave controller of a native button.
    pub fn wave(&self) -> Option<&WaveController> {
        self.inner.wave.as_ref()
    }

    /// Emitted for clicks on the button while it is not loading or disabled.
    pub fn clicked(&self) -> &Signal<ClickEvent> {
        &self.inner.clicked
    }

    /// Whether the button is currently loading.
    pub fn is_loading(&self) -> bool {
        self.inner.state.lock().loading
    }

    /// Whether a delayed loading state is waiting for its timer.
    pub fn has_pending_delay(&self) -> bool {
        self.inner.state.lock().delay_timer.is_some()
    }

    /// Change the loading state.
    ///
    /// Any pending delay is cancelled first. [`Loading::Delayed`] keeps the
    /// current state until the delay elapses.
    pub fn set_loading(&self, loading: impl Into<Loading>) {
        let mut state = self.inner.state.lock();
        if state.unmounted {
            return;
        }
        self.inner.set_loading(&mut state, loading.into());
    }

    /// Whether the button is still in the tree.
    pub fn is_mounted(&self) -> bool {
        !self.inner.state.lock().unmounted
    }

    /// Remove the button from the tree and release its timer, wave and
    /// listeners. Safe to call more than once.
    pub fn unmount(&self) {
        let mut state = self.inner.state.lock();
        if state.unmounted {
            return;
        }
        state.unmounted = true;
        if let Some(id) = state.delay_timer.take() {
            self.inner.scheduler.stop_timer(id);
        }
        if let Some(id) = state.click.take() {
            self.inner.node.click().disconnect(id);
        }
        if let Some(wave) = &self.inner.wave {
            wave.detach();
        }
        self.inner.node.remove();
        tracing::debug!(target: targets::BUTTON, node = %self.inner.node.describe(), "unmounted button");
    }
}

impl Drop for ButtonHandle {
    fn drop(&mut self) {
        self.unmount();
    }
}

impl ButtonInner {
    fn on_click(&self, event: &ClickEvent) {
        {
            let state = self.state.lock();
            if state.unmounted || state.loading || self.props.disabled {
                return;
            }
        }
        self.clicked.emit(event.clone());
    }

    fn set_loading(self: &Arc<Self>, state: &mut ButtonState, loading: Loading) {
        if let Some(id) = state.delay_timer.take() {
            self.scheduler.stop_timer(id);
        }
        match loading {
            Loading::Idle => self.apply_loading(state, false),
            Loading::Active => self.apply_loading(state, true),
            Loading::Delayed(delay) if delay.is_zero() => self.apply_loading(state, true),
            Loading::Delayed(delay) => {
                let weak: Weak<Self> = Arc::downgrade(self);
                let id = self.scheduler.start_timer(
                    delay,
                    Box::new(move || {
                        if let Some(inner) = weak.upgrade() {
                            inner.delay_elapsed();
                        }
                    }),
                );
                state.delay_timer = Some(id);
                tracing::trace!(target: targets::BUTTON, ?delay, "loading delayed");
            }
        }
    }

    fn delay_elapsed(&self) {
        let mut state = self.state.lock();
        if state.unmounted {
            return;
        }
        state.delay_timer = None;
        self.apply_loading(&mut state, true);
    }

    fn apply_loading(&self, state: &mut ButtonState, loading: bool) {
        if state.loading == loading {
            return;
        }
        state.loading = loading;
        self.node
            .set_class_name(self.props.class_list(&self.prefix, loading));
        self.render_icon(state);
        tracing::trace!(target: targets::BUTTON, node = %self.node.describe(), loading, "loading changed");
    }

    /// Replace the icon child to match the loading state.
    fn render_icon(&self, state: &mut ButtonState) {
        if let Some(old) = state.icon.take() {
            old.remove();
        }
        let name = if state.loading {
            Some(LOADING_ICON)
        } else {
            self.props.icon.as_deref()
        };
        let Some(name) = name else {
            return;
        };
        let Some(document) = self.node.owner_document() else {
            return;
        };

        let icon = document.create_element("i");
        icon.set_class_name(format!("anticon anticon-{name}"));
        let first = self.node.children().into_iter().next();
        match self.node.insert_before(&icon, first.as_ref()) {
            Ok(()) => state.icon = Some(icon),
            Err(err) => {
                tracing::warn!(target: targets::BUTTON, error = %err, "could not render icon")
            }
        }
    }
}

static_assertions::assert_impl_all!(ButtonHandle: Send, Sync);
