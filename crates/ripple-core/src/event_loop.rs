//! The cooperative event loop that drives Ripple.
//!
//! Everything in Ripple runs on one logical thread: input events are handled
//! synchronously, and anything that must happen "later" goes through a
//! [`Scheduler`]. The scheduler offers three kinds of deferral:
//!
//! - **Tasks** run on the next turn of the loop ([`Scheduler::post_task`]).
//! - **Frame requests** run after a number of rendered frames
//!   ([`Scheduler::request_frames`]).
//! - **Timers** run once the clock has advanced by a delay
//!   ([`Scheduler::start_timer`]).
//!
//! [`EventLoop`] is the in-process implementation. It is pumped explicitly,
//! which makes every interleaving reproducible:
//!
//! ```
//! use ripple_core::{EventLoop, Scheduler};
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicBool, Ordering};
//!
//! let event_loop = EventLoop::new();
//! let ran = Arc::new(AtomicBool::new(false));
//!
//! let flag = ran.clone();
//! event_loop.post_task(Box::new(move || flag.store(true, Ordering::SeqCst)));
//! assert!(!ran.load(Ordering::SeqCst));
//!
//! event_loop.run_pending_tasks();
//! assert!(ran.load(Ordering::SeqCst));
//! ```

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use crate::frame::{FrameQueue, FrameRequestId};
use crate::logging::{span_names, targets};
use crate::task::{TaskId, TaskQueue};
use crate::timer::{TimerId, TimerManager};

/// Nominal duration of one rendered frame.
pub const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// A callback handed to a [`Scheduler`].
pub type Callback = Box<dyn FnOnce() + Send + 'static>;

/// Timing primitives of the host environment.
///
/// Every callback runs on the loop's thread, never re-entrantly inside the
/// call that scheduled it. Cancelling returns `false` when the callback has
/// already run or was never scheduled; callers may cancel unconditionally.
pub trait Scheduler: Send + Sync {
    /// Run `task` on the next turn of the loop.
    fn post_task(&self, task: Callback) -> TaskId;

    /// Cancel a task posted with [`Scheduler::post_task`].
    fn cancel_task(&self, id: TaskId) -> bool;

    /// Run `callback` once `frames` frames have been rendered.
    fn request_frames(&self, frames: u32, callback: Callback) -> FrameRequestId;

    /// Cancel a pending frame request.
    fn cancel_frames(&self, id: FrameRequestId) -> bool;

    /// Run `callback` once `delay` has elapsed.
    fn start_timer(&self, delay: Duration, callback: Callback) -> TimerId;

    /// Stop a pending timer.
    fn stop_timer(&self, id: TimerId) -> bool;
}

struct EventLoopInner {
    tasks: Mutex<TaskQueue>,
    frames: Mutex<FrameQueue>,
    timers: Mutex<TimerManager>,
    /// Virtual clock, starting at zero.
    now: Mutex<Duration>,
    /// Frames rendered so far.
    frame_count: Mutex<u64>,
}

/// A manually pumped, single-threaded event loop.
///
/// Cloning an `EventLoop` yields another handle to the same loop.
#[derive(Clone)]
pub struct EventLoop {
    inner: Arc<EventLoopInner>,
}

impl Default for EventLoop {
    fn default() -> Self {
        Self::new()
    }
}

impl EventLoop {
    /// Create an idle loop whose clock reads zero.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(EventLoopInner {
                tasks: Mutex::new(TaskQueue::new()),
                frames: Mutex::new(FrameQueue::new()),
                timers: Mutex::new(TimerManager::new()),
                now: Mutex::new(Duration::ZERO),
                frame_count: Mutex::new(0),
            }),
        }
    }

    /// The loop as a shareable [`Scheduler`] trait object.
    pub fn scheduler(&self) -> Arc<dyn Scheduler> {
        Arc::new(self.clone())
    }

    /// Current reading of the virtual clock.
    pub fn now(&self) -> Duration {
        *self.inner.now.lock()
    }

    /// Number of frames rendered so far.
    pub fn frame_count(&self) -> u64 {
        *self.inner.frame_count.lock()
    }

    /// Number of tasks waiting to run.
    pub fn pending_tasks(&self) -> usize {
        self.inner.tasks.lock().pending_count()
    }

    /// Number of frame requests waiting to run.
    pub fn pending_frame_requests(&self) -> usize {
        self.inner.frames.lock().pending_count()
    }

    /// Check whether a frame request is still pending.
    pub fn is_frame_request_pending(&self, id: FrameRequestId) -> bool {
        self.inner.frames.lock().is_pending(id)
    }

    /// Number of timers that have not fired yet.
    pub fn active_timers(&self) -> usize {
        self.inner.timers.lock().active_count()
    }

    /// Check whether a timer is still pending.
    pub fn is_timer_active(&self, id: TimerId) -> bool {
        self.inner.timers.lock().is_active(id)
    }

    /// Run every pending task, including tasks posted while running.
    ///
    /// Returns the number of tasks executed.
    pub fn run_pending_tasks(&self) -> usize {
        let mut executed = 0;
        loop {
            // The queue lock is released before the task runs.
            let next = self.inner.tasks.lock().pop_front();
            let Some((id, task)) = next else {
                break;
            };
            tracing::trace!(target: targets::TASK, task = id.as_u64(), "running task");
            task();
            executed += 1;
        }
        executed
    }

    /// Render one frame.
    ///
    /// Pending tasks run first, the clock moves by [`FRAME_INTERVAL`] (firing
    /// any timers that fall due), then the frame's callbacks run in request
    /// order.
    pub fn advance_frame(&self) {
        let _span = tracing::trace_span!(target: targets::EVENT_LOOP, span_names::EVENT_LOOP).entered();
        self.run_pending_tasks();
        self.advance_time(FRAME_INTERVAL);

        let frame = {
            let mut count = self.inner.frame_count.lock();
            *count += 1;
            *count
        };
        let due = self.inner.frames.lock().tick();
        tracing::trace!(target: targets::FRAME, frame, due = due.len(), "frame rendered");

        for id in due {
            // A callback earlier in this frame may have cancelled this one.
            let callback = self.inner.frames.lock().take(id);
            if let Some(callback) = callback {
                callback();
            }
        }
        self.run_pending_tasks();
    }

    /// Render `frames` frames.
    pub fn advance_frames(&self, frames: u32) {
        for _ in 0..frames {
            self.advance_frame();
        }
    }

    /// Move the clock forward, firing timers in deadline order.
    ///
    /// Tasks posted by a timer run before the next timer fires. The clock
    /// saturates at [`Duration::MAX`].
    pub fn advance_time(&self, delta: Duration) {
        let target = self.now().saturating_add(delta);
        loop {
            let due = {
                let mut timers = self.inner.timers.lock();
                match timers.next_deadline() {
                    Some(deadline) if deadline <= target => {
                        *self.inner.now.lock() = deadline;
                        timers.pop_due(deadline)
                    }
                    _ => None,
                }
            };
            let Some((_, callback)) = due else {
                break;
            };
            callback();
            self.run_pending_tasks();
        }
        *self.inner.now.lock() = target;
        self.run_pending_tasks();
    }
}

impl Scheduler for EventLoop {
    fn post_task(&self, task: Callback) -> TaskId {
        let id = self.inner.tasks.lock().post(task);
        tracing::trace!(target: targets::TASK, task = id.as_u64(), "task posted");
        id
    }

    fn cancel_task(&self, id: TaskId) -> bool {
        self.inner.tasks.lock().cancel(id).is_ok()
    }

    fn request_frames(&self, frames: u32, callback: Callback) -> FrameRequestId {
        let id = self.inner.frames.lock().request(frames, callback);
        tracing::trace!(target: targets::FRAME, ?id, frames, "frames requested");
        id
    }

    fn cancel_frames(&self, id: FrameRequestId) -> bool {
        self.inner.frames.lock().cancel(id).is_ok()
    }

    fn start_timer(&self, delay: Duration, callback: Callback) -> TimerId {
        let deadline = self.now().saturating_add(delay);
        let id = self.inner.timers.lock().start(deadline, callback);
        tracing::trace!(target: targets::TIMER, ?id, ?delay, "timer started");
        id
    }

    fn stop_timer(&self, id: TimerId) -> bool {
        self.inner.timers.lock().stop(id).is_ok()
    }
}

static_assertions::assert_impl_all!(EventLoop: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn recorder() -> (Arc<Mutex<Vec<&'static str>>>, impl Fn(&'static str) -> Callback) {
        let log = Arc::new(Mutex::new(Vec::new()));
        let make = {
            let log = log.clone();
            move |label: &'static str| -> Callback {
                let log = log.clone();
                Box::new(move || log.lock().push(label))
            }
        };
        (log, make)
    }

    #[test]
    fn tasks_do_not_run_synchronously() {
        let event_loop = EventLoop::new();
        let (log, make) = recorder();

        event_loop.post_task(make("task"));
        assert!(log.lock().is_empty());
        assert_eq!(event_loop.pending_tasks(), 1);

        assert_eq!(event_loop.run_pending_tasks(), 1);
        assert_eq!(*log.lock(), vec!["task"]);
    }

    #[test]
    fn tasks_posted_by_tasks_run_in_the_same_drain() {
        let event_loop = EventLoop::new();
        let count = Arc::new(AtomicU32::new(0));

        let inner_loop = event_loop.clone();
        let inner_count = count.clone();
        event_loop.post_task(Box::new(move || {
            inner_count.fetch_add(1, Ordering::SeqCst);
            let count = inner_count.clone();
            inner_loop.post_task(Box::new(move || {
                count.fetch_add(1, Ordering::SeqCst);
            }));
        }));

        assert_eq!(event_loop.run_pending_tasks(), 2);
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn cancelled_task_never_runs() {
        let event_loop = EventLoop::new();
        let (log, make) = recorder();

        let id = event_loop.post_task(make("cancelled"));
        assert!(event_loop.cancel_task(id));
        assert!(!event_loop.cancel_task(id));
        event_loop.run_pending_tasks();
        assert!(log.lock().is_empty());
    }

    #[test]
    fn frame_request_runs_after_frame_budget() {
        let event_loop = EventLoop::new();
        let (log, make) = recorder();

        event_loop.request_frames(10, make("watchdog"));
        event_loop.advance_frames(9);
        assert!(log.lock().is_empty());

        event_loop.advance_frame();
        assert_eq!(*log.lock(), vec!["watchdog"]);
        assert_eq!(event_loop.frame_count(), 10);
        assert_eq!(event_loop.now(), FRAME_INTERVAL * 10);
    }

    #[test]
    fn cancelled_frame_request_never_runs() {
        let event_loop = EventLoop::new();
        let (log, make) = recorder();

        let id = event_loop.request_frames(2, make("frame"));
        assert!(event_loop.is_frame_request_pending(id));
        assert!(event_loop.cancel_frames(id));
        event_loop.advance_frames(5);
        assert!(log.lock().is_empty());
        assert!(!event_loop.cancel_frames(id));
    }

    #[test]
    fn frame_callback_can_cancel_a_sibling_due_in_the_same_frame() {
        let event_loop = EventLoop::new();
        let (log, make) = recorder();

        let sibling = Arc::new(Mutex::new(None));
        let canceller_loop = event_loop.clone();
        let canceller_sibling = sibling.clone();
        event_loop.request_frames(
            1,
            Box::new(move || {
                if let Some(id) = canceller_sibling.lock().take() {
                    canceller_loop.cancel_frames(id);
                }
            }),
        );
        *sibling.lock() = Some(event_loop.request_frames(1, make("sibling")));

        event_loop.advance_frame();
        assert!(log.lock().is_empty());
        assert_eq!(event_loop.pending_frame_requests(), 0);
    }

    #[test]
    fn pending_tasks_run_before_frame_callbacks() {
        let event_loop = EventLoop::new();
        let (log, make) = recorder();

        event_loop.request_frames(1, make("frame"));
        event_loop.post_task(make("task"));
        event_loop.advance_frame();

        assert_eq!(*log.lock(), vec!["task", "frame"]);
    }

    #[test]
    fn timers_fire_when_clock_reaches_deadline() {
        let event_loop = EventLoop::new();
        let (log, make) = recorder();

        let late = event_loop.start_timer(Duration::from_millis(300), make("late"));
        event_loop.start_timer(Duration::from_millis(100), make("early"));

        event_loop.advance_time(Duration::from_millis(99));
        assert!(log.lock().is_empty());

        event_loop.advance_time(Duration::from_millis(1));
        assert_eq!(*log.lock(), vec!["early"]);
        assert!(event_loop.is_timer_active(late));

        event_loop.advance_time(Duration::from_millis(500));
        assert_eq!(*log.lock(), vec!["early", "late"]);
        assert_eq!(event_loop.active_timers(), 0);
        assert_eq!(event_loop.now(), Duration::from_millis(600));
    }

    #[test]
    fn stopped_timer_never_fires() {
        let event_loop = EventLoop::new();
        let (log, make) = recorder();

        let id = event_loop.start_timer(Duration::from_millis(10), make("timer"));
        assert!(event_loop.stop_timer(id));
        assert!(!event_loop.stop_timer(id));
        event_loop.advance_time(Duration::from_secs(1));
        assert!(log.lock().is_empty());
    }

    #[test]
    fn huge_delays_saturate_instead_of_overflowing() {
        let event_loop = EventLoop::new();
        let (log, make) = recorder();

        event_loop.advance_frame();
        let id = event_loop.start_timer(Duration::MAX, make("never"));
        assert!(event_loop.is_timer_active(id));

        event_loop.advance_time(Duration::from_secs(3600));
        assert!(log.lock().is_empty());

        event_loop.advance_time(Duration::MAX);
        assert_eq!(event_loop.now(), Duration::MAX);
        assert_eq!(*log.lock(), vec!["never"]);

        event_loop.advance_time(Duration::from_millis(1));
        assert_eq!(event_loop.now(), Duration::MAX);
    }

    #[test]
    fn timer_started_by_timer_uses_its_deadline_as_base() {
        let event_loop = EventLoop::new();
        let fired_at = Arc::new(Mutex::new(Vec::new()));

        let outer_loop = event_loop.clone();
        let outer_fired = fired_at.clone();
        event_loop.start_timer(
            Duration::from_millis(10),
            Box::new(move || {
                outer_fired.lock().push(outer_loop.now());
                let inner_loop = outer_loop.clone();
                let inner_fired = outer_fired.clone();
                outer_loop.start_timer(
                    Duration::from_millis(10),
                    Box::new(move || inner_fired.lock().push(inner_loop.now())),
                );
            }),
        );

        event_loop.advance_time(Duration::from_millis(50));
        assert_eq!(
            *fired_at.lock(),
            vec![Duration::from_millis(10), Duration::from_millis(20)]
        );
    }
}
