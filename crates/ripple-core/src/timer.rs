//! Timer system for Ripple.
//!
//! One-shot timers measured against the event loop's virtual clock. The clock
//! only moves when the loop is told to advance, which keeps every delay
//! observable and deterministic.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::time::Duration;

use slotmap::{SlotMap, new_key_type};

use crate::error::{Result, SchedulerError};
use crate::task::BoxedTask;

new_key_type! {
    /// A unique identifier for a timer.
    pub struct TimerId;
}

/// Internal timer data.
struct TimerData {
    /// Clock reading at which the timer fires.
    deadline: Duration,
    callback: BoxedTask,
}

/// An entry in the timer queue (min-heap by deadline, then start order).
#[derive(Debug, Clone, Copy)]
struct TimerQueueEntry {
    id: TimerId,
    deadline: Duration,
    sequence: u64,
}

impl PartialEq for TimerQueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.deadline == other.deadline && self.sequence == other.sequence
    }
}

impl Eq for TimerQueueEntry {}

impl PartialOrd for TimerQueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TimerQueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse order for min-heap (BinaryHeap is max-heap by default).
        other
            .deadline
            .cmp(&self.deadline)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

/// Manages all pending timers of an event loop.
#[derive(Default)]
pub(crate) struct TimerManager {
    /// All registered timers.
    timers: SlotMap<TimerId, TimerData>,
    /// Priority queue of pending timer fires.
    queue: BinaryHeap<TimerQueueEntry>,
    next_sequence: u64,
}

impl TimerManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a one-shot timer that fires once the clock reaches `deadline`.
    pub fn start(&mut self, deadline: Duration, callback: BoxedTask) -> TimerId {
        let id = self.timers.insert(TimerData { deadline, callback });
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.queue.push(TimerQueueEntry {
            id,
            deadline,
            sequence,
        });
        id
    }

    /// Stop and remove a timer.
    pub fn stop(&mut self, id: TimerId) -> Result<()> {
        self.timers
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| SchedulerError::InvalidTimerId.into())
    }

    pub fn is_active(&self, id: TimerId) -> bool {
        self.timers.contains_key(id)
    }

    /// The earliest deadline among live timers.
    pub fn next_deadline(&mut self) -> Option<Duration> {
        self.discard_stopped();
        self.queue.peek().map(|entry| entry.deadline)
    }

    /// Remove the earliest timer whose deadline is at or before `now`.
    #[tracing::instrument(skip(self), target = "ripple_core::timer", level = "trace")]
    pub fn pop_due(&mut self, now: Duration) -> Option<(TimerId, BoxedTask)> {
        self.discard_stopped();
        let entry = *self.queue.peek()?;
        if entry.deadline > now {
            return None;
        }
        self.queue.pop();
        let data = self.timers.remove(entry.id)?;
        tracing::trace!(target: "ripple_core::timer", id = ?entry.id, deadline = ?data.deadline, "timer fired");
        Some((entry.id, data.callback))
    }

    pub fn active_count(&self) -> usize {
        self.timers.len()
    }

    /// Drop queue entries whose timers were stopped.
    fn discard_stopped(&mut self) {
        while let Some(entry) = self.queue.peek() {
            if self.timers.contains_key(entry.id) {
                break;
            }
            self.queue.pop();
        }
    }
}
