//! Animation frame requests.
//!
//! A frame request runs its callback once a given number of rendering frames
//! have elapsed. Multi-frame requests are how time budgets that must track
//! the renderer (rather than the wall clock) are expressed.

use slotmap::{SlotMap, new_key_type};

use crate::error::{Result, SchedulerError};
use crate::task::BoxedTask;

new_key_type! {
    /// A unique identifier for a pending frame request.
    pub struct FrameRequestId;
}

struct FrameRequest {
    /// Frames left before the callback runs.
    remaining: u32,
    /// Request order, for stable firing order within a frame.
    sequence: u64,
    callback: BoxedTask,
}

/// Pending frame requests.
#[derive(Default)]
pub(crate) struct FrameQueue {
    requests: SlotMap<FrameRequestId, FrameRequest>,
    next_sequence: u64,
}

impl FrameQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request `frames` frames; zero is treated as one.
    pub fn request(&mut self, frames: u32, callback: BoxedTask) -> FrameRequestId {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.requests.insert(FrameRequest {
            remaining: frames.max(1),
            sequence,
            callback,
        })
    }

    pub fn cancel(&mut self, id: FrameRequestId) -> Result<()> {
        self.requests
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| SchedulerError::InvalidFrameRequest.into())
    }

    pub fn is_pending(&self, id: FrameRequestId) -> bool {
        self.requests.contains_key(id)
    }

    pub fn pending_count(&self) -> usize {
        self.requests.len()
    }

    /// Count one frame down and return the IDs that are now due, oldest first.
    ///
    /// Due requests stay registered until [`FrameQueue::take`] claims them, so
    /// a callback running earlier in the same frame can still cancel them.
    pub fn tick(&mut self) -> Vec<FrameRequestId> {
        let mut due: Vec<(u64, FrameRequestId)> = Vec::new();
        for (id, request) in self.requests.iter_mut() {
            request.remaining = request.remaining.saturating_sub(1);
            if request.remaining == 0 {
                due.push((request.sequence, id));
            }
        }
        due.sort_unstable_by_key(|(sequence, _)| *sequence);
        due.into_iter().map(|(_, id)| id).collect()
    }

    /// Remove a due request and hand back its callback.
    pub fn take(&mut self, id: FrameRequestId) -> Option<BoxedTask> {
        self.requests.remove(id).map(|request| request.callback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_fires_after_its_frame_count() {
        let mut queue = FrameQueue::new();
        let id = queue.request(3, Box::new(|| {}));

        assert!(queue.tick().is_empty());
        assert!(queue.tick().is_empty());
        assert_eq!(queue.tick(), vec![id]);
        assert!(queue.take(id).is_some());
        assert_eq!(queue.pending_count(), 0);
    }

    #[test]
    fn zero_frames_means_next_frame() {
        let mut queue = FrameQueue::new();
        let id = queue.request(0, Box::new(|| {}));
        assert_eq!(queue.tick(), vec![id]);
    }

    #[test]
    fn due_requests_are_ordered_by_request_time() {
        let mut queue = FrameQueue::new();
        let first = queue.request(2, Box::new(|| {}));
        let second = queue.request(1, Box::new(|| {}));

        assert_eq!(queue.tick(), vec![second]);
        queue.take(second);
        assert_eq!(queue.tick(), vec![first]);
    }

    #[test]
    fn cancelled_request_never_becomes_due() {
        let mut queue = FrameQueue::new();
        let id = queue.request(1, Box::new(|| {}));
        assert!(queue.cancel(id).is_ok());
        assert!(queue.cancel(id).is_err());
        assert!(!queue.is_pending(id));
        assert!(queue.tick().is_empty());
    }
}
