use std::collections::VecDeque;

use crate::reconcile::CompletionCheck;

/// Defers completion checks until the host's next frame.
///
/// Checks are single-shot and never cancelled; a stale one runs and does
/// nothing.
pub trait Scheduler {
    fn schedule(&mut self, check: CompletionCheck);
}

/// FIFO of checks waiting for the next frame
#[derive(Debug, Clone, Default)]
pub struct FrameQueue {
    pending: VecDeque<CompletionCheck>,
}

impl FrameQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Take every check due this frame, oldest first
    pub fn drain(&mut self) -> Vec<CompletionCheck> {
        self.pending.drain(..).collect()
    }
}

impl Scheduler for FrameQueue {
    fn schedule(&mut self, check: CompletionCheck) {
        self.pending.push_back(check);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reconcile::CompositionTracker;
    use pretty_assertions::assert_eq;

    #[test]
    fn drains_in_schedule_order() {
        let mut tracker = CompositionTracker::new();
        let mut queue = FrameQueue::new();

        tracker.start();
        queue.schedule(tracker.end());
        tracker.start();
        queue.schedule(tracker.end());
        assert_eq!(queue.len(), 2);

        let generations: Vec<u64> = queue.drain().iter().map(|c| c.generation()).collect();
        assert_eq!(generations, vec![1, 2]);
        assert!(queue.is_empty());
    }
}
