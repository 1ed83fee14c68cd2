//! Deferred, cancellable tasks on a virtual clock.
//!
//! Feedback pacing (the pause between a correct answer and the next
//! question, the level-up banner) is modelled as data: a controller schedules
//! a task value with a delay and later applies whatever [`Scheduler::advance`]
//! hands back. Nothing runs on its own, so a task can never fire against a
//! controller that has been reset or dropped.

use std::time::Duration;

/// Handle to a scheduled task, used for cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(u64);

#[derive(Debug)]
struct Pending<T> {
    id: TaskId,
    due: Duration,
    task: T,
}

/// A queue of delayed tasks ordered by due time, FIFO among equal due times.
#[derive(Debug)]
pub struct Scheduler<T> {
    now: Duration,
    next_id: u64,
    pending: Vec<Pending<T>>,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Scheduler<T> {
    /// Create an empty scheduler at time zero.
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            next_id: 0,
            pending: Vec::new(),
        }
    }

    /// Time elapsed on this scheduler's clock.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Schedule `task` to come due after `delay`.
    pub fn schedule(&mut self, delay: Duration, task: T) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        self.pending.push(Pending {
            id,
            due: self.now.saturating_add(delay),
            task,
        });
        id
    }

    /// Cancel a task. Returns true if it was still pending.
    pub fn cancel(&mut self, id: TaskId) -> bool {
        let before = self.pending.len();
        self.pending.retain(|p| p.id != id);
        self.pending.len() < before
    }

    /// Cancel everything. Returns how many tasks were dropped.
    pub fn cancel_all(&mut self) -> usize {
        let dropped = self.pending.len();
        self.pending.clear();
        dropped
    }

    /// Whether a task is still waiting to fire.
    pub fn is_pending(&self, id: TaskId) -> bool {
        self.pending.iter().any(|p| p.id == id)
    }

    /// Number of pending tasks.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Whether nothing is pending.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Time until the earliest pending task comes due.
    pub fn next_due(&self) -> Option<Duration> {
        self.pending
            .iter()
            .map(|p| p.due.saturating_sub(self.now))
            .min()
    }

    /// Move the clock forward and return every task that came due, in order.
    pub fn advance(&mut self, elapsed: Duration) -> Vec<T> {
        self.now = self.now.saturating_add(elapsed);
        let now = self.now;
        let (mut due, rest): (Vec<_>, Vec<_>) = std::mem::take(&mut self.pending)
            .into_iter()
            .partition(|p| p.due <= now);
        self.pending = rest;
        due.sort_by_key(|p| (p.due, p.id));
        due.into_iter().map(|p| p.task).collect()
    }
}
