//! Virtual-clock timer queue
//!
//! One-shot timers keyed to a clock that only moves when the host calls
//! [`TimerQueue::advance`]. Callbacks receive the queue so they can schedule
//! follow-up timers; anything they schedule that falls due inside the same
//! advance window runs in that same call.

use std::fmt;

/// Handle to a scheduled timer
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

/// Timer callback; receives the queue to allow rescheduling
pub type TimerCallback = Box<dyn FnOnce(&mut TimerQueue) + Send>;

struct ScheduledTask {
    id: TimerId,
    due_at: u64,
    order: u64,
    callback: TimerCallback,
}

/// Upper bound on callbacks run by a single `advance` call
const STEP_LIMIT: usize = 10_000;

/// One-shot timers on a virtual clock
pub struct TimerQueue {
    now_ms: u64,
    next_id: u64,
    next_order: u64,
    tasks: Vec<ScheduledTask>,
}

impl fmt::Debug for TimerQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimerQueue")
            .field("now_ms", &self.now_ms)
            .field("pending", &self.tasks.len())
            .finish()
    }
}

impl Default for TimerQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl TimerQueue {
    pub fn new() -> Self {
        Self {
            now_ms: 0,
            next_id: 1,
            next_order: 0,
            tasks: Vec::new(),
        }
    }

    /// Current virtual time in milliseconds
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Number of timers waiting to fire
    pub fn pending(&self) -> usize {
        self.tasks.len()
    }

    /// Schedule `callback` to run `delay_ms` from now
    pub fn schedule<F>(&mut self, delay_ms: u64, callback: F) -> TimerId
    where
        F: FnOnce(&mut TimerQueue) + Send + 'static,
    {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        let order = self.next_order;
        self.next_order += 1;

        self.tasks.push(ScheduledTask {
            id,
            due_at: self.now_ms.saturating_add(delay_ms),
            order,
            callback: Box::new(callback),
        });
        id
    }

    /// Cancel a pending timer, returning whether it was still pending
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|task| task.id != id);
        self.tasks.len() != before
    }

    /// Move the clock forward, running every timer that falls due
    ///
    /// Timers run in due-time order, ties broken by scheduling order.
    /// Returns the number of callbacks run.
    pub fn advance(&mut self, delta_ms: u64) -> usize {
        let target = self.now_ms.saturating_add(delta_ms);
        let mut ran = 0;

        while let Some(index) = self.next_due(target) {
            if ran >= STEP_LIMIT {
                tracing::warn!(
                    "TimerQueue: step limit ({}) reached, {} timer(s) deferred",
                    STEP_LIMIT,
                    self.tasks.len()
                );
                break;
            }
            let task = self.tasks.swap_remove(index);
            self.now_ms = self.now_ms.max(task.due_at);
            (task.callback)(self);
            ran += 1;
        }

        self.now_ms = self.now_ms.max(target);
        ran
    }

    fn next_due(&self, target: u64) -> Option<usize> {
        self.tasks
            .iter()
            .enumerate()
            .filter(|(_, task)| task.due_at <= target)
            .min_by_key(|(_, task)| (task.due_at, task.order))
            .map(|(index, _)| index)
    }
}
