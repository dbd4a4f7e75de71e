//! Deferred task queue.
//!
//! The original tool fired bare timers for its simulated backend work.
//! Here the delays are explicit: scheduling returns a cancellable handle,
//! and delivery happens only when the owner polls. Everything runs on the
//! single event loop; a state mutation issued before a delayed event
//! fires is still reflected when it fires.

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Identifier for a scheduled task.
pub type TaskId = u64;

/// Cancellable handle to a scheduled task.
///
/// Cancelling after delivery is a no-op. Dropping the handle does not
/// cancel the task; the current product never cancels, the handle just
/// makes it possible.
#[derive(Debug, Clone)]
pub struct TaskHandle {
    id: TaskId,
    cancelled: Rc<Cell<bool>>,
}

impl TaskHandle {
    /// The task's id.
    pub fn id(&self) -> TaskId {
        self.id
    }

    /// Cancel the task; it will never be delivered.
    pub fn cancel(&self) {
        self.cancelled.set(true);
    }

    /// Check whether the task was cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.get()
    }
}

#[derive(Debug)]
struct Scheduled<E> {
    id: TaskId,
    due: Instant,
    cancelled: Rc<Cell<bool>>,
    event: E,
}

/// Single-threaded delay queue delivering events of type `E`.
#[derive(Debug)]
pub struct TaskQueue<E> {
    next_id: TaskId,
    pending: Vec<Scheduled<E>>,
}

impl<E> Default for TaskQueue<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> TaskQueue<E> {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self {
            next_id: 0,
            pending: Vec::new(),
        }
    }

    /// Schedule `event` for delivery after `delay`.
    pub fn schedule(&mut self, delay: Duration, event: E) -> TaskHandle {
        self.schedule_at(Instant::now() + delay, event)
    }

    /// Schedule `event` for delivery at `due`.
    pub fn schedule_at(&mut self, due: Instant, event: E) -> TaskHandle {
        let id = self.next_id;
        self.next_id += 1;
        let cancelled = Rc::new(Cell::new(false));
        self.pending.push(Scheduled {
            id,
            due,
            cancelled: cancelled.clone(),
            event,
        });
        TaskHandle { id, cancelled }
    }

    /// Number of undelivered tasks, cancelled ones included.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Check whether anything is still scheduled.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Deliver every task due at `now`, in schedule order, dropping
    /// cancelled ones.
    pub fn poll_ready(&mut self, now: Instant) -> Vec<E> {
        let mut ready = Vec::new();
        let mut remaining = Vec::new();
        for task in self.pending.drain(..) {
            if task.cancelled.get() {
                continue;
            }
            if task.due <= now {
                ready.push(task.event);
            } else {
                remaining.push(task);
            }
        }
        self.pending = remaining;
        ready
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delivery_after_delay() {
        let mut queue = TaskQueue::new();
        let start = Instant::now();
        queue.schedule_at(start + Duration::from_secs(1), "processed");

        assert!(queue.poll_ready(start).is_empty());
        let ready = queue.poll_ready(start + Duration::from_secs(2));
        assert_eq!(ready, vec!["processed"]);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_schedule_order_preserved() {
        let mut queue = TaskQueue::new();
        let start = Instant::now();
        queue.schedule_at(start, "first");
        queue.schedule_at(start, "second");

        assert_eq!(queue.poll_ready(start), vec!["first", "second"]);
    }

    #[test]
    fn test_cancelled_task_never_delivered() {
        let mut queue = TaskQueue::new();
        let start = Instant::now();
        let handle = queue.schedule_at(start, "stale");
        handle.cancel();

        assert!(handle.is_cancelled());
        assert!(queue.poll_ready(start + Duration::from_secs(1)).is_empty());
    }

    #[test]
    fn test_not_due_tasks_stay_queued() {
        let mut queue = TaskQueue::new();
        let start = Instant::now();
        queue.schedule_at(start, "now");
        queue.schedule_at(start + Duration::from_secs(5), "later");

        assert_eq!(queue.poll_ready(start), vec!["now"]);
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.poll_ready(start + Duration::from_secs(5)), vec!["later"]);
    }
}
