//! FIFO of pending pricing tasks shared by pool workers

use crate::task::PricingTask;
use parking_lot::{Condvar, Mutex};
use std::collections::VecDeque;

#[derive(Debug, Default)]
struct QueueState {
    tasks: VecDeque<PricingTask>,
    closed: bool,
}

/// A blocking task queue with cooperative shutdown.
///
/// `push` wakes exactly one idle worker. `pop` blocks while the queue is empty and open;
/// once closed it keeps handing out the remaining tasks and returns `None` only when the
/// queue is both closed and empty, so shutting down never discards queued work.
#[derive(Debug, Default)]
pub struct TaskQueue {
    state: Mutex<QueueState>,
    available: Condvar,
}

impl TaskQueue {
    /// Create an open, empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a task and wake one waiting worker
    pub fn push(&self, task: PricingTask) {
        self.state.lock().tasks.push_back(task);
        self.available.notify_one();
    }

    /// Blocks until a task is available or the queue is closed and drained.
    ///
    /// The lock is released before the caller sees the task, so execution never happens
    /// under the queue lock.
    pub fn pop(&self) -> Option<PricingTask> {
        let mut state = self.state.lock();
        while state.tasks.is_empty() && !state.closed {
            self.available.wait(&mut state);
        }
        state.tasks.pop_front()
    }

    /// Close the queue and wake every waiter
    pub fn close(&self) {
        self.state.lock().closed = true;
        self.available.notify_all();
    }

    /// Re-open a closed queue so new workers can block on it again
    pub fn reopen(&self) {
        self.state.lock().closed = false;
    }

    /// True once [`TaskQueue::close`] has been called and not undone
    pub fn is_closed(&self) -> bool {
        self.state.lock().closed
    }

    /// Number of queued tasks
    pub fn len(&self) -> usize {
        self.state.lock().tasks.len()
    }

    /// True when no task is queued
    pub fn is_empty(&self) -> bool {
        self.state.lock().tasks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::TaskQueue;
    use crate::task::PricingTask;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;
    use std::time::Duration;
    use uuid::Uuid;

    fn task(product: &str) -> PricingTask {
        PricingTask::new(Uuid::new_v4(), "pool", product)
    }

    #[test]
    fn test_fifo_order() {
        let queue = TaskQueue::new();
        queue.push(task("P1"));
        queue.push(task("P2"));
        queue.push(task("P3"));
        assert_eq!(queue.len(), 3);

        let order: Vec<String> = (0..3)
            .filter_map(|_| queue.pop())
            .map(|t| t.product_id)
            .collect();
        assert_eq!(order, vec!["P1", "P2", "P3"]);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_close_drains_remaining_tasks() {
        let queue = TaskQueue::new();
        queue.push(task("P1"));
        queue.push(task("P2"));
        queue.close();

        assert_eq!(queue.pop().map(|t| t.product_id), Some("P1".to_string()));
        assert_eq!(queue.pop().map(|t| t.product_id), Some("P2".to_string()));
        assert!(queue.pop().is_none());
    }

    #[test]
    fn test_close_wakes_idle_workers() {
        let queue = Arc::new(TaskQueue::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let queue = Arc::clone(&queue);
                thread::spawn(move || queue.pop())
            })
            .collect();

        thread::sleep(Duration::from_millis(20));
        queue.close();

        for handle in handles {
            assert!(handle.join().unwrap().is_none());
        }
    }

    #[test]
    fn test_every_task_popped_exactly_once() {
        let queue = Arc::new(TaskQueue::new());
        let popped = Arc::new(AtomicUsize::new(0));

        let workers: Vec<_> = (0..4)
            .map(|_| {
                let queue = Arc::clone(&queue);
                let popped = Arc::clone(&popped);
                thread::spawn(move || {
                    while queue.pop().is_some() {
                        popped.fetch_add(1, Ordering::SeqCst);
                    }
                })
            })
            .collect();

        for i in 0..500 {
            queue.push(task(&format!("P{i}")));
        }
        queue.close();

        for worker in workers {
            worker.join().unwrap();
        }
        assert_eq!(popped.load(Ordering::SeqCst), 500);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_reopen() {
        let queue = TaskQueue::new();
        queue.close();
        assert!(queue.is_closed());
        queue.reopen();
        assert!(!queue.is_closed());
    }
}
