//! Virtual-time clock advanced by hand.

use super::{Clock, Task, TimerHandle};
use parking_lot::Mutex;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Duration;

/// Deterministic clock whose time only moves when `advance` is called.
///
/// Clones share one timeline, so a test can keep a clone to drive time while
/// the controller owns another.
///
/// # Example
///
/// ```rust
/// use crossing::clock::{Clock, ManualClock};
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use std::sync::Arc;
/// use std::time::Duration;
///
/// let clock = ManualClock::new();
/// let fired = Arc::new(AtomicUsize::new(0));
///
/// let counter = Arc::clone(&fired);
/// clock.schedule_after(
///     Duration::from_millis(10),
///     Box::new(move || {
///         counter.fetch_add(1, Ordering::SeqCst);
///     }),
/// );
///
/// assert_eq!(clock.advance(Duration::from_millis(9)), 0);
/// assert_eq!(clock.advance(Duration::from_millis(1)), 1);
/// assert_eq!(fired.load(Ordering::SeqCst), 1);
/// assert_eq!(clock.now(), Duration::from_millis(10));
/// ```
#[derive(Clone, Default)]
pub struct ManualClock {
    timeline: Arc<Mutex<Timeline>>,
}

#[derive(Default)]
struct Timeline {
    now: Duration,
    next_id: u64,
    // Keyed by (due time, scheduling order).
    queue: BTreeMap<(Duration, u64), Task>,
    due: HashMap<u64, Duration>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move time forward by `by`, running every task that falls due.
    ///
    /// Tasks run synchronously in due-time order, ties broken by scheduling
    /// order. Tasks scheduled while advancing also run if they fall due before
    /// the target time. While a task runs, `now` reads as that task's due time.
    ///
    /// Time stops at `Duration::MAX` rather than overflowing.
    ///
    /// Returns the number of tasks run.
    pub fn advance(&self, by: Duration) -> usize {
        let target = self.timeline.lock().now.saturating_add(by);
        let mut fired = 0;

        loop {
            let task = {
                let mut timeline = self.timeline.lock();
                match timeline.queue.first_key_value() {
                    Some((&(at, id), _)) if at <= target => {
                        timeline.due.remove(&id);
                        timeline.now = at;
                        timeline.queue.remove(&(at, id))
                    }
                    _ => {
                        timeline.now = target;
                        break;
                    }
                }
            };

            // The lock is released here so tasks can schedule and cancel.
            if let Some(task) = task {
                task();
                fired += 1;
            }
        }

        fired
    }

    /// Number of tasks waiting to run.
    pub fn pending(&self) -> usize {
        self.timeline.lock().queue.len()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.timeline.lock().now
    }

    fn schedule_after(&self, delay: Duration, task: Task) -> TimerHandle {
        let mut timeline = self.timeline.lock();
        let id = timeline.next_id;
        timeline.next_id += 1;

        // Saturates, so a task beyond the end of time stays pending.
        let at = timeline.now.saturating_add(delay);
        timeline.queue.insert((at, id), task);
        timeline.due.insert(id, at);
        TimerHandle::new(id)
    }

    fn cancel(&self, handle: TimerHandle) {
        let mut timeline = self.timeline.lock();
        if let Some(at) = timeline.due.remove(&handle.id()) {
            timeline.queue.remove(&(at, handle.id()));
        }
    }
}
