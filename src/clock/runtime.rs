//! Wall-clock timers backed by a tokio runtime.

use super::{Clock, Task, TimerHandle};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::{Handle, TryCurrentError};
use tokio::task::AbortHandle;
use tokio::time::{self, Instant};

/// Clock that runs each scheduled task on a tokio runtime after a real delay.
///
/// Time is read through `tokio::time::Instant`, so a runtime with paused time
/// (`#[tokio::test(start_paused = true)]`) drives this clock deterministically.
#[derive(Clone)]
pub struct TokioClock {
    runtime: Handle,
    origin: Instant,
    timers: Arc<Mutex<TimerTable>>,
}

#[derive(Default)]
struct TimerTable {
    next_id: u64,
    live: HashMap<u64, AbortHandle>,
}

impl TokioClock {
    /// Clock bound to the runtime of the calling context.
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime. Use
    /// [`TokioClock::try_current`] to get an error instead.
    pub fn current() -> Self {
        Self::with_handle(Handle::current())
    }

    /// Clock bound to the runtime of the calling context, if there is one.
    pub fn try_current() -> Result<Self, TryCurrentError> {
        Handle::try_current().map(Self::with_handle)
    }

    /// Clock spawning its timers on the given runtime.
    pub fn with_handle(runtime: Handle) -> Self {
        Self {
            runtime,
            origin: Instant::now(),
            timers: Arc::new(Mutex::new(TimerTable::default())),
        }
    }

    /// Number of timers scheduled but not yet fired or cancelled.
    pub fn live(&self) -> usize {
        self.timers.lock().live.len()
    }
}

impl Clock for TokioClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }

    fn schedule_after(&self, delay: Duration, task: Task) -> TimerHandle {
        // Held across the spawn so the timer cannot fire before it is registered.
        let mut timers = self.timers.lock();
        let id = timers.next_id;
        timers.next_id += 1;

        let table = Arc::clone(&self.timers);
        let join = self.runtime.spawn(async move {
            time::sleep(delay).await;
            let still_live = table.lock().live.remove(&id).is_some();
            if still_live {
                task();
            }
        });

        timers.live.insert(id, join.abort_handle());
        TimerHandle::new(id)
    }

    fn cancel(&self, handle: TimerHandle) {
        if let Some(timer) = self.timers.lock().live.remove(&handle.id()) {
            timer.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[test]
    fn try_current_fails_outside_runtime() {
        assert!(TokioClock::try_current().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn task_runs_after_delay() {
        let clock = TokioClock::current();
        let (tx, rx) = tokio::sync::oneshot::channel();

        clock.schedule_after(
            Duration::from_secs(5),
            Box::new(move || {
                let _ = tx.send(());
            }),
        );
        assert_eq!(clock.live(), 1);

        rx.await.unwrap();
        assert!(clock.now() >= Duration::from_secs(5));
        assert_eq!(clock.live(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_task_never_runs() {
        let clock = TokioClock::current();
        let fired = Arc::new(AtomicBool::new(false));

        let flag = Arc::clone(&fired);
        let handle = clock.schedule_after(
            Duration::from_secs(5),
            Box::new(move || flag.store(true, Ordering::SeqCst)),
        );
        clock.cancel(handle);
        assert_eq!(clock.live(), 0);

        time::sleep(Duration::from_secs(10)).await;
        assert!(!fired.load(Ordering::SeqCst));
    }

    #[tokio::test(start_paused = true)]
    async fn cancelling_unknown_handle_is_a_no_op() {
        let clock = TokioClock::current();
        clock.cancel(TimerHandle::new(42));
        assert_eq!(clock.live(), 0);
    }
}
