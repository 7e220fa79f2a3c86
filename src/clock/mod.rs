//! Clocks that schedule delayed tasks for the controller.
//!
//! The controller never sleeps or spawns on its own. Every suspension point
//! belongs to a `Clock`:
//!
//! - **`ManualClock`**: virtual time, advanced explicitly and synchronously.
//!   Deterministic, suited to tests and fast-forwarded simulations.
//! - **`TokioClock`**: wall-clock timers spawned on a tokio runtime.

mod manual;
mod runtime;

pub use manual::ManualClock;
pub use runtime::TokioClock;

use std::fmt;
use std::time::Duration;

/// A unit of deferred work handed to a clock.
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// Handle to a scheduled task, used to cancel it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(u64);

impl TimerHandle {
    pub(crate) fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn id(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for TimerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "timer#{}", self.0)
    }
}

/// Source of time and delayed execution.
///
/// Implementations must accept any number of outstanding tasks and cancel each
/// independently. Cancelling a handle whose task already ran, or was already
/// cancelled, does nothing.
pub trait Clock: Send + Sync + 'static {
    /// Time elapsed since the clock's origin.
    fn now(&self) -> Duration;

    /// Run `task` once, `delay` from now.
    fn schedule_after(&self, delay: Duration, task: Task) -> TimerHandle;

    /// Prevent a scheduled task from running.
    fn cancel(&self, handle: TimerHandle);
}
