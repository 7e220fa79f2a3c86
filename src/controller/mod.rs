//! Timer-driven intersection controller.
//!
//! This module is the imperative shell around the pure transition rule. The
//! controller owns the current snapshot, arms two timers per cycle on a
//! [`Clock`], applies the transition rule when they fire and reports changes
//! to a callback.
//!
//! # Cycle
//!
//! Starting from `start()`, or from the moment the previous cycle ended:
//!
//! 1. *caution* fires after `turn - yellow`: green lights turn yellow.
//! 2. *turn* fires after `turn`: yellow lights turn red, the waiting pair turns
//!    green, and the next cycle is armed.
//!
//! # Cancellation
//!
//! Every armed timer carries the epoch current when it was armed. `stop()`
//! bumps the epoch and cancels the pending handles under the controller lock,
//! so a timer that was already firing when `stop()` ran finds a newer epoch
//! and does nothing.

mod error;
mod timing;

pub use error::ControllerError;
pub use timing::Timing;

use crate::builder::ControllerBuilder;
use crate::clock::{Clock, TimerHandle};
use crate::core::{next_state, Intersection, IntersectionState};
use parking_lot::ReentrantMutex;
use std::cell::RefCell;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, trace};

/// Callback invoked with each new intersection state.
pub type ChangeCallback = Box<dyn FnMut(&IntersectionState) + Send + 'static>;

/// The two scheduled events of a cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Caution,
    Turn,
}

/// Drives an intersection through its light cycle on a clock.
///
/// Timer handling, `start` and `stop` are serialized by one re-entrant lock.
/// The change callback runs with that lock held but with no internal borrow
/// outstanding, so it may call `state`, `stop` or `start` on the same
/// controller. Dropping the controller stops it.
///
/// While the callback runs it is out of the controller, so changes caused by
/// the callback itself (for example by advancing a `ManualClock` from inside
/// it) are applied but not reported. A callback that panics is put back and
/// keeps receiving later changes.
///
/// # Example
///
/// ```rust
/// use crossing::{IntersectionController, IntersectionState, LightColor::*, ManualClock};
/// use std::sync::{Arc, Mutex};
/// use std::time::Duration;
///
/// let clock = ManualClock::new();
/// let seen = Arc::new(Mutex::new(Vec::new()));
/// let sink = Arc::clone(&seen);
///
/// let controller = IntersectionController::builder()
///     .clock(clock.clone())
///     .turn_duration(Duration::from_secs(300))
///     .yellow_duration(Duration::from_secs(30))
///     .on_change(move |state| sink.lock().unwrap().push(*state))
///     .build()
///     .unwrap();
///
/// controller.start().unwrap();
/// clock.advance(Duration::from_secs(300));
/// controller.stop();
///
/// assert_eq!(
///     *seen.lock().unwrap(),
///     vec![
///         IntersectionState::new(Yellow, Red, Yellow, Red),
///         IntersectionState::new(Red, Green, Red, Green),
///     ]
/// );
/// ```
pub struct IntersectionController<C: Clock> {
    shared: Arc<Shared<C>>,
}

struct Shared<C: Clock> {
    clock: C,
    timing: Timing,
    core: ReentrantMutex<RefCell<Core>>,
}

struct Core {
    intersection: Intersection,
    running: bool,
    epoch: u64,
    pending: Vec<TimerHandle>,
    on_change: Option<ChangeCallback>,
}

impl<C: Clock> IntersectionController<C> {
    /// Start configuring a controller.
    pub fn builder() -> ControllerBuilder<C> {
        ControllerBuilder::new()
    }

    pub(crate) fn new(
        clock: C,
        timing: Timing,
        initial: IntersectionState,
        on_change: Option<ChangeCallback>,
    ) -> Self {
        let core = Core {
            intersection: Intersection::new(initial),
            running: false,
            epoch: 0,
            pending: Vec::with_capacity(2),
            on_change,
        };

        Self {
            shared: Arc::new(Shared {
                clock,
                timing,
                core: ReentrantMutex::new(RefCell::new(core)),
            }),
        }
    }

    /// Arm the first cycle.
    ///
    /// Fails with [`ControllerError::AlreadyRunning`] if the controller was
    /// started and not stopped since.
    pub fn start(&self) -> Result<(), ControllerError> {
        let guard = self.shared.core.lock();
        let mut core = guard.borrow_mut();
        if core.running {
            return Err(ControllerError::AlreadyRunning);
        }

        core.running = true;
        core.epoch += 1;
        info!(
            epoch = core.epoch,
            turn = ?self.shared.timing.turn(),
            yellow = ?self.shared.timing.yellow(),
            state = %core.intersection.state(),
            "intersection controller started"
        );
        Shared::arm_cycle(&self.shared, &mut core);
        Ok(())
    }

    /// Cancel pending transitions and stop.
    ///
    /// Safe to call when already stopped. Once this returns no further state
    /// change or callback happens until the next `start`.
    pub fn stop(&self) {
        let guard = self.shared.core.lock();
        let mut core = guard.borrow_mut();
        if !core.running {
            return;
        }

        core.running = false;
        core.epoch += 1;
        for handle in std::mem::take(&mut core.pending) {
            self.shared.clock.cancel(handle);
        }
        info!(
            epoch = core.epoch,
            at = ?self.shared.clock.now(),
            state = %core.intersection.state(),
            "intersection controller stopped"
        );
    }

    /// Current snapshot.
    pub fn state(&self) -> IntersectionState {
        self.shared.core.lock().borrow().intersection.state()
    }

    pub fn is_running(&self) -> bool {
        self.shared.core.lock().borrow().running
    }

    pub fn timing(&self) -> Timing {
        self.shared.timing
    }

    pub fn clock(&self) -> &C {
        &self.shared.clock
    }
}

impl<C: Clock> Shared<C> {
    fn arm_cycle(shared: &Arc<Self>, core: &mut Core) {
        let epoch = core.epoch;
        let timing = shared.timing;
        let caution = Self::schedule(shared, Phase::Caution, timing.caution_after(), epoch);
        let turn = Self::schedule(shared, Phase::Turn, timing.turn(), epoch);
        core.pending = vec![caution, turn];
        trace!(epoch, %caution, %turn, "armed cycle");
    }

    fn schedule(shared: &Arc<Self>, phase: Phase, delay: Duration, epoch: u64) -> TimerHandle {
        let controller = Arc::downgrade(shared);
        shared.clock.schedule_after(
            delay,
            Box::new(move || {
                if let Some(shared) = controller.upgrade() {
                    Self::fire(&shared, phase, epoch);
                }
            }),
        )
    }

    fn fire(shared: &Arc<Self>, phase: Phase, epoch: u64) {
        let guard = shared.core.lock();

        let change = {
            let mut core = guard.borrow_mut();
            if !core.running || core.epoch != epoch {
                trace!(?phase, epoch, current = core.epoch, "ignoring stale timer");
                return;
            }

            let current = core.intersection.state();
            let next = next_state(&current);
            if next == current {
                trace!(?phase, state = %current, "transition left lights unchanged");
                None
            } else {
                core.intersection.set_state(next);
                debug!(?phase, at = ?shared.clock.now(), state = %next, "lights changed");
                Some((next, core.on_change.take()))
            }
        };

        // The callback runs without a borrow so it may re-enter the controller.
        if let Some((state, Some(on_change))) = change {
            let mut slot = CallbackSlot {
                core: &guard,
                on_change: Some(on_change),
            };
            if let Some(on_change) = slot.on_change.as_mut() {
                on_change(&state);
            }
        }

        if phase == Phase::Turn {
            let mut core = guard.borrow_mut();
            if core.running && core.epoch == epoch {
                Self::arm_cycle(shared, &mut core);
            }
        }
    }
}

/// Puts a taken callback back into the core, also when the callback panics.
struct CallbackSlot<'a> {
    core: &'a RefCell<Core>,
    on_change: Option<ChangeCallback>,
}

impl Drop for CallbackSlot<'_> {
    fn drop(&mut self) {
        let Some(on_change) = self.on_change.take() else {
            return;
        };
        if let Ok(mut core) = self.core.try_borrow_mut() {
            if core.on_change.is_none() {
                core.on_change = Some(on_change);
            }
        }
    }
}

impl<C: Clock> Drop for IntersectionController<C> {
    fn drop(&mut self) {
        self.stop();
    }
}

impl<C: Clock> fmt::Debug for IntersectionController<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let guard = self.shared.core.lock();
        let core = guard.borrow();
        f.debug_struct("IntersectionController")
            .field("state", &core.intersection.state())
            .field("running", &core.running)
            .field("epoch", &core.epoch)
            .field("timing", &self.shared.timing)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::core::LightColor::{Green, Red, Yellow};
    use std::panic::{self, AssertUnwindSafe};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    const TURN: Duration = Duration::from_secs(300);
    const YELLOW: Duration = Duration::from_secs(30);

    fn controller(
        clock: &ManualClock,
        on_change: Option<ChangeCallback>,
    ) -> IntersectionController<ManualClock> {
        IntersectionController::new(
            clock.clone(),
            Timing::new(TURN, YELLOW).unwrap(),
            IntersectionState::default(),
            on_change,
        )
    }

    #[test]
    fn new_controller_is_stopped_with_initial_state() {
        let clock = ManualClock::new();
        let controller = controller(&clock, None);
        assert!(!controller.is_running());
        assert_eq!(controller.state(), IntersectionState::default());
        assert_eq!(clock.pending(), 0);
    }

    #[test]
    fn start_arms_two_timers() {
        let clock = ManualClock::new();
        let controller = controller(&clock, None);
        controller.start().unwrap();
        assert!(controller.is_running());
        assert_eq!(clock.pending(), 2);
    }

    #[test]
    fn second_start_is_rejected() {
        let clock = ManualClock::new();
        let controller = controller(&clock, None);
        controller.start().unwrap();
        assert_eq!(controller.start(), Err(ControllerError::AlreadyRunning));
        assert_eq!(clock.pending(), 2);
    }

    #[test]
    fn stop_cancels_pending_timers() {
        let clock = ManualClock::new();
        let controller = controller(&clock, None);
        controller.start().unwrap();
        controller.stop();
        assert!(!controller.is_running());
        assert_eq!(clock.pending(), 0);

        controller.stop();
        assert!(!controller.is_running());
    }

    #[test]
    fn missing_callback_still_advances_state() {
        let clock = ManualClock::new();
        let controller = controller(&clock, None);
        controller.start().unwrap();

        clock.advance(TURN - YELLOW);
        assert_eq!(
            controller.state(),
            IntersectionState::new(Yellow, Red, Yellow, Red)
        );

        clock.advance(YELLOW);
        assert_eq!(
            controller.state(),
            IntersectionState::new(Red, Green, Red, Green)
        );
    }

    #[test]
    fn turn_timer_rearms_next_cycle() {
        let clock = ManualClock::new();
        let controller = controller(&clock, None);
        controller.start().unwrap();

        clock.advance(TURN);
        assert_eq!(clock.pending(), 2);
        assert!(controller.is_running());
    }

    #[test]
    fn stale_epoch_timer_is_ignored() {
        let clock = ManualClock::new();
        let controller = controller(&clock, None);
        controller.start().unwrap();

        // A timer armed before start carries epoch 0.
        Shared::fire(&controller.shared, Phase::Turn, 0);
        assert_eq!(controller.state(), IntersectionState::default());
        assert_eq!(clock.pending(), 2);
    }

    #[test]
    fn callback_can_stop_the_controller() {
        let clock = ManualClock::new();
        let calls = Arc::new(Mutex::new(0));
        let slot: Arc<Mutex<Option<Arc<IntersectionController<ManualClock>>>>> =
            Arc::new(Mutex::new(None));

        let counter = Arc::clone(&calls);
        let handle = Arc::clone(&slot);
        let controller = Arc::new(controller(
            &clock,
            Some(Box::new(move |_state: &IntersectionState| {
                *counter.lock().unwrap() += 1;
                if let Some(controller) = handle.lock().unwrap().as_ref() {
                    controller.stop();
                }
            })),
        ));
        *slot.lock().unwrap() = Some(Arc::clone(&controller));

        controller.start().unwrap();
        clock.advance(TURN * 4);

        assert_eq!(*calls.lock().unwrap(), 1);
        assert!(!controller.is_running());
        assert_eq!(clock.pending(), 0);

        slot.lock().unwrap().take();
    }

    #[test]
    fn panicking_callback_keeps_receiving_changes() {
        let clock = ManualClock::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let controller = controller(
            &clock,
            Some(Box::new(move |_state: &IntersectionState| {
                if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                    panic!("first notification fails");
                }
            })),
        );
        controller.start().unwrap();

        let failed = panic::catch_unwind(AssertUnwindSafe(|| clock.advance(TURN - YELLOW)));
        assert!(failed.is_err());
        assert_eq!(
            controller.state(),
            IntersectionState::new(Yellow, Red, Yellow, Red)
        );

        clock.advance(YELLOW);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(
            controller.state(),
            IntersectionState::new(Red, Green, Red, Green)
        );
        assert!(controller.is_running());
    }

    #[test]
    fn debug_output_names_the_controller() {
        let clock = ManualClock::new();
        let controller = controller(&clock, None);
        let rendered = format!("{controller:?}");
        assert!(rendered.contains("IntersectionController"));
        assert!(rendered.contains("running: false"));
    }
}
