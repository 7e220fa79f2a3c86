//! Builder for constructing intersection controllers.

use crate::builder::error::BuildError;
use crate::clock::Clock;
use crate::controller::{ChangeCallback, IntersectionController, Timing};
use crate::core::IntersectionState;
use std::time::Duration;

/// Builder for constructing controllers with a fluent API.
///
/// The clock and both durations are required. The initial state defaults to
/// North/South green, East/West red. Without a change callback, changes are
/// applied silently.
pub struct ControllerBuilder<C: Clock> {
    clock: Option<C>,
    initial: IntersectionState,
    turn_duration: Option<Duration>,
    yellow_duration: Option<Duration>,
    on_change: Option<ChangeCallback>,
}

impl<C: Clock> ControllerBuilder<C> {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            clock: None,
            initial: IntersectionState::default(),
            turn_duration: None,
            yellow_duration: None,
            on_change: None,
        }
    }

    /// Set the clock that schedules transitions (required).
    pub fn clock(mut self, clock: C) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Set the starting snapshot.
    pub fn initial(mut self, state: IntersectionState) -> Self {
        self.initial = state;
        self
    }

    /// Set the full cycle length (required).
    pub fn turn_duration(mut self, duration: Duration) -> Self {
        self.turn_duration = Some(duration);
        self
    }

    /// Set how long yellow shows before red (required).
    pub fn yellow_duration(mut self, duration: Duration) -> Self {
        self.yellow_duration = Some(duration);
        self
    }

    /// Set both durations from an already validated timing.
    pub fn timing(self, timing: Timing) -> Self {
        self.turn_duration(timing.turn())
            .yellow_duration(timing.yellow())
    }

    /// Register the callback receiving every new state.
    pub fn on_change<F>(mut self, callback: F) -> Self
    where
        F: FnMut(&IntersectionState) + Send + 'static,
    {
        self.on_change = Some(Box::new(callback));
        self
    }

    /// Build the controller, stopped.
    /// Returns an error if required fields are missing or inconsistent.
    pub fn build(self) -> Result<IntersectionController<C>, BuildError> {
        let clock = self.clock.ok_or(BuildError::MissingClock)?;
        let turn = self.turn_duration.ok_or(BuildError::MissingDuration {
            field: "turn_duration",
        })?;
        let yellow = self.yellow_duration.ok_or(BuildError::MissingDuration {
            field: "yellow_duration",
        })?;
        let timing = Timing::new(turn, yellow)?;

        if !self.initial.is_paired() {
            return Err(BuildError::UnpairedInitialState {
                state: self.initial,
            });
        }

        Ok(IntersectionController::new(
            clock,
            timing,
            self.initial,
            self.on_change,
        ))
    }
}

impl<C: Clock> Default for ControllerBuilder<C> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::core::LightColor::{Green, Red};

    fn builder() -> ControllerBuilder<ManualClock> {
        ControllerBuilder::new()
            .clock(ManualClock::new())
            .turn_duration(Duration::from_secs(300))
            .yellow_duration(Duration::from_secs(30))
    }

    #[test]
    fn builder_validates_required_clock() {
        let result = ControllerBuilder::<ManualClock>::new()
            .turn_duration(Duration::from_secs(300))
            .yellow_duration(Duration::from_secs(30))
            .build();

        assert!(matches!(result, Err(BuildError::MissingClock)));
    }

    #[test]
    fn builder_validates_required_durations() {
        let result = ControllerBuilder::new()
            .clock(ManualClock::new())
            .yellow_duration(Duration::from_secs(30))
            .build();
        assert!(matches!(
            result,
            Err(BuildError::MissingDuration {
                field: "turn_duration"
            })
        ));

        let result = ControllerBuilder::new()
            .clock(ManualClock::new())
            .turn_duration(Duration::from_secs(300))
            .build();
        assert!(matches!(
            result,
            Err(BuildError::MissingDuration {
                field: "yellow_duration"
            })
        ));
    }

    #[test]
    fn builder_rejects_turn_not_exceeding_yellow() {
        let result = builder().turn_duration(Duration::from_secs(30)).build();
        assert!(matches!(
            result,
            Err(BuildError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn builder_rejects_unpaired_initial_state() {
        let unpaired = IntersectionState::new(Green, Red, Red, Red);
        let result = builder().initial(unpaired).build();
        assert!(matches!(
            result,
            Err(BuildError::UnpairedInitialState { state }) if state == unpaired
        ));
    }

    #[test]
    fn builder_defaults_initial_state() {
        let controller = builder().build().unwrap();
        assert_eq!(controller.state(), IntersectionState::default());
        assert!(!controller.is_running());
    }

    #[test]
    fn builder_accepts_explicit_state_and_timing() {
        let timing = Timing::new(Duration::from_secs(60), Duration::from_secs(5)).unwrap();
        let start = IntersectionState::new(Red, Green, Red, Green);
        let controller = ControllerBuilder::new()
            .clock(ManualClock::new())
            .timing(timing)
            .initial(start)
            .on_change(|_| {})
            .build()
            .unwrap();

        assert_eq!(controller.state(), start);
        assert_eq!(controller.timing(), timing);
    }

    #[test]
    fn build_error_messages_are_descriptive() {
        let err = builder()
            .turn_duration(Duration::from_secs(10))
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("must exceed yellow duration"));
    }
}
