//! Fast-forwarded simulation runs.
//!
//! A simulation drives a controller on a [`ManualClock`] for a fixed span of
//! virtual time and collects every change it reports, so a half-hour run
//! completes synchronously.

use crate::builder::BuildError;
use crate::clock::{Clock, ManualClock};
use crate::controller::{IntersectionController, Timing};
use crate::core::{ChangeHistory, IntersectionState, LightColor, StateChange};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Parameters of a simulation run.
///
/// Durations are whole milliseconds so the config reads naturally as JSON.
/// The defaults run for 30 minutes with a 5 minute turn and a 30 second
/// yellow phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub duration_ms: u64,
    pub turn_ms: u64,
    pub yellow_ms: u64,
    pub initial: IntersectionState,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            duration_ms: 30 * 60 * 1000,
            turn_ms: 5 * 60 * 1000,
            yellow_ms: 30 * 1000,
            initial: IntersectionState::default(),
        }
    }
}

impl SimulationConfig {
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }

    pub fn turn(&self) -> Duration {
        Duration::from_millis(self.turn_ms)
    }

    pub fn yellow(&self) -> Duration {
        Duration::from_millis(self.yellow_ms)
    }

    /// Validated cycle timing.
    pub fn timing(&self) -> Result<Timing, BuildError> {
        Timing::new(self.turn(), self.yellow())
    }
}

/// Outcome of a simulation run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationReport {
    pub initial: IntersectionState,
    pub history: ChangeHistory,
    pub elapsed: Duration,
}

/// One line of the results table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReportRow {
    pub index: usize,
    pub at: Duration,
    pub state: IntersectionState,
}

impl ReportRow {
    pub fn colors(&self) -> impl Iterator<Item = LightColor> + '_ {
        self.state.iter().map(|(_, color)| color)
    }
}

impl SimulationReport {
    /// Rows for display: the initial state at time zero, then every change.
    pub fn rows(&self) -> Vec<ReportRow> {
        std::iter::once((Duration::ZERO, self.initial))
            .chain(self.history.changes().iter().map(|change| (change.at, change.to)))
            .enumerate()
            .map(|(index, (at, state))| ReportRow { index, at, state })
            .collect()
    }

    /// The final state reached.
    pub fn final_state(&self) -> IntersectionState {
        self.history
            .last()
            .map_or(self.initial, |change| change.to)
    }
}

/// Run a controller for `config.duration()` of virtual time.
///
/// ```
/// use crossing::simulation::{self, SimulationConfig};
///
/// let report = simulation::run(&SimulationConfig::default()).unwrap();
/// assert_eq!(report.history.len(), 12);
/// assert_eq!(report.final_state(), report.initial);
/// ```
pub fn run(config: &SimulationConfig) -> Result<SimulationReport, BuildError> {
    let clock = ManualClock::new();
    let history = Arc::new(Mutex::new(ChangeHistory::new()));

    let recorder = Arc::clone(&history);
    let timestamps = clock.clone();
    let mut previous = config.initial;
    let controller = IntersectionController::builder()
        .clock(clock.clone())
        .timing(config.timing()?)
        .initial(config.initial)
        .on_change(move |state| {
            let mut history = recorder.lock();
            let change = StateChange {
                sequence: history.len() + 1,
                at: timestamps.now(),
                from: previous,
                to: *state,
            };
            *history = history.record(change);
            previous = *state;
        })
        .build()?;

    info!(
        duration = ?config.duration(),
        turn = ?config.turn(),
        yellow = ?config.yellow(),
        "starting simulation"
    );
    match controller.start() {
        Ok(()) => {
            clock.advance(config.duration());
        }
        Err(err) => warn!(%err, "simulation controller did not start"),
    }
    controller.stop();

    let history = history.lock().clone();
    info!(changes = history.len(), "simulation finished");

    Ok(SimulationReport {
        initial: config.initial,
        history,
        elapsed: clock.now(),
    })
}
