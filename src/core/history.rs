//! Record of observed intersection state changes.
//!
//! Provides immutable tracking of state changes over clock time.

use super::state::IntersectionState;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// One observed change of the intersection state.
///
/// # Example
///
/// ```rust
/// use crossing::{IntersectionState, LightColor::*, StateChange};
/// use std::time::Duration;
///
/// let change = StateChange {
///     sequence: 1,
///     at: Duration::from_secs(270),
///     from: IntersectionState::default(),
///     to: IntersectionState::new(Yellow, Red, Yellow, Red),
/// };
/// assert_eq!(change.sequence, 1);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateChange {
    /// Position of this change in the history, starting at 1
    pub sequence: usize,
    /// Clock time at which the change was applied
    pub at: Duration,
    /// The state being left
    pub from: IntersectionState,
    /// The state entered
    pub to: IntersectionState,
}

/// Ordered history of state changes.
///
/// History is immutable - `record` returns a new history with the change
/// added.
///
/// # Example
///
/// ```rust
/// use crossing::{ChangeHistory, IntersectionState, LightColor::*, StateChange};
/// use std::time::Duration;
///
/// let start = IntersectionState::default();
/// let caution = IntersectionState::new(Yellow, Red, Yellow, Red);
///
/// let history = ChangeHistory::new().record(StateChange {
///     sequence: 1,
///     at: Duration::from_secs(270),
///     from: start,
///     to: caution,
/// });
///
/// assert_eq!(history.path(), vec![start, caution]);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeHistory {
    changes: Vec<StateChange>,
}

impl ChangeHistory {
    /// Create a new empty history.
    pub fn new() -> Self {
        Self {
            changes: Vec::new(),
        }
    }

    /// Record a change, returning a new history.
    ///
    /// The existing history is left untouched.
    pub fn record(&self, change: StateChange) -> Self {
        let mut changes = self.changes.clone();
        changes.push(change);
        Self { changes }
    }

    /// States traversed: the first `from`, then each `to` in order.
    pub fn path(&self) -> Vec<IntersectionState> {
        let mut path = Vec::with_capacity(self.changes.len() + 1);
        if let Some(first) = self.changes.first() {
            path.push(first.from);
        }
        path.extend(self.changes.iter().map(|change| change.to));
        path
    }

    /// Clock time between the first and last recorded change.
    ///
    /// Returns `None` when nothing has been recorded.
    pub fn span(&self) -> Option<Duration> {
        match (self.changes.first(), self.changes.last()) {
            (Some(first), Some(last)) => Some(last.at.saturating_sub(first.at)),
            _ => None,
        }
    }

    /// Get all changes in order.
    pub fn changes(&self) -> &[StateChange] {
        &self.changes
    }

    /// The most recent change, if any.
    pub fn last(&self) -> Option<&StateChange> {
        self.changes.last()
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }
}
