//! Intersection state snapshots and the state holder.
//!
//! An `IntersectionState` always carries exactly one colour per direction.
//! Partial mappings are rejected at the conversion boundary, so every value
//! of the type satisfies the transition rule's precondition.

use super::light::{Direction, LightColor};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use thiserror::Error;

/// Errors raised when a mapping cannot form a complete intersection state.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum StateError {
    #[error("Invalid intersection state: no colour given for {missing}")]
    InvalidState { missing: Direction },
}

/// Snapshot of all four light colours.
///
/// Snapshots are plain values. They are replaced wholesale, never edited in
/// place.
///
/// # Example
///
/// ```rust
/// use crossing::{Direction, IntersectionState, LightColor};
///
/// let state = IntersectionState::default();
/// assert_eq!(state.color(Direction::North), LightColor::Green);
/// assert_eq!(state.color(Direction::East), LightColor::Red);
/// assert!(state.is_paired());
/// assert_eq!(state.to_string(), "N=Green E=Red S=Green W=Red");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(
    into = "BTreeMap<Direction, LightColor>",
    try_from = "BTreeMap<Direction, LightColor>"
)]
pub struct IntersectionState {
    colors: [LightColor; Direction::COUNT],
}

impl IntersectionState {
    /// Build a snapshot from one colour per direction.
    pub const fn new(
        north: LightColor,
        east: LightColor,
        south: LightColor,
        west: LightColor,
    ) -> Self {
        Self {
            colors: [north, east, south, west],
        }
    }

    /// Build a snapshot by asking `f` for the colour of each direction.
    pub fn from_fn<F>(mut f: F) -> Self
    where
        F: FnMut(Direction) -> LightColor,
    {
        Self {
            colors: std::array::from_fn(|index| f(Direction::ALL[index])),
        }
    }

    /// Colour currently shown in `direction`.
    pub const fn color(&self, direction: Direction) -> LightColor {
        self.colors[direction.ordinal()]
    }

    /// Iterate over `(direction, colour)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (Direction, LightColor)> + '_ {
        Direction::ALL
            .iter()
            .map(move |&direction| (direction, self.color(direction)))
    }

    /// Whether opposite directions show the same colour.
    pub fn is_paired(&self) -> bool {
        Direction::ALL
            .iter()
            .all(|&direction| self.color(direction) == self.color(direction.opposite()))
    }
}

impl Default for IntersectionState {
    fn default() -> Self {
        Self::new(
            LightColor::Green,
            LightColor::Red,
            LightColor::Green,
            LightColor::Red,
        )
    }
}

impl fmt::Display for IntersectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (direction, color) in self.iter() {
            if !first {
                f.write_str(" ")?;
            }
            first = false;
            write!(f, "{}={}", &direction.name()[..1], color)?;
        }
        Ok(())
    }
}

fn complete<F>(mut lookup: F) -> Result<IntersectionState, StateError>
where
    F: FnMut(Direction) -> Option<LightColor>,
{
    let mut colors = [LightColor::Red; Direction::COUNT];
    for &direction in Direction::ALL {
        colors[direction.ordinal()] =
            lookup(direction).ok_or(StateError::InvalidState { missing: direction })?;
    }
    Ok(IntersectionState { colors })
}

impl TryFrom<BTreeMap<Direction, LightColor>> for IntersectionState {
    type Error = StateError;

    fn try_from(map: BTreeMap<Direction, LightColor>) -> Result<Self, Self::Error> {
        complete(|direction| map.get(&direction).copied())
    }
}

impl TryFrom<HashMap<Direction, LightColor>> for IntersectionState {
    type Error = StateError;

    fn try_from(map: HashMap<Direction, LightColor>) -> Result<Self, Self::Error> {
        complete(|direction| map.get(&direction).copied())
    }
}

impl From<IntersectionState> for BTreeMap<Direction, LightColor> {
    fn from(state: IntersectionState) -> Self {
        state.iter().collect()
    }
}

/// Holder of the current intersection snapshot.
///
/// Performs no validation; whoever calls `set_state` owns the pairing
/// invariant.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Intersection {
    state: IntersectionState,
}

impl Intersection {
    pub fn new(state: IntersectionState) -> Self {
        Self { state }
    }

    /// Current snapshot (pure).
    pub fn state(&self) -> IntersectionState {
        self.state
    }

    /// Replace the snapshot wholesale.
    pub fn set_state(&mut self, state: IntersectionState) {
        self.state = state;
    }
}
