//! Validated cycle timing.

use crate::builder::BuildError;
use std::time::Duration;

/// Durations driving one controller cycle.
///
/// Each cycle lasts `turn`. The first transition happens `turn - yellow` into
/// the cycle, the second at its end. A turn no longer than the yellow phase
/// would leave no green time and is rejected.
///
/// ```
/// use crossing::Timing;
/// use std::time::Duration;
///
/// let timing = Timing::new(Duration::from_secs(300), Duration::from_secs(30)).unwrap();
/// assert_eq!(timing.caution_after(), Duration::from_secs(270));
///
/// assert!(Timing::new(Duration::from_secs(30), Duration::from_secs(30)).is_err());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Timing {
    turn: Duration,
    yellow: Duration,
}

impl Timing {
    pub fn new(turn: Duration, yellow: Duration) -> Result<Self, BuildError> {
        if turn <= yellow {
            return Err(BuildError::InvalidConfiguration { turn, yellow });
        }
        Ok(Self { turn, yellow })
    }

    /// Full cycle length.
    pub fn turn(&self) -> Duration {
        self.turn
    }

    /// How long yellow is shown before red.
    pub fn yellow(&self) -> Duration {
        self.yellow
    }

    /// Delay from cycle start to the green-to-yellow transition.
    pub fn caution_after(&self) -> Duration {
        self.turn - self.yellow
    }
}
