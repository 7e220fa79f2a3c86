//! The light transition rule.
//!
//! One rule, applied to all four directions from a single snapshot:
//!
//! - Green becomes Yellow
//! - Yellow becomes Red
//! - Red becomes Green only while the clockwise neighbour shows Yellow
//!
//! Applied on the two timer events of each cycle, it drives the intersection
//! through `(G,R,G,R) -> (Y,R,Y,R) -> (R,G,R,G) -> (R,Y,R,Y) -> (G,R,G,R)`.
//! The gate relies on both pairs sharing the same fixed phase offset.

use super::light::LightColor;
use super::state::IntersectionState;

/// Next colour for a light given the colour of its clockwise neighbour.
pub fn next_color(color: LightColor, adjacent: LightColor) -> LightColor {
    match (color, adjacent) {
        (LightColor::Green, _) => LightColor::Yellow,
        (LightColor::Yellow, _) => LightColor::Red,
        (LightColor::Red, LightColor::Yellow) => LightColor::Green,
        (color, _) => color,
    }
}

/// Next snapshot of the whole intersection (pure).
///
/// Every direction reads the pre-transition snapshot, never a colour already
/// updated in the same step.
///
/// ```
/// use crossing::core::next_state;
/// use crossing::{IntersectionState, LightColor::*};
///
/// let caution = next_state(&IntersectionState::default());
/// assert_eq!(caution, IntersectionState::new(Yellow, Red, Yellow, Red));
///
/// let turned = next_state(&caution);
/// assert_eq!(turned, IntersectionState::new(Red, Green, Red, Green));
/// ```
pub fn next_state(state: &IntersectionState) -> IntersectionState {
    IntersectionState::from_fn(|direction| {
        next_color(state.color(direction), state.color(direction.adjacent()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::light::Direction;
    use LightColor::{Green, Red, Yellow};

    #[test]
    fn green_always_turns_yellow() {
        for &adjacent in LightColor::ALL {
            assert_eq!(next_color(Green, adjacent), Yellow);
        }
    }

    #[test]
    fn yellow_always_turns_red() {
        for &adjacent in LightColor::ALL {
            assert_eq!(next_color(Yellow, adjacent), Red);
        }
    }

    #[test]
    fn red_turns_green_only_beside_yellow() {
        assert_eq!(next_color(Red, Yellow), Green);
        assert_eq!(next_color(Red, Green), Red);
        assert_eq!(next_color(Red, Red), Red);
    }

    #[test]
    fn default_state_cycles_with_period_four() {
        let start = IntersectionState::default();
        let expected = [
            IntersectionState::new(Yellow, Red, Yellow, Red),
            IntersectionState::new(Red, Green, Red, Green),
            IntersectionState::new(Red, Yellow, Red, Yellow),
            IntersectionState::new(Green, Red, Green, Red),
        ];

        let mut state = start;
        for want in expected {
            state = next_state(&state);
            assert_eq!(state, want);
        }
        assert_eq!(state, start);
    }

    #[test]
    fn all_red_is_a_fixed_point() {
        let all_red = IntersectionState::new(Red, Red, Red, Red);
        assert_eq!(next_state(&all_red), all_red);
    }

    #[test]
    fn transition_reads_pre_transition_snapshot() {
        // South sees West's Yellow even though West turns Red in the same step.
        let state = IntersectionState::new(Red, Red, Red, Yellow);
        let next = next_state(&state);
        assert_eq!(next.color(Direction::North), Red);
        assert_eq!(next.color(Direction::South), Green);
        assert_eq!(next.color(Direction::West), Red);
    }

    #[test]
    fn next_state_is_deterministic() {
        let state = IntersectionState::new(Yellow, Red, Yellow, Red);
        assert_eq!(next_state(&state), next_state(&state));
    }
}
