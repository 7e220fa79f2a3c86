//! Core intersection types and logic.
//!
//! This module contains the pure functional core of the controller:
//! - Light colours and directions
//! - Complete intersection snapshots and the state holder
//! - The transition rule
//! - Immutable change history
//!
//! All logic in this module is pure (no side effects, no clocks), following
//! the "pure core, imperative shell" philosophy.

mod history;
mod light;
mod state;
mod transition;

pub use history::{ChangeHistory, StateChange};
pub use light::{Direction, LightColor};
pub use state::{Intersection, IntersectionState, StateError};
pub use transition::{next_color, next_state};
