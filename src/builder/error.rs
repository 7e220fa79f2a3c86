//! Build errors for controller construction.

use crate::core::IntersectionState;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when building an intersection controller.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BuildError {
    #[error("Clock not specified. Call .clock(clock) before .build()")]
    MissingClock,

    #[error("Duration `{field}` not specified")]
    MissingDuration { field: &'static str },

    #[error(
        "Invalid configuration: turn duration ({turn:?}) must exceed yellow duration ({yellow:?})"
    )]
    InvalidConfiguration { turn: Duration, yellow: Duration },

    #[error("Initial state {state} does not pair opposite directions")]
    UnpairedInitialState { state: IntersectionState },
}
