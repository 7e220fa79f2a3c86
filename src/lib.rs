//! Crossing: a timer-driven four-way traffic intersection controller
//!
//! Crossing is built on the "pure core, imperative shell" philosophy. The
//! light transition rule is a pure function over complete intersection
//! snapshots, while timers, locking and change notification live in a thin
//! controller around it.
//!
//! # Core Concepts
//!
//! - **State**: `IntersectionState`, one `LightColor` per `Direction`
//! - **Transition**: Green → Yellow → Red, with Red → Green gated on the
//!   clockwise neighbour showing Yellow
//! - **Clock**: the only source of scheduled execution, either virtual
//!   (`ManualClock`) or wall-clock (`TokioClock`)
//! - **Controller**: arms two timers per cycle and reports every change
//!
//! # Example
//!
//! ```rust
//! use crossing::{IntersectionController, IntersectionState, LightColor::*, ManualClock};
//! use std::time::Duration;
//!
//! let clock = ManualClock::new();
//! let controller = IntersectionController::builder()
//!     .clock(clock.clone())
//!     .turn_duration(Duration::from_secs(300))
//!     .yellow_duration(Duration::from_secs(30))
//!     .on_change(|state| println!("lights now {state}"))
//!     .build()
//!     .unwrap();
//!
//! controller.start().unwrap();
//! clock.advance(Duration::from_secs(270));
//! assert_eq!(controller.state(), IntersectionState::new(Yellow, Red, Yellow, Red));
//! controller.stop();
//! ```

pub mod builder;
pub mod clock;
pub mod controller;
pub mod core;
pub mod simulation;

// Re-export commonly used types
pub use self::builder::{BuildError, ControllerBuilder};
pub use self::clock::{Clock, ManualClock, TimerHandle, TokioClock};
pub use self::controller::{ChangeCallback, ControllerError, IntersectionController, Timing};
pub use self::core::{
    ChangeHistory, Direction, Intersection, IntersectionState, LightColor, StateChange, StateError,
};
pub use self::simulation::{SimulationConfig, SimulationReport};
