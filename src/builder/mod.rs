//! Builder API for ergonomic controller construction.
//!
//! This module provides the fluent controller builder, its validation errors,
//! and the `signal_enum!` macro used to declare the light and direction
//! enumerations.

pub mod controller;
pub mod error;
pub mod macros;

pub use controller::ControllerBuilder;
pub use error::BuildError;
