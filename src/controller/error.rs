//! Controller runtime errors.

use thiserror::Error;

/// Errors returned by controller lifecycle operations.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum ControllerError {
    #[error("Controller is already running. Call .stop() before starting again")]
    AlreadyRunning,
}
