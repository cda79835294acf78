//! Error handling for Rosetta
//!
//! Provides the error types for both layers of the panel:
//! - Panel errors (parameter validation in the model)
//! - Controller errors (MDI mode changes and command dispatch)
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Panel error type
///
/// Represents input the parameter model refuses. These are recoverable:
/// the model is left unchanged and the user can enter another value.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PanelError {
    /// The index distance does not resolve to a finite angle
    #[error("Index distance {value} for {target} does not resolve to an angle in {mode} mode")]
    InvalidIndexDistance {
        /// The panel member being indexed.
        target: String,
        /// The rejected distance.
        value: f64,
        /// The index mode in effect.
        mode: String,
    },

    /// A value that cannot appear in a command (NaN or infinite)
    #[error("{field} {value} for {target} is not a finite number")]
    InvalidValue {
        /// The panel member the value belongs to.
        target: String,
        /// The field being set, e.g. `feed rate`.
        field: String,
        /// The rejected value.
        value: f64,
    },
}

/// Controller error type
///
/// Represents failures while bringing the controller into MDI mode or
/// while waiting for a dispatched command to complete.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ControllerError {
    /// A blocking wait on the controller ran out of time
    #[error("Controller did not confirm {operation} within {timeout_ms}ms")]
    Timeout {
        /// What was being waited for.
        operation: String,
        /// The timeout duration in milliseconds.
        timeout_ms: u64,
    },

    /// The controller refused to switch task mode
    #[error("Mode change to {requested} rejected, controller is in {current}")]
    ModeChangeRejected {
        /// The requested mode name.
        requested: String,
        /// The mode the controller reported afterwards.
        current: String,
    },

    /// The controller reported an error while executing a command
    #[error("Command '{command}' rejected: {reason}")]
    CommandRejected {
        /// The command that failed.
        command: String,
        /// The reason reported by the controller.
        reason: String,
    },

    /// The command or status channel failed.
    ///
    /// Channel implementations return this when the controller link itself
    /// is gone, as opposed to the controller refusing a request.
    #[error("Channel error: {message}")]
    Channel {
        /// The error message.
        message: String,
    },
}

/// Main error type for Rosetta
///
/// A unified error type that can represent any error from all layers.
/// This is the primary error type used in public APIs.
#[derive(Error, Debug)]
pub enum Error {
    /// Panel error
    #[error(transparent)]
    Panel(#[from] PanelError),

    /// Controller error
    #[error(transparent)]
    Controller(#[from] ControllerError),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this is a timeout error
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Controller(ControllerError::Timeout { .. }))
    }

    /// Check if this is a validation error the user can correct
    pub fn is_panel_error(&self) -> bool {
        matches!(self, Error::Panel(_))
    }

    /// Check if the controller link itself failed
    pub fn is_channel_error(&self) -> bool {
        matches!(self, Error::Controller(ControllerError::Channel { .. }))
    }

    /// Check if this is a controller error
    pub fn is_controller_error(&self) -> bool {
        matches!(self, Error::Controller(_))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;
