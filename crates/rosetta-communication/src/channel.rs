//! Command and status channel traits
//!
//! These mirror the small slice of the host motion-control API the panel
//! needs: switch task mode, send an MDI line, wait for completion, and poll
//! the current task mode.

use rosetta_core::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Controller task mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskMode {
    /// Jogging and manual controls
    Manual,
    /// Running a loaded program
    Auto,
    /// Manual data input, required for ad hoc commands
    Mdi,
}

impl fmt::Display for TaskMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Manual => write!(f, "MANUAL"),
            Self::Auto => write!(f, "AUTO"),
            Self::Mdi => write!(f, "MDI"),
        }
    }
}

/// Outcome of a bounded wait on the command channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    /// The last request finished
    Done,
    /// The controller reported an error for the last request
    Failed(String),
    /// The timeout elapsed before the controller answered
    TimedOut,
}

/// Channel used to change mode and issue commands
pub trait CommandChannel {
    /// Request a task mode change. Does not wait.
    fn set_mode(&mut self, mode: TaskMode) -> Result<()>;

    /// Send one MDI line. Does not wait.
    fn mdi(&mut self, command: &str) -> Result<()>;

    /// Block until the last request completes or `timeout` elapses
    fn wait_complete(&mut self, timeout: Duration) -> Result<Completion>;
}

/// Channel used to read controller status
pub trait StatusChannel {
    /// Refresh the cached status from the controller
    fn poll(&mut self) -> Result<()>;

    /// Task mode as of the last [`StatusChannel::poll`]
    fn task_mode(&self) -> TaskMode;
}
