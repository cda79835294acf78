//! MDI dispatcher
//!
//! Every command batch runs through the same sequence:
//!
//! ```text
//! Unknown --poll--> Polling --mode == MDI--> Ready
//! Polling --mode != MDI--> ModeMismatch --set_mode--> ModeChanging --confirmed--> Ready
//! Ready --mdi(cmd)--> Sent --completed--> Completed
//! ```
//!
//! The MDI check runs once per batch; each command in the batch is then
//! sent and waited on in order. Every wait is bounded by the configured
//! timeouts, and a failed wait leaves the state where it stopped.

use crate::channel::{CommandChannel, Completion, StatusChannel, TaskMode};
use rosetta_core::{ControllerError, Result};
use std::fmt;
use std::time::Duration;

/// Timeouts applied to blocking controller waits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchConfig {
    /// Maximum wait for a task mode change to be confirmed
    pub mode_timeout: Duration,
    /// Maximum wait for one command to complete
    pub command_timeout: Duration,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            mode_timeout: Duration::from_secs(5),
            command_timeout: Duration::from_secs(120),
        }
    }
}

/// Position of the dispatcher in the per-dispatch state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchState {
    Unknown,
    Polling,
    ModeMismatch,
    ModeChanging,
    Ready,
    Sent,
    Completed,
}

impl fmt::Display for DispatchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Unknown => "Unknown",
            Self::Polling => "Polling",
            Self::ModeMismatch => "ModeMismatch",
            Self::ModeChanging => "ModeChanging",
            Self::Ready => "Ready",
            Self::Sent => "Sent",
            Self::Completed => "Completed",
        };
        write!(f, "{}", name)
    }
}

/// Sends MDI commands once the controller is confirmed to be in MDI mode.
///
/// Dispatch takes `&mut self`, so only one command sequence can be in
/// flight at a time.
pub struct MdiDispatcher {
    command: Box<dyn CommandChannel>,
    status: Box<dyn StatusChannel>,
    config: DispatchConfig,
    state: DispatchState,
}

impl MdiDispatcher {
    /// Create a dispatcher over the given channels
    pub fn new(
        command: Box<dyn CommandChannel>,
        status: Box<dyn StatusChannel>,
        config: DispatchConfig,
    ) -> Self {
        Self {
            command,
            status,
            config,
            state: DispatchState::Unknown,
        }
    }

    /// Current state machine position
    pub fn state(&self) -> DispatchState {
        self.state
    }

    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    /// Bring the controller into MDI mode if it is not already there.
    ///
    /// Requests no mode change when the polled mode is already MDI.
    pub fn ensure_mdi(&mut self) -> Result<()> {
        self.state = DispatchState::Polling;
        self.status.poll()?;

        let current = self.status.task_mode();
        if current == TaskMode::Mdi {
            self.state = DispatchState::Ready;
            return Ok(());
        }

        self.state = DispatchState::ModeMismatch;
        tracing::debug!("Controller in {} mode, requesting MDI", current);
        self.command.set_mode(TaskMode::Mdi)?;
        self.state = DispatchState::ModeChanging;

        match self.command.wait_complete(self.config.mode_timeout)? {
            Completion::Done => {}
            Completion::Failed(reason) => {
                tracing::warn!("MDI mode change failed: {}", reason);
                return Err(ControllerError::ModeChangeRejected {
                    requested: TaskMode::Mdi.to_string(),
                    current: current.to_string(),
                }
                .into());
            }
            Completion::TimedOut => {
                tracing::error!(
                    "MDI mode change not confirmed within {:?}",
                    self.config.mode_timeout
                );
                return Err(ControllerError::Timeout {
                    operation: "mode change to MDI".to_string(),
                    timeout_ms: duration_ms(self.config.mode_timeout),
                }
                .into());
            }
        }

        self.status.poll()?;
        let confirmed = self.status.task_mode();
        if confirmed != TaskMode::Mdi {
            return Err(ControllerError::ModeChangeRejected {
                requested: TaskMode::Mdi.to_string(),
                current: confirmed.to_string(),
            }
            .into());
        }

        self.state = DispatchState::Ready;
        Ok(())
    }

    /// Dispatch a single command
    pub fn dispatch(&mut self, command: &str) -> Result<()> {
        self.dispatch_batch(&[command])
    }

    /// Dispatch commands in order after one MDI check.
    ///
    /// Stops at the first command that fails or times out; later commands
    /// are not sent. An empty batch does not touch the controller.
    pub fn dispatch_batch<S: AsRef<str>>(&mut self, commands: &[S]) -> Result<()> {
        if commands.is_empty() {
            return Ok(());
        }

        self.ensure_mdi()?;

        for command in commands {
            let command = command.as_ref();
            tracing::info!("MDI: {}", command);

            self.command.mdi(command)?;
            self.state = DispatchState::Sent;

            match self.command.wait_complete(self.config.command_timeout)? {
                Completion::Done => {
                    self.state = DispatchState::Completed;
                }
                Completion::Failed(reason) => {
                    tracing::error!("Command '{}' failed: {}", command, reason);
                    return Err(ControllerError::CommandRejected {
                        command: command.to_string(),
                        reason,
                    }
                    .into());
                }
                Completion::TimedOut => {
                    tracing::error!(
                        "Command '{}' not completed within {:?}",
                        command,
                        self.config.command_timeout
                    );
                    return Err(ControllerError::Timeout {
                        operation: format!("completion of '{}'", command),
                        timeout_ms: duration_ms(self.config.command_timeout),
                    }
                    .into());
                }
            }
        }

        Ok(())
    }
}

fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
