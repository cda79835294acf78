//! Simulated controller
//!
//! An in-memory stand-in for the motion controller. It hands out a command
//! channel and a status channel that share one state, records every mode
//! request and MDI line, and can be scripted to stall or reject requests,
//! or to lose the link altogether.
//! Waits never sleep: a stalled request reports [`Completion::TimedOut`]
//! straight away.

use crate::channel::{CommandChannel, Completion, StatusChannel, TaskMode};
use parking_lot::Mutex;
use rosetta_core::{ControllerError, Result};
use std::sync::Arc;
use std::time::Duration;

/// Scripted responses of the simulated controller
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SimulatedBehavior {
    /// Mode changes never complete
    pub stall_mode_change: bool,
    /// Mode changes complete but the mode stays as it was
    pub ignore_mode_change: bool,
    /// Commands never complete
    pub stall_commands: bool,
    /// Commands complete with this error
    pub reject_commands: Option<String>,
    /// Every channel call fails as if the link were down
    pub disconnected: bool,
}

#[derive(Debug)]
enum Pending {
    Idle,
    Mode(TaskMode),
    Command,
}

#[derive(Debug)]
struct SimState {
    mode: TaskMode,
    pending: Pending,
    behavior: SimulatedBehavior,
    sent: Vec<String>,
    mode_requests: Vec<TaskMode>,
    polls: usize,
}

impl SimState {
    fn check_link(&self) -> Result<()> {
        if self.behavior.disconnected {
            return Err(ControllerError::Channel {
                message: "simulated controller link is down".to_string(),
            }
            .into());
        }
        Ok(())
    }
}

/// Handle on the shared simulated controller state
#[derive(Debug, Clone)]
pub struct SimulatedController {
    state: Arc<Mutex<SimState>>,
}

impl SimulatedController {
    /// Create a controller starting in `mode`
    pub fn new(mode: TaskMode) -> Self {
        Self {
            state: Arc::new(Mutex::new(SimState {
                mode,
                pending: Pending::Idle,
                behavior: SimulatedBehavior::default(),
                sent: Vec::new(),
                mode_requests: Vec::new(),
                polls: 0,
            })),
        }
    }

    pub fn with_behavior(self, behavior: SimulatedBehavior) -> Self {
        self.set_behavior(behavior);
        self
    }

    pub fn set_behavior(&self, behavior: SimulatedBehavior) {
        self.state.lock().behavior = behavior;
    }

    /// Command and status channels bound to this controller
    pub fn channels(&self) -> (SimulatedCommandChannel, SimulatedStatusChannel) {
        let mode = self.state.lock().mode;
        (
            SimulatedCommandChannel {
                state: Arc::clone(&self.state),
            },
            SimulatedStatusChannel {
                state: Arc::clone(&self.state),
                cached_mode: mode,
            },
        )
    }

    /// Every MDI line received, in order
    pub fn sent_commands(&self) -> Vec<String> {
        self.state.lock().sent.clone()
    }

    /// Every mode change requested, in order
    pub fn mode_requests(&self) -> Vec<TaskMode> {
        self.state.lock().mode_requests.clone()
    }

    pub fn poll_count(&self) -> usize {
        self.state.lock().polls
    }

    /// Actual controller mode, regardless of what a status channel cached
    pub fn task_mode(&self) -> TaskMode {
        self.state.lock().mode
    }

    /// Change the mode behind the panel's back, as an operator would
    pub fn set_task_mode(&self, mode: TaskMode) {
        self.state.lock().mode = mode;
    }

    pub fn clear_history(&self) {
        let mut state = self.state.lock();
        state.sent.clear();
        state.mode_requests.clear();
        state.polls = 0;
    }
}

/// Command channel half of a [`SimulatedController`]
#[derive(Debug)]
pub struct SimulatedCommandChannel {
    state: Arc<Mutex<SimState>>,
}

impl CommandChannel for SimulatedCommandChannel {
    fn set_mode(&mut self, mode: TaskMode) -> Result<()> {
        let mut state = self.state.lock();
        state.check_link()?;
        state.mode_requests.push(mode);
        state.pending = Pending::Mode(mode);
        Ok(())
    }

    fn mdi(&mut self, command: &str) -> Result<()> {
        let mut state = self.state.lock();
        state.check_link()?;
        state.sent.push(command.to_string());
        state.pending = Pending::Command;
        Ok(())
    }

    fn wait_complete(&mut self, _timeout: Duration) -> Result<Completion> {
        let mut state = self.state.lock();
        state.check_link()?;
        let pending = std::mem::replace(&mut state.pending, Pending::Idle);

        let completion = match pending {
            Pending::Idle => Completion::Done,
            Pending::Mode(mode) => {
                if state.behavior.stall_mode_change {
                    Completion::TimedOut
                } else {
                    if !state.behavior.ignore_mode_change {
                        state.mode = mode;
                    }
                    Completion::Done
                }
            }
            Pending::Command => {
                if state.behavior.stall_commands {
                    Completion::TimedOut
                } else if let Some(reason) = state.behavior.reject_commands.clone() {
                    Completion::Failed(reason)
                } else {
                    Completion::Done
                }
            }
        };
        Ok(completion)
    }
}

/// Status channel half of a [`SimulatedController`]
#[derive(Debug)]
pub struct SimulatedStatusChannel {
    state: Arc<Mutex<SimState>>,
    cached_mode: TaskMode,
}

impl StatusChannel for SimulatedStatusChannel {
    fn poll(&mut self) -> Result<()> {
        let mut state = self.state.lock();
        state.check_link()?;
        state.polls += 1;
        self.cached_mode = state.mode;
        Ok(())
    }

    fn task_mode(&self) -> TaskMode {
        self.cached_mode
    }
}
