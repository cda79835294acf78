//! # Rosetta Communication
//!
//! Controller-facing plumbing for the Rosetta panel.
//!
//! The panel never talks to the motion controller directly. It goes through
//! two narrow channels: a command channel (mode requests, MDI commands,
//! completion waits) and a status channel (polled task mode). The
//! [`MdiDispatcher`] drives both to guarantee the controller is in MDI mode
//! before every batch of commands, with every wait bounded by a timeout.

pub mod channel;
pub mod dispatcher;
pub mod simulated;

pub use channel::{CommandChannel, Completion, StatusChannel, TaskMode};
pub use dispatcher::{DispatchConfig, DispatchState, MdiDispatcher};
pub use simulated::{
    SimulatedBehavior, SimulatedCommandChannel, SimulatedController, SimulatedStatusChannel,
};
