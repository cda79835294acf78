//! # Rosetta Panel
//!
//! The rose engine control panel without the GUI.
//!
//! - [`ParameterStore`] holds every axis and spindle field and keeps the
//!   derived values (resolved index angles, secondary spindle speed) in step.
//! - [`CommandFormatter`] turns the current state into MDI command text.
//! - [`PanelHandler`] is what a host toolkit wires its widgets to: it
//!   applies value changes to the store and dispatches button commands.

pub mod commands;
pub mod handler;
pub mod hit_counter;
pub mod input;
pub mod params;

pub use commands::CommandFormatter;
pub use handler::PanelHandler;
pub use hit_counter::HitCounter;
pub use input::{SpinValue, ValueSource};
pub use params::{
    LinearAxisState, ParameterStore, PrimarySpindleState, RotaryAxisState, SecondarySpindleState,
};
