//! # Rosetta Core
//!
//! Core types and utilities shared by the Rosetta panel crates.
//! Provides axis and spindle identifiers, the index-mode vocabulary,
//! the G-code number formatter, and the unified error types.

pub mod axis;
pub mod error;
pub mod format;

pub use axis::{
    Axis, Direction, IndexMode, IndexedAxis, LinearAxis, Sign, Spindle, Target,
    FULL_ROTATION_DEG,
};
pub use error::{ControllerError, Error, PanelError, Result};
pub use format::{format_finite, format_number, round_to};
