//! MDI command text built from the parameter store
//!
//! Every method is a pure read of the store. Counters and dispatch are the
//! caller's business. A number that is NaN or infinite (a derived speed can
//! overflow even when both inputs are finite) fails the command with
//! [`PanelError::InvalidValue`] instead of reaching the controller.

use crate::params::ParameterStore;
use rosetta_core::{
    format_finite, Axis, Direction, LinearAxis, PanelError, Sign, Spindle, Target,
};

/// Orientation word sent with every spindle index command
const INDEX_ORIENTATION: &str = "Q10";

/// Formats commands from a borrowed [`ParameterStore`]
#[derive(Debug, Clone, Copy)]
pub struct CommandFormatter<'a> {
    store: &'a ParameterStore,
}

impl<'a> CommandFormatter<'a> {
    pub fn new(store: &'a ParameterStore) -> Self {
        Self { store }
    }

    /// `G0 <axis><sign><index distance> F<feed>`
    pub fn linear_move(&self, axis: LinearAxis, sign: Sign) -> Result<String, PanelError> {
        let state = self.store.linear(axis);
        let target = Target::from(axis);
        Ok(format!(
            "G0 {}{}{} F{}",
            axis.letter(),
            sign.as_str(),
            number(target, "index distance", state.index_distance)?,
            number(target, "feed rate", state.feed_rate)?
        ))
    }

    /// `G0 B<sign><resolved degrees> F<feed>`
    pub fn rotary_b_move(&self, sign: Sign) -> Result<String, PanelError> {
        let b = self.store.b();
        let target = Target::Axis(Axis::B);
        Ok(format!(
            "G0 {}{}{} F{}",
            Axis::B.letter(),
            sign.as_str(),
            number(target, "index degrees", b.index_degrees)?,
            number(target, "feed rate", b.feed_rate)?
        ))
    }

    /// Speed commands for both spindles, primary first
    pub fn spindle_speed_commands(&self) -> Result<(String, String), PanelError> {
        Ok((
            speed_command(self.store.primary_speed(), Spindle::Sp0)?,
            self.secondary_speed_command()?,
        ))
    }

    /// Speed command for the secondary spindle alone
    pub fn secondary_speed_command(&self) -> Result<String, PanelError> {
        speed_command(self.store.secondary_speed(), Spindle::Sp1)
    }

    /// Start all spindles: `M3 $-1` forward, `M4 $-1` reverse
    pub fn spindle_start(&self, direction: Direction) -> String {
        match direction {
            Direction::Forward => "M3 $-1".to_string(),
            Direction::Reverse => "M4 $-1".to_string(),
        }
    }

    pub fn spindle_stop(&self) -> String {
        "M5".to_string()
    }

    /// Orient one spindle by `degrees`.
    ///
    /// `P1` turns forward and `P2` in reverse.
    pub fn spindle_index(
        &self,
        spindle: Spindle,
        degrees: f64,
        direction: Direction,
    ) -> Result<String, PanelError> {
        let turn = match direction {
            Direction::Forward => 1,
            Direction::Reverse => 2,
        };
        Ok(format!(
            "M19 R{} {} P{} ${}",
            number(Target::Spindle(spindle), "index degrees", degrees)?,
            INDEX_ORIENTATION,
            turn,
            spindle.selector()
        ))
    }
}

fn speed_command(speed: f64, spindle: Spindle) -> Result<String, PanelError> {
    Ok(format!(
        "S{} ${}",
        number(Target::Spindle(spindle), "speed", speed)?,
        spindle.selector()
    ))
}

fn number(target: Target, field: &str, value: f64) -> Result<String, PanelError> {
    format_finite(value).ok_or_else(|| PanelError::InvalidValue {
        target: target.to_string(),
        field: field.to_string(),
        value,
    })
}
