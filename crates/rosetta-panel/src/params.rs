//! Axis and spindle parameter store
//!
//! Holds the current value of every panel field. Setters accept values as
//! given: range limits belong to the widgets feeding them. Refused input
//! leaves the store untouched:
//! - NaN or infinite values for any numeric field
//! - an index distance that does not turn into a usable angle (zero
//!   divisions, or so many that the rounded angle is zero)
//!
//! Derived values:
//! - `index_degrees` for B and Sp0 follows `index_distance` through the
//!   axis' [`IndexMode`], rounded per the configured precision.
//! - The secondary spindle speed is `primary speed * percent / 100`.

use rosetta_core::{
    round_to, Axis, Direction, IndexMode, IndexedAxis, LinearAxis, PanelError, Spindle, Target,
};
use rosetta_settings::{LinearAxisDefaults, PanelDefaults};
use serde::Serialize;

/// State of one linear axis
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinearAxisState {
    pub feed_rate: f64,
    /// Signed offset applied per button press
    pub index_distance: f64,
    pub move_distance: f64,
    pub index_count: i64,
    /// Tracked only, nothing acts on it yet
    pub sync_enabled: bool,
}

impl LinearAxisState {
    fn from_defaults(defaults: &LinearAxisDefaults) -> Self {
        Self {
            feed_rate: defaults.feed_rate,
            index_distance: defaults.index_distance,
            move_distance: defaults.move_distance,
            index_count: 0,
            sync_enabled: false,
        }
    }
}

/// State of the rotary B axis
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RotaryAxisState {
    pub feed_rate: f64,
    /// Raw distance as entered: degrees or a division count
    pub index_distance: f64,
    /// Angle actually sent to the controller
    pub index_degrees: f64,
    pub index_mode: IndexMode,
    pub index_count: i64,
    pub move_distance: f64,
    pub sync_enabled: bool,
}

/// State of the primary spindle (Sp0)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrimarySpindleState {
    pub speed: f64,
    pub index_distance: f64,
    pub index_degrees: f64,
    /// Shared with the secondary spindle
    pub index_mode: IndexMode,
    pub index_count: i64,
    pub index_enabled: bool,
    pub sync_enabled: bool,
}

/// State of the secondary spindle (Sp1)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SecondarySpindleState {
    pub index_distance: f64,
    pub index_count: i64,
    /// Speed as a percentage of the primary spindle speed
    pub speed_percent: f64,
    pub index_enabled: bool,
    pub sync_enabled: bool,
}

/// Every axis and spindle field of the panel
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterStore {
    linear: [LinearAxisState; 5],
    b: RotaryAxisState,
    primary: PrimarySpindleState,
    secondary: SecondarySpindleState,
    #[serde(skip)]
    precision: Option<u32>,
}

impl Default for ParameterStore {
    fn default() -> Self {
        let defaults = PanelDefaults::default();
        let precision = Some(1);
        let b_degrees = defaults.b.index_distance;
        let sp0_degrees = defaults.spindle.index_distance;
        Self::build(&defaults, precision, b_degrees, sp0_degrees)
    }
}

impl ParameterStore {
    /// Store with the built-in start-up values and one-decimal rounding
    pub fn new() -> Self {
        Self::default()
    }

    /// Store initialised from configured start-up values.
    ///
    /// `precision` is the number of decimal places kept in resolved index
    /// angles; `None` keeps them unrounded.
    pub fn from_defaults(
        defaults: &PanelDefaults,
        precision: Option<u32>,
    ) -> Result<Self, PanelError> {
        let b_degrees = resolve(
            Target::Axis(Axis::B),
            defaults.b.index_mode,
            defaults.b.index_distance,
            precision,
        )?;
        let sp0_degrees = resolve(
            Target::Spindle(Spindle::Sp0),
            defaults.spindle.index_mode,
            defaults.spindle.index_distance,
            precision,
        )?;
        Ok(Self::build(defaults, precision, b_degrees, sp0_degrees))
    }

    fn build(
        defaults: &PanelDefaults,
        precision: Option<u32>,
        b_degrees: f64,
        sp0_degrees: f64,
    ) -> Self {
        Self {
            linear: LinearAxis::ALL.map(|axis| LinearAxisState::from_defaults(defaults.linear(axis))),
            b: RotaryAxisState {
                feed_rate: defaults.b.feed_rate,
                index_distance: defaults.b.index_distance,
                index_degrees: b_degrees,
                index_mode: defaults.b.index_mode,
                index_count: 0,
                move_distance: defaults.b.move_distance,
                sync_enabled: false,
            },
            primary: PrimarySpindleState {
                speed: defaults.spindle.speed,
                index_distance: defaults.spindle.index_distance,
                index_degrees: sp0_degrees,
                index_mode: defaults.spindle.index_mode,
                index_count: 0,
                index_enabled: false,
                sync_enabled: false,
            },
            secondary: SecondarySpindleState {
                index_distance: defaults.spindle.secondary_index_distance,
                index_count: 0,
                speed_percent: defaults.spindle.secondary_percent,
                index_enabled: false,
                sync_enabled: false,
            },
            precision,
        }
    }

    pub fn precision(&self) -> Option<u32> {
        self.precision
    }

    pub fn linear(&self, axis: LinearAxis) -> &LinearAxisState {
        &self.linear[axis.index()]
    }

    pub fn b(&self) -> &RotaryAxisState {
        &self.b
    }

    pub fn primary(&self) -> &PrimarySpindleState {
        &self.primary
    }

    pub fn secondary(&self) -> &SecondarySpindleState {
        &self.secondary
    }

    pub fn feed_rate(&self, axis: Axis) -> f64 {
        match axis.as_linear() {
            Some(linear) => self.linear(linear).feed_rate,
            None => self.b.feed_rate,
        }
    }

    pub fn set_feed_rate(&mut self, axis: Axis, value: f64) -> Result<(), PanelError> {
        check_finite(Target::Axis(axis), "feed rate", value)?;
        match axis.as_linear() {
            Some(linear) => self.linear[linear.index()].feed_rate = value,
            None => self.b.feed_rate = value,
        }
        tracing::debug!("{} feed rate = {}", axis, value);
        Ok(())
    }

    pub fn move_distance(&self, axis: Axis) -> f64 {
        match axis.as_linear() {
            Some(linear) => self.linear(linear).move_distance,
            None => self.b.move_distance,
        }
    }

    pub fn set_move_distance(&mut self, axis: Axis, value: f64) -> Result<(), PanelError> {
        check_finite(Target::Axis(axis), "move distance", value)?;
        match axis.as_linear() {
            Some(linear) => self.linear[linear.index()].move_distance = value,
            None => self.b.move_distance = value,
        }
        tracing::debug!("{} move distance = {}", axis, value);
        Ok(())
    }

    pub fn index_distance(&self, target: Target) -> f64 {
        match target {
            Target::Axis(axis) => match axis.as_linear() {
                Some(linear) => self.linear[linear.index()].index_distance,
                None => self.b.index_distance,
            },
            Target::Spindle(Spindle::Sp0) => self.primary.index_distance,
            Target::Spindle(Spindle::Sp1) => self.secondary.index_distance,
        }
    }

    /// Store an index distance.
    ///
    /// For B and Sp0 the resolved angle is recomputed under the current
    /// mode. A distance that does not resolve is refused and nothing changes.
    pub fn set_index_distance(&mut self, target: Target, value: f64) -> Result<(), PanelError> {
        match target {
            Target::Axis(Axis::B) => {
                let degrees = resolve(target, self.b.index_mode, value, self.precision)?;
                self.b.index_distance = value;
                self.b.index_degrees = degrees;
            }
            Target::Spindle(Spindle::Sp0) => {
                let degrees = resolve(target, self.primary.index_mode, value, self.precision)?;
                self.primary.index_distance = value;
                self.primary.index_degrees = degrees;
            }
            Target::Spindle(Spindle::Sp1) => {
                check_finite(target, "index distance", value)?;
                self.secondary.index_distance = value;
            }
            Target::Axis(axis) => {
                check_finite(target, "index distance", value)?;
                if let Some(linear) = axis.as_linear() {
                    self.linear[linear.index()].index_distance = value;
                }
            }
        }
        tracing::debug!("{} index distance = {}", target, value);
        Ok(())
    }

    pub fn index_mode(&self, axis: IndexedAxis) -> IndexMode {
        match axis {
            IndexedAxis::B => self.b.index_mode,
            IndexedAxis::Sp0 => self.primary.index_mode,
        }
    }

    pub fn index_degrees(&self, axis: IndexedAxis) -> f64 {
        match axis {
            IndexedAxis::B => self.b.index_degrees,
            IndexedAxis::Sp0 => self.primary.index_degrees,
        }
    }

    /// Switch between degrees and divisions, returning the new mode.
    ///
    /// The stored distance is kept; the angle is recomputed from it.
    pub fn toggle_index_mode(&mut self, axis: IndexedAxis) -> Result<IndexMode, PanelError> {
        let mode = self.index_mode(axis).toggled();
        self.set_index_mode(axis, mode)?;
        Ok(mode)
    }

    /// Select an index mode and recompute the angle from the stored distance
    pub fn set_index_mode(&mut self, axis: IndexedAxis, mode: IndexMode) -> Result<(), PanelError> {
        let target = Target::from(axis);
        let distance = self.index_distance(target);
        let degrees = resolve(target, mode, distance, self.precision)?;

        match axis {
            IndexedAxis::B => {
                self.b.index_mode = mode;
                self.b.index_degrees = degrees;
            }
            IndexedAxis::Sp0 => {
                self.primary.index_mode = mode;
                self.primary.index_degrees = degrees;
            }
        }
        tracing::debug!("{} index mode = {}, index degrees = {}", axis, mode, degrees);
        Ok(())
    }

    /// Angle a spindle turns per index step.
    ///
    /// Sp1 has no mode of its own: its distance is read through Sp0's mode.
    pub fn spindle_index_degrees(&self, spindle: Spindle) -> Result<f64, PanelError> {
        match spindle {
            Spindle::Sp0 => Ok(self.primary.index_degrees),
            Spindle::Sp1 => resolve(
                Target::Spindle(Spindle::Sp1),
                self.primary.index_mode,
                self.secondary.index_distance,
                self.precision,
            ),
        }
    }

    pub fn primary_speed(&self) -> f64 {
        self.primary.speed
    }

    pub fn set_primary_speed(&mut self, value: f64) -> Result<(), PanelError> {
        check_finite(Target::Spindle(Spindle::Sp0), "speed", value)?;
        self.primary.speed = value;
        tracing::debug!(
            "Sp0 speed = {}, Sp1 speed = {}",
            value,
            self.secondary_speed()
        );
        Ok(())
    }

    pub fn speed_percent(&self) -> f64 {
        self.secondary.speed_percent
    }

    pub fn set_speed_percent(&mut self, value: f64) -> Result<(), PanelError> {
        check_finite(Target::Spindle(Spindle::Sp1), "speed percent", value)?;
        self.secondary.speed_percent = value;
        tracing::debug!(
            "Sp1 percent = {}, Sp1 speed = {}",
            value,
            self.secondary_speed()
        );
        Ok(())
    }

    /// Secondary spindle speed derived from the primary speed
    pub fn secondary_speed(&self) -> f64 {
        self.primary.speed * self.secondary.speed_percent / 100.0
    }

    pub fn sync_enabled(&self, target: Target) -> bool {
        match target {
            Target::Axis(axis) => match axis.as_linear() {
                Some(linear) => self.linear[linear.index()].sync_enabled,
                None => self.b.sync_enabled,
            },
            Target::Spindle(Spindle::Sp0) => self.primary.sync_enabled,
            Target::Spindle(Spindle::Sp1) => self.secondary.sync_enabled,
        }
    }

    /// Flip the sync flag, returning the new value
    pub fn toggle_sync(&mut self, target: Target) -> bool {
        let flag = match target {
            Target::Axis(axis) => match axis.as_linear() {
                Some(linear) => &mut self.linear[linear.index()].sync_enabled,
                None => &mut self.b.sync_enabled,
            },
            Target::Spindle(Spindle::Sp0) => &mut self.primary.sync_enabled,
            Target::Spindle(Spindle::Sp1) => &mut self.secondary.sync_enabled,
        };
        *flag = !*flag;
        let value = *flag;
        tracing::debug!("{} sync = {}", target, value);
        value
    }

    pub fn index_enabled(&self, spindle: Spindle) -> bool {
        match spindle {
            Spindle::Sp0 => self.primary.index_enabled,
            Spindle::Sp1 => self.secondary.index_enabled,
        }
    }

    /// Flip the index-enabled flag, returning the new value
    pub fn toggle_index_enabled(&mut self, spindle: Spindle) -> bool {
        let flag = match spindle {
            Spindle::Sp0 => &mut self.primary.index_enabled,
            Spindle::Sp1 => &mut self.secondary.index_enabled,
        };
        *flag = !*flag;
        let value = *flag;
        tracing::debug!("{} index enabled = {}", spindle, value);
        value
    }

    pub fn index_count(&self, target: Target) -> i64 {
        match target {
            Target::Axis(axis) => match axis.as_linear() {
                Some(linear) => self.linear[linear.index()].index_count,
                None => self.b.index_count,
            },
            Target::Spindle(Spindle::Sp0) => self.primary.index_count,
            Target::Spindle(Spindle::Sp1) => self.secondary.index_count,
        }
    }

    /// Count one index step, returning the new count. Not clamped.
    pub fn increment_index_count(&mut self, target: Target, direction: Direction) -> i64 {
        let count = match target {
            Target::Axis(axis) => match axis.as_linear() {
                Some(linear) => &mut self.linear[linear.index()].index_count,
                None => &mut self.b.index_count,
            },
            Target::Spindle(Spindle::Sp0) => &mut self.primary.index_count,
            Target::Spindle(Spindle::Sp1) => &mut self.secondary.index_count,
        };
        *count += direction.count_delta();
        let value = *count;
        tracing::debug!("{} index count = {}", target, value);
        value
    }

    /// JSON rendering of the whole store
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

fn check_finite(target: Target, field: &str, value: f64) -> Result<(), PanelError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(PanelError::InvalidValue {
            target: target.to_string(),
            field: field.to_string(),
            value,
        })
    }
}

/// Resolve and round an index angle.
///
/// A division count so large that the angle rounds to zero is refused
/// along with counts that do not resolve at all.
fn resolve(
    target: Target,
    mode: IndexMode,
    distance: f64,
    precision: Option<u32>,
) -> Result<f64, PanelError> {
    let invalid = || PanelError::InvalidIndexDistance {
        target: target.to_string(),
        value: distance,
        mode: mode.to_string(),
    };

    let degrees = mode.resolve_degrees(distance).ok_or_else(invalid)?;
    let degrees = match precision {
        Some(places) => round_to(degrees, places),
        None => degrees,
    };

    if !degrees.is_finite() || (mode == IndexMode::Divisions && degrees == 0.0) {
        return Err(invalid());
    }
    Ok(degrees)
}
