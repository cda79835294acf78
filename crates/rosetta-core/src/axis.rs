//! Axis and spindle identifiers
//!
//! The rose engine exposes five linear axes (U, V, X, Y, Z), one rotary
//! axis (B) and two spindles. The primary spindle (Sp0) sets the speed,
//! the secondary spindle (Sp1) follows it as a percentage.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Degrees in one full rotation, used to turn a division count into an angle.
pub const FULL_ROTATION_DEG: f64 = 360.0;

/// Linear axes driven by plain `G0` moves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LinearAxis {
    U,
    V,
    X,
    Y,
    Z,
}

impl LinearAxis {
    /// All linear axes in panel order
    pub const ALL: [LinearAxis; 5] = [Self::U, Self::V, Self::X, Self::Y, Self::Z];

    /// G-code word letter for this axis
    pub fn letter(self) -> char {
        match self {
            Self::U => 'U',
            Self::V => 'V',
            Self::X => 'X',
            Self::Y => 'Y',
            Self::Z => 'Z',
        }
    }

    /// Position of the axis in [`LinearAxis::ALL`]
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for LinearAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// Motion axes: the linear axes plus the rotary B axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    U,
    V,
    X,
    Y,
    Z,
    B,
}

impl Axis {
    /// Linear axis view of this axis, `None` for B
    pub fn as_linear(self) -> Option<LinearAxis> {
        match self {
            Self::U => Some(LinearAxis::U),
            Self::V => Some(LinearAxis::V),
            Self::X => Some(LinearAxis::X),
            Self::Y => Some(LinearAxis::Y),
            Self::Z => Some(LinearAxis::Z),
            Self::B => None,
        }
    }

    pub fn letter(self) -> char {
        match self.as_linear() {
            Some(linear) => linear.letter(),
            None => 'B',
        }
    }
}

impl From<LinearAxis> for Axis {
    fn from(axis: LinearAxis) -> Self {
        match axis {
            LinearAxis::U => Self::U,
            LinearAxis::V => Self::V,
            LinearAxis::X => Self::X,
            LinearAxis::Y => Self::Y,
            LinearAxis::Z => Self::Z,
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

impl FromStr for Axis {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "U" => Ok(Self::U),
            "V" => Ok(Self::V),
            "X" => Ok(Self::X),
            "Y" => Ok(Self::Y),
            "Z" => Ok(Self::Z),
            "B" => Ok(Self::B),
            _ => Err(format!("Unknown axis: {}", s)),
        }
    }
}

/// Spindles, addressed on the controller by the `$n` selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Spindle {
    /// Primary spindle (`$0`)
    Sp0,
    /// Secondary spindle (`$1`), geared to the primary
    Sp1,
}

impl Spindle {
    pub const ALL: [Spindle; 2] = [Self::Sp0, Self::Sp1];

    /// Controller spindle selector (`$0` / `$1`)
    pub fn selector(self) -> u8 {
        match self {
            Self::Sp0 => 0,
            Self::Sp1 => 1,
        }
    }
}

impl fmt::Display for Spindle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sp0 => write!(f, "Sp0"),
            Self::Sp1 => write!(f, "Sp1"),
        }
    }
}

/// Members whose index distance is resolved through an [`IndexMode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IndexedAxis {
    B,
    Sp0,
}

impl fmt::Display for IndexedAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::B => write!(f, "B"),
            Self::Sp0 => write!(f, "Sp0"),
        }
    }
}

/// Any panel member that carries an index distance, a sync flag and an index counter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Target {
    Axis(Axis),
    Spindle(Spindle),
}

impl From<Axis> for Target {
    fn from(axis: Axis) -> Self {
        Self::Axis(axis)
    }
}

impl From<LinearAxis> for Target {
    fn from(axis: LinearAxis) -> Self {
        Self::Axis(axis.into())
    }
}

impl From<Spindle> for Target {
    fn from(spindle: Spindle) -> Self {
        Self::Spindle(spindle)
    }
}

impl From<IndexedAxis> for Target {
    fn from(axis: IndexedAxis) -> Self {
        match axis {
            IndexedAxis::B => Self::Axis(Axis::B),
            IndexedAxis::Sp0 => Self::Spindle(Spindle::Sp0),
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Axis(axis) => write!(f, "{}", axis),
            Self::Spindle(spindle) => write!(f, "{}", spindle),
        }
    }
}

impl FromStr for Target {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sp0" => Ok(Self::Spindle(Spindle::Sp0)),
            "sp1" => Ok(Self::Spindle(Spindle::Sp1)),
            other => other.parse::<Axis>().map(Self::Axis),
        }
    }
}

/// Sign of a linear or rotary move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sign {
    Plus,
    Minus,
}

impl Sign {
    /// Text placed between the axis letter and the distance
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Plus => "",
            Self::Minus => "-",
        }
    }
}

/// Direction of a spindle run or an index step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Forward,
    Reverse,
}

impl Direction {
    /// Change applied to an index counter for one step in this direction
    pub fn count_delta(self) -> i64 {
        match self {
            Self::Forward => 1,
            Self::Reverse => -1,
        }
    }

    pub fn sign(self) -> Sign {
        match self {
            Self::Forward => Sign::Plus,
            Self::Reverse => Sign::Minus,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Forward => write!(f, "forward"),
            Self::Reverse => write!(f, "reverse"),
        }
    }
}

/// How an index distance is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexMode {
    /// The distance is an angle in degrees
    #[default]
    Degrees,
    /// The distance is a count of equal divisions of one rotation
    Divisions,
}

impl IndexMode {
    pub fn toggled(self) -> Self {
        match self {
            Self::Degrees => Self::Divisions,
            Self::Divisions => Self::Degrees,
        }
    }

    /// Resolve a raw index distance to degrees.
    ///
    /// Returns `None` when the result is not a finite angle, which happens
    /// for a zero division count.
    pub fn resolve_degrees(self, distance: f64) -> Option<f64> {
        let degrees = match self {
            Self::Degrees => distance,
            Self::Divisions => FULL_ROTATION_DEG / distance,
        };
        degrees.is_finite().then_some(degrees)
    }
}

impl fmt::Display for IndexMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Degrees => write!(f, "Deg"),
            Self::Divisions => write!(f, "Div"),
        }
    }
}
