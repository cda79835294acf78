//! Numeric values coming from the host toolkit
//!
//! Panel handlers accept anything that can report a number, so a spin
//! button, a slider or a plain value from a script all feed the same path.

/// Anything with a current numeric value
pub trait ValueSource {
    fn value(&self) -> f64;
}

impl ValueSource for f64 {
    fn value(&self) -> f64 {
        *self
    }
}

impl ValueSource for f32 {
    fn value(&self) -> f64 {
        f64::from(*self)
    }
}

impl ValueSource for i32 {
    fn value(&self) -> f64 {
        f64::from(*self)
    }
}

impl<T: ValueSource + ?Sized> ValueSource for &T {
    fn value(&self) -> f64 {
        (**self).value()
    }
}

/// A bounded value, the way a spin button holds one
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpinValue {
    value: f64,
    min: f64,
    max: f64,
}

impl SpinValue {
    /// New spin value clamped into `min..=max`.
    ///
    /// Bounds given in the wrong order are swapped. Panics if a bound is NaN.
    pub fn new(value: f64, min: f64, max: f64) -> Self {
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        Self {
            value: value.clamp(min, max),
            min,
            max,
        }
    }

    /// Store a new value, clamped into range
    pub fn set(&mut self, value: f64) {
        self.value = value.clamp(self.min, self.max);
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }
}

impl ValueSource for SpinValue {
    fn value(&self) -> f64 {
        self.value
    }
}
