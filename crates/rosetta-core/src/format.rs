//! Number formatting for MDI command words
//!
//! Commands go to the controller verbatim, so every number embedded in a
//! command uses the same rendering: the shortest decimal text that reads
//! back as the same `f64`, never in exponent form, and always with at least
//! one fractional digit (`90.0`, `0.25`, `1000.0`).

/// Render a value for a G-code/M-code word.
///
/// Non-finite input renders as Rust prints it (`NaN`, `inf`); command
/// builders go through [`format_finite`] so such text never reaches a
/// controller.
pub fn format_number(value: f64) -> String {
    // Also catches -0.0
    if value == 0.0 {
        return "0.0".to_string();
    }

    let mut text = value.to_string();
    if value.is_finite() && !text.contains('.') {
        text.push_str(".0");
    }
    text
}

/// Round `value` to `places` decimal places.
///
/// Values too large to scale are returned unchanged; they carry no
/// fractional digits to round anyway.
pub fn round_to(value: f64, places: u32) -> f64 {
    let scale = 10f64.powi(places as i32);
    let scaled = value * scale;
    if !scaled.is_finite() {
        return value;
    }
    scaled.round() / scale
}

/// Render a value for a command word, `None` for NaN or infinity.
pub fn format_finite(value: f64) -> Option<String> {
    value.is_finite().then(|| format_number(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integral_values_keep_one_decimal() {
        assert_eq!(format_number(90.0), "90.0");
        assert_eq!(format_number(1000.0), "1000.0");
        assert_eq!(format_number(-15.0), "-15.0");
    }

    #[test]
    fn test_fractions_are_not_padded() {
        assert_eq!(format_number(0.25), "0.25");
        assert_eq!(format_number(51.4), "51.4");
        assert_eq!(format_number(2.5), "2.5");
    }

    #[test]
    fn test_negative_zero() {
        assert_eq!(format_number(-0.0), "0.0");
    }

    #[test]
    fn test_no_exponent_form() {
        assert_eq!(format_number(1e16), "10000000000000000.0");
        assert_eq!(format_number(1e-7), "0.0000001");
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(360.0 / 7.0, 1), 51.4);
        assert_eq!(round_to(2.0 / 3.0, 2), 0.67);
        assert_eq!(round_to(90.0, 1), 90.0);
    }

    #[test]
    fn test_round_to_keeps_huge_values_finite() {
        assert_eq!(round_to(1.0e308, 1), 1.0e308);
        assert_eq!(round_to(-1.0e308, 12), -1.0e308);
        assert!(round_to(f64::MAX, 3).is_finite());
    }

    #[test]
    fn test_format_finite_refuses_nan_and_infinity() {
        assert_eq!(format_finite(2.5).as_deref(), Some("2.5"));
        assert_eq!(format_finite(f64::NAN), None);
        assert_eq!(format_finite(f64::INFINITY), None);
        assert_eq!(format_finite(f64::NEG_INFINITY), None);
    }
}
