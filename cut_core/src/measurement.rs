//! # Measurement Parsing and Formatting
//!
//! Converts between the length strings people type into an order form and
//! canonical numeric lengths (feet for imperial, meters for metric).
//!
//! ## Accepted Input
//!
//! | System   | Major unit                  | Minor unit               | Bare number |
//! |----------|-----------------------------|--------------------------|-------------|
//! | Imperial | `5'`, `5ft`, `5 feet`       | `3"`, `3in`, `3 inches`  | feet        |
//! | Metric   | `2m`, `2 meters`, `2 metres`| `50cm`                   | meters      |
//!
//! Major and minor parts may be combined in either order (`5' 3"`, `2m 50cm`).
//! Anything that cannot be read unambiguously yields `None`; parsing never
//! panics and never returns NaN.
//!
//! ## Example
//!
//! ```rust
//! use cut_core::measurement::{format_measurement, parse_feet_inches, parse_meters_cm};
//! use cut_core::units::MeasurementUnit;
//!
//! assert_eq!(parse_feet_inches("5' 3\""), Some(5.25));
//! assert_eq!(parse_meters_cm("150cm"), Some(1.5));
//! assert_eq!(parse_feet_inches("two feet"), None);
//!
//! assert_eq!(format_measurement(5.25, MeasurementUnit::Imperial), "5' 3\"");
//! ```

use crate::units::{Centimeters, Feet, Inches, MeasurementUnit, Meters};

/// Display string for a length that is NaN or infinite.
pub const UNDEFINED_LENGTH: &str = "n/a";

/// Which part of a compound length a token belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Part {
    Major,
    Minor,
}

/// A number followed by its (possibly empty) unit marker.
#[derive(Debug, Clone, PartialEq)]
struct Token {
    value: f64,
    marker: String,
}

/// Parse an imperial length string into feet.
///
/// `5' 3"` → 5.25, `6"` → 0.5, `5.5` → 5.5. Returns `None` when the input has
/// no readable numeral or uses an unknown marker.
pub fn parse_feet_inches(input: &str) -> Option<f64> {
    parse_length(input, MeasurementUnit::Imperial)
}

/// Parse a metric length string into meters.
///
/// `2m 50cm` → 2.5, `150cm` → 1.5, `2.5` → 2.5.
pub fn parse_meters_cm(input: &str) -> Option<f64> {
    parse_length(input, MeasurementUnit::Metric)
}

/// Parse a length string in the given unit system into its canonical unit.
pub fn parse_length(input: &str, unit: MeasurementUnit) -> Option<f64> {
    let tokens = tokenize(input)?;

    // A lone unmarked number is in the canonical unit
    if let [only] = tokens.as_slice() {
        if only.marker.is_empty() {
            return Some(only.value);
        }
    }

    let mut major: Option<f64> = None;
    let mut minor: Option<f64> = None;
    for token in &tokens {
        let slot = match classify(&token.marker, unit)? {
            Part::Major => &mut major,
            Part::Minor => &mut minor,
        };
        if slot.replace(token.value).is_some() {
            // "5' 6'" has no single meaning
            return None;
        }
    }

    if major.is_none() && minor.is_none() {
        return None;
    }

    Some(compose(unit, major.unwrap_or(0.0), minor.unwrap_or(0.0)))
}

/// Canonical length of `major` whole units plus `minor` sub-units.
fn compose(unit: MeasurementUnit, major: f64, minor: f64) -> f64 {
    match unit {
        MeasurementUnit::Imperial => (Feet(major) + Feet::from(Inches(minor))).value(),
        MeasurementUnit::Metric => (Meters(major) + Meters::from(Centimeters(minor))).value(),
    }
}

/// Sub-units in the part of `magnitude` past `whole` major units.
fn sub_unit_remainder(unit: MeasurementUnit, magnitude: f64, whole: f64) -> f64 {
    match unit {
        MeasurementUnit::Imperial => Inches::from(Feet(magnitude) - Feet(whole)).value(),
        MeasurementUnit::Metric => Centimeters::from(Meters(magnitude) - Meters(whole)).value(),
    }
}

fn classify(marker: &str, unit: MeasurementUnit) -> Option<Part> {
    match unit {
        MeasurementUnit::Imperial => match marker {
            "'" | "′" | "ft" | "foot" | "feet" => Some(Part::Major),
            "\"" | "″" | "''" | "in" | "inch" | "inches" => Some(Part::Minor),
            _ => None,
        },
        MeasurementUnit::Metric => match marker {
            "m" | "meter" | "meters" | "metre" | "metres" => Some(Part::Major),
            "cm" | "centimeter" | "centimeters" | "centimetre" | "centimetres" => Some(Part::Minor),
            _ => None,
        },
    }
}

fn is_marker_char(c: char) -> bool {
    c.is_alphabetic() || matches!(c, '\'' | '"' | '′' | '″')
}

fn is_number_char(c: char) -> bool {
    c.is_ascii_digit() || c == '.'
}

/// Split input into `(number, marker)` pairs.
fn tokenize(input: &str) -> Option<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut rest = input.trim();

    while !rest.is_empty() {
        let sign_len = if rest.starts_with(['-', '+']) { 1 } else { 0 };
        let digits_len = rest[sign_len..]
            .find(|c: char| !is_number_char(c))
            .unwrap_or(rest.len() - sign_len);
        if digits_len == 0 {
            return None;
        }
        let number_len = sign_len + digits_len;
        let value: f64 = rest[..number_len].parse().ok()?;
        if !value.is_finite() {
            return None;
        }
        rest = rest[number_len..].trim_start();

        let marker_len = rest.find(|c: char| !is_marker_char(c)).unwrap_or(rest.len());
        let marker = rest[..marker_len].to_lowercase();
        rest = rest[marker_len..].trim_start();

        tokens.push(Token { value, marker });
    }

    if tokens.is_empty() {
        None
    } else {
        Some(tokens)
    }
}

/// Format a canonical length for display.
///
/// Imperial renders `F'`, `I"` or `F' I"`; metric renders `Mm`, `Ccm` or
/// `Mm Ccm`. The minor part is rounded to the nearest whole inch/centimeter
/// and zero parts are omitted. A length that rounds to zero renders as `0'`
/// or `0m`.
///
/// # Example
///
/// ```rust
/// use cut_core::measurement::format_measurement;
/// use cut_core::units::MeasurementUnit;
///
/// assert_eq!(format_measurement(5.0, MeasurementUnit::Imperial), "5'");
/// assert_eq!(format_measurement(0.5, MeasurementUnit::Imperial), "6\"");
/// assert_eq!(format_measurement(2.5, MeasurementUnit::Metric), "2m 50cm");
/// ```
pub fn format_measurement(value: f64, unit: MeasurementUnit) -> String {
    if !value.is_finite() {
        return UNDEFINED_LENGTH.to_string();
    }

    let (major_mark, minor_mark) = match unit {
        MeasurementUnit::Imperial => ("'", "\""),
        MeasurementUnit::Metric => ("m", "cm"),
    };
    let per_major = unit.sub_units();

    let magnitude = value.abs();
    let mut major = magnitude.trunc();
    let mut minor = sub_unit_remainder(unit, magnitude, major).round();
    if minor >= per_major {
        major += 1.0;
        minor = 0.0;
    }

    let (major, minor) = (major as u64, minor as u64);
    let sign = if value < 0.0 && (major > 0 || minor > 0) { "-" } else { "" };

    match (major > 0, minor > 0) {
        (true, true) => format!("{sign}{major}{major_mark} {minor}{minor_mark}"),
        (true, false) => format!("{sign}{major}{major_mark}"),
        (false, true) => format!("{sign}{minor}{minor_mark}"),
        (false, false) => format!("0{major_mark}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Option<f64>, b: f64) -> bool {
        a.map(|v| (v - b).abs() < 1e-9).unwrap_or(false)
    }

    #[test]
    fn test_parse_feet_and_inches() {
        assert_eq!(parse_feet_inches("5' 3\""), Some(5.25));
        assert_eq!(parse_feet_inches("5'3\""), Some(5.25));
        assert_eq!(parse_feet_inches("6\""), Some(0.5));
        assert_eq!(parse_feet_inches("5.5"), Some(5.5));
        assert_eq!(parse_feet_inches("8'"), Some(8.0));
    }

    #[test]
    fn test_parse_feet_word_markers() {
        assert!(approx(parse_feet_inches("5 ft 3 in"), 5.25));
        assert!(approx(parse_feet_inches("2 feet"), 2.0));
        assert!(approx(parse_feet_inches("18 inches"), 1.5));
        assert!(approx(parse_feet_inches("3\" 1'"), 1.25));
    }

    #[test]
    fn test_parse_fractional_inches() {
        assert!(approx(parse_feet_inches("1' 1.5\""), 1.125));
    }

    #[test]
    fn test_parse_meters_and_centimeters() {
        assert_eq!(parse_meters_cm("2m 50cm"), Some(2.5));
        assert_eq!(parse_meters_cm("150cm"), Some(1.5));
        assert_eq!(parse_meters_cm("2.5"), Some(2.5));
        assert_eq!(parse_meters_cm("3m"), Some(3.0));
        assert!(approx(parse_meters_cm("1 metre 5 cm"), 1.05));
    }

    #[test]
    fn test_parse_rejects_input_without_numeral() {
        assert_eq!(parse_feet_inches(""), None);
        assert_eq!(parse_feet_inches("   "), None);
        assert_eq!(parse_feet_inches("abc"), None);
        assert_eq!(parse_feet_inches("'\""), None);
        assert_eq!(parse_meters_cm("cm"), None);
        assert_eq!(parse_meters_cm("."), None);
    }

    #[test]
    fn test_parse_rejects_overflowing_numeral() {
        let huge = format!("{}'", "9".repeat(400));
        assert_eq!(parse_feet_inches(&huge), None);
        assert_eq!(parse_meters_cm(&"9".repeat(400)), None);
    }

    #[test]
    fn test_parse_rejects_ambiguous_input() {
        // Duplicate components
        assert_eq!(parse_feet_inches("5' 6'"), None);
        // Metric markers in an imperial field and vice versa
        assert_eq!(parse_feet_inches("2m"), None);
        assert_eq!(parse_meters_cm("5'"), None);
        // A second bare number has no unit
        assert_eq!(parse_feet_inches("5' 3"), None);
        assert_eq!(parse_feet_inches("nan"), None);
    }

    #[test]
    fn test_parse_negative_is_returned_for_caller_to_reject() {
        assert_eq!(parse_feet_inches("-2'"), Some(-2.0));
    }

    #[test]
    fn test_format_imperial() {
        assert_eq!(format_measurement(5.25, MeasurementUnit::Imperial), "5' 3\"");
        assert_eq!(format_measurement(5.0, MeasurementUnit::Imperial), "5'");
        assert_eq!(format_measurement(0.5, MeasurementUnit::Imperial), "6\"");
        assert_eq!(format_measurement(0.0, MeasurementUnit::Imperial), "0'");
    }

    #[test]
    fn test_format_rounding_carries_into_feet() {
        // 5.99 ft = 5' 11.88" which rounds to 6'
        assert_eq!(format_measurement(5.99, MeasurementUnit::Imperial), "6'");
        assert_eq!(format_measurement(1.999, MeasurementUnit::Metric), "2m");
    }

    #[test]
    fn test_format_metric() {
        assert_eq!(format_measurement(2.5, MeasurementUnit::Metric), "2m 50cm");
        assert_eq!(format_measurement(2.0, MeasurementUnit::Metric), "2m");
        assert_eq!(format_measurement(0.35, MeasurementUnit::Metric), "35cm");
    }

    #[test]
    fn test_format_negative_and_undefined() {
        assert_eq!(format_measurement(-1.5, MeasurementUnit::Imperial), "-1' 6\"");
        assert_eq!(format_measurement(-0.001, MeasurementUnit::Imperial), "0'");
        assert_eq!(format_measurement(f64::NAN, MeasurementUnit::Metric), UNDEFINED_LENGTH);
        assert_eq!(format_measurement(f64::INFINITY, MeasurementUnit::Imperial), UNDEFINED_LENGTH);
    }

    #[test]
    fn test_round_trip_within_one_sub_unit() {
        for unit in MeasurementUnit::ALL {
            let tolerance = 1.0 / unit.sub_units();
            for value in [0.3, 1.0, 2.5, 5.25, 7.777, 12.04, 99.99] {
                let text = format_measurement(value, unit);
                let parsed = parse_length(&text, unit).unwrap();
                assert!(
                    (parsed - value).abs() <= tolerance,
                    "{} {:?} -> {} -> {}",
                    value,
                    unit,
                    text,
                    parsed
                );
            }
        }
    }
}
