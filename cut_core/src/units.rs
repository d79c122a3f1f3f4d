//! # Unit Types
//!
//! Length units for the two measurement systems a shop works in, plus
//! newtype wrappers for the individual units. Parsing, formatting and
//! cross-system conversion go through the wrappers so a value is never
//! scaled by the wrong factor.
//!
//! ## Measurement Systems
//!
//! - **Imperial**: canonical value in feet; entered and displayed as feet + inches
//! - **Metric**: canonical value in meters; entered and displayed as meters + centimeters
//!
//! Stock, thresholds and cut lengths are always plain `f64` values in the
//! canonical unit of the owning material's system.
//!
//! ## Example
//!
//! ```rust
//! use cut_core::units::{convert_measurement, Feet, Inches, Meters, MeasurementUnit};
//!
//! let board = Feet(8.0);
//! let inches: Inches = board.into();
//! assert_eq!(inches.0, 96.0);
//!
//! let metric: Meters = Feet(1.0).into();
//! assert!((metric.0 - 0.3048).abs() < 1e-12);
//!
//! let m = convert_measurement(10.0, MeasurementUnit::Imperial, MeasurementUnit::Metric);
//! assert!((m - 3.048).abs() < 1e-12);
//! ```

use std::fmt;
use std::ops::{Add, Sub};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::CutError;

/// Meters per international foot (exact).
pub const METERS_PER_FOOT: f64 = 0.3048;

/// Feet per meter, derived from [`METERS_PER_FOOT`] rather than the rounded
/// 3.28084 literal so repeated conversions do not drift.
pub const FEET_PER_METER: f64 = 1.0 / METERS_PER_FOOT;

// ============================================================================
// Measurement System
// ============================================================================

/// Unit system a material is measured and sold in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeasurementUnit {
    /// Feet and inches; canonical value in feet
    #[default]
    Imperial,
    /// Meters and centimeters; canonical value in meters
    Metric,
}

impl MeasurementUnit {
    /// All unit systems for selection lists
    pub const ALL: [MeasurementUnit; 2] = [MeasurementUnit::Imperial, MeasurementUnit::Metric];

    /// Symbol of the canonical unit ("ft" or "m")
    pub fn canonical_symbol(&self) -> &'static str {
        match self {
            MeasurementUnit::Imperial => "ft",
            MeasurementUnit::Metric => "m",
        }
    }

    /// Number of sub-units per canonical unit (inches per foot, cm per meter)
    pub fn sub_units(&self) -> f64 {
        match self {
            MeasurementUnit::Imperial => 12.0,
            MeasurementUnit::Metric => 100.0,
        }
    }

    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            MeasurementUnit::Imperial => "Imperial (ft/in)",
            MeasurementUnit::Metric => "Metric (m/cm)",
        }
    }
}

impl fmt::Display for MeasurementUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MeasurementUnit::Imperial => write!(f, "imperial"),
            MeasurementUnit::Metric => write!(f, "metric"),
        }
    }
}

impl FromStr for MeasurementUnit {
    type Err = CutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "imperial" | "ft" | "feet" | "us" => Ok(MeasurementUnit::Imperial),
            "metric" | "m" | "meters" | "metres" | "si" => Ok(MeasurementUnit::Metric),
            _ => Err(CutError::invalid_input(
                "measurement_unit",
                s,
                "Expected 'imperial' or 'metric'",
            )),
        }
    }
}

/// Convert a length between unit systems.
///
/// Identity when the systems match; otherwise feet → meters multiplies by
/// [`METERS_PER_FOOT`] and meters → feet by [`FEET_PER_METER`].
pub fn convert_measurement(value: f64, from: MeasurementUnit, to: MeasurementUnit) -> f64 {
    match (from, to) {
        (MeasurementUnit::Imperial, MeasurementUnit::Metric) => Meters::from(Feet(value)).value(),
        (MeasurementUnit::Metric, MeasurementUnit::Imperial) => Feet::from(Meters(value)).value(),
        _ => value,
    }
}

// ============================================================================
// Length Units
// ============================================================================

/// Length in feet
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Feet(pub f64);

/// Length in inches
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Inches(pub f64);

/// Length in meters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Meters(pub f64);

/// Length in centimeters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Centimeters(pub f64);

impl From<Feet> for Inches {
    fn from(ft: Feet) -> Self {
        Inches(ft.0 * 12.0)
    }
}

impl From<Inches> for Feet {
    fn from(inches: Inches) -> Self {
        Feet(inches.0 / 12.0)
    }
}

impl From<Meters> for Centimeters {
    fn from(m: Meters) -> Self {
        Centimeters(m.0 * 100.0)
    }
}

impl From<Centimeters> for Meters {
    fn from(cm: Centimeters) -> Self {
        Meters(cm.0 / 100.0)
    }
}

impl From<Feet> for Meters {
    fn from(ft: Feet) -> Self {
        Meters(ft.0 * METERS_PER_FOOT)
    }
}

impl From<Meters> for Feet {
    fn from(m: Meters) -> Self {
        Feet(m.0 * FEET_PER_METER)
    }
}

// ============================================================================
// Arithmetic Implementations
// ============================================================================

macro_rules! impl_arithmetic {
    ($type:ty) => {
        impl Add for $type {
            type Output = Self;
            fn add(self, rhs: Self) -> Self::Output {
                Self(self.0 + rhs.0)
            }
        }

        impl Sub for $type {
            type Output = Self;
            fn sub(self, rhs: Self) -> Self::Output {
                Self(self.0 - rhs.0)
            }
        }

        impl $type {
            /// Get the raw f64 value
            pub fn value(self) -> f64 {
                self.0
            }
        }
    };
}

impl_arithmetic!(Feet);
impl_arithmetic!(Inches);
impl_arithmetic!(Meters);
impl_arithmetic!(Centimeters);
