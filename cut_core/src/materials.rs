//! # Materials
//!
//! Stock materials the shop cuts to order.
//!
//! Stock and reorder threshold are always in the material's own
//! [`MeasurementUnit`] (feet for imperial, meters for metric); `unit_cost` is
//! currency per one of those units.
//!
//! ## Example
//!
//! ```rust
//! use cut_core::materials::{Material, MaterialType};
//! use cut_core::stock::StockStatus;
//! use cut_core::units::MeasurementUnit;
//!
//! let pine = Material::new("2x4 SPF Stud", MaterialType::Wood, MeasurementUnit::Imperial)
//!     .with_unit_cost(0.85)
//!     .with_stock(240.0, 48.0)
//!     .with_supplier("Northern Lumber");
//!
//! assert_eq!(pine.stock_status(8.0, 4).status, StockStatus::Sufficient);
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{CutError, CutResult};
use crate::measurement::format_measurement;
use crate::stock::{get_stock_status, StockCheck};
use crate::units::MeasurementUnit;

/// Broad material category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaterialType {
    Wood,
    Metal,
    #[default]
    Other,
}

impl MaterialType {
    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            MaterialType::Wood => "Wood",
            MaterialType::Metal => "Metal",
            MaterialType::Other => "Other",
        }
    }
}

impl fmt::Display for MaterialType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MaterialType::Wood => write!(f, "wood"),
            MaterialType::Metal => write!(f, "metal"),
            MaterialType::Other => write!(f, "other"),
        }
    }
}

impl FromStr for MaterialType {
    type Err = CutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "wood" | "lumber" | "timber" => Ok(MaterialType::Wood),
            "metal" | "steel" | "aluminum" | "aluminium" => Ok(MaterialType::Metal),
            "other" => Ok(MaterialType::Other),
            _ => Err(CutError::invalid_input(
                "material_type",
                s,
                "Expected 'wood', 'metal' or 'other'",
            )),
        }
    }
}

/// A stocked material.
///
/// ## JSON Example
///
/// ```json
/// {
///   "id": "4b1c0a5e-8f0e-4c1e-9d7a-2f1f3f6b8a10",
///   "name": "1/2\" EMT Conduit",
///   "material_type": "metal",
///   "unit_cost": 0.62,
///   "current_stock": 300.0,
///   "reorder_threshold": 50.0,
///   "supplier": "Metro Electric Supply",
///   "measurement_unit": "imperial"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub id: Uuid,

    /// Display name (e.g., "2x4 SPF Stud")
    pub name: String,

    pub material_type: MaterialType,

    /// Currency per canonical length unit
    pub unit_cost: f64,

    /// Stock on hand, in `measurement_unit`
    pub current_stock: f64,

    /// Level at or below which the material should be reordered, in `measurement_unit`
    pub reorder_threshold: f64,

    pub supplier: String,

    pub measurement_unit: MeasurementUnit,
}

impl Material {
    /// Create a material with no stock and zero cost.
    pub fn new(name: impl Into<String>, material_type: MaterialType, measurement_unit: MeasurementUnit) -> Self {
        Material {
            id: Uuid::new_v4(),
            name: name.into(),
            material_type,
            unit_cost: 0.0,
            current_stock: 0.0,
            reorder_threshold: 0.0,
            supplier: String::new(),
            measurement_unit,
        }
    }

    /// Builder: set the unit cost
    pub fn with_unit_cost(mut self, unit_cost: f64) -> Self {
        self.unit_cost = unit_cost;
        self
    }

    /// Builder: set stock on hand and reorder threshold
    pub fn with_stock(mut self, current_stock: f64, reorder_threshold: f64) -> Self {
        self.current_stock = current_stock;
        self.reorder_threshold = reorder_threshold;
        self
    }

    /// Builder: set the supplier
    pub fn with_supplier(mut self, supplier: impl Into<String>) -> Self {
        self.supplier = supplier.into();
        self
    }

    /// Validate material fields.
    pub fn validate(&self) -> CutResult<()> {
        if self.name.trim().is_empty() {
            return Err(CutError::missing_field("name"));
        }
        if !self.unit_cost.is_finite() || self.unit_cost < 0.0 {
            return Err(CutError::invalid_input(
                "unit_cost",
                self.unit_cost.to_string(),
                "Unit cost must be a non-negative number",
            ));
        }
        if !self.current_stock.is_finite() || self.current_stock < 0.0 {
            return Err(CutError::invalid_input(
                "current_stock",
                self.current_stock.to_string(),
                "Stock cannot be negative",
            ));
        }
        if !self.reorder_threshold.is_finite() || self.reorder_threshold < 0.0 {
            return Err(CutError::invalid_input(
                "reorder_threshold",
                self.reorder_threshold.to_string(),
                "Reorder threshold cannot be negative",
            ));
        }
        Ok(())
    }

    /// Check stock for a cut already expressed in this material's unit.
    pub fn stock_status(&self, length: f64, quantity: u32) -> StockCheck {
        get_stock_status(self.current_stock, self.reorder_threshold, length, quantity)
    }

    /// Whether stock is at or below the reorder threshold
    pub fn needs_reorder(&self) -> bool {
        self.current_stock <= self.reorder_threshold
    }

    /// Stock on hand formatted in the material's unit (e.g., `240'`)
    pub fn stock_display(&self) -> String {
        format_measurement(self.current_stock, self.measurement_unit)
    }
}
