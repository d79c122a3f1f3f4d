//! # Pricing Engine
//!
//! Deterministic cost breakdown for a cut job.
//!
//! ## Algorithm
//!
//! Applied in fixed order:
//!
//! 1. `material_cost = unit_cost × length × quantity`
//! 2. `labor_cost = quantity × labor_rate_per_cut`
//! 3. `waste_cost = material_cost × waste_allowance_percent / 100`
//! 4. `subtotal = material_cost + labor_cost + waste_cost`
//! 5. `markup = subtotal × markup_percent / 100`
//! 6. `total_cost = subtotal + markup`
//!
//! Labor is billed per piece cut, not per unit length.
//!
//! Values are kept at full precision; rounding to cents happens only when a
//! breakdown is displayed.
//!
//! ## Example
//!
//! ```rust
//! use cut_core::pricing::{calculate_job_cost, PricingConfig};
//!
//! let cost = calculate_job_cost(10.0, 5.0, 2, &PricingConfig::default());
//! assert_eq!(cost.material_cost, 100.0);
//! assert_eq!(cost.labor_cost, 0.5);
//! assert_eq!(cost.total_cost, 144.375);
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{CutError, CutResult};

/// Default labor charge per piece cut
pub const DEFAULT_LABOR_RATE_PER_CUT: f64 = 0.25;

/// Default waste allowance as a percentage of material cost
pub const DEFAULT_WASTE_ALLOWANCE_PERCENT: f64 = 15.0;

/// Default markup as a percentage of the subtotal
pub const DEFAULT_MARKUP_PERCENT: f64 = 25.0;

/// Shop pricing policy.
///
/// ## JSON Example
///
/// ```json
/// {
///   "labor_rate_per_cut": 0.25,
///   "waste_allowance_percent": 15.0,
///   "markup_percent": 25.0
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricingConfig {
    /// Currency charged for each piece cut
    pub labor_rate_per_cut: f64,

    /// Surcharge on material cost for offcuts and kerf (percent)
    pub waste_allowance_percent: f64,

    /// Margin applied to the subtotal (percent)
    pub markup_percent: f64,
}

impl Default for PricingConfig {
    fn default() -> Self {
        PricingConfig {
            labor_rate_per_cut: DEFAULT_LABOR_RATE_PER_CUT,
            waste_allowance_percent: DEFAULT_WASTE_ALLOWANCE_PERCENT,
            markup_percent: DEFAULT_MARKUP_PERCENT,
        }
    }
}

impl PricingConfig {
    /// Validate the pricing policy.
    ///
    /// Rates must be finite and non-negative.
    pub fn validate(&self) -> CutResult<()> {
        let fields = [
            ("labor_rate_per_cut", self.labor_rate_per_cut),
            ("waste_allowance_percent", self.waste_allowance_percent),
            ("markup_percent", self.markup_percent),
        ];
        for (field, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(CutError::invalid_input(
                    field,
                    value.to_string(),
                    "Rate must be a non-negative number",
                ));
            }
        }
        Ok(())
    }
}

/// Full cost breakdown for a job.
///
/// Callers display every field, never only the total.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CostBreakdown {
    /// Raw material cost
    pub material_cost: f64,
    /// Per-piece cutting charge
    pub labor_cost: f64,
    /// Waste allowance on material
    pub waste_cost: f64,
    /// Material + labor + waste
    pub subtotal: f64,
    /// Margin on the subtotal
    pub markup: f64,
    /// Amount charged to the customer
    pub total_cost: f64,
}

impl CostBreakdown {
    /// The breakdown returned for invalid input.
    pub fn zero() -> Self {
        CostBreakdown::default()
    }

    /// Whether every field is zero.
    ///
    /// [`calculate_job_cost`] returns a zero breakdown for inputs it cannot
    /// price, but a free job with no labor charge is zero too. Use
    /// [`price_job`] when the difference matters.
    pub fn is_zero(&self) -> bool {
        *self == CostBreakdown::zero()
    }
}

impl fmt::Display for CostBreakdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Material: {:>10}", format_currency(self.material_cost))?;
        writeln!(f, "Labor:    {:>10}", format_currency(self.labor_cost))?;
        writeln!(f, "Waste:    {:>10}", format_currency(self.waste_cost))?;
        writeln!(f, "Subtotal: {:>10}", format_currency(self.subtotal))?;
        writeln!(f, "Markup:   {:>10}", format_currency(self.markup))?;
        write!(f, "Total:    {:>10}", format_currency(self.total_cost))
    }
}

/// Round to whole cents, halves away from zero.
pub fn round_to_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

/// Format an amount as dollars and cents (e.g. `$144.38`).
pub fn format_currency(amount: f64) -> String {
    // Adding 0.0 turns -0.0 into 0.0
    let cents = round_to_cents(amount) + 0.0;
    if cents < 0.0 {
        format!("-${:.2}", -cents)
    } else {
        format!("${:.2}", cents)
    }
}

/// Compute the cost breakdown for `quantity` pieces of `length` each.
///
/// `length` must be in the same canonical unit `unit_cost` is quoted in.
/// Returns [`CostBreakdown::zero`] when `length <= 0`, `quantity == 0`, any
/// input is NaN or infinite, the unit cost is negative, or `config` does not
/// validate.
pub fn calculate_job_cost(unit_cost: f64, length: f64, quantity: u32, config: &PricingConfig) -> CostBreakdown {
    price_job(unit_cost, length, quantity, config).unwrap_or_else(|_| CostBreakdown::zero())
}

/// Like [`calculate_job_cost`], but reports why a job cannot be priced.
///
/// # Returns
///
/// * `Ok(CostBreakdown)` - The breakdown; all zero only for a genuinely free job
/// * `Err(CutError::InvalidInput)` - The input or pricing policy is unusable
pub fn price_job(unit_cost: f64, length: f64, quantity: u32, config: &PricingConfig) -> CutResult<CostBreakdown> {
    if !unit_cost.is_finite() || unit_cost < 0.0 {
        return Err(CutError::invalid_input(
            "unit_cost",
            unit_cost.to_string(),
            "Unit cost must be a non-negative number",
        ));
    }
    if !length.is_finite() || length <= 0.0 {
        return Err(CutError::invalid_input("length", length.to_string(), "Length must be positive"));
    }
    if quantity == 0 {
        return Err(CutError::invalid_input("quantity", "0", "Quantity must be at least 1"));
    }
    config.validate()?;

    let pieces = f64::from(quantity);

    let material_cost = unit_cost * length * pieces;
    let labor_cost = pieces * config.labor_rate_per_cut;
    let waste_cost = material_cost * (config.waste_allowance_percent / 100.0);
    let subtotal = material_cost + labor_cost + waste_cost;
    let markup = subtotal * (config.markup_percent / 100.0);
    let total_cost = subtotal + markup;

    if !total_cost.is_finite() {
        return Err(CutError::invalid_input(
            "total_cost",
            total_cost.to_string(),
            "Cost is too large to represent",
        ));
    }

    Ok(CostBreakdown {
        material_cost,
        labor_cost,
        waste_cost,
        subtotal,
        markup,
        total_cost,
    })
}
