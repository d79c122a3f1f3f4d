//! # Stock Evaluator
//!
//! Classifies whether a material has enough stock for a requested cut.
//!
//! Requested values must already be in the material's own unit; no
//! conversion happens here. Rules, first match wins:
//!
//! 1. needed (`length × quantity`) > current stock → [`StockStatus::Insufficient`]
//! 2. current stock ≤ reorder threshold → [`StockStatus::Low`]
//! 3. otherwise → [`StockStatus::Sufficient`]
//!
//! A job that needs exactly the remaining stock is still sufficient.
//! Quantities are compared at [`STOCK_RESOLUTION`] of the canonical unit, so
//! float noise from unit conversion or repeated cuts never refuses such a job.
//!
//! ## Example
//!
//! ```rust
//! use cut_core::stock::{get_stock_status, StockStatus};
//!
//! let check = get_stock_status(10.0, 5.0, 2.0, 5);
//! assert_eq!(check.status, StockStatus::Sufficient);
//! assert_eq!(check.needed, 10.0);
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

const STEPS_PER_UNIT: f64 = 1e9;

/// Smallest stock quantity the evaluator distinguishes, in the canonical unit
pub const STOCK_RESOLUTION: f64 = 1.0 / STEPS_PER_UNIT;

/// Round a stock quantity to [`STOCK_RESOLUTION`].
///
/// Non-finite values pass through unchanged.
pub fn snap_stock(value: f64) -> f64 {
    if !value.is_finite() {
        return value;
    }
    (value * STEPS_PER_UNIT).round() / STEPS_PER_UNIT
}

/// Tri-state stock availability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StockStatus {
    /// Enough stock, and stock is above the reorder threshold
    Sufficient,
    /// Enough stock for this job, but the material is at or below its reorder threshold
    Low,
    /// Not enough stock to fill the job
    Insufficient,
}

impl StockStatus {
    /// Stable user-facing message
    pub fn message(&self) -> &'static str {
        match self {
            StockStatus::Sufficient => "Sufficient stock available",
            StockStatus::Low => "Low stock - reorder soon",
            StockStatus::Insufficient => "Insufficient stock for this job",
        }
    }

    /// Display color hint for badges and warnings
    pub fn color(&self) -> &'static str {
        match self {
            StockStatus::Sufficient => "green",
            StockStatus::Low => "orange",
            StockStatus::Insufficient => "red",
        }
    }

    /// Whether a job may be submitted with this status
    pub fn allows_job(&self) -> bool {
        !matches!(self, StockStatus::Insufficient)
    }
}

impl fmt::Display for StockStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StockStatus::Sufficient => write!(f, "sufficient"),
            StockStatus::Low => write!(f, "low"),
            StockStatus::Insufficient => write!(f, "insufficient"),
        }
    }
}

/// Result of a stock check.
///
/// ## JSON Example
///
/// ```json
/// {
///   "status": "low",
///   "needed": 1.0,
///   "current_stock": 4.0,
///   "message": "Low stock - reorder soon",
///   "color": "orange"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockCheck {
    /// Availability classification
    pub status: StockStatus,
    /// Total length the job consumes (length × quantity)
    pub needed: f64,
    /// Stock on hand at the time of the check
    pub current_stock: f64,
    /// Stable message for display
    pub message: String,
    /// Display color hint
    pub color: String,
}

impl StockCheck {
    fn new(status: StockStatus, needed: f64, current_stock: f64) -> Self {
        StockCheck {
            status,
            needed,
            current_stock,
            message: status.message().to_string(),
            color: status.color().to_string(),
        }
    }

    /// Stock left after the job, if it can be filled
    pub fn remaining(&self) -> Option<f64> {
        if self.status.allows_job() {
            Some(snap_stock(self.current_stock - self.needed).max(0.0))
        } else {
            None
        }
    }
}

/// Classify stock availability for `requested_quantity` pieces of `requested_length`.
///
/// A NaN or infinite request is reported as insufficient so it can never
/// pass as a fillable job.
pub fn get_stock_status(
    current_stock: f64,
    reorder_threshold: f64,
    requested_length: f64,
    requested_quantity: u32,
) -> StockCheck {
    let needed = requested_length * f64::from(requested_quantity);

    let status = if !needed.is_finite()
        || !current_stock.is_finite()
        || snap_stock(needed) > snap_stock(current_stock)
    {
        StockStatus::Insufficient
    } else if snap_stock(current_stock) <= snap_stock(reorder_threshold) {
        StockStatus::Low
    } else {
        StockStatus::Sufficient
    };

    StockCheck::new(status, needed, current_stock)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_stock_is_sufficient() {
        let check = get_stock_status(10.0, 5.0, 2.0, 5);
        assert_eq!(check.needed, 10.0);
        assert_eq!(check.status, StockStatus::Sufficient);
        assert_eq!(check.remaining(), Some(0.0));
    }

    #[test]
    fn test_over_request_is_insufficient() {
        let check = get_stock_status(10.0, 5.0, 2.0, 6);
        assert_eq!(check.needed, 12.0);
        assert_eq!(check.status, StockStatus::Insufficient);
        assert_eq!(check.remaining(), None);
        assert!(!check.status.allows_job());
    }

    #[test]
    fn test_below_threshold_is_low() {
        let check = get_stock_status(4.0, 5.0, 1.0, 1);
        assert_eq!(check.status, StockStatus::Low);
        assert_eq!(check.color, "orange");
        assert!(check.status.allows_job());
    }

    #[test]
    fn test_at_threshold_is_low() {
        let check = get_stock_status(5.0, 5.0, 1.0, 1);
        assert_eq!(check.status, StockStatus::Low);
    }

    #[test]
    fn test_insufficient_wins_over_low() {
        let check = get_stock_status(4.0, 5.0, 3.0, 2);
        assert_eq!(check.status, StockStatus::Insufficient);
    }

    #[test]
    fn test_job_that_would_cross_threshold_is_still_sufficient() {
        // 20 on hand, threshold 5, job takes 18: the status reflects the
        // current level only
        let check = get_stock_status(20.0, 5.0, 9.0, 2);
        assert_eq!(check.status, StockStatus::Sufficient);
    }

    #[test]
    fn test_nan_request_is_insufficient() {
        let check = get_stock_status(10.0, 5.0, f64::NAN, 1);
        assert_eq!(check.status, StockStatus::Insufficient);
    }

    #[test]
    fn test_conversion_noise_does_not_refuse_exact_stock() {
        // 3 x 10cm is 0.30000000000000004 in f64
        let check = get_stock_status(0.3, 0.0, 0.1, 3);
        assert_eq!(check.status, StockStatus::Sufficient);
        assert_eq!(check.remaining(), Some(0.0));
    }

    #[test]
    fn test_repeated_small_cuts_drain_stock() {
        let inch = 1.0 / 12.0;
        let mut stock = 1.0;
        for _ in 0..12 {
            let check = get_stock_status(stock, 0.0, inch, 1);
            assert!(check.status.allows_job(), "refused with {} left", stock);
            stock = check.remaining().unwrap();
        }
        assert!(stock < 1e-6);
        assert_eq!(get_stock_status(stock, 0.0, inch, 1).status, StockStatus::Insufficient);
    }

    #[test]
    fn test_snap_stock() {
        assert_eq!(snap_stock(0.1 * 3.0), snap_stock(0.3));
        assert!(snap_stock(f64::NAN).is_nan());
        assert_eq!(snap_stock(2.5), 2.5);
    }

    #[test]
    fn test_messages_are_stable() {
        assert_eq!(StockStatus::Sufficient.message(), "Sufficient stock available");
        assert_eq!(StockStatus::Low.message(), "Low stock - reorder soon");
        assert_eq!(StockStatus::Insufficient.message(), "Insufficient stock for this job");
        assert_eq!(StockStatus::Insufficient.color(), "red");
    }

    #[test]
    fn test_serialization() {
        let check = get_stock_status(4.0, 5.0, 1.0, 1);
        let json = serde_json::to_string(&check).unwrap();
        assert!(json.contains("\"status\":\"low\""));
        let roundtrip: StockCheck = serde_json::from_str(&json).unwrap();
        assert_eq!(check, roundtrip);
    }
}
