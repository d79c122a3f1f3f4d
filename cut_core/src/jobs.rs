//! # Cut Jobs
//!
//! A `CutJob` is a customer order for `quantity` pieces of a material cut to
//! `length`. Jobs keep a snapshot of the material as it was when ordered, so
//! later price or stock changes never alter historical jobs.
//!
//! Status has no enforced transition table; any status may be set from any
//! other.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::CutError;
use crate::materials::Material;
use crate::measurement::format_measurement;
use crate::pricing::CostBreakdown;
use crate::units::MeasurementUnit;

/// Characters used in printed order codes
const ORDER_CODE_ALPHABET: &[u8; 36] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Length of a printed order code
pub const ORDER_CODE_LEN: usize = 4;

/// Generate a short order code for tickets (e.g., `"K7Q2"`).
///
/// Codes are random, not unique: two jobs may share a code.
pub fn generate_order_code() -> String {
    Uuid::new_v4()
        .as_bytes()
        .iter()
        .take(ORDER_CODE_LEN)
        .map(|b| ORDER_CODE_ALPHABET[usize::from(*b) % ORDER_CODE_ALPHABET.len()] as char)
        .collect()
}

/// Job lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    #[default]
    Pending,
    Completed,
    Cancelled,
}

impl JobStatus {
    /// Every status, in lifecycle order
    pub const ALL: [JobStatus; 3] = [JobStatus::Pending, JobStatus::Completed, JobStatus::Cancelled];
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobStatus::Pending => write!(f, "pending"),
            JobStatus::Completed => write!(f, "completed"),
            JobStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl FromStr for JobStatus {
    type Err = CutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(JobStatus::Pending),
            "completed" | "complete" | "done" => Ok(JobStatus::Completed),
            "cancelled" | "canceled" => Ok(JobStatus::Cancelled),
            _ => Err(CutError::invalid_input(
                "status",
                s,
                "Expected 'pending', 'completed' or 'cancelled'",
            )),
        }
    }
}

/// A customer cut order.
///
/// ## JSON Example
///
/// ```json
/// {
///   "id": "9a4e1c2b-7d3f-4e5a-8b6c-1d2e3f4a5b6c",
///   "order_code": "K7Q2",
///   "customer_name": "Dana Reyes",
///   "material": { "name": "2x4 SPF Stud", "...": "..." },
///   "length": 5.0,
///   "quantity": 2,
///   "material_cost": 100.0,
///   "labor_cost": 0.5,
///   "waste_cost": 15.0,
///   "subtotal": 115.5,
///   "markup": 28.875,
///   "total_cost": 144.375,
///   "status": "pending",
///   "created_at": "2025-03-01T15:04:05Z",
///   "completed_at": null,
///   "notes": null,
///   "measurement_unit": "imperial"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CutJob {
    pub id: Uuid,

    /// Short code printed on the ticket
    #[serde(default)]
    pub order_code: Option<String>,

    pub customer_name: String,

    /// Material as it was when the job was created
    pub material: Material,

    /// Length of each piece, in the material's unit
    pub length: f64,

    /// Number of pieces
    pub quantity: u32,

    #[serde(flatten)]
    pub cost: CostBreakdown,

    #[serde(default)]
    pub status: JobStatus,

    pub created_at: DateTime<Utc>,

    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub notes: Option<String>,

    /// Unit system of `length`, inherited from the material
    pub measurement_unit: MeasurementUnit,
}

impl CutJob {
    /// Create a pending job from a material snapshot and a computed cost.
    pub fn new(
        customer_name: impl Into<String>,
        material: Material,
        length: f64,
        quantity: u32,
        cost: CostBreakdown,
    ) -> Self {
        let measurement_unit = material.measurement_unit;
        CutJob {
            id: Uuid::new_v4(),
            order_code: None,
            customer_name: customer_name.into(),
            material,
            length,
            quantity,
            cost,
            status: JobStatus::Pending,
            created_at: Utc::now(),
            completed_at: None,
            notes: None,
            measurement_unit,
        }
    }

    /// Builder: attach an order code
    pub fn with_order_code(mut self, code: impl Into<String>) -> Self {
        self.order_code = Some(code.into());
        self
    }

    /// Builder: attach notes
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Set the status.
    ///
    /// Moving to `Completed` stamps `completed_at`; moving to any other
    /// status clears it.
    pub fn set_status(&mut self, status: JobStatus) {
        self.completed_at = match status {
            JobStatus::Completed => Some(self.completed_at.unwrap_or_else(Utc::now)),
            _ => None,
        };
        self.status = status;
    }

    /// Total material consumed (length × quantity)
    pub fn total_length(&self) -> f64 {
        self.length * f64::from(self.quantity)
    }

    /// Amount charged to the customer
    pub fn total_cost(&self) -> f64 {
        self.cost.total_cost
    }

    /// Piece length formatted in the job's unit (e.g., `5' 3"`)
    pub fn length_display(&self) -> String {
        format_measurement(self.length, self.measurement_unit)
    }

    /// Short label for lists: the order code, or the first 8 characters of the id
    pub fn label(&self) -> String {
        match &self.order_code {
            Some(code) => code.clone(),
            None => self.id.simple().to_string()[..8].to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::materials::MaterialType;
    use crate::pricing::{calculate_job_cost, PricingConfig};

    fn test_job() -> CutJob {
        let material = Material::new("Oak Dowel 1\"", MaterialType::Wood, MeasurementUnit::Imperial)
            .with_unit_cost(10.0)
            .with_stock(50.0, 10.0);
        let cost = calculate_job_cost(material.unit_cost, 5.0, 2, &PricingConfig::default());
        CutJob::new("Dana Reyes", material, 5.0, 2, cost)
    }

    #[test]
    fn test_order_code_shape() {
        for _ in 0..50 {
            let code = generate_order_code();
            assert_eq!(code.len(), ORDER_CODE_LEN);
            assert!(code.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
        }
    }

    #[test]
    fn test_new_job_is_pending() {
        let job = test_job();
        assert_eq!(job.status, JobStatus::Pending);
        assert!(job.completed_at.is_none());
        assert_eq!(job.measurement_unit, MeasurementUnit::Imperial);
        assert_eq!(job.total_length(), 10.0);
        assert_eq!(job.total_cost(), 144.375);
        assert_eq!(job.length_display(), "5'");
    }

    #[test]
    fn test_status_changes_track_completion() {
        let mut job = test_job();
        job.set_status(JobStatus::Completed);
        assert!(job.completed_at.is_some());

        job.set_status(JobStatus::Pending);
        assert!(job.completed_at.is_none());

        // Any transition is allowed
        job.set_status(JobStatus::Cancelled);
        job.set_status(JobStatus::Completed);
        assert_eq!(job.status, JobStatus::Completed);
    }

    #[test]
    fn test_label() {
        let job = test_job();
        assert_eq!(job.label().len(), 8);
        let job = job.with_order_code("AB12");
        assert_eq!(job.label(), "AB12");
    }

    #[test]
    fn test_status_parsing() {
        assert_eq!("canceled".parse::<JobStatus>().unwrap(), JobStatus::Cancelled);
        assert_eq!("Completed".parse::<JobStatus>().unwrap(), JobStatus::Completed);
        assert!("shipped".parse::<JobStatus>().is_err());
    }

    #[test]
    fn test_serialization_flattens_cost() {
        let job = test_job().with_notes("Square ends");
        let json = serde_json::to_string_pretty(&job).unwrap();
        assert!(json.contains("\"total_cost\": 144.375"));
        assert!(json.contains("\"status\": \"pending\""));

        let roundtrip: CutJob = serde_json::from_str(&json).unwrap();
        assert_eq!(job, roundtrip);
    }
}
