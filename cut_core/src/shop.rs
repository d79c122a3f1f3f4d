//! # Shop Data and Job Workflow
//!
//! The `Shop` struct is the root container for a cutting counter's data:
//! its materials, its jobs and its pricing settings. Shops serialize to
//! `.cuts` files as human-readable JSON (see [`crate::file_io`]).
//!
//! ## Structure
//!
//! ```text
//! Shop
//! ├── meta: ShopMetadata (version, name, timestamps)
//! ├── settings: ShopSettings (pricing policy, default unit)
//! ├── materials: HashMap<Uuid, Material>
//! └── jobs: HashMap<Uuid, CutJob>
//! ```
//!
//! ## Job Creation
//!
//! [`Shop::create_job`] runs the order flow:
//! parse length → convert to the material's unit → check stock → price →
//! store the job and decrement stock.
//!
//! ## Example
//!
//! ```rust
//! use cut_core::materials::{Material, MaterialType};
//! use cut_core::shop::{JobRequest, Shop};
//! use cut_core::units::MeasurementUnit;
//!
//! let mut shop = Shop::new("Main St Hardware");
//! let pine = shop.add_material(
//!     Material::new("2x4 SPF Stud", MaterialType::Wood, MeasurementUnit::Imperial)
//!         .with_unit_cost(10.0)
//!         .with_stock(50.0, 10.0),
//! ).unwrap();
//!
//! let request = JobRequest::new("Dana Reyes", pine.to_string(), "5'", 2);
//! let job_id = shop.create_job(&request).unwrap();
//!
//! assert_eq!(shop.jobs[&job_id].total_cost(), 144.375);
//! assert_eq!(shop.materials[&pine].current_stock, 40.0);
//! ```

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::errors::{CutError, CutResult};
use crate::jobs::{generate_order_code, CutJob, JobStatus};
use crate::materials::Material;
use crate::measurement::{format_measurement, parse_length};
use crate::pricing::{price_job, CostBreakdown, PricingConfig};
use crate::stock::{snap_stock, StockCheck};
use crate::units::{convert_measurement, MeasurementUnit};

/// Current schema version for .cuts files
pub const SCHEMA_VERSION: &str = "0.1.0";

/// Root shop container.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shop {
    /// Shop metadata (version, name, timestamps)
    pub meta: ShopMetadata,

    /// Pricing policy and defaults
    pub settings: ShopSettings,

    /// Stocked materials, keyed by UUID
    pub materials: HashMap<Uuid, Material>,

    /// Cut jobs, keyed by UUID
    pub jobs: HashMap<Uuid, CutJob>,
}

/// Shop metadata stored in the file header.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShopMetadata {
    /// Schema version (for migration compatibility)
    pub version: String,

    /// Shop or counter name printed on tickets
    pub shop_name: String,

    pub created: DateTime<Utc>,

    pub modified: DateTime<Utc>,
}

/// Shop-wide settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShopSettings {
    /// Pricing policy applied to new jobs
    #[serde(default)]
    pub pricing: PricingConfig,

    /// Unit assumed for entered lengths when none is given
    #[serde(default)]
    pub default_unit: MeasurementUnit,

    /// Whether new jobs get a printed order code
    #[serde(default = "default_true")]
    pub order_codes: bool,
}

fn default_true() -> bool {
    true
}

impl Default for ShopSettings {
    fn default() -> Self {
        ShopSettings {
            pricing: PricingConfig::default(),
            default_unit: MeasurementUnit::Imperial,
            order_codes: true,
        }
    }
}

/// An order as entered at the counter, before validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRequest {
    pub customer_name: String,

    /// Material UUID or name
    pub material: String,

    /// Length as typed (e.g., `5' 3"`, `1m 20cm`)
    pub length: String,

    /// Unit system `length` is written in; the shop default when `None`
    #[serde(default)]
    pub unit: Option<MeasurementUnit>,

    pub quantity: u32,

    #[serde(default)]
    pub notes: Option<String>,
}

impl JobRequest {
    pub fn new(
        customer_name: impl Into<String>,
        material: impl Into<String>,
        length: impl Into<String>,
        quantity: u32,
    ) -> Self {
        JobRequest {
            customer_name: customer_name.into(),
            material: material.into(),
            length: length.into(),
            unit: None,
            quantity,
            notes: None,
        }
    }

    /// Builder: set the unit system the length is written in
    pub fn with_unit(mut self, unit: MeasurementUnit) -> Self {
        self.unit = Some(unit);
        self
    }

    /// Builder: attach notes
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

/// A validated, priced request that has not been stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobQuote {
    pub material_id: Uuid,

    /// Piece length in the material's unit
    pub length: f64,

    pub quantity: u32,

    pub measurement_unit: MeasurementUnit,

    pub stock: StockCheck,

    pub cost: CostBreakdown,
}

impl Shop {
    /// Create a new empty shop.
    pub fn new(shop_name: impl Into<String>) -> Self {
        let now = Utc::now();
        Shop {
            meta: ShopMetadata {
                version: SCHEMA_VERSION.to_string(),
                shop_name: shop_name.into(),
                created: now,
                modified: now,
            },
            settings: ShopSettings::default(),
            materials: HashMap::new(),
            jobs: HashMap::new(),
        }
    }

    /// Update the modified timestamp.
    pub fn touch(&mut self) {
        self.meta.modified = Utc::now();
    }

    /// Check the pricing policy and every material.
    ///
    /// Shops built through [`Shop::add_material`] always pass; a hand-edited
    /// file may not.
    pub fn validate(&self) -> CutResult<()> {
        self.settings.pricing.validate()?;
        for material in self.materials.values() {
            material.validate()?;
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Materials
    // ------------------------------------------------------------------

    /// Validate and add a material. Returns its UUID.
    ///
    /// Names are unique ignoring case, since jobs may name their material.
    pub fn add_material(&mut self, material: Material) -> CutResult<Uuid> {
        material.validate()?;
        let name = material.name.trim();
        if self.materials.values().any(|m| m.name.trim().eq_ignore_ascii_case(name)) {
            return Err(CutError::invalid_input(
                "name",
                name,
                "A material with this name already exists",
            ));
        }
        let id = material.id;
        info!(material = %material.name, %id, "added material");
        self.materials.insert(id, material);
        self.touch();
        Ok(id)
    }

    /// Remove a material by UUID.
    ///
    /// Existing jobs keep their own snapshot and are not affected.
    pub fn remove_material(&mut self, id: &Uuid) -> Option<Material> {
        let material = self.materials.remove(id);
        if material.is_some() {
            self.touch();
        }
        material
    }

    /// Get a material by UUID.
    pub fn get_material(&self, id: &Uuid) -> Option<&Material> {
        self.materials.get(id)
    }

    /// Find a material by UUID string or case-insensitive name.
    pub fn find_material(&self, key: &str) -> CutResult<&Material> {
        let key = key.trim();
        if let Ok(id) = Uuid::parse_str(key) {
            if let Some(material) = self.materials.get(&id) {
                return Ok(material);
            }
        }
        self.materials
            .values()
            .find(|m| m.name.eq_ignore_ascii_case(key))
            .ok_or_else(|| CutError::material_not_found(key))
    }

    /// Add `amount` (in the material's own unit) to a material's stock.
    pub fn restock(&mut self, id: &Uuid, amount: f64) -> CutResult<f64> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(CutError::invalid_input(
                "amount",
                amount.to_string(),
                "Restock amount must be positive",
            ));
        }
        let material = self
            .materials
            .get_mut(id)
            .ok_or_else(|| CutError::material_not_found(id.to_string()))?;
        material.current_stock = snap_stock(material.current_stock + amount);
        let stock = material.current_stock;
        info!(material = %material.name, added = amount, stock, "restocked");
        self.touch();
        Ok(stock)
    }

    /// Materials at or below their reorder threshold, sorted by name.
    pub fn materials_needing_reorder(&self) -> Vec<&Material> {
        let mut low: Vec<&Material> = self.materials.values().filter(|m| m.needs_reorder()).collect();
        low.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        low
    }

    // ------------------------------------------------------------------
    // Jobs
    // ------------------------------------------------------------------

    /// Validate and price a request without changing the shop.
    ///
    /// The returned quote may carry an insufficient stock status; only
    /// [`Shop::create_job`] refuses it.
    pub fn quote(&self, request: &JobRequest) -> CutResult<JobQuote> {
        if request.customer_name.trim().is_empty() {
            return Err(CutError::missing_field("customer_name"));
        }
        if request.quantity == 0 {
            return Err(CutError::invalid_input(
                "quantity",
                "0",
                "Quantity must be at least 1",
            ));
        }

        let material = self.find_material(&request.material)?;

        let input_unit = request.unit.unwrap_or(self.settings.default_unit);
        let entered = parse_length(&request.length, input_unit).ok_or_else(|| {
            CutError::invalid_input(
                "length",
                request.length.clone(),
                format!("Could not read a {} length", input_unit),
            )
        })?;
        let length = convert_measurement(entered, input_unit, material.measurement_unit);
        if !length.is_finite() || length <= 0.0 {
            return Err(CutError::invalid_input(
                "length",
                request.length.clone(),
                "Length must be positive",
            ));
        }

        let stock = material.stock_status(length, request.quantity);
        let cost = price_job(material.unit_cost, length, request.quantity, &self.settings.pricing)?;

        debug!(
            material = %material.name,
            length,
            quantity = request.quantity,
            status = %stock.status,
            total = cost.total_cost,
            "quoted job"
        );

        Ok(JobQuote {
            material_id: material.id,
            length,
            quantity: request.quantity,
            measurement_unit: material.measurement_unit,
            stock,
            cost,
        })
    }

    /// Create a job, decrementing the material's stock.
    ///
    /// # Returns
    ///
    /// * `Ok(Uuid)` - ID of the new job
    /// * `Err(CutError::InsufficientStock)` - Not enough material on hand
    /// * `Err(_)` - The request did not validate (see [`Shop::quote`])
    pub fn create_job(&mut self, request: &JobRequest) -> CutResult<Uuid> {
        let quote = self.quote(request)?;

        let material = self
            .materials
            .get_mut(&quote.material_id)
            .ok_or_else(|| CutError::material_not_found(quote.material_id.to_string()))?;

        let Some(remaining) = quote.stock.remaining() else {
            return Err(CutError::insufficient_stock(
                material.name.clone(),
                format_measurement(quote.stock.needed, material.measurement_unit),
                format_measurement(material.current_stock, material.measurement_unit),
            ));
        };

        let mut job = CutJob::new(
            request.customer_name.trim(),
            material.clone(),
            quote.length,
            quote.quantity,
            quote.cost,
        );
        if self.settings.order_codes {
            job = job.with_order_code(generate_order_code());
        }
        if let Some(notes) = request.notes.as_deref().map(str::trim).filter(|n| !n.is_empty()) {
            job = job.with_notes(notes);
        }

        material.current_stock = remaining;
        if material.needs_reorder() {
            warn!(
                material = %material.name,
                stock = %material.stock_display(),
                "material at or below reorder threshold"
            );
        }

        let id = job.id;
        info!(job = %job.label(), customer = %job.customer_name, total = job.total_cost(), "created job");
        self.jobs.insert(id, job);
        self.touch();
        Ok(id)
    }

    /// Get a job by UUID.
    pub fn get_job(&self, id: &Uuid) -> Option<&CutJob> {
        self.jobs.get(id)
    }

    /// Find a job by UUID string or order code (case-insensitive).
    ///
    /// Order codes may collide; the oldest matching job wins.
    pub fn find_job(&self, key: &str) -> CutResult<&CutJob> {
        let key = key.trim();
        if let Ok(id) = Uuid::parse_str(key) {
            if let Some(job) = self.jobs.get(&id) {
                return Ok(job);
            }
        }
        self.jobs
            .values()
            .filter(|j| j.order_code.as_deref().is_some_and(|c| c.eq_ignore_ascii_case(key)))
            .min_by_key(|j| j.created_at)
            .ok_or_else(|| CutError::job_not_found(key))
    }

    /// Set a job's status. Stock is not adjusted.
    pub fn set_job_status(&mut self, id: &Uuid, status: JobStatus) -> CutResult<()> {
        let job = self
            .jobs
            .get_mut(id)
            .ok_or_else(|| CutError::job_not_found(id.to_string()))?;
        job.set_status(status);
        info!(job = %job.label(), %status, "job status changed");
        self.touch();
        Ok(())
    }

    /// Jobs with the given status, oldest first.
    pub fn jobs_by_status(&self, status: JobStatus) -> Vec<&CutJob> {
        let mut jobs: Vec<&CutJob> = self.jobs.values().filter(|j| j.status == status).collect();
        jobs.sort_by_key(|j| j.created_at);
        jobs
    }

    /// All jobs, oldest first.
    pub fn jobs_sorted(&self) -> Vec<&CutJob> {
        let mut jobs: Vec<&CutJob> = self.jobs.values().collect();
        jobs.sort_by_key(|j| j.created_at);
        jobs
    }
}

impl Default for Shop {
    fn default() -> Self {
        Shop::new("")
    }
}
