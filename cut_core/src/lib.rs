//! # cut_core - Cut & Order Engine
//!
//! `cut_core` is the computational heart of the Cut & Order manager: a
//! hardware-store cutting counter where customers order material cut to
//! length. It parses and formats lengths, prices jobs, checks stock, and
//! keeps the shop's materials and jobs in a JSON file.
//!
//! ## Design Philosophy
//!
//! - **Pure core**: measurement, pricing and stock checks are side-effect-free functions
//! - **Explicit failure**: unreadable lengths are `None`, unpriceable jobs a zero breakdown
//! - **JSON-First**: all records implement Serialize/Deserialize
//! - **No globals**: the [`Shop`] is built by the caller and passed by reference
//!
//! ## Quick Start
//!
//! ```rust
//! use cut_core::measurement::parse_feet_inches;
//! use cut_core::pricing::{calculate_job_cost, PricingConfig};
//! use cut_core::stock::{get_stock_status, StockStatus};
//!
//! let length = parse_feet_inches("5'").expect("readable length");
//! let stock = get_stock_status(50.0, 10.0, length, 2);
//! assert_eq!(stock.status, StockStatus::Sufficient);
//!
//! let cost = calculate_job_cost(10.0, length, 2, &PricingConfig::default());
//! assert_eq!(cost.total_cost, 144.375);
//! ```
//!
//! ## Modules
//!
//! - [`units`] - Measurement systems and unit conversion
//! - [`measurement`] - Length string parsing and formatting
//! - [`pricing`] - Job cost breakdown
//! - [`stock`] - Stock availability classification
//! - [`materials`] - Stocked materials
//! - [`jobs`] - Cut jobs and order codes
//! - [`shop`] - Shop container and the job creation workflow
//! - [`file_io`] - Shop files with atomic saves and locking
//! - [`errors`] - Structured error types

pub mod errors;
pub mod file_io;
pub mod jobs;
pub mod materials;
pub mod measurement;
pub mod pricing;
pub mod shop;
pub mod stock;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use errors::{CutError, CutResult};
pub use file_io::{create_shop_file, load_shop, save_shop, FileLock};
pub use jobs::{CutJob, JobStatus};
pub use materials::{Material, MaterialType};
pub use measurement::{format_measurement, parse_feet_inches, parse_length, parse_meters_cm};
pub use pricing::{calculate_job_cost, price_job, CostBreakdown, PricingConfig};
pub use shop::{JobQuote, JobRequest, Shop, ShopMetadata, ShopSettings};
pub use stock::{get_stock_status, StockCheck, StockStatus};
pub use units::{convert_measurement, MeasurementUnit};
