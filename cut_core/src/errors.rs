//! # Error Types
//!
//! Structured error types for cut_core. Errors carry enough context for a
//! front end to tell the user which field or record was at fault.
//!
//! Note that the pure engine functions (`measurement`, `pricing`, `stock`)
//! never return these: parsing yields `Option`, pricing yields a zero
//! breakdown. `CutError` is for the shop workflow and file I/O.
//!
//! ## Example
//!
//! ```rust
//! use cut_core::errors::{CutError, CutResult};
//!
//! fn validate_quantity(quantity: u32) -> CutResult<()> {
//!     if quantity == 0 {
//!         return Err(CutError::InvalidInput {
//!             field: "quantity".to_string(),
//!             value: quantity.to_string(),
//!             reason: "Quantity must be at least 1".to_string(),
//!         });
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for cut_core operations
pub type CutResult<T> = Result<T, CutError>;

/// Structured error type for shop operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CutError {
    /// An input value is invalid (unparseable, out of range, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// A required field is missing
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    /// Material not found in the shop
    #[error("Material not found: {material}")]
    MaterialNotFound { material: String },

    /// Job not found in the shop
    #[error("Job not found: {job}")]
    JobNotFound { job: String },

    /// Not enough stock to fill the requested cut
    #[error("Insufficient stock of '{material}': need {needed}, have {available}")]
    InsufficientStock {
        material: String,
        needed: String,
        available: String,
    },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// File is locked by another user/process
    #[error("File locked: '{path}' is locked by {locked_by} since {locked_at}")]
    FileLocked {
        path: String,
        locked_by: String,
        locked_at: String,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Schema version mismatch
    #[error("Version mismatch: file version {file_version}, expected {expected_version}")]
    VersionMismatch {
        file_version: String,
        expected_version: String,
    },
}

impl CutError {
    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        CutError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a MissingField error
    pub fn missing_field(field: impl Into<String>) -> Self {
        CutError::MissingField {
            field: field.into(),
        }
    }

    /// Create a MaterialNotFound error
    pub fn material_not_found(material: impl Into<String>) -> Self {
        CutError::MaterialNotFound {
            material: material.into(),
        }
    }

    /// Create a JobNotFound error
    pub fn job_not_found(job: impl Into<String>) -> Self {
        CutError::JobNotFound { job: job.into() }
    }

    /// Create an InsufficientStock error
    pub fn insufficient_stock(material: impl Into<String>, needed: impl Into<String>, available: impl Into<String>) -> Self {
        CutError::InsufficientStock {
            material: material.into(),
            needed: needed.into(),
            available: available.into(),
        }
    }

    /// Create a FileError
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        CutError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a FileLocked error
    pub fn file_locked(path: impl Into<String>, locked_by: impl Into<String>, locked_at: impl Into<String>) -> Self {
        CutError::FileLocked {
            path: path.into(),
            locked_by: locked_by.into(),
            locked_at: locked_at.into(),
        }
    }

    /// Check if this is a recoverable error (e.g., can retry)
    pub fn is_recoverable(&self) -> bool {
        matches!(self, CutError::FileLocked { .. })
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CutError::InvalidInput { .. } => "INVALID_INPUT",
            CutError::MissingField { .. } => "MISSING_FIELD",
            CutError::MaterialNotFound { .. } => "MATERIAL_NOT_FOUND",
            CutError::JobNotFound { .. } => "JOB_NOT_FOUND",
            CutError::InsufficientStock { .. } => "INSUFFICIENT_STOCK",
            CutError::FileError { .. } => "FILE_ERROR",
            CutError::FileLocked { .. } => "FILE_LOCKED",
            CutError::SerializationError { .. } => "SERIALIZATION_ERROR",
            CutError::VersionMismatch { .. } => "VERSION_MISMATCH",
        }
    }
}
