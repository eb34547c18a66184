//! # Error Types
//!
//! Structured error types for strength_core. Every variant carries enough
//! context for a caller (or a front end printing JSON) to tell which value
//! was rejected and why.
//!
//! ## Example
//!
//! ```rust
//! use strength_core::errors::{CalcError, CalcResult};
//!
//! fn validate_grade(grade_mpa: f64) -> CalcResult<()> {
//!     if grade_mpa <= 0.0 {
//!         return Err(CalcError::invalid_measurement(
//!             "grade_mpa",
//!             grade_mpa.to_string(),
//!             "Grade must be positive",
//!         ));
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for strength_core operations
pub type CalcResult<T> = Result<T, CalcError>;

/// Structured error type for evaluation, export and file operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CalcError {
    /// A measurement is zero, negative, not finite, or below a configured floor
    #[error("Invalid measurement for '{field}': {value} - {reason}")]
    InvalidMeasurement {
        field: String,
        value: String,
        reason: String,
    },

    /// No core sample with this label exists in the project
    #[error("Sample not found: {label}")]
    SampleNotFound { label: String },

    /// CSV or PDF export failed
    #[error("{format} export failed: {reason}")]
    ExportFailed { format: String, reason: String },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
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

impl CalcError {
    /// Create an InvalidMeasurement error
    pub fn invalid_measurement(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        CalcError::InvalidMeasurement {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a SampleNotFound error
    pub fn sample_not_found(label: impl Into<String>) -> Self {
        CalcError::SampleNotFound {
            label: label.into(),
        }
    }

    /// Create an ExportFailed error
    pub fn export_failed(format: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::ExportFailed {
            format: format.into(),
            reason: reason.into(),
        }
    }

    /// Create a FileError
    pub fn file_error(
        operation: impl Into<String>,
        path: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        CalcError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// True for errors caused by the measurement values themselves
    pub fn is_input_error(&self) -> bool {
        matches!(self, CalcError::InvalidMeasurement { .. })
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CalcError::InvalidMeasurement { .. } => "INVALID_MEASUREMENT",
            CalcError::SampleNotFound { .. } => "SAMPLE_NOT_FOUND",
            CalcError::ExportFailed { .. } => "EXPORT_FAILED",
            CalcError::FileError { .. } => "FILE_ERROR",
            CalcError::SerializationError { .. } => "SERIALIZATION_ERROR",
            CalcError::VersionMismatch { .. } => "VERSION_MISMATCH",
        }
    }
}

impl From<serde_json::Error> for CalcError {
    fn from(e: serde_json::Error) -> Self {
        CalcError::SerializationError {
            reason: e.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = CalcError::invalid_measurement("grade_mpa", "0", "Grade must be positive");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"type\":\"InvalidMeasurement\""));

        let roundtrip: CalcError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(
            CalcError::invalid_measurement("core_diameter_mm", "0", "zero").error_code(),
            "INVALID_MEASUREMENT"
        );
        assert_eq!(CalcError::sample_not_found("C-1").error_code(), "SAMPLE_NOT_FOUND");
        assert_eq!(CalcError::export_failed("CSV", "boom").error_code(), "EXPORT_FAILED");
    }

    #[test]
    fn test_display_message() {
        let error = CalcError::invalid_measurement("load_kn", "-1", "Load must be positive");
        assert_eq!(
            error.to_string(),
            "Invalid measurement for 'load_kn': -1 - Load must be positive"
        );
        assert!(error.is_input_error());
        assert!(!CalcError::sample_not_found("C-9").is_input_error());
    }
}
