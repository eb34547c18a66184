//! # strength_core - Concrete Core Strength Evaluation Engine
//!
//! `strength_core` turns the measurements of a drilled concrete core
//! (diameter, length, crushing load, specified grade) into a corrected
//! compressive strength and an IS 516 acceptance verdict, with every
//! intermediate value kept for the report.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: the evaluator is a pure function, safe to call from any thread
//! - **JSON-First**: all inputs and outputs implement Serialize/Deserialize
//! - **Rich Errors**: structured error types, not just strings
//! - **One rendering**: CSV and PDF exports share a single ordered field list
//!
//! ## Quick Start
//!
//! ```rust
//! use strength_core::calculations::{evaluate, Status};
//!
//! let result = evaluate(68.0, 132.0, 175.0, 50.0).unwrap();
//! assert_eq!(result.corrected_strength_mpa, 51.1);
//! assert_eq!(result.status, Status::Pass);
//!
//! let json = serde_json::to_string_pretty(&result).unwrap();
//! ```
//!
//! ## Modules
//!
//! - [`calculations`] - The core strength pipeline and rounding rule
//! - [`report`] - Ordered, labeled report fields
//! - [`export`] - CSV export and parsing
//! - [`pdf`] - Typst-based PDF reports
//! - [`project`] - Multi-sample project container and settings
//! - [`file_io`] - Atomic project and export writes
//! - [`units`] - Type-safe unit wrappers
//! - [`errors`] - Structured error types

pub mod calculations;
pub mod errors;
pub mod export;
pub mod file_io;
pub mod pdf;
pub mod project;
pub mod report;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use calculations::{calculate, evaluate, EvaluationResult, Measurement, Status};
pub use errors::{CalcError, CalcResult};
pub use file_io::{load_project, save_project, write_export};
pub use project::{CoreSample, GlobalSettings, InputFloors, Project, ProjectMetadata};
pub use report::{ReportField, ReportValue};
