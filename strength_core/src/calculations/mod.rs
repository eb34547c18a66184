//! # Strength Calculations
//!
//! Each calculation follows the pattern:
//!
//! - an input struct (JSON-serializable)
//! - a result struct (JSON-serializable)
//! - `calculate(&input) -> CalcResult<Result>`, a pure function
//!
//! ## Available Calculations
//!
//! - [`core_strength`] - Drilled core compressive strength per IS 516
//! - [`rounding`] - The two-decimal rounding rule used by every step

pub mod core_strength;
pub mod rounding;

// Re-export commonly used types
pub use core_strength::{
    calculate, evaluate, DiameterBracket, EvaluationResult, Measurement, Status,
};
pub use rounding::round2;
