//! # Unit Types
//!
//! Type-safe wrappers for the SI units used by core testing. They are plain
//! `f64` newtypes that serialize as bare numbers.
//!
//! - Length: millimetres (mm)
//! - Area: square millimetres (mm²)
//! - Force: newtons (N), kilonewtons (kN = 1000 N)
//! - Stress: megapascals (MPa = N/mm²)
//!
//! ## Example
//!
//! ```rust
//! use strength_core::units::{Kilonewtons, Newtons, SquareMillimeters};
//!
//! let load: Newtons = Kilonewtons(175.0).into();
//! assert_eq!(load.0, 175000.0);
//!
//! let stress = load / SquareMillimeters(1000.0);
//! assert_eq!(stress.0, 175.0);
//! ```

use serde::{Deserialize, Serialize};
use std::ops::{Div, Mul};

// ============================================================================
// Length and Area
// ============================================================================

/// Length in millimetres
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Millimeters(pub f64);

/// Area in square millimetres
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SquareMillimeters(pub f64);

impl Div for Millimeters {
    type Output = f64;

    /// Ratio of two lengths (dimensionless)
    fn div(self, rhs: Millimeters) -> f64 {
        self.0 / rhs.0
    }
}

// ============================================================================
// Force
// ============================================================================

/// Force in newtons
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Newtons(pub f64);

/// Force in kilonewtons (1 kN = 1000 N)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Kilonewtons(pub f64);

impl From<Kilonewtons> for Newtons {
    fn from(kn: Kilonewtons) -> Self {
        Newtons(kn.0 * 1000.0)
    }
}

impl From<Newtons> for Kilonewtons {
    fn from(n: Newtons) -> Self {
        Kilonewtons(n.0 / 1000.0)
    }
}

// ============================================================================
// Stress
// ============================================================================

/// Stress in megapascals (N/mm²)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Megapascals(pub f64);

impl Div<SquareMillimeters> for Newtons {
    type Output = Megapascals;

    fn div(self, rhs: SquareMillimeters) -> Megapascals {
        Megapascals(self.0 / rhs.0)
    }
}

impl Mul<f64> for Megapascals {
    type Output = Megapascals;

    fn mul(self, rhs: f64) -> Megapascals {
        Megapascals(self.0 * rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_force_conversions() {
        let n: Newtons = Kilonewtons(2.5).into();
        assert_eq!(n.0, 2500.0);

        let kn: Kilonewtons = Newtons(750.0).into();
        assert!((kn.0 - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_stress_from_force_over_area() {
        let stress = Newtons(175000.0) / SquareMillimeters(3500.0);
        assert!((stress.0 - 50.0).abs() < 1e-9);
        assert!(((stress * 1.06).0 - 53.0).abs() < 1e-9);
    }

    #[test]
    fn test_length_ratio() {
        assert_eq!(Millimeters(150.0) / Millimeters(75.0), 2.0);
    }

    #[test]
    fn test_transparent_serialization() {
        let json = serde_json::to_string(&Megapascals(37.5)).unwrap();
        assert_eq!(json, "37.5");
    }
}
