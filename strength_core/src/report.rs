//! # Report Field Mapping
//!
//! The ordered list of labeled values that every export renders. CSV and
//! PDF both consume [`EvaluationResult::report_fields`], so a value prints
//! identically in every format.
//!
//! ## Example
//!
//! ```rust
//! use strength_core::calculations::evaluate;
//!
//! let result = evaluate(68.0, 132.0, 175.0, 50.0).unwrap();
//! let fields = result.report_fields();
//!
//! assert_eq!(fields.len(), 15);
//! assert_eq!(fields[0].label, "Core Diameter (mm)");
//! assert_eq!(fields[0].value.to_string(), "68.0");
//! assert_eq!(fields[14].value.to_string(), "PASS");
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::calculations::EvaluationResult;

/// Field labels in report order.
pub const REPORT_LABELS: [&str; 15] = [
    "Core Diameter (mm)",
    "Core Length (mm)",
    "Load (kN)",
    "Load (N)",
    "Area (mm²)",
    "L/D Ratio",
    "Dia Correction Factor",
    "Raw Strength (MPa)",
    "Corrected Strength (MPa)",
    "Graph Correction Factor",
    "Graph Corrected Strength (MPa)",
    "Cube Equivalent Strength (MPa)",
    "Percent Strength vs Grade (%)",
    "Required Strength (75% of Grade)",
    "Status",
];

/// A value in the report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ReportValue {
    Number(f64),
    Text(String),
}

impl fmt::Display for ReportValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportValue::Number(v) => f.write_str(&format_number(*v)),
            ReportValue::Text(s) => f.write_str(s),
        }
    }
}

/// One labeled line of the report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportField {
    pub label: String,
    pub value: ReportValue,
}

impl ReportField {
    fn number(label: &str, value: f64) -> Self {
        ReportField {
            label: label.to_string(),
            value: ReportValue::Number(value),
        }
    }

    fn text(label: &str, value: impl Into<String>) -> Self {
        ReportField {
            label: label.to_string(),
            value: ReportValue::Text(value.into()),
        }
    }

    /// Label and rendered value
    pub fn to_pair(&self) -> (String, String) {
        (self.label.clone(), self.value.to_string())
    }
}

/// Canonical number rendering: whole numbers keep one decimal (`68.0`),
/// everything else uses the shortest exact form (`3629.84`).
pub fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}

impl EvaluationResult {
    /// The 15 report fields: the three echoed inputs interleaved with the
    /// derived values, in fixed order. Grade is not echoed.
    pub fn report_fields(&self) -> Vec<ReportField> {
        let m = &self.measurement;
        let numbers = [
            m.core_diameter_mm,
            m.core_length_mm,
            m.load_kn,
            self.load_n,
            self.area_mm2,
            self.ld_ratio_display(),
            self.dia_correction_factor,
            self.raw_strength_mpa,
            self.corrected_strength_mpa,
            self.graph_correction_factor,
            self.graph_corrected_strength_mpa,
            self.cube_equivalent_strength_mpa,
            self.percent_strength,
            self.required_strength_mpa,
        ];

        let mut fields: Vec<ReportField> = REPORT_LABELS
            .iter()
            .zip(numbers)
            .map(|(label, value)| ReportField::number(label, value))
            .collect();
        fields.push(ReportField::text(REPORT_LABELS[14], self.status.as_str()));
        fields
    }

    /// Report fields rendered as label/value string pairs
    pub fn report_pairs(&self) -> Vec<(String, String)> {
        self.report_fields().iter().map(ReportField::to_pair).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::evaluate;

    #[test]
    fn test_labels_and_order() {
        let result = evaluate(68.0, 132.0, 175.0, 50.0).unwrap();
        let labels: Vec<String> = result.report_fields().into_iter().map(|f| f.label).collect();
        assert_eq!(labels, REPORT_LABELS.to_vec());
    }

    #[test]
    fn test_reference_values() {
        let result = evaluate(68.0, 132.0, 175.0, 50.0).unwrap();
        let values: Vec<String> = result.report_pairs().into_iter().map(|(_, v)| v).collect();
        assert_eq!(
            values,
            vec![
                "68.0", "132.0", "175.0", "175000.0", "3629.84", "1.94", "1.06", "48.21", "51.1",
                "0.99", "50.59", "63.24", "126.48", "37.5", "PASS",
            ]
        );
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(1.0), "1.0");
        assert_eq!(format_number(7850.0), "7850.0");
        assert_eq!(format_number(1.06), "1.06");
        assert_eq!(format_number(0.5), "0.5");
    }

    #[test]
    fn test_fail_status_text() {
        let result = evaluate(75.0, 150.0, 100.0, 40.0).unwrap();
        let last = result.report_fields().pop().unwrap();
        assert_eq!(last.value, ReportValue::Text("FAIL".to_string()));
    }
}
