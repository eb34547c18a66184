//! # Core Strength Evaluation
//!
//! Corrects the crushing strength of a drilled concrete core per the IS 516
//! methodology and checks it against 75% of the specified grade.
//!
//! ## Pipeline
//!
//! Every derived value is rounded to 2 decimals and the rounded value feeds
//! the next step:
//!
//! ```text
//! A        = round2((3.14 / 4) * D²)
//! P        = load_kN * 1000
//! f_raw    = round2(P / A)
//! L/D      = length / D                         (full precision)
//! k_dia    = 1.06 | 1.03 | 1.00                 (diameter bracket)
//! f_corr   = round2(f_raw * k_dia)
//! k_graph  = round2(0.11 * L/D + 0.78)
//! f_graph  = round2(f_corr * k_graph)
//! f_cube   = round2(f_graph * 1.25)
//! percent  = round2(f_cube / grade * 100)
//! f_req    = round2(0.75 * grade)
//! status   = PASS if f_corr >= f_req
//! ```
//!
//! π is the fixed value 3.14 so results match previously issued reports.
//! The verdict is gated on the diameter-corrected strength `f_corr`, not on
//! the graph-corrected or cube-equivalent values that are also reported.
//!
//! ## Example
//!
//! ```rust
//! use strength_core::calculations::core_strength::{evaluate, Status};
//!
//! let result = evaluate(68.0, 132.0, 175.0, 50.0).unwrap();
//! assert_eq!(result.area_mm2, 3629.84);
//! assert_eq!(result.corrected_strength_mpa, 51.1);
//! assert_eq!(result.status, Status::Pass);
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::rounding::round2;
use crate::errors::{CalcError, CalcResult};
use crate::units::{Kilonewtons, Megapascals, Millimeters, Newtons, SquareMillimeters};

/// π as used by the reference reports. Not `std::f64::consts::PI`.
pub const PI_APPROX: f64 = 3.14;

/// Slope of the linear fit to the L/D correction graph
pub const GRAPH_SLOPE: f64 = 0.11;

/// Intercept of the linear fit to the L/D correction graph
pub const GRAPH_INTERCEPT: f64 = 0.78;

/// Core (cylinder) to cube strength equivalence factor
pub const CUBE_EQUIVALENCE_FACTOR: f64 = 1.25;

/// Fraction of the grade the corrected core strength must reach
pub const ACCEPTANCE_FRACTION: f64 = 0.75;

/// Measurements taken from one core sample.
///
/// ## JSON Example
///
/// ```json
/// {
///   "core_diameter_mm": 68.0,
///   "core_length_mm": 132.0,
///   "load_kn": 175.0,
///   "grade_mpa": 50.0
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    /// Core diameter in millimetres
    pub core_diameter_mm: f64,

    /// Core length (after capping) in millimetres
    pub core_length_mm: f64,

    /// Crushing load in kilonewtons
    pub load_kn: f64,

    /// Specified concrete grade in MPa (e.g. 50 for M50)
    pub grade_mpa: f64,
}

impl Measurement {
    pub fn new(core_diameter_mm: f64, core_length_mm: f64, load_kn: f64, grade_mpa: f64) -> Self {
        Measurement {
            core_diameter_mm,
            core_length_mm,
            load_kn,
            grade_mpa,
        }
    }

    /// Every field must be finite and strictly positive.
    pub fn validate(&self) -> CalcResult<()> {
        for (field, value, what) in self.fields() {
            if !value.is_finite() {
                return Err(CalcError::invalid_measurement(
                    field,
                    value.to_string(),
                    format!("{} must be a finite number", what),
                ));
            }
            if value <= 0.0 {
                return Err(CalcError::invalid_measurement(
                    field,
                    value.to_string(),
                    format!("{} must be positive", what),
                ));
            }
        }
        Ok(())
    }

    pub fn diameter(&self) -> Millimeters {
        Millimeters(self.core_diameter_mm)
    }

    pub fn length(&self) -> Millimeters {
        Millimeters(self.core_length_mm)
    }

    pub fn load(&self) -> Kilonewtons {
        Kilonewtons(self.load_kn)
    }

    fn fields(&self) -> [(&'static str, f64, &'static str); 4] {
        [
            ("core_diameter_mm", self.core_diameter_mm, "Core diameter"),
            ("core_length_mm", self.core_length_mm, "Core length"),
            ("load_kn", self.load_kn, "Load"),
            ("grade_mpa", self.grade_mpa, "Grade"),
        ]
    }
}

/// Diameter bracket selecting the diameter correction factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiameterBracket {
    /// D < 70 mm
    Small,
    /// 70 mm <= D <= 80 mm
    Standard,
    /// D > 80 mm
    Large,
}

impl DiameterBracket {
    pub fn for_diameter(diameter: Millimeters) -> Self {
        if diameter.0 < 70.0 {
            DiameterBracket::Small
        } else if diameter.0 <= 80.0 {
            DiameterBracket::Standard
        } else {
            DiameterBracket::Large
        }
    }

    pub fn factor(self) -> f64 {
        match self {
            DiameterBracket::Small => 1.06,
            DiameterBracket::Standard => 1.03,
            DiameterBracket::Large => 1.00,
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            DiameterBracket::Small => "D < 70 mm",
            DiameterBracket::Standard => "70 mm <= D <= 80 mm",
            DiameterBracket::Large => "D > 80 mm",
        }
    }
}

/// Acceptance verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Status {
    Pass,
    Fail,
}

impl Status {
    pub fn is_pass(self) -> bool {
        self == Status::Pass
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Status::Pass => "PASS",
            Status::Fail => "FAIL",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Full breakdown of one core evaluation.
///
/// Fields appear in dependency order. All values except `ld_ratio` and
/// `load_n` are rounded to 2 decimals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    /// The measurements this result was computed from
    pub measurement: Measurement,

    /// Cross-sectional area (mm²)
    pub area_mm2: f64,

    /// Crushing load (N)
    pub load_n: f64,

    /// Load over area (MPa)
    pub raw_strength_mpa: f64,

    /// Length to diameter ratio, unrounded
    pub ld_ratio: f64,

    /// 1.06, 1.03 or 1.00 by diameter bracket
    pub dia_correction_factor: f64,

    /// Raw strength times the diameter factor (MPa). Gates the verdict.
    pub corrected_strength_mpa: f64,

    /// round2(0.11 * L/D + 0.78)
    pub graph_correction_factor: f64,

    /// Corrected strength times the graph factor (MPa)
    pub graph_corrected_strength_mpa: f64,

    /// Graph-corrected strength times 1.25 (MPa)
    pub cube_equivalent_strength_mpa: f64,

    /// Cube-equivalent strength as a percentage of grade
    pub percent_strength: f64,

    /// 75% of grade (MPa)
    pub required_strength_mpa: f64,

    pub status: Status,
}

impl EvaluationResult {
    pub fn passes(&self) -> bool {
        self.status.is_pass()
    }

    /// L/D ratio as shown in summaries and exports
    pub fn ld_ratio_display(&self) -> f64 {
        round2(self.ld_ratio)
    }

    pub fn diameter_bracket(&self) -> DiameterBracket {
        DiameterBracket::for_diameter(self.measurement.diameter())
    }

    /// Margin of the corrected strength over the requirement (MPa, may be negative)
    pub fn margin_mpa(&self) -> f64 {
        round2(self.corrected_strength_mpa - self.required_strength_mpa)
    }
}

/// Evaluate a core sample.
///
/// # Returns
///
/// * `Ok(EvaluationResult)` - every derived field plus the verdict
/// * `Err(CalcError::InvalidMeasurement)` - an input is zero, negative or not finite
pub fn calculate(input: &Measurement) -> CalcResult<EvaluationResult> {
    input.validate()?;

    let diameter = input.diameter();

    let area = SquareMillimeters(round2((PI_APPROX / 4.0) * diameter.0.powi(2)));
    let load: Newtons = input.load().into();
    let raw_strength = Megapascals(round2((load / area).0));
    let ld_ratio = input.length() / diameter;

    let dia_correction_factor = DiameterBracket::for_diameter(diameter).factor();
    let corrected_strength = round2((raw_strength * dia_correction_factor).0);

    let graph_correction_factor = round2(GRAPH_SLOPE * ld_ratio + GRAPH_INTERCEPT);
    let graph_corrected_strength = round2(corrected_strength * graph_correction_factor);
    let cube_equivalent_strength = round2(graph_corrected_strength * CUBE_EQUIVALENCE_FACTOR);
    let percent_strength = round2(cube_equivalent_strength / input.grade_mpa * 100.0);

    let required_strength = round2(ACCEPTANCE_FRACTION * input.grade_mpa);
    let status = if corrected_strength >= required_strength {
        Status::Pass
    } else {
        Status::Fail
    };

    debug!(
        diameter_mm = input.core_diameter_mm,
        corrected_mpa = corrected_strength,
        required_mpa = required_strength,
        %status,
        "core sample evaluated"
    );

    Ok(EvaluationResult {
        measurement: *input,
        area_mm2: area.0,
        load_n: load.0,
        raw_strength_mpa: raw_strength.0,
        ld_ratio,
        dia_correction_factor,
        corrected_strength_mpa: corrected_strength,
        graph_correction_factor,
        graph_corrected_strength_mpa: graph_corrected_strength,
        cube_equivalent_strength_mpa: cube_equivalent_strength,
        percent_strength,
        required_strength_mpa: required_strength,
        status,
    })
}

/// Evaluate from the four raw measurements.
///
/// Same as [`calculate`] over a [`Measurement`].
pub fn evaluate(
    core_diameter_mm: f64,
    core_length_mm: f64,
    load_kn: f64,
    grade_mpa: f64,
) -> CalcResult<EvaluationResult> {
    calculate(&Measurement::new(
        core_diameter_mm,
        core_length_mm,
        load_kn,
        grade_mpa,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn reference_sample() -> Measurement {
        Measurement::new(68.0, 132.0, 175.0, 50.0)
    }

    #[test]
    fn test_reference_scenario() {
        let r = calculate(&reference_sample()).unwrap();

        assert_eq!(r.area_mm2, 3629.84);
        assert_eq!(r.load_n, 175000.0);
        assert_eq!(r.raw_strength_mpa, 48.21);
        assert!((r.ld_ratio - 132.0 / 68.0).abs() < 1e-12);
        assert_eq!(r.ld_ratio_display(), 1.94);
        assert_eq!(r.dia_correction_factor, 1.06);
        // 48.21 * 1.06 = 51.1026
        assert_eq!(r.corrected_strength_mpa, 51.1);
        assert_eq!(r.graph_correction_factor, 0.99);
        // 51.10 * 0.99 = 50.589
        assert_eq!(r.graph_corrected_strength_mpa, 50.59);
        assert_eq!(r.cube_equivalent_strength_mpa, 63.24);
        assert_eq!(r.percent_strength, 126.48);
        assert_eq!(r.required_strength_mpa, 37.5);
        assert_eq!(r.status, Status::Pass);
        assert_eq!(r.margin_mpa(), 13.6);
    }

    #[test]
    fn test_large_core_uses_unit_factor() {
        let r = evaluate(100.0, 200.0, 200.0, 30.0).unwrap();
        assert_eq!(r.area_mm2, 7850.0);
        assert_eq!(r.raw_strength_mpa, 25.48);
        assert_eq!(r.dia_correction_factor, 1.00);
        assert_eq!(r.corrected_strength_mpa, 25.48);
        assert_eq!(r.graph_correction_factor, 1.0);
        assert_eq!(r.cube_equivalent_strength_mpa, 31.85);
        assert_eq!(r.percent_strength, 106.17);
        assert_eq!(r.required_strength_mpa, 22.5);
        assert!(r.passes());
    }

    #[test]
    fn test_failing_core() {
        // A = 4415.625 rounds up to 4415.63
        let r = evaluate(75.0, 150.0, 100.0, 40.0).unwrap();
        assert_eq!(r.area_mm2, 4415.63);
        assert_eq!(r.raw_strength_mpa, 22.65);
        assert_eq!(r.dia_correction_factor, 1.03);
        assert_eq!(r.corrected_strength_mpa, 23.33);
        assert_eq!(r.cube_equivalent_strength_mpa, 29.16);
        assert_eq!(r.percent_strength, 72.9);
        assert_eq!(r.required_strength_mpa, 30.0);
        assert_eq!(r.status, Status::Fail);
        assert!(r.margin_mpa() < 0.0);
    }

    #[test]
    fn test_diameter_bracket_boundaries() {
        let factor = |d: f64| DiameterBracket::for_diameter(Millimeters(d)).factor();
        assert_eq!(factor(69.999), 1.06);
        assert_eq!(factor(70.0), 1.03);
        assert_eq!(factor(80.0), 1.03);
        assert_eq!(factor(80.001), 1.00);
    }

    #[test]
    fn test_bracket_flows_into_result() {
        assert_eq!(evaluate(70.0, 140.0, 150.0, 40.0).unwrap().dia_correction_factor, 1.03);
        assert_eq!(evaluate(69.999, 140.0, 150.0, 40.0).unwrap().dia_correction_factor, 1.06);
        assert_eq!(evaluate(80.0, 160.0, 150.0, 40.0).unwrap().dia_correction_factor, 1.03);
        assert_eq!(evaluate(80.001, 160.0, 150.0, 40.0).unwrap().dia_correction_factor, 1.00);
    }

    #[test]
    fn test_verdict_uses_diameter_corrected_strength() {
        // Short core: graph factor 0.89 pulls the graph-corrected value
        // below the requirement while the diameter-corrected value passes.
        let r = evaluate(100.0, 100.0, 180.0, 30.0).unwrap();
        assert_eq!(r.corrected_strength_mpa, 22.93);
        assert_eq!(r.graph_correction_factor, 0.89);
        assert_eq!(r.graph_corrected_strength_mpa, 20.41);
        assert_eq!(r.required_strength_mpa, 22.5);
        assert!(r.graph_corrected_strength_mpa < r.required_strength_mpa);
        assert_eq!(r.status, Status::Pass);
    }

    #[test]
    fn test_zero_grade_rejected() {
        let err = evaluate(68.0, 132.0, 175.0, 0.0).unwrap_err();
        match err {
            CalcError::InvalidMeasurement { field, .. } => assert_eq!(field, "grade_mpa"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_zero_diameter_rejected() {
        let err = evaluate(0.0, 132.0, 175.0, 50.0).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_MEASUREMENT");
    }

    #[test]
    fn test_negative_and_nan_inputs_rejected() {
        assert!(evaluate(68.0, -1.0, 175.0, 50.0).is_err());
        assert!(evaluate(68.0, 132.0, -175.0, 50.0).is_err());
        assert!(evaluate(f64::NAN, 132.0, 175.0, 50.0).is_err());
        assert!(evaluate(68.0, 132.0, f64::INFINITY, 50.0).is_err());
    }

    #[test]
    fn test_status_serialization() {
        assert_eq!(serde_json::to_string(&Status::Pass).unwrap(), "\"PASS\"");
        let status: Status = serde_json::from_str("\"FAIL\"").unwrap();
        assert_eq!(status, Status::Fail);
    }

    #[test]
    fn test_result_serialization() {
        let r = calculate(&reference_sample()).unwrap();
        let json = serde_json::to_string_pretty(&r).unwrap();
        assert!(json.contains("\"corrected_strength_mpa\": 51.1"));
        let roundtrip: EvaluationResult = serde_json::from_str(&json).unwrap();
        assert_eq!(roundtrip.measurement, r.measurement);
        assert_eq!(roundtrip.status, Status::Pass);
        assert_eq!(roundtrip.report_pairs(), r.report_pairs());
    }

    proptest! {
        #[test]
        fn prop_total_over_positive_inputs(
            d in 1.0f64..500.0,
            l in 1.0f64..1000.0,
            kn in 0.1f64..5000.0,
            g in 1.0f64..120.0,
        ) {
            let r = evaluate(d, l, kn, g).unwrap();
            prop_assert!(r.area_mm2 > 0.0);
            prop_assert!(r.percent_strength.is_finite());
            prop_assert_eq!(
                r.status == Status::Pass,
                r.corrected_strength_mpa >= round2(0.75 * g)
            );
        }

        #[test]
        fn prop_deterministic(
            d in 1.0f64..500.0,
            l in 1.0f64..1000.0,
            kn in 0.1f64..5000.0,
            g in 1.0f64..120.0,
        ) {
            let a = evaluate(d, l, kn, g).unwrap();
            let b = evaluate(d, l, kn, g).unwrap();
            prop_assert_eq!(
                serde_json::to_string(&a).unwrap(),
                serde_json::to_string(&b).unwrap()
            );
        }
    }
}
