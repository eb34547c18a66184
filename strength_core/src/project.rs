//! # Project Data Structures
//!
//! A `Project` groups the cores drilled from one structure so they can be
//! saved together and reported in a single package. Projects serialize to
//! `.csp` files as human-readable JSON.
//!
//! ## Structure
//!
//! ```text
//! Project
//! ├── meta: ProjectMetadata (version, engineer, job, structure, timestamps)
//! ├── settings: GlobalSettings (code reference, input floors)
//! └── samples: HashMap<Uuid, CoreSample>
//! ```
//!
//! ## Example
//!
//! ```rust
//! use strength_core::calculations::Measurement;
//! use strength_core::project::Project;
//!
//! let mut project = Project::new("Jane Engineer", "25-042", "Podium slab");
//! project.add_sample("C-1", None, Measurement::new(68.0, 132.0, 175.0, 50.0));
//!
//! let results = project.evaluate_all().unwrap();
//! assert!(results[0].1.passes());
//! ```

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calculations::{calculate, EvaluationResult, Measurement};
use crate::errors::{CalcError, CalcResult};

/// Current schema version for .csp files
pub const SCHEMA_VERSION: &str = "0.1.0";

/// Root project container.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub meta: ProjectMetadata,

    #[serde(default)]
    pub settings: GlobalSettings,

    /// All core samples, keyed by UUID
    pub samples: HashMap<Uuid, CoreSample>,
}

impl Project {
    /// Create a new empty project.
    ///
    /// ```rust
    /// use strength_core::project::Project;
    ///
    /// let project = Project::new("John Doe", "25-001", "Bridge pier P3");
    /// assert_eq!(project.meta.engineer, "John Doe");
    /// ```
    pub fn new(
        engineer: impl Into<String>,
        job_id: impl Into<String>,
        structure: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Project {
            meta: ProjectMetadata {
                version: SCHEMA_VERSION.to_string(),
                engineer: engineer.into(),
                job_id: job_id.into(),
                structure: structure.into(),
                created: now,
                modified: now,
            },
            settings: GlobalSettings::default(),
            samples: HashMap::new(),
        }
    }

    /// Add a core sample. Returns the UUID assigned to it.
    pub fn add_sample(
        &mut self,
        label: impl Into<String>,
        location: Option<String>,
        measurement: Measurement,
    ) -> Uuid {
        let id = Uuid::new_v4();
        self.samples.insert(
            id,
            CoreSample {
                label: label.into(),
                location,
                measurement,
            },
        );
        self.touch();
        id
    }

    /// Remove a sample by UUID.
    pub fn remove_sample(&mut self, id: &Uuid) -> Option<CoreSample> {
        let sample = self.samples.remove(id);
        if sample.is_some() {
            self.touch();
        }
        sample
    }

    /// Remove a sample by label.
    pub fn remove_by_label(&mut self, label: &str) -> CalcResult<CoreSample> {
        let id = self
            .find_by_label(label)
            .map(|(id, _)| id)
            .ok_or_else(|| CalcError::sample_not_found(label))?;
        self.remove_sample(&id)
            .ok_or_else(|| CalcError::sample_not_found(label))
    }

    pub fn get_sample(&self, id: &Uuid) -> Option<&CoreSample> {
        self.samples.get(id)
    }

    /// First sample carrying this label.
    pub fn find_by_label(&self, label: &str) -> Option<(Uuid, &CoreSample)> {
        self.samples
            .iter()
            .find(|(_, sample)| sample.label == label)
            .map(|(id, sample)| (*id, sample))
    }

    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }

    /// Update the modified timestamp.
    pub fn touch(&mut self) {
        self.meta.modified = Utc::now();
    }

    /// Evaluate every sample, sorted by label.
    ///
    /// Stops at the first sample whose measurement is rejected; the error
    /// names that sample.
    pub fn evaluate_all(&self) -> CalcResult<Vec<(&CoreSample, EvaluationResult)>> {
        let mut samples: Vec<&CoreSample> = self.samples.values().collect();
        samples.sort_by(|a, b| a.label.cmp(&b.label));

        samples
            .into_iter()
            .map(|sample| {
                sample.evaluate().map(|r| (sample, r)).map_err(|e| match e {
                    CalcError::InvalidMeasurement { field, value, reason } => {
                        CalcError::InvalidMeasurement {
                            field: format!("{}.{}", sample.label, field),
                            value,
                            reason,
                        }
                    }
                    other => other,
                })
            })
            .collect()
    }
}

impl Default for Project {
    fn default() -> Self {
        Project::new("", "", "")
    }
}

/// Project metadata stored in the file header.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectMetadata {
    /// Schema version (for migration compatibility)
    pub version: String,

    /// Name of the responsible engineer
    pub engineer: String,

    /// Job/project number
    pub job_id: String,

    /// Structure or member the cores were taken from
    pub structure: String,

    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
}

/// One drilled core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoreSample {
    /// User label (e.g. "C-1")
    pub label: String,

    /// Where the core was drilled (gridline, level, element)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    pub measurement: Measurement,
}

impl CoreSample {
    pub fn evaluate(&self) -> CalcResult<EvaluationResult> {
        calculate(&self.measurement)
    }
}

/// Global project settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalSettings {
    /// Code reference printed on reports
    pub code: String,

    /// Minimum values accepted from data entry
    #[serde(default)]
    pub input_floors: InputFloors,
}

impl Default for GlobalSettings {
    fn default() -> Self {
        GlobalSettings {
            code: "IS 516".to_string(),
            input_floors: InputFloors::default(),
        }
    }
}

/// Sanity floors applied to entered values before evaluation.
///
/// These guard data entry only. The evaluator accepts any positive value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InputFloors {
    pub core_diameter_mm: f64,
    pub core_length_mm: f64,
    pub load_kn: f64,
    pub grade_mpa: f64,
}

impl Default for InputFloors {
    fn default() -> Self {
        InputFloors {
            core_diameter_mm: 1.0,
            core_length_mm: 1.0,
            load_kn: 0.1,
            grade_mpa: 1.0,
        }
    }
}

impl InputFloors {
    /// Reject any value below its floor (NaN is rejected too).
    pub fn check(&self, m: &Measurement) -> CalcResult<()> {
        let checks = [
            ("core_diameter_mm", m.core_diameter_mm, self.core_diameter_mm),
            ("core_length_mm", m.core_length_mm, self.core_length_mm),
            ("load_kn", m.load_kn, self.load_kn),
            ("grade_mpa", m.grade_mpa, self.grade_mpa),
        ];
        for (field, value, floor) in checks {
            if value.is_nan() || value < floor {
                return Err(CalcError::invalid_measurement(
                    field,
                    value.to_string(),
                    format!("must be at least {}", floor),
                ));
            }
        }
        Ok(())
    }
}
