//! # File I/O Module
//!
//! Project and report file operations:
//! - **Atomic writes**: write to a `.tmp` sibling, fsync, rename
//! - **Version validation**: reject project files from an incompatible schema
//!
//! ## Example
//!
//! ```rust,no_run
//! use strength_core::file_io::{load_project, save_project};
//! use strength_core::project::Project;
//! use std::path::Path;
//!
//! let project = Project::new("Engineer", "25-001", "Podium slab");
//! save_project(&project, Path::new("cores.csp")).unwrap();
//!
//! let loaded = load_project(Path::new("cores.csp")).unwrap();
//! assert_eq!(loaded.meta.job_id, "25-001");
//! ```

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::errors::{CalcError, CalcResult};
use crate::project::{Project, SCHEMA_VERSION};

/// Extension used for project files
pub const PROJECT_EXTENSION: &str = "csp";

/// Save a project as pretty JSON with atomic write semantics.
pub fn save_project(project: &Project, path: &Path) -> CalcResult<()> {
    let json = serde_json::to_string_pretty(project)?;
    write_atomic(path, json.as_bytes())?;
    info!(
        path = %path.display(),
        samples = project.sample_count(),
        "saved project"
    );
    Ok(())
}

/// Load a project file.
///
/// # Returns
///
/// * `Ok(Project)` - Successfully loaded project
/// * `Err(CalcError::VersionMismatch)` - File version is incompatible
/// * `Err(CalcError::SerializationError)` - Invalid JSON
/// * `Err(CalcError::FileError)` - I/O error
pub fn load_project(path: &Path) -> CalcResult<Project> {
    let contents = fs::read_to_string(path)
        .map_err(|e| CalcError::file_error("read", path.display().to_string(), e.to_string()))?;

    let project: Project =
        serde_json::from_str(&contents).map_err(|e| CalcError::SerializationError {
            reason: format!("Invalid JSON in {}: {}", path.display(), e),
        })?;

    validate_version(&project.meta.version)?;

    info!(
        path = %path.display(),
        samples = project.sample_count(),
        "loaded project"
    );
    Ok(project)
}

/// Write a CSV or PDF export with the same atomic semantics as project saves.
pub fn write_export(path: &Path, bytes: &[u8]) -> CalcResult<()> {
    write_atomic(path, bytes)?;
    info!(path = %path.display(), bytes = bytes.len(), "wrote export");
    Ok(())
}

/// Temp sibling: `report.pdf` -> `report.pdf.tmp`
fn tmp_path_for(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

fn write_atomic(path: &Path, bytes: &[u8]) -> CalcResult<()> {
    let tmp_path = tmp_path_for(path);
    debug!(tmp = %tmp_path.display(), "writing temp file");

    let mut tmp_file = File::create(&tmp_path).map_err(|e| {
        CalcError::file_error("create temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    tmp_file.write_all(bytes).map_err(|e| {
        CalcError::file_error("write temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    tmp_file.sync_all().map_err(|e| {
        CalcError::file_error("sync temp file", tmp_path.display().to_string(), e.to_string())
    })?;
    drop(tmp_file);

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        CalcError::file_error("rename to final", path.display().to_string(), e.to_string())
    })
}

/// Same major version required; on 0.x a newer minor is rejected too.
fn validate_version(file_version: &str) -> CalcResult<()> {
    let mismatch = || CalcError::VersionMismatch {
        file_version: file_version.to_string(),
        expected_version: SCHEMA_VERSION.to_string(),
    };

    let parse = |v: &str| -> Vec<u32> { v.split('.').filter_map(|p| p.parse().ok()).collect() };
    let file_parts = parse(file_version);
    let current_parts = parse(SCHEMA_VERSION);

    let (Some(&file_major), Some(&current_major)) = (file_parts.first(), current_parts.first())
    else {
        return Err(mismatch());
    };

    if file_major != current_major {
        return Err(mismatch());
    }

    if current_major == 0 {
        if let (Some(&file_minor), Some(&current_minor)) = (file_parts.get(1), current_parts.get(1)) {
            if file_minor > current_minor {
                return Err(mismatch());
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::Measurement;
    use tempfile::TempDir;

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("roundtrip.csp");

        let mut project = Project::new("Test Engineer", "TEST-001", "Raft");
        project.add_sample("C-1", None, Measurement::new(68.0, 132.0, 175.0, 50.0));
        save_project(&project, &path).unwrap();

        let loaded = load_project(&path).unwrap();
        assert_eq!(loaded.meta.engineer, "Test Engineer");
        assert_eq!(loaded.meta.job_id, "TEST-001");
        assert_eq!(loaded.samples, project.samples);
    }

    #[test]
    fn test_atomic_save_leaves_no_tmp_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("atomic.csp");

        save_project(&Project::new("Test", "TEST", "Wall"), &path).unwrap();

        assert!(!tmp_path_for(&path).exists());
        assert!(path.exists());
    }

    #[test]
    fn test_tmp_path_keeps_extension() {
        assert_eq!(
            tmp_path_for(Path::new("/out/report.pdf")),
            Path::new("/out/report.pdf.tmp")
        );
    }

    #[test]
    fn test_write_export() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("core_strength_report.csv");
        write_export(&path, b"a,b\n1,2\n").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "a,b\n1,2\n");
    }

    #[test]
    fn test_load_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = load_project(&dir.path().join("missing.csp")).unwrap_err();
        assert_eq!(err.error_code(), "FILE_ERROR");
    }

    #[test]
    fn test_load_invalid_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.csp");
        fs::write(&path, "{ not json").unwrap();
        assert_eq!(load_project(&path).unwrap_err().error_code(), "SERIALIZATION_ERROR");
    }

    #[test]
    fn test_load_rejects_newer_schema() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("future.csp");
        let mut project = Project::new("Test", "TEST", "Deck");
        project.meta.version = "0.9.0".to_string();
        save_project(&project, &path).unwrap();

        assert_eq!(load_project(&path).unwrap_err().error_code(), "VERSION_MISMATCH");
    }

    #[test]
    fn test_version_validation() {
        assert!(validate_version(SCHEMA_VERSION).is_ok());
        assert!(validate_version("0.1.0").is_ok());
        assert!(validate_version("0.1.5").is_ok());
        assert!(validate_version("1.0.0").is_err());
        assert!(validate_version("0.2.0").is_err());
        assert!(validate_version("garbage").is_err());
    }
}
