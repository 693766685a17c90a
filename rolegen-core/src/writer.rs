//! Role artifact writer.
//!
//! Each deployment descriptor is written to `<dir>/Role_<role>.json`,
//! pretty-printed with four-space indentation.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use tracing::{debug, info};

use crate::deployment::DeploymentDescriptor;
use crate::error::{RolegenError, RolegenResult};

/// Default output directory name.
pub const DEFAULT_OUTPUT_DIR: &str = "Roles";

/// File name prefix for role artifacts.
pub const FILE_PREFIX: &str = "Role_";

/// Serialize a value as JSON with four-space indentation.
pub fn to_pretty_json<T: Serialize>(value: &T) -> RolegenResult<String> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut serializer)?;
    // serde_json only emits valid UTF-8.
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// File name of the artifact for `role`.
///
/// Characters that are not allowed in file names on common platforms are
/// replaced by `_`.
pub fn artifact_file_name(role: &str) -> String {
    let sanitized: String = role
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    format!("{FILE_PREFIX}{sanitized}.json")
}

/// Writes deployment descriptors into an output directory.
#[derive(Debug, Clone)]
pub struct ArtifactWriter {
    dir: PathBuf,
}

impl ArtifactWriter {
    /// Create a writer, creating `dir` and its parents if absent.
    pub fn create(dir: impl Into<PathBuf>) -> RolegenResult<Self> {
        let dir = dir.into();
        if !dir.exists() {
            debug!(dir = %dir.display(), "Creating output directory");
            fs::create_dir_all(&dir)?;
        }
        Ok(Self { dir })
    }

    /// The output directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path the artifact for `role` is written to.
    pub fn path_for(&self, role: &str) -> PathBuf {
        self.dir.join(artifact_file_name(role))
    }

    /// Write one descriptor, replacing any existing file.
    pub fn write(&self, descriptor: &DeploymentDescriptor) -> RolegenResult<PathBuf> {
        let path = self.path_for(descriptor.role_name());
        let json = to_pretty_json(descriptor)?;
        fs::write(&path, json)?;
        info!(role = %descriptor.role_name(), path = %path.display(), "Role artifact written");
        Ok(path)
    }

    /// Write every descriptor, stopping at the first failure.
    ///
    /// Nothing is written if two roles map to the same file name. Names are
    /// compared case-insensitively since common filesystems fold case.
    pub fn write_all(&self, descriptors: &[DeploymentDescriptor]) -> RolegenResult<Vec<PathBuf>> {
        check_distinct_file_names(descriptors)?;
        descriptors.iter().map(|d| self.write(d)).collect()
    }
}

fn check_distinct_file_names(descriptors: &[DeploymentDescriptor]) -> RolegenResult<()> {
    let mut seen: HashMap<String, &str> = HashMap::with_capacity(descriptors.len());
    for descriptor in descriptors {
        let role = descriptor.role_name();
        let file_name = artifact_file_name(role);
        if let Some(other) = seen.insert(file_name.to_lowercase(), role) {
            return Err(RolegenError::config(format!(
                "roles '{}' and '{}' map to the same file {}",
                other, role, file_name
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::permission::RolePermission;
    use tempfile::TempDir;

    fn descriptor(role: &str) -> DeploymentDescriptor {
        DeploymentDescriptor::create_or_replace("Model", RolePermission::new(role, Vec::new(), "rolegen"))
    }

    #[test]
    fn test_file_name() {
        assert_eq!(artifact_file_name("Sales EU"), "Role_Sales EU.json");
        assert_eq!(artifact_file_name("a/b\\c:d"), "Role_a_b_c_d.json");
    }

    #[test]
    fn test_pretty_json_indent() {
        let json = to_pretty_json(&serde_json::json!({ "a": { "b": 1 } })).unwrap();
        assert_eq!(json, "{\n    \"a\": {\n        \"b\": 1\n    }\n}");
    }

    #[test]
    fn test_creates_nested_dir() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("out").join("Roles");
        let writer = ArtifactWriter::create(&dir).unwrap();
        assert!(dir.is_dir());
        assert_eq!(writer.dir(), dir.as_path());
    }

    #[test]
    fn test_write_all() {
        let tmp = TempDir::new().unwrap();
        let writer = ArtifactWriter::create(tmp.path()).unwrap();
        let paths = writer
            .write_all(&[descriptor("Readers"), descriptor("Writers")])
            .unwrap();

        assert_eq!(paths.len(), 2);
        assert!(tmp.path().join("Role_Readers.json").exists());

        let content = fs::read_to_string(tmp.path().join("Role_Writers.json")).unwrap();
        let parsed: DeploymentDescriptor = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed.role_name(), "Writers");
    }

    #[test]
    fn test_write_all_rejects_file_name_clash() {
        let tmp = TempDir::new().unwrap();
        let writer = ArtifactWriter::create(tmp.path()).unwrap();
        let err = writer
            .write_all(&[descriptor("Sales/EU"), descriptor("Sales_EU")])
            .unwrap_err();

        assert!(matches!(err, RolegenError::Config(_)));
        assert_eq!(
            err.to_string(),
            "configuration error: roles 'Sales/EU' and 'Sales_EU' map to the same file Role_Sales_EU.json"
        );
        assert_eq!(fs::read_dir(tmp.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_write_all_rejects_case_only_clash() {
        let tmp = TempDir::new().unwrap();
        let writer = ArtifactWriter::create(tmp.path()).unwrap();
        let err = writer
            .write_all(&[descriptor("Sales"), descriptor("SALES")])
            .unwrap_err();

        assert!(matches!(err, RolegenError::Config(_)));
        assert!(!tmp.path().join("Role_Sales.json").exists());
    }

    #[test]
    fn test_write_overwrites() {
        let tmp = TempDir::new().unwrap();
        let writer = ArtifactWriter::create(tmp.path()).unwrap();
        fs::write(writer.path_for("R"), "stale").unwrap();
        writer.write(&descriptor("R")).unwrap();
        let content = fs::read_to_string(writer.path_for("R")).unwrap();
        assert!(content.starts_with('{'));
    }
}
