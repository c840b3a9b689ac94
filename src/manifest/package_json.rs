//! package.json access
//!
//! The document is loaded once, edited in memory and written back with
//! 2-space indentation, original key order and a trailing newline.

use super::ManifestStore;
use crate::domain::DependencySection;
use crate::error::ManifestError;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// File name of the npm manifest
pub const PACKAGE_JSON: &str = "package.json";

/// A loaded package.json
#[derive(Debug, Clone)]
pub struct PackageJson {
    path: PathBuf,
    document: Value,
}

impl PackageJson {
    /// Load `<dir>/package.json`
    pub fn load_from_dir(dir: &Path) -> Result<Self, ManifestError> {
        Self::load(dir.join(PACKAGE_JSON))
    }

    /// Load and validate a package.json file
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, ManifestError> {
        let path = path.into();
        if !path.exists() {
            return Err(ManifestError::not_found(path));
        }

        let content =
            std::fs::read_to_string(&path).map_err(|e| ManifestError::read_error(&path, e))?;
        Self::parse(path, &content)
    }

    /// Parse package.json content read from `path`
    pub fn parse(path: impl Into<PathBuf>, content: &str) -> Result<Self, ManifestError> {
        let path = path.into();
        let document: Value = serde_json::from_str(content)
            .map_err(|e| ManifestError::json_parse_error(&path, e.to_string()))?;

        if !document.is_object() {
            return Err(ManifestError::json_parse_error(
                &path,
                "top-level value is not an object",
            ));
        }

        for section in DependencySection::all() {
            validate_section(&path, *section, document.get(section.key()))?;
        }

        Ok(Self { path, document })
    }

    /// Render the document as written by `save`
    pub fn to_json_string(&self) -> String {
        // Serializing a Value cannot fail
        let mut content = serde_json::to_string_pretty(&self.document).unwrap_or_default();
        content.push('\n');
        content
    }
}

impl ManifestStore for PackageJson {
    fn path(&self) -> &Path {
        &self.path
    }

    fn dependencies(&self, section: DependencySection) -> Option<BTreeMap<String, String>> {
        let object = self.document.get(section.key())?.as_object()?;
        Some(
            object
                .iter()
                .filter_map(|(name, range)| Some((name.clone(), range.as_str()?.to_string())))
                .collect(),
        )
    }

    fn set_version(&mut self, package: &str, range: &str) -> Result<(), ManifestError> {
        let mut found = false;

        for section in DependencySection::all() {
            let entry = self
                .document
                .get_mut(section.key())
                .and_then(Value::as_object_mut)
                .and_then(|deps| deps.get_mut(package));
            if let Some(entry) = entry {
                *entry = Value::String(range.to_string());
                found = true;
            }
        }

        if !found {
            return Err(ManifestError::PackageNotFound {
                path: self.path.clone(),
                package: package.to_string(),
            });
        }
        Ok(())
    }

    fn save(&self) -> Result<(), ManifestError> {
        std::fs::write(&self.path, self.to_json_string())
            .map_err(|e| ManifestError::write_error(&self.path, e))
    }
}

fn validate_section(
    path: &Path,
    section: DependencySection,
    value: Option<&Value>,
) -> Result<(), ManifestError> {
    let Some(value) = value else {
        return Ok(());
    };
    let object = value
        .as_object()
        .ok_or_else(|| ManifestError::invalid_section(path, section.key(), "not an object"))?;

    for (name, range) in object {
        if !range.is_string() {
            return Err(ManifestError::invalid_section(
                path,
                section.key(),
                format!("package name = {}, version = {}", name, range),
            ));
        }
    }
    Ok(())
}
