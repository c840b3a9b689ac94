//! Manifest file access
//!
//! The updater works against the `ManifestStore` trait; `PackageJson` is
//! the file-backed implementation.

mod package_json;

pub use package_json::{PackageJson, PACKAGE_JSON};

use crate::domain::DependencySection;
use crate::error::ManifestError;
use std::collections::BTreeMap;
use std::path::Path;

/// Read and write declared dependency ranges
pub trait ManifestStore: Send {
    /// Path of the manifest file, staged when committing
    fn path(&self) -> &Path;

    /// Name to range map of a section, or None if the section is absent
    fn dependencies(&self, section: DependencySection) -> Option<BTreeMap<String, String>>;

    /// Set the range of `package` in every section declaring it
    fn set_version(&mut self, package: &str, range: &str) -> Result<(), ManifestError>;

    /// Persist the document
    fn save(&self) -> Result<(), ManifestError>;
}
