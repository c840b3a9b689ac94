//! Package metadata and per-package update state

use std::collections::BTreeMap;
use std::fmt;

/// Package metadata reported by a registry for one version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageInfo {
    /// The queried version, or the latest one when no version was given
    pub version: String,
    /// All published versions, oldest first
    pub versions: Vec<String>,
    /// Peer dependency ranges declared by `version`
    pub peer_dependencies: BTreeMap<String, String>,
}

impl PackageInfo {
    /// Creates a new PackageInfo
    pub fn new(
        version: impl Into<String>,
        versions: Vec<String>,
        peer_dependencies: BTreeMap<String, String>,
    ) -> Self {
        Self {
            version: version.into(),
            versions,
            peer_dependencies,
        }
    }
}

/// Update state of one dependency in the section being updated
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageRecord {
    /// Package name
    pub name: String,
    /// Range declared in the manifest
    pub current_range: String,
    /// Newest published version
    pub latest_version: String,
    /// All published versions, oldest first
    pub available_versions: Vec<String>,
    /// Peers in the same section, with the range the latest release requires
    pub depends_on: BTreeMap<String, String>,
    /// Packages in the same section declaring this one as a peer
    pub depended_by: BTreeMap<String, String>,
    /// Version tried during resolution
    pub update_candidate: Option<String>,
    /// Value to write to the manifest
    pub update_version: Option<String>,
}

impl PackageRecord {
    /// Creates a record from the declared range and the registry's latest info
    pub fn new(name: impl Into<String>, current_range: impl Into<String>, info: PackageInfo) -> Self {
        Self {
            name: name.into(),
            current_range: current_range.into(),
            latest_version: info.version,
            available_versions: info.versions,
            depends_on: BTreeMap::new(),
            depended_by: BTreeMap::new(),
            update_candidate: None,
            update_version: None,
        }
    }

    /// Returns true if this record has no peer inside the section
    pub fn is_root(&self) -> bool {
        self.depends_on.is_empty()
    }

    /// Returns true if planning decided to change the manifest entry
    pub fn has_pending_update(&self) -> bool {
        self.update_version
            .as_deref()
            .is_some_and(|version| version != self.current_range)
    }
}

/// A manifest change decided by the planner
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedUpdate {
    /// Package name
    pub name: String,
    /// Range currently declared
    pub from: String,
    /// Range to declare
    pub to: String,
}

impl PlannedUpdate {
    /// Creates a new PlannedUpdate
    pub fn new(name: impl Into<String>, from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            from: from.into(),
            to: to.into(),
        }
    }
}

impl fmt::Display for PlannedUpdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} from {} to {}", self.name, self.from, self.to)
    }
}
