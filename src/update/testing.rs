//! In-memory registry for unit tests

use crate::domain::PackageInfo;
use crate::error::RegistryError;
use crate::registry::Registry;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Mutex;

/// Registry serving fixed packages; the last listed version is `latest`
#[derive(Default)]
pub struct FakeRegistry {
    packages: BTreeMap<String, Vec<(String, BTreeMap<String, String>)>>,
    queries: Mutex<Vec<String>>,
}

impl FakeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a package given `(version, [(peer, range)])` oldest first
    pub fn package(mut self, name: &str, versions: &[(&str, &[(&str, &str)])]) -> Self {
        let versions = versions
            .iter()
            .map(|(version, peers)| {
                let peers = peers
                    .iter()
                    .map(|(peer, range)| (peer.to_string(), range.to_string()))
                    .collect();
                (version.to_string(), peers)
            })
            .collect();
        self.packages.insert(name.to_string(), versions);
        self
    }

    /// Specs queried so far, as `name` or `name@version`
    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl Registry for FakeRegistry {
    fn registry_name(&self) -> &'static str {
        "fake"
    }

    async fn info(&self, package: &str, version: Option<&str>) -> Result<PackageInfo, RegistryError> {
        let spec = match version {
            Some(version) => format!("{}@{}", package, version),
            None => package.to_string(),
        };
        self.queries.lock().unwrap().push(spec.clone());

        let entries = self
            .packages
            .get(package)
            .ok_or_else(|| RegistryError::package_not_found(&spec, "fake"))?;
        let (selected, peers) = match version {
            Some(version) => entries.iter().find(|(v, _)| v == version),
            None => entries.last(),
        }
        .ok_or_else(|| RegistryError::package_not_found(&spec, "fake"))?;

        Ok(PackageInfo::new(
            selected.clone(),
            entries.iter().map(|(v, _)| v.clone()).collect(),
            peers.clone(),
        ))
    }
}
