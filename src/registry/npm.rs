//! npm Registry adapter
//!
//! Fetches the package document (packument) from an npm-compatible registry.
//! API endpoint: {registry}/{package}

use super::{string_map, Registry, DEFAULT_REGISTRY_URL};
use crate::domain::PackageInfo;
use crate::error::RegistryError;
use crate::registry::HttpClient;
use crate::version::compare_versions;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Parts of the packument the resolver reads
#[derive(Debug, Deserialize)]
struct Packument {
    /// Tag name to version, `latest` among them
    #[serde(rename = "dist-tags", default)]
    dist_tags: BTreeMap<String, String>,
    /// Manifest of every published version
    versions: BTreeMap<String, Value>,
}

/// npm Registry adapter
pub struct NpmRegistry {
    client: HttpClient,
    base_url: String,
}

impl NpmRegistry {
    /// Create an adapter for the public npm registry
    pub fn new(client: HttpClient) -> Self {
        Self::with_base_url(client, DEFAULT_REGISTRY_URL)
    }

    /// Create an adapter for a custom registry
    pub fn with_base_url(client: HttpClient, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// Build the packument URL for a package
    ///
    /// The slash of a scoped name is escaped, as the registry expects.
    fn build_url(&self, package: &str) -> String {
        let base = self.base_url.trim_end_matches('/');
        if package.starts_with('@') {
            format!("{}/{}", base, package.replacen('/', "%2f", 1))
        } else {
            format!("{}/{}", base, package)
        }
    }
}

#[async_trait]
impl Registry for NpmRegistry {
    fn registry_name(&self) -> &'static str {
        "npm"
    }

    async fn info(&self, package: &str, version: Option<&str>) -> Result<PackageInfo, RegistryError> {
        let url = self.build_url(package);
        tracing::debug!(%url, version, "fetching packument");
        let document: Value = self
            .client
            .get_json(&url, package, self.registry_name())
            .await?;

        parse_packument(package, version, self.registry_name(), &document)
    }
}

/// Extract the metadata of one version from a packument
///
/// Without `version` the `latest` dist-tag is used.
fn parse_packument(
    package: &str,
    version: Option<&str>,
    registry: &str,
    document: &Value,
) -> Result<PackageInfo, RegistryError> {
    let invalid = |message: &str| RegistryError::invalid_response(package, registry, message);

    let packument = Packument::deserialize(document).map_err(|e| invalid(&e.to_string()))?;

    let selected = match version {
        Some(version) => version.to_string(),
        None => packument
            .dist_tags
            .get("latest")
            .cloned()
            .ok_or_else(|| invalid("'dist-tags.latest' is missing"))?,
    };

    let entry = packument.versions.get(&selected).ok_or_else(|| {
        RegistryError::package_not_found(format!("{}@{}", package, selected), registry)
    })?;

    let peer_dependencies =
        string_map(entry.get("peerDependencies")).map_err(|message| invalid(&message))?;

    let mut versions: Vec<String> = packument.versions.keys().cloned().collect();
    versions.sort_by(|a, b| compare_versions(a, b));

    Ok(PackageInfo::new(selected, versions, peer_dependencies))
}
