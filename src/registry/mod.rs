//! Registry adapters for fetching package metadata
//!
//! This module provides:
//! - HTTP client shared foundation with retry logic
//! - npm Registry adapter (packument over HTTP)
//! - `npm info` command adapter
//! - .npmrc registry lookup

mod client;
mod command;
mod npm;
mod npmrc;

pub use client::HttpClient;
pub use command::NpmCli;
pub use npm::NpmRegistry;
pub use npmrc::read_registry;

use crate::domain::PackageInfo;
use crate::error::RegistryError;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;

/// Public npm registry
pub const DEFAULT_REGISTRY_URL: &str = "https://registry.npmjs.org";

/// Source of package metadata
#[async_trait]
pub trait Registry: Send + Sync {
    /// Get the registry name used in error messages
    fn registry_name(&self) -> &'static str;

    /// Fetch metadata of `package`, at `version` or at its latest release
    async fn info(&self, package: &str, version: Option<&str>) -> Result<PackageInfo, RegistryError>;
}

/// Which adapter to construct
#[derive(Debug, Clone, Default)]
pub struct RegistryOptions {
    /// Registry URL given on the command line
    pub registry_url: Option<String>,
    /// Use the `npm` binary instead of HTTP
    pub use_npm_cli: bool,
}

/// Create a registry adapter for the project in `project_dir`
///
/// The URL comes from the options, then the project's .npmrc, then the
/// public registry.
pub fn create_registry(
    project_dir: &Path,
    options: &RegistryOptions,
) -> Result<Box<dyn Registry>, RegistryError> {
    if options.use_npm_cli {
        let cli = NpmCli::new(project_dir);
        return Ok(Box::new(match &options.registry_url {
            Some(url) => cli.with_registry(url.clone()),
            None => cli,
        }));
    }

    let url = options
        .registry_url
        .clone()
        .or_else(|| read_registry(project_dir))
        .unwrap_or_else(|| DEFAULT_REGISTRY_URL.to_string());
    tracing::debug!(%url, "using npm registry");

    Ok(Box::new(NpmRegistry::with_base_url(HttpClient::new()?, url)))
}

/// Read an optional JSON object of string values
pub(crate) fn string_map(value: Option<&Value>) -> Result<BTreeMap<String, String>, String> {
    let Some(value) = value else {
        return Ok(BTreeMap::new());
    };
    let object = value
        .as_object()
        .ok_or_else(|| format!("peerDependencies = {}", value))?;

    object
        .iter()
        .map(|(name, range)| {
            range
                .as_str()
                .map(|range| (name.clone(), range.to_string()))
                .ok_or_else(|| format!("peerDependencies.{} = {}", name, range))
        })
        .collect()
}
