//! npm command adapter
//!
//! Runs `npm info <package>[@<version>] --json` and validates its output.

use super::{string_map, Registry};
use crate::domain::PackageInfo;
use crate::error::RegistryError;
use async_trait::async_trait;
use serde_json::Value;
use std::path::PathBuf;
use tokio::process::Command;

/// Registry adapter backed by the `npm` binary
pub struct NpmCli {
    /// Directory the command runs in, so the project's .npmrc applies
    working_dir: PathBuf,
    /// Registry passed through as `--registry`
    registry_url: Option<String>,
}

impl NpmCli {
    /// Create an adapter running in the given directory
    pub fn new(working_dir: impl Into<PathBuf>) -> Self {
        Self {
            working_dir: working_dir.into(),
            registry_url: None,
        }
    }

    /// Override the registry (builder pattern)
    pub fn with_registry(mut self, registry_url: impl Into<String>) -> Self {
        self.registry_url = Some(registry_url.into());
        self
    }

    fn args(&self, spec: &str) -> Vec<String> {
        let mut args = vec!["info".to_string(), spec.to_string(), "--json".to_string()];
        if let Some(url) = &self.registry_url {
            args.push("--registry".to_string());
            args.push(url.clone());
        }
        args
    }
}

#[async_trait]
impl Registry for NpmCli {
    fn registry_name(&self) -> &'static str {
        "npm"
    }

    async fn info(&self, package: &str, version: Option<&str>) -> Result<PackageInfo, RegistryError> {
        let spec = match version {
            Some(version) => format!("{}@{}", package, version),
            None => package.to_string(),
        };
        let args = self.args(&spec);
        let command = format!("npm {}", args.join(" "));
        tracing::debug!(%command, "running npm");

        let output = Command::new("npm")
            .args(&args)
            .current_dir(&self.working_dir)
            .output()
            .await
            .map_err(|e| RegistryError::CommandFailed {
                command: command.clone(),
                message: e.to_string(),
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        if !output.status.success() {
            if stdout.contains("E404") || String::from_utf8_lossy(&output.stderr).contains("E404") {
                return Err(RegistryError::package_not_found(spec, self.registry_name()));
            }
            return Err(RegistryError::CommandFailed {
                command,
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        parse_info_output(&spec, &stdout)
    }
}

/// Validate the JSON printed by `npm info --json`
fn parse_info_output(spec: &str, stdout: &str) -> Result<PackageInfo, RegistryError> {
    let invalid = |message: String| RegistryError::invalid_response(spec, "npm", message);

    // An unknown exact version prints nothing
    if stdout.trim().is_empty() {
        return Err(RegistryError::package_not_found(spec, "npm"));
    }

    let value: Value =
        serde_json::from_str(stdout).map_err(|e| invalid(format!("failed to parse JSON: {}", e)))?;

    let version = value
        .get("version")
        .and_then(Value::as_str)
        .ok_or_else(|| invalid(format!("version = {}", display(value.get("version")))))?
        .to_string();

    let versions = value
        .get("versions")
        .and_then(Value::as_array)
        .ok_or_else(|| invalid(format!("versions = {}", display(value.get("versions")))))?
        .iter()
        .map(|v| {
            v.as_str()
                .map(str::to_string)
                .ok_or_else(|| invalid(format!("element of versions = {}", v)))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let peer_dependencies = string_map(value.get("peerDependencies")).map_err(invalid)?;

    Ok(PackageInfo::new(version, versions, peer_dependencies))
}

fn display(value: Option<&Value>) -> String {
    value.map_or_else(|| "undefined".to_string(), Value::to_string)
}
