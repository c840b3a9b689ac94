//! Application error types using thiserror
//!
//! Error hierarchy:
//! - ManifestError: Issues with package.json reading and writing
//! - RegistryError: Issues with package registry communication
//! - ResolveError: Violated graph invariants and exhausted backtracking
//! - GitError: Failures of the git commit wrapper

use std::path::PathBuf;
use thiserror::Error;

/// Application-level error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Manifest file related errors
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    /// Package registry related errors
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// Candidate resolution errors
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// Version control errors
    #[error(transparent)]
    Git(#[from] GitError),
}

/// Errors related to manifest file operations
#[derive(Error, Debug)]
pub enum ManifestError {
    /// Manifest file not found
    #[error("manifest file not found: {path}")]
    NotFound { path: PathBuf },

    /// Failed to read manifest file
    #[error("failed to read manifest file {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write manifest file
    #[error("failed to write manifest file {path}: {source}")]
    WriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON parsing error
    #[error("failed to parse JSON in {path}: {message}")]
    JsonParseError { path: PathBuf, message: String },

    /// A dependency section is not an object of string ranges
    #[error("invalid {section} in {path}: {message}")]
    InvalidSection {
        path: PathBuf,
        section: String,
        message: String,
    },

    /// The package is declared in neither dependency section
    #[error("package '{package}' was not found in {path}")]
    PackageNotFound { path: PathBuf, package: String },
}

/// Errors related to package registry communication
#[derive(Error, Debug)]
pub enum RegistryError {
    /// Package not found in registry
    #[error("package '{package}' not found in {registry} registry")]
    PackageNotFound { package: String, registry: String },

    /// Network request failed
    #[error("failed to fetch package '{package}' from {registry}: {message}")]
    NetworkError {
        package: String,
        registry: String,
        message: String,
    },

    /// Rate limit exceeded
    #[error("rate limit exceeded for {registry} registry")]
    RateLimitExceeded { registry: String },

    /// Invalid response from registry
    #[error("invalid response from {registry} for '{package}': {message}")]
    InvalidResponse {
        package: String,
        registry: String,
        message: String,
    },

    /// Timeout
    #[error("timeout while fetching '{package}' from {registry}")]
    Timeout { package: String, registry: String },

    /// The npm command could not be run or exited with failure
    #[error("'{command}' failed: {message}")]
    CommandFailed { command: String, message: String },
}

/// Errors raised while building the peer graph and resolving candidates
#[derive(Error, Debug)]
pub enum ResolveError {
    /// A graph invariant does not hold; always a defect
    #[error("inconsistent package graph: {message}")]
    Consistency { message: String },

    /// The peer-dependency relation contains a cycle
    #[error("peer dependency cycle detected: {}", .path.join(" -> "))]
    Cycle { path: Vec<String> },

    /// Backtracking ran out of older versions
    #[error("no update candidate for '{package}': {message}")]
    NoCandidate { package: String, message: String },

    /// A peer range could not be interpreted
    #[error("invalid version range '{range}' required for '{package}': {message}")]
    InvalidRange {
        package: String,
        range: String,
        message: String,
    },

    /// An older release does not declare a peer its latest release does
    #[error("'{peer}' should be a peer dependency of {package}@{version}, but that version does not declare it")]
    PeerDropped {
        package: String,
        version: String,
        peer: String,
    },

    /// A published version string is not valid semver
    #[error("invalid version '{version}' of '{package}'")]
    InvalidVersion { package: String, version: String },

    /// Registry failure while querying a candidate
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// Errors related to git operations
#[derive(Error, Debug)]
pub enum GitError {
    /// git could not be executed
    #[error("failed to execute 'git {command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// git exited with a failure status
    #[error("'git {command}' failed: {stderr}")]
    CommandFailed { command: String, stderr: String },
}

impl ManifestError {
    /// Creates a new NotFound error
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        ManifestError::NotFound { path: path.into() }
    }

    /// Creates a new ReadError
    pub fn read_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ManifestError::ReadError {
            path: path.into(),
            source,
        }
    }

    /// Creates a new WriteError
    pub fn write_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ManifestError::WriteError {
            path: path.into(),
            source,
        }
    }

    /// Creates a new JsonParseError
    pub fn json_parse_error(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        ManifestError::JsonParseError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a new InvalidSection error
    pub fn invalid_section(
        path: impl Into<PathBuf>,
        section: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        ManifestError::InvalidSection {
            path: path.into(),
            section: section.into(),
            message: message.into(),
        }
    }
}

impl RegistryError {
    /// Creates a new PackageNotFound error
    pub fn package_not_found(package: impl Into<String>, registry: impl Into<String>) -> Self {
        RegistryError::PackageNotFound {
            package: package.into(),
            registry: registry.into(),
        }
    }

    /// Creates a new NetworkError
    pub fn network_error(
        package: impl Into<String>,
        registry: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        RegistryError::NetworkError {
            package: package.into(),
            registry: registry.into(),
            message: message.into(),
        }
    }

    /// Creates a new InvalidResponse error
    pub fn invalid_response(
        package: impl Into<String>,
        registry: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        RegistryError::InvalidResponse {
            package: package.into(),
            registry: registry.into(),
            message: message.into(),
        }
    }

    /// Creates a new RateLimitExceeded error
    pub fn rate_limit_exceeded(registry: impl Into<String>) -> Self {
        RegistryError::RateLimitExceeded {
            registry: registry.into(),
        }
    }

    /// Creates a new Timeout error
    pub fn timeout(package: impl Into<String>, registry: impl Into<String>) -> Self {
        RegistryError::Timeout {
            package: package.into(),
            registry: registry.into(),
        }
    }
}

impl ResolveError {
    /// Creates a new Consistency error
    pub fn consistency(message: impl Into<String>) -> Self {
        ResolveError::Consistency {
            message: message.into(),
        }
    }

    /// Creates a new NoCandidate error
    pub fn no_candidate(package: impl Into<String>, message: impl Into<String>) -> Self {
        ResolveError::NoCandidate {
            package: package.into(),
            message: message.into(),
        }
    }
}
