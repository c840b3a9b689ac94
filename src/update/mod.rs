//! Section update pipeline
//!
//! This module provides:
//! - Peer-dependency graph construction and grouping
//! - Backtracking candidate resolution
//! - Range prefix and conservative planning
//! - Manifest application and commit message construction
//! - The `Updater` driving one dependency section through all of it

mod applier;
mod graph;
mod planner;
mod resolver;
#[cfg(test)]
mod testing;

pub use applier::{apply, commit_message};
pub use graph::{build_graph, PackageGraph, PackageGroup};
pub use planner::{plan, PlanOptions, RangePrefix};
pub use resolver::resolve;

use crate::cli::CliArgs;
use crate::domain::{DependencySection, SectionOutcome, SectionReport};
use crate::error::AppError;
use crate::manifest::ManifestStore;
use crate::progress::Progress;
use crate::registry::Registry;
use crate::vcs::VersionControl;

/// Behavior of an update run
#[derive(Debug, Clone, Default)]
pub struct UpdaterConfig {
    /// Compute and log the plan without writing
    pub dry_run: bool,
    /// Prefix of written versions
    pub prefix: RangePrefix,
    /// Keep declared ranges that already admit the new version
    pub conservative: bool,
    /// Commit the manifest after writing
    pub git: bool,
    /// Prepended to the commit message
    pub commit_prefix: String,
    /// Draw a progress bar while fetching metadata
    pub show_progress: bool,
}

impl UpdaterConfig {
    /// Create config from CLI arguments
    pub fn from_cli(args: &CliArgs) -> Self {
        Self {
            dry_run: args.dry_run,
            prefix: RangePrefix::from_flags(args.caret, args.tilde),
            conservative: args.conservative,
            git: args.git,
            commit_prefix: args.commit_prefix.clone().unwrap_or_default(),
            show_progress: !args.debug,
        }
    }

    fn plan_options(&self) -> PlanOptions {
        PlanOptions {
            prefix: self.prefix,
            conservative: self.conservative,
        }
    }
}

/// Updates the dependency sections of one manifest
pub struct Updater {
    config: UpdaterConfig,
    registry: Box<dyn Registry>,
    manifest: Box<dyn ManifestStore>,
    vcs: Option<Box<dyn VersionControl>>,
}

impl Updater {
    /// Create an updater without version control
    pub fn new(
        config: UpdaterConfig,
        registry: Box<dyn Registry>,
        manifest: Box<dyn ManifestStore>,
    ) -> Self {
        Self {
            config,
            registry,
            manifest,
            vcs: None,
        }
    }

    /// Commit applied updates with `vcs` (builder pattern)
    pub fn with_vcs(mut self, vcs: Box<dyn VersionControl>) -> Self {
        self.vcs = Some(vcs);
        self
    }

    /// The manifest being updated
    pub fn manifest(&self) -> &dyn ManifestStore {
        self.manifest.as_ref()
    }

    /// Update one section
    ///
    /// Nothing is written unless resolution and planning succeed.
    pub async fn update(&mut self, section: DependencySection) -> Result<SectionReport, AppError> {
        let Some(declared) = self.manifest.dependencies(section) else {
            tracing::info!("{} was not found in package.json", section);
            return Ok(SectionReport::new(section, SectionOutcome::Missing));
        };
        tracing::debug!(%section, packages = declared.len(), "updating section");

        let mut progress = Progress::new(self.config.show_progress);
        let mut graph = build_graph(self.registry.as_ref(), &declared, &mut progress).await?;
        tracing::debug!(groups = graph.groups().len(), "built package groups");

        resolve(&mut graph, self.registry.as_ref()).await?;
        let updates = plan(&mut graph, self.config.plan_options())?;

        if updates.is_empty() {
            tracing::info!("{} need no update", section);
            return Ok(SectionReport::new(section, SectionOutcome::UpToDate));
        }

        tracing::info!("Update {} to the following version.", section);
        for update in &updates {
            tracing::info!("* {}: {} -> {}", update.name, update.from, update.to);
        }

        if self.config.dry_run {
            tracing::warn!("dry run mode is set, skipping changes to package.json");
            return Ok(SectionReport::new(section, SectionOutcome::DryRun { updates }));
        }

        let applied = apply(&graph, self.manifest.as_mut())?;
        self.manifest.save()?;

        let committed = match &self.vcs {
            Some(vcs) => {
                let message = commit_message(&self.config.commit_prefix, &applied);
                tracing::debug!(%message, "committing");
                vcs.add(self.manifest.path())?;
                vcs.commit(&message)?;
                true
            }
            None => false,
        };

        Ok(SectionReport::new(
            section,
            SectionOutcome::Applied {
                updates: applied,
                committed,
            },
        ))
    }
}
