//! Outcome of updating one dependency section

use super::{DependencySection, PlannedUpdate};

/// What happened to a section
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionOutcome {
    /// The manifest has no such section
    Missing,
    /// Every package is already at its resolved version
    UpToDate,
    /// Updates were planned but not written
    DryRun { updates: Vec<PlannedUpdate> },
    /// Updates were written to the manifest
    Applied {
        updates: Vec<PlannedUpdate>,
        committed: bool,
    },
}

/// Report for one section
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionReport {
    /// The section processed
    pub section: DependencySection,
    /// What happened
    pub outcome: SectionOutcome,
}

impl SectionReport {
    /// Creates a new SectionReport
    pub fn new(section: DependencySection, outcome: SectionOutcome) -> Self {
        Self { section, outcome }
    }

    /// Returns the planned or applied updates
    pub fn updates(&self) -> &[PlannedUpdate] {
        match &self.outcome {
            SectionOutcome::Missing | SectionOutcome::UpToDate => &[],
            SectionOutcome::DryRun { updates } | SectionOutcome::Applied { updates, .. } => {
                updates
            }
        }
    }

    /// Returns true if the manifest was modified
    pub fn is_applied(&self) -> bool {
        matches!(self.outcome, SectionOutcome::Applied { .. })
    }
}
