//! Text output for section reports
//!
//! Prints each section with its updates, tagging every change with its
//! semantic version kind.

use crate::domain::{PlannedUpdate, SectionOutcome, SectionReport};
use colored::Colorize;
use std::io::Write;

/// Semantic version change type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionChangeType {
    /// Major version change (breaking)
    Major,
    /// Minor version change (features)
    Minor,
    /// Patch version change (fixes)
    Patch,
    /// Unknown or unparseable
    Unknown,
}

impl VersionChangeType {
    /// Determine the change type between two ranges, ignoring `^`/`~` prefixes
    pub fn from_versions(old: &str, new: &str) -> Self {
        let parse = |v: &str| -> Option<(u64, u64)> {
            let v = v.trim_start_matches(['^', '~', '=', 'v']);
            let mut parts = v.split(['.', '-']);
            let major = parts.next()?.parse().ok()?;
            let minor = parts.next().map_or(Some(0), |m| m.parse().ok())?;
            Some((major, minor))
        };

        match (parse(old), parse(new)) {
            (Some((old_major, _)), Some((new_major, _))) if old_major != new_major => {
                VersionChangeType::Major
            }
            (Some((_, old_minor)), Some((_, new_minor))) if old_minor != new_minor => {
                VersionChangeType::Minor
            }
            (Some(_), Some(_)) => VersionChangeType::Patch,
            _ => VersionChangeType::Unknown,
        }
    }

    /// Get the display label with color
    pub fn colored_label(&self) -> String {
        match self {
            VersionChangeType::Major => "major".red().bold().to_string(),
            VersionChangeType::Minor => "minor".yellow().to_string(),
            VersionChangeType::Patch => "patch".green().to_string(),
            VersionChangeType::Unknown => "?".dimmed().to_string(),
        }
    }

    /// Get the plain label
    pub fn label(&self) -> &'static str {
        match self {
            VersionChangeType::Major => "major",
            VersionChangeType::Minor => "minor",
            VersionChangeType::Patch => "patch",
            VersionChangeType::Unknown => "?",
        }
    }
}

/// Text formatter for section reports
pub struct TextFormatter {
    /// Whether to use colors
    color: bool,
}

impl TextFormatter {
    /// Create a new text formatter
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    fn status(&self, outcome: &SectionOutcome) -> String {
        let label = match outcome {
            SectionOutcome::Missing => "not present",
            SectionOutcome::UpToDate => "up to date",
            SectionOutcome::DryRun { .. } => "dry run",
            SectionOutcome::Applied {
                committed: true, ..
            } => "updated and committed",
            SectionOutcome::Applied { .. } => "updated",
        };
        if !self.color {
            return label.to_string();
        }
        match outcome {
            SectionOutcome::Missing => label.dimmed().to_string(),
            SectionOutcome::UpToDate => label.green().to_string(),
            SectionOutcome::DryRun { .. } => label.cyan().to_string(),
            SectionOutcome::Applied { .. } => label.green().bold().to_string(),
        }
    }

    fn update_line(&self, update: &PlannedUpdate, name_width: usize) -> String {
        let change = VersionChangeType::from_versions(&update.from, &update.to);
        if self.color {
            format!(
                "  {:<width$}  {} → {}  ({})",
                update.name.bold(),
                update.from.dimmed(),
                update.to.green(),
                change.colored_label(),
                width = name_width
            )
        } else {
            format!(
                "  {:<width$}  {} → {}  ({})",
                update.name,
                update.from,
                update.to,
                change.label(),
                width = name_width
            )
        }
    }

    /// Write one section report
    pub fn format(&self, report: &SectionReport, writer: &mut dyn Write) -> std::io::Result<()> {
        let section = report.section.to_string();
        let section = if self.color {
            section.bold().to_string()
        } else {
            section
        };
        writeln!(writer, "{}: {}", section, self.status(&report.outcome))?;

        let updates = report.updates();
        let name_width = updates.iter().map(|u| u.name.len()).max().unwrap_or(0);
        for update in updates {
            writeln!(writer, "{}", self.update_line(update, name_width))?;
        }
        Ok(())
    }
}
