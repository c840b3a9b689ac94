//! Turn resolved candidates into manifest values

use super::graph::PackageGraph;
use crate::domain::PlannedUpdate;
use crate::error::ResolveError;
use crate::version::satisfies;

/// Prefix written in front of an updated version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RangePrefix {
    /// Exact version
    #[default]
    None,
    /// `^x.y.z`
    Caret,
    /// `~x.y.z`
    Tilde,
}

impl RangePrefix {
    /// Tilde wins when both flags are set
    pub fn from_flags(caret: bool, tilde: bool) -> Self {
        if tilde {
            RangePrefix::Tilde
        } else if caret {
            RangePrefix::Caret
        } else {
            RangePrefix::None
        }
    }

    fn symbol(&self) -> &'static str {
        match self {
            RangePrefix::None => "",
            RangePrefix::Caret => "^",
            RangePrefix::Tilde => "~",
        }
    }

    /// Render `version` with this prefix, never doubling an existing one
    pub fn apply(&self, version: &str) -> String {
        if version.starts_with(['^', '~']) {
            return version.to_string();
        }
        format!("{}{}", self.symbol(), version)
    }
}

/// Planning options
#[derive(Debug, Clone, Copy, Default)]
pub struct PlanOptions {
    /// Prefix of written versions
    pub prefix: RangePrefix,
    /// Keep the declared range when it already admits the candidate
    pub conservative: bool,
}

/// Set `update_version` of every record and return the changes in name order
pub fn plan(graph: &mut PackageGraph, options: PlanOptions) -> Result<Vec<PlannedUpdate>, ResolveError> {
    let mut updates = Vec::new();

    for record in graph.records_mut() {
        let candidate = record.update_candidate.clone().ok_or_else(|| {
            ResolveError::consistency(format!("'{}' has no candidate after resolution", record.name))
        })?;

        let target = if candidate == record.current_range {
            record.current_range.clone()
        } else if options.conservative && satisfies(&candidate, &record.current_range) {
            tracing::debug!(package = %record.name, %candidate, range = %record.current_range, "kept by conservative mode");
            record.current_range.clone()
        } else {
            options.prefix.apply(&candidate)
        };

        if target != record.current_range {
            updates.push(PlannedUpdate::new(&record.name, &record.current_range, &target));
        }
        record.update_version = Some(target);
    }

    Ok(updates)
}
