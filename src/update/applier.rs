//! Write planned versions to the manifest
//!
//! Starting from each changed package, every changed package linked to it
//! through peer edges is written in the same pass, so a bump never leaves
//! its peers behind.

use super::graph::PackageGraph;
use crate::domain::{PackageRecord, PlannedUpdate};
use crate::error::ManifestError;
use crate::manifest::ManifestStore;
use std::collections::HashSet;

/// Write every pending record and return the updates in write order
///
/// The manifest is only modified in memory; the caller saves it.
pub fn apply(
    graph: &PackageGraph,
    manifest: &mut dyn ManifestStore,
) -> Result<Vec<PlannedUpdate>, ManifestError> {
    let mut written: HashSet<&str> = HashSet::new();
    let mut applied = Vec::new();

    for start in graph.records().filter(|record| record.has_pending_update()) {
        let mut stack = vec![start];

        while let Some(record) = stack.pop() {
            if written.contains(record.name.as_str()) {
                continue;
            }
            let Some(target) = record.update_version.as_deref() else {
                continue;
            };

            tracing::debug!(package = %record.name, from = %record.current_range, to = %target, "writing");
            manifest.set_version(&record.name, target)?;
            written.insert(&record.name);
            applied.push(PlannedUpdate::new(&record.name, &record.current_range, target));

            let linked: Vec<&PackageRecord> = record
                .depends_on
                .keys()
                .chain(record.depended_by.keys())
                .filter_map(|name| graph.record(name))
                .filter(|linked| linked.has_pending_update())
                .collect();
            stack.extend(linked.into_iter().rev());
        }
    }

    Ok(applied)
}

/// Build the commit message for a set of applied updates
pub fn commit_message(prefix: &str, applied: &[PlannedUpdate]) -> String {
    let updates: Vec<String> = applied.iter().map(ToString::to_string).collect();
    format!("{}Update {}", prefix, updates.join(", "))
}
