//! Backtracking candidate resolution
//!
//! Every package starts at its latest version. When a peer range is not met
//! either the dependent or the peer is lowered to an older published
//! version, and the packages affected by the change are visited again.
//!
//! Visits are driven by a LIFO stack of steps. Each visit only schedules
//! follow-up visits as its final action, so popping the stack reproduces
//! depth-first order.

use super::graph::PackageGraph;
use crate::error::ResolveError;
use crate::registry::Registry;
use crate::version::{parse_version, satisfies, VersionRange};
use std::cmp::Ordering;

/// How a visit may change an existing candidate
#[derive(Debug, Clone, PartialEq, Eq)]
enum Lowering {
    /// The next older published version
    Previous,
    /// The newest older version satisfying a range
    Within(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Step {
    group: usize,
    name: String,
    lowering: Option<Lowering>,
}

impl Step {
    fn select(group: usize, name: impl Into<String>) -> Self {
        Self {
            group,
            name: name.into(),
            lowering: None,
        }
    }

    fn lower(group: usize, name: impl Into<String>, lowering: Lowering) -> Self {
        Self {
            group,
            name: name.into(),
            lowering: Some(lowering),
        }
    }
}

/// Assign `update_candidate` of every record, group by group
pub async fn resolve(graph: &mut PackageGraph, registry: &dyn Registry) -> Result<(), ResolveError> {
    for index in 0..graph.groups().len() {
        let root = graph.groups()[index].root().to_string();
        tracing::debug!(group = %root, "resolving group");

        let mut stack = vec![Step::select(index, root)];
        while let Some(step) = stack.pop() {
            let next = visit(graph, registry, &step).await?;
            stack.extend(next.into_iter().rev());
        }
    }
    Ok(())
}

async fn visit(
    graph: &mut PackageGraph,
    registry: &dyn Registry,
    step: &Step,
) -> Result<Vec<Step>, ResolveError> {
    let name = step.name.as_str();
    if !graph.groups()[step.group].contains(name) {
        return Err(ResolveError::consistency(format!(
            "'{}' is not a member of group '{}'",
            name,
            graph.groups()[step.group].root()
        )));
    }

    let record = graph
        .record(name)
        .ok_or_else(|| ResolveError::consistency(format!("no record for '{}'", name)))?;

    let had_candidate = record.update_candidate.is_some();
    let (candidate, lowered) = match (&record.update_candidate, &step.lowering) {
        (None, _) => (record.latest_version.clone(), false),
        (Some(current), Some(lowering)) => {
            let lowered = lower_candidate(name, &record.available_versions, current, lowering)?;
            (lowered, true)
        }
        (Some(current), None) => (current.clone(), false),
    };
    let depends_on: Vec<String> = record.depends_on.keys().cloned().collect();
    let depended_by: Vec<String> = record.depended_by.keys().cloned().collect();

    if lowered {
        tracing::debug!(package = %name, %candidate, "lowered candidate");
    } else {
        tracing::debug!(package = %name, %candidate, "checking candidate");
    }
    set_candidate(graph, name, Some(candidate.clone()))?;

    // A lowered candidate is checked again in every other group holding it,
    // whichever way this visit ends
    let rechecks: Vec<Step> = if lowered {
        graph
            .groups()
            .iter()
            .enumerate()
            .filter(|(index, group)| *index != step.group && group.contains(name))
            .map(|(index, _)| Step::select(index, name))
            .collect()
    } else {
        Vec::new()
    };

    let info = registry.info(name, Some(&candidate)).await?;

    for dep in depends_on {
        let Some(required) = info.peer_dependencies.get(&dep) else {
            return Err(ResolveError::PeerDropped {
                package: name.to_string(),
                version: candidate,
                peer: dep,
            });
        };
        if !graph.groups()[step.group].contains(&dep) {
            continue;
        }
        let dep_candidate = graph
            .record(&dep)
            .ok_or_else(|| ResolveError::consistency(format!("no record for '{}'", dep)))?
            .update_candidate
            .clone();

        // The peer revisits this package once it has a candidate. A
        // candidate chosen by an earlier visit is kept as is.
        let Some(dep_candidate) = dep_candidate else {
            tracing::debug!(package = %name, peer = %dep, "peer not resolved yet");
            if !had_candidate {
                set_candidate(graph, name, None)?;
            }
            return Ok(rechecks);
        };

        if satisfies(&dep_candidate, required) {
            continue;
        }

        let minimum = VersionRange::parse(required)
            .map_err(|e| ResolveError::InvalidRange {
                package: name.to_string(),
                range: required.clone(),
                message: e.message,
            })?
            .min_version()
            .ok_or_else(|| ResolveError::InvalidRange {
                package: name.to_string(),
                range: required.clone(),
                message: "no version satisfies the range".to_string(),
            })?;
        let dep_version = parse_version(&dep_candidate).ok_or_else(|| ResolveError::InvalidVersion {
            package: dep.clone(),
            version: dep_candidate.clone(),
        })?;

        tracing::debug!(
            package = %name,
            %candidate,
            peer = %dep,
            peer_candidate = %dep_candidate,
            %required,
            "peer range not satisfied"
        );

        let fix = if dep_version.cmp_precedence(&minimum) == Ordering::Less {
            Step::lower(step.group, name, Lowering::Previous)
        } else {
            Step::lower(step.group, dep, Lowering::Within(required.clone()))
        };
        return Ok(std::iter::once(fix).chain(rechecks).collect());
    }

    let mut next = rechecks;
    next.extend(
        depended_by
            .into_iter()
            .map(|dependent| Step::select(step.group, dependent)),
    );
    Ok(next)
}

fn lower_candidate(
    name: &str,
    available: &[String],
    current: &str,
    lowering: &Lowering,
) -> Result<String, ResolveError> {
    let index = available
        .iter()
        .rposition(|version| version == current)
        .ok_or_else(|| {
            ResolveError::no_candidate(name, format!("{} is not a published version", current))
        })?;
    if index == 0 {
        return Err(ResolveError::no_candidate(
            name,
            format!("{} is the oldest version", current),
        ));
    }

    match lowering {
        Lowering::Previous => Ok(available[index - 1].clone()),
        Lowering::Within(range) => available[..index]
            .iter()
            .rev()
            .find(|version| satisfies(version, range))
            .cloned()
            .ok_or_else(|| {
                ResolveError::no_candidate(
                    name,
                    format!("no version older than {} satisfies {}", current, range),
                )
            }),
    }
}

fn set_candidate(
    graph: &mut PackageGraph,
    name: &str,
    candidate: Option<String>,
) -> Result<(), ResolveError> {
    let record = graph
        .record_mut(name)
        .ok_or_else(|| ResolveError::consistency(format!("no record for '{}'", name)))?;
    record.update_candidate = candidate;
    Ok(())
}
