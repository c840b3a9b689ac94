//! Peer-dependency graph of one dependency section
//!
//! Records live in a single map keyed by name. Groups hold member names
//! only, so a change made while resolving one group is seen by every other
//! group containing the same package.

use crate::domain::{PackageInfo, PackageRecord};
use crate::error::ResolveError;
use crate::progress::Progress;
use crate::registry::Registry;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Packages reachable from one root through `depended_by`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageGroup {
    root: String,
    members: BTreeSet<String>,
}

impl PackageGroup {
    /// The member without peers inside the section
    pub fn root(&self) -> &str {
        &self.root
    }

    /// Returns true if `name` belongs to this group
    pub fn contains(&self, name: &str) -> bool {
        self.members.contains(name)
    }
}

/// All records of a section and their groups
#[derive(Debug, Clone)]
pub struct PackageGraph {
    records: BTreeMap<String, PackageRecord>,
    groups: Vec<PackageGroup>,
}

impl PackageGraph {
    /// Link `depended_by`, reject cycles and partition into groups
    ///
    /// `depends_on` of every record must only name other records.
    pub fn new(records: Vec<PackageRecord>) -> Result<Self, ResolveError> {
        let mut records: BTreeMap<String, PackageRecord> = records
            .into_iter()
            .map(|record| (record.name.clone(), record))
            .collect();

        let edges: Vec<(String, String, String)> = records
            .values()
            .flat_map(|record| {
                record
                    .depends_on
                    .iter()
                    .map(|(peer, range)| (record.name.clone(), peer.clone(), range.clone()))
            })
            .collect();

        for (dependent, peer, range) in edges {
            let target = records.get_mut(&peer).ok_or_else(|| {
                ResolveError::consistency(format!(
                    "'{}' declares peer '{}' which is not part of the section",
                    dependent, peer
                ))
            })?;
            target.depended_by.insert(dependent, range);
        }

        if let Some(path) = find_cycle(&records) {
            return Err(ResolveError::Cycle { path });
        }

        let groups = partition(&records);
        Ok(Self { records, groups })
    }

    /// Look up a record
    pub fn record(&self, name: &str) -> Option<&PackageRecord> {
        self.records.get(name)
    }

    pub(crate) fn record_mut(&mut self, name: &str) -> Option<&mut PackageRecord> {
        self.records.get_mut(name)
    }

    /// All records in name order
    pub fn records(&self) -> impl Iterator<Item = &PackageRecord> {
        self.records.values()
    }

    pub(crate) fn records_mut(&mut self) -> impl Iterator<Item = &mut PackageRecord> {
        self.records.values_mut()
    }

    /// Groups in root name order
    pub fn groups(&self) -> &[PackageGroup] {
        &self.groups
    }
}

/// Fetch latest metadata for every declared package and build the graph
///
/// Peers outside `declared` are ignored.
pub async fn build_graph(
    registry: &dyn Registry,
    declared: &BTreeMap<String, String>,
    progress: &mut Progress,
) -> Result<PackageGraph, ResolveError> {
    progress.start(declared.len() as u64, "Fetching package metadata");

    let mut records = Vec::with_capacity(declared.len());
    for (name, range) in declared {
        progress.set_message(name);
        let info: PackageInfo = registry.info(name, None).await?;
        tracing::debug!(package = %name, latest = %info.version, "fetched latest metadata");

        let depends_on: BTreeMap<String, String> = info
            .peer_dependencies
            .iter()
            .filter(|(peer, _)| declared.contains_key(*peer))
            .map(|(peer, range)| (peer.clone(), range.clone()))
            .collect();

        let mut record = PackageRecord::new(name.clone(), range.clone(), info);
        record.depends_on = depends_on;
        records.push(record);
        progress.inc();
    }

    progress.finish_and_clear();
    PackageGraph::new(records)
}

/// Find a cycle along `depends_on`, returned as a closed path
fn find_cycle(records: &BTreeMap<String, PackageRecord>) -> Option<Vec<String>> {
    #[derive(Clone, Copy, PartialEq, Eq)]
    enum Mark {
        Visiting,
        Done,
    }

    let mut marks: HashMap<&str, Mark> = HashMap::new();

    for start in records.keys() {
        if marks.contains_key(start.as_str()) {
            continue;
        }
        marks.insert(start.as_str(), Mark::Visiting);
        let mut path: Vec<(&str, Vec<&str>)> = vec![(start.as_str(), children(records, start))];

        loop {
            let Some((node, pending)) = path.last_mut() else {
                break;
            };
            let node = *node;
            let next = pending.pop();

            let Some(next) = next else {
                marks.insert(node, Mark::Done);
                path.pop();
                continue;
            };

            match marks.get(next) {
                Some(Mark::Visiting) => {
                    let from = path.iter().position(|(n, _)| *n == next).unwrap_or(0);
                    let mut cycle: Vec<String> =
                        path[from..].iter().map(|(n, _)| n.to_string()).collect();
                    cycle.push(next.to_string());
                    return Some(cycle);
                }
                Some(Mark::Done) => {}
                None => {
                    marks.insert(next, Mark::Visiting);
                    path.push((next, children(records, next)));
                }
            }
        }
    }

    None
}

/// Peers of `name`, reversed so popping yields name order
fn children<'a>(records: &'a BTreeMap<String, PackageRecord>, name: &str) -> Vec<&'a str> {
    records
        .get(name)
        .map(|record| record.depends_on.keys().rev().map(String::as_str).collect())
        .unwrap_or_default()
}

/// One group per root, collecting everything reachable through `depended_by`
fn partition(records: &BTreeMap<String, PackageRecord>) -> Vec<PackageGroup> {
    records
        .values()
        .filter(|record| record.is_root())
        .map(|root| {
            let mut members = BTreeSet::new();
            let mut stack = vec![root.name.as_str()];
            while let Some(name) = stack.pop() {
                if !members.insert(name.to_string()) {
                    continue;
                }
                if let Some(record) = records.get(name) {
                    stack.extend(record.depended_by.keys().map(String::as_str));
                }
            }
            PackageGroup {
                root: root.name.clone(),
                members,
            }
        })
        .collect()
}
