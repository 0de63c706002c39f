//! Tree builder turning flat records into an organization forest.

use std::collections::{HashMap, HashSet};

use tracing::{debug, instrument, warn};

use crate::domain::arena::OrgForest;
use crate::domain::entities::{FlatRecord, OrgNode, DEFAULT_NAME};
use crate::domain::error::{DomainResult, ImportWarning};

/// Forest built from an import plus what was noticed on the way.
#[derive(Debug, Default)]
pub struct BuildOutput {
    pub forest: OrgForest,
    pub warnings: Vec<ImportWarning>,
}

/// Constructs the ownership forest from flat records.
#[derive(Debug)]
pub struct TreeBuilder {
    default_name: String,
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self {
            default_name: DEFAULT_NAME.to_string(),
        }
    }

    pub fn with_default_name(mut self, name: impl Into<String>) -> Self {
        self.default_name = name.into();
        self
    }

    /// Build the forest from records.
    ///
    /// Records without id are dropped, duplicates resolve to the last record.
    /// Parent references to unknown ids are ignored. Roots without children are
    /// isolated and left out of the forest.
    #[instrument(level = "debug", skip(self, records), fields(records = records.len()))]
    pub fn build(&self, records: &[FlatRecord]) -> DomainResult<BuildOutput> {
        let mut warnings = Vec::new();

        // Index by id: first occurrence fixes the position, last one the values
        let mut order: Vec<&str> = Vec::new();
        let mut latest: HashMap<&str, &FlatRecord> = HashMap::new();
        for record in records {
            if record.id.is_empty() {
                debug!("dropping record without id: {:?}", record.name);
                continue;
            }
            if latest.insert(record.id.as_str(), record).is_some() {
                warn!("duplicate id {}, last record wins", record.id);
                warnings.push(ImportWarning::DuplicateId(record.id.clone()));
            } else {
                order.push(record.id.as_str());
            }
        }

        // Resolve parent links in record order
        let mut parent_of: HashMap<&str, &str> = HashMap::new();
        let mut children_of: HashMap<&str, Vec<&str>> = HashMap::new();
        for &id in &order {
            let Some(parent_id) = latest[id].parent_id.as_deref() else {
                continue;
            };
            if parent_id == id || !latest.contains_key(parent_id) {
                debug!("{}: parent {:?} not resolvable, treated as root", id, parent_id);
                continue;
            }
            if closes_cycle(&parent_of, id, parent_id) {
                warn!("{} -> {} would close a cycle, link dropped", id, parent_id);
                warnings.push(ImportWarning::CycleBroken {
                    id: id.to_string(),
                    parent_id: parent_id.to_string(),
                });
                continue;
            }
            parent_of.insert(id, parent_id);
        }
        for &id in &order {
            if let Some(&parent_id) = parent_of.get(id) {
                children_of.entry(parent_id).or_default().push(id);
            }
        }

        // Roots, minus isolated ones
        let roots: Vec<&str> = order
            .iter()
            .copied()
            .filter(|id| !parent_of.contains_key(id))
            .filter(|id| {
                let keep = children_of.contains_key(id);
                if !keep {
                    debug!("{}: isolated, excluded", id);
                }
                keep
            })
            .collect();

        if roots.is_empty() && !order.is_empty() {
            warn!("all {} records are isolated", order.len());
            warnings.push(ImportWarning::EmptyResult {
                records: order.len(),
            });
        }

        let mut forest = OrgForest::new();
        let mut stack: Vec<(&str, _)> = roots.iter().rev().map(|&r| (r, None)).collect();
        while let Some((id, parent_idx)) = stack.pop() {
            let mut data = latest[id].data();
            if data.name.trim().is_empty() {
                data.name = self.default_name.clone();
            }
            let idx = forest.insert_node(data, parent_idx)?;

            if let Some(children) = children_of.get(id) {
                for &child in children.iter().rev() {
                    stack.push((child, Some(idx)));
                }
            }
        }
        debug!(
            "built {} nodes in {} trees",
            forest.len(),
            forest.roots().len()
        );

        Ok(BuildOutput { forest, warnings })
    }
}

/// True if linking `id` under `parent_id` would make `id` its own ancestor.
fn closes_cycle(parent_of: &HashMap<&str, &str>, id: &str, parent_id: &str) -> bool {
    let mut seen = HashSet::new();
    let mut current = Some(parent_id);
    while let Some(node) = current {
        if node == id || !seen.insert(node) {
            return true;
        }
        current = parent_of.get(node).copied();
    }
    false
}

/// Build a nested ownership forest with default settings.
pub fn build(records: &[FlatRecord]) -> DomainResult<Vec<OrgNode>> {
    Ok(TreeBuilder::new().build(records)?.forest.to_nodes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_chain_when_checking_cycle_then_detects_back_link() {
        let mut parent_of = HashMap::new();
        parent_of.insert("b", "a");
        parent_of.insert("c", "b");
        assert!(closes_cycle(&parent_of, "a", "c"));
        assert!(!closes_cycle(&parent_of, "d", "c"));
    }

    #[test]
    fn given_empty_name_when_building_then_uses_default_name() {
        let records = vec![FlatRecord::new("a", "", None), FlatRecord::new("b", " ", Some("a"))];
        let output = TreeBuilder::new().with_default_name("N/A").build(&records).unwrap();
        let names: Vec<_> = output.forest.iter().map(|(_, _, n)| n.data.name.clone()).collect();
        assert_eq!(names, vec!["N/A", "N/A"]);
    }
}
