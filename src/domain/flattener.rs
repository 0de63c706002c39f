//! Serialization of the forest back into flat records, parent before children.

use tracing::instrument;

use crate::domain::arena::OrgForest;
use crate::domain::entities::{FlatRecord, OrgNode};

/// Flat records of the whole forest in pre-order.
///
/// The parent id is the one seen during traversal.
#[instrument(level = "debug", skip_all)]
pub fn flatten(forest: &OrgForest) -> Vec<FlatRecord> {
    let mut parents: Vec<&str> = Vec::new();
    let mut records = Vec::with_capacity(forest.len());
    for (depth, _, node) in forest.iter() {
        parents.truncate(depth);
        records.push(node.data.to_record(parents.last().copied()));
        parents.push(node.data.id.as_str());
    }
    records
}

/// Flat records of a nested ownership forest, roots attached to `parent_id`.
pub fn flatten_nodes(nodes: &[OrgNode], parent_id: Option<&str>) -> Vec<FlatRecord> {
    let mut records = Vec::new();
    for node in nodes {
        records.push(node.data.to_record(parent_id));
        records.extend(flatten_nodes(&node.children, Some(node.id())));
    }
    records
}
