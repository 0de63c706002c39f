//! Editing operations on the forest.
//!
//! Every operation validates before touching the arena, so a failed call
//! leaves the forest exactly as it was.

use generational_arena::Index;
use tracing::{debug, instrument};

use crate::domain::arena::OrgForest;
use crate::domain::entities::NodeData;
use crate::domain::error::{DomainError, DomainResult};

impl OrgForest {
    /// Insert a new node as last child of `parent_id`, or as last root.
    #[instrument(level = "debug", skip(self, data), fields(id = %data.id))]
    pub fn insert(&mut self, data: NodeData, parent_id: Option<&str>) -> DomainResult<Index> {
        let parent = parent_id.map(|p| self.require(p)).transpose()?;
        self.insert_node(data, parent)
    }

    /// Replace the scalar fields of an existing node and move it under `parent_id`
    /// if that changed. The subtree and the collapse flag stay with the node.
    #[instrument(level = "debug", skip(self, data), fields(id = %data.id))]
    pub fn update(&mut self, data: NodeData, parent_id: Option<&str>) -> DomainResult<()> {
        let idx = self.require(&data.id)?;
        let new_parent = parent_id.map(|p| self.require(p)).transpose()?;
        let old_parent = self.get_node(idx).and_then(|n| n.parent);

        if new_parent != old_parent {
            if let Some(target) = new_parent {
                if target == idx || self.is_descendant(target, idx) {
                    return Err(DomainError::CycleDetected {
                        node: data.id,
                        parent: parent_id.unwrap_or_default().to_string(),
                    });
                }
            }
            debug!("relinking {} under {:?}", data.id, parent_id);
            self.detach(idx);
            self.attach(idx, new_parent);
        }

        if let Some(node) = self.get_node_mut(idx) {
            node.data = data;
        }
        Ok(())
    }

    /// Remove a node with its whole subtree. Returns the number of removed nodes.
    #[instrument(level = "debug", skip(self))]
    pub fn delete(&mut self, id: &str) -> DomainResult<usize> {
        let idx = self.require(id)?;
        self.detach(idx);
        let removed = self.purge(idx);
        debug!("deleted {} nodes", removed);
        Ok(removed)
    }

    /// Flip the collapse flag of one node. Children keep their own flags.
    #[instrument(level = "debug", skip(self))]
    pub fn toggle_collapse(&mut self, id: &str) -> DomainResult<bool> {
        let idx = self.require(id)?;
        let node = self
            .get_node_mut(idx)
            .ok_or_else(|| DomainError::NotFound(id.to_string()))?;
        node.collapsed = !node.collapsed;
        Ok(node.collapsed)
    }

    /// Nodes that may become the parent of `id` without forming a cycle:
    /// everything except the node itself and its descendants, in pre-order.
    /// With `None` (a node not yet in the forest) every node qualifies.
    #[instrument(level = "debug", skip(self))]
    pub fn candidate_parents(&self, id: Option<&str>) -> DomainResult<Vec<&NodeData>> {
        let excluded = id.map(|i| self.require(i)).transpose()?;
        Ok(self
            .iter()
            .filter(|&(_, idx, _)| match excluded {
                Some(node) => idx != node && !self.is_descendant(idx, node),
                None => true,
            })
            .map(|(_, _, entry)| &entry.data)
            .collect())
    }
}
