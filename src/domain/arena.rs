use std::collections::HashMap;

use generational_arena::{Arena, Index};
use tracing::instrument;

use crate::domain::entities::{NodeData, OrgNode};
use crate::domain::error::{DomainError, DomainResult};

/// Tree node in the arena-based organization structure.
#[derive(Debug)]
pub struct OrgEntry {
    /// Member data for this node
    pub data: NodeData,
    /// Index of parent node in the arena, None for roots
    pub parent: Option<Index>,
    /// Indices of direct children in the arena, in insertion order
    pub children: Vec<Index>,
    /// UI flag hiding the children from projection
    pub collapsed: bool,
}

/// Arena-based forest of organization members.
///
/// Nodes live in a generational arena and are indexed by id, so lookups are
/// O(1) and ancestor checks walk parent links instead of searching the tree.
#[derive(Debug, Default)]
pub struct OrgForest {
    /// Arena storage for all nodes
    arena: Arena<OrgEntry>,
    /// id -> arena index
    index: HashMap<String, Index>,
    /// Roots in display order
    roots: Vec<Index>,
}

impl OrgForest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn roots(&self) -> &[Index] {
        &self.roots
    }

    #[instrument(level = "trace", skip(self))]
    pub fn lookup(&self, id: &str) -> Option<Index> {
        self.index.get(id).copied()
    }

    #[instrument(level = "trace", skip(self))]
    pub fn get_node(&self, idx: Index) -> Option<&OrgEntry> {
        self.arena.get(idx)
    }

    pub(crate) fn get_node_mut(&mut self, idx: Index) -> Option<&mut OrgEntry> {
        self.arena.get_mut(idx)
    }

    /// Node with the given id.
    pub fn get(&self, id: &str) -> Option<&OrgEntry> {
        self.lookup(id).and_then(|idx| self.arena.get(idx))
    }

    pub(crate) fn require(&self, id: &str) -> DomainResult<Index> {
        self.lookup(id)
            .ok_or_else(|| DomainError::NotFound(id.to_string()))
    }

    /// Id of the node's parent, derived from the parent link.
    pub fn parent_id(&self, idx: Index) -> Option<&str> {
        self.arena
            .get(idx)
            .and_then(|node| node.parent)
            .and_then(|p| self.arena.get(p))
            .map(|p| p.data.id.as_str())
    }

    /// Appends a node under `parent`, or as the last root.
    #[instrument(level = "trace", skip(self, data), fields(id = %data.id))]
    pub fn insert_node(&mut self, data: NodeData, parent: Option<Index>) -> DomainResult<Index> {
        if self.index.contains_key(&data.id) {
            return Err(DomainError::DuplicateId(data.id));
        }
        if let Some(parent_idx) = parent {
            if !self.arena.contains(parent_idx) {
                return Err(DomainError::NotFound(format!("{:?}", parent_idx)));
            }
        }

        let id = data.id.clone();
        let node_idx = self.arena.insert(OrgEntry {
            data,
            parent,
            children: Vec::new(),
            collapsed: false,
        });
        self.index.insert(id, node_idx);

        match parent.and_then(|p| self.arena.get_mut(p)) {
            Some(parent) => parent.children.push(node_idx),
            None => self.roots.push(node_idx),
        }
        Ok(node_idx)
    }

    /// Detaches a node from its parent's children (or from the roots).
    pub(crate) fn detach(&mut self, idx: Index) {
        let parent = self.arena.get(idx).and_then(|n| n.parent);
        let siblings = match parent.and_then(|p| self.arena.get_mut(p)) {
            Some(parent) => &mut parent.children,
            None => &mut self.roots,
        };
        siblings.retain(|&c| c != idx);
        if let Some(node) = self.arena.get_mut(idx) {
            node.parent = None;
        }
    }

    /// Attaches a detached node as last child of `parent`, or as last root.
    pub(crate) fn attach(&mut self, idx: Index, parent: Option<Index>) {
        if let Some(node) = self.arena.get_mut(idx) {
            node.parent = parent;
        }
        match parent.and_then(|p| self.arena.get_mut(p)) {
            Some(parent) => parent.children.push(idx),
            None => self.roots.push(idx),
        }
    }

    /// Removes a detached subtree from storage and the id index.
    pub(crate) fn purge(&mut self, idx: Index) -> usize {
        let mut stack = vec![idx];
        let mut removed = 0;
        while let Some(current) = stack.pop() {
            if let Some(node) = self.arena.remove(current) {
                self.index.remove(&node.data.id);
                stack.extend(node.children);
                removed += 1;
            }
        }
        removed
    }

    /// True if `candidate` lies strictly below `ancestor`.
    #[instrument(level = "trace", skip(self))]
    pub fn is_descendant(&self, candidate: Index, ancestor: Index) -> bool {
        let mut current = self.arena.get(candidate).and_then(|n| n.parent);
        while let Some(idx) = current {
            if idx == ancestor {
                return true;
            }
            current = self.arena.get(idx).and_then(|n| n.parent);
        }
        false
    }

    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self) -> usize {
        self.iter().map(|(depth, _, _)| depth + 1).max().unwrap_or(0)
    }

    /// Pre-order traversal of the whole forest as `(depth, index, node)`.
    pub fn iter(&self) -> PreOrderIterator<'_> {
        PreOrderIterator::new(self, self.roots.iter().rev().map(|&r| (0, r)).collect())
    }

    /// Nested ownership tree, roots in order.
    #[instrument(level = "debug", skip(self))]
    pub fn to_nodes(&self) -> Vec<OrgNode> {
        self.roots
            .iter()
            .filter_map(|&root| self.to_node(root))
            .collect()
    }

    fn to_node(&self, idx: Index) -> Option<OrgNode> {
        let node = self.arena.get(idx)?;
        Some(OrgNode {
            data: node.data.clone(),
            parent_id: self.parent_id(idx).map(str::to_string),
            collapsed: node.collapsed,
            children: node
                .children
                .iter()
                .filter_map(|&child| self.to_node(child))
                .collect(),
        })
    }
}

pub struct PreOrderIterator<'a> {
    forest: &'a OrgForest,
    stack: Vec<(usize, Index)>,
}

impl<'a> PreOrderIterator<'a> {
    fn new(forest: &'a OrgForest, stack: Vec<(usize, Index)>) -> Self {
        Self { forest, stack }
    }
}

impl<'a> Iterator for PreOrderIterator<'a> {
    type Item = (usize, Index, &'a OrgEntry);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((depth, current_idx)) = self.stack.pop() {
            if let Some(node) = self.forest.get_node(current_idx) {
                // Push children in reverse order for left-to-right traversal
                for &child in node.children.iter().rev() {
                    self.stack.push((depth + 1, child));
                }
                return Some((depth, current_idx, node));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> OrgForest {
        // a
        // ├── b
        // │   └── d
        // └── c
        let mut forest = OrgForest::new();
        let a = forest.insert_node(NodeData::new("a", "Ada"), None).unwrap();
        let b = forest.insert_node(NodeData::new("b", "Bob"), Some(a)).unwrap();
        forest.insert_node(NodeData::new("c", "Cy"), Some(a)).unwrap();
        forest.insert_node(NodeData::new("d", "Di"), Some(b)).unwrap();
        forest
    }

    #[test]
    fn given_forest_when_iterating_then_visits_in_pre_order() {
        let forest = sample();
        let visited: Vec<(usize, &str)> = forest
            .iter()
            .map(|(depth, _, n)| (depth, n.data.id.as_str()))
            .collect();
        assert_eq!(visited, vec![(0, "a"), (1, "b"), (2, "d"), (1, "c")]);
        assert_eq!(forest.depth(), 3);
    }

    #[test]
    fn given_forest_when_checking_descendants_then_follows_parent_links() {
        let forest = sample();
        let a = forest.lookup("a").unwrap();
        let d = forest.lookup("d").unwrap();
        let c = forest.lookup("c").unwrap();
        assert!(forest.is_descendant(d, a));
        assert!(!forest.is_descendant(a, d));
        assert!(!forest.is_descendant(a, a));
        assert!(!forest.is_descendant(c, forest.lookup("b").unwrap()));
    }

    #[test]
    fn given_duplicate_id_when_inserting_then_errors() {
        let mut forest = sample();
        let result = forest.insert_node(NodeData::new("b", "Other"), None);
        assert_eq!(result, Err(DomainError::DuplicateId("b".into())));
        assert_eq!(forest.len(), 4);
    }

    #[test]
    fn given_forest_when_converting_to_nodes_then_structure_is_kept() {
        let mut forest = sample();
        let b = forest.lookup("b").unwrap();
        forest.get_node_mut(b).unwrap().collapsed = true;

        let nodes = forest.to_nodes();
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].children[0].parent_id.as_deref(), Some("a"));
        assert!(nodes[0].children[0].collapsed);
        assert_eq!(nodes[0].children[0].children[0].id(), "d");
        assert_eq!(nodes[0].children[1].parent_id.as_deref(), Some("a"));
    }

    #[test]
    fn given_subtree_when_purging_then_index_forgets_all_members() {
        let mut forest = sample();
        let b = forest.lookup("b").unwrap();
        forest.detach(b);
        assert_eq!(forest.purge(b), 2);
        assert!(!forest.contains("b"));
        assert!(!forest.contains("d"));
        assert_eq!(forest.len(), 2);
    }
}
