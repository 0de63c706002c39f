//! Projection of the ownership forest into renderer-facing display nodes.
//!
//! Pure derivation: the display tree is rebuilt from scratch on every change.

use std::collections::{BTreeMap, HashSet};

use generational_arena::Index;
use tracing::instrument;

use crate::domain::arena::OrgForest;
use crate::domain::entities::{attr, DisplayNode, DEFAULT_NAME, DEFAULT_ROOT_NAME};
use crate::domain::ids::{generate_unique_id, DEFAULT_ID_LENGTH};

/// A single tree ready for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Projection {
    pub root: DisplayNode,
    /// Set when `root` is the synthetic wrapper around several roots
    pub synthetic_root_id: Option<String>,
}

#[derive(Debug)]
pub struct Projector {
    root_name: String,
    default_name: String,
    id_length: usize,
}

impl Default for Projector {
    fn default() -> Self {
        Self::new()
    }
}

impl Projector {
    pub fn new() -> Self {
        Self {
            root_name: DEFAULT_ROOT_NAME.to_string(),
            default_name: DEFAULT_NAME.to_string(),
            id_length: DEFAULT_ID_LENGTH,
        }
    }

    pub fn with_root_name(mut self, name: impl Into<String>) -> Self {
        self.root_name = name.into();
        self
    }

    pub fn with_default_name(mut self, name: impl Into<String>) -> Self {
        self.default_name = name.into();
        self
    }

    pub fn with_id_length(mut self, length: usize) -> Self {
        self.id_length = length;
        self
    }

    /// Project every root, preserving order. No wrapper is added.
    #[instrument(level = "debug", skip_all)]
    pub fn project_forest(&self, forest: &OrgForest) -> Vec<DisplayNode> {
        forest
            .roots()
            .iter()
            .filter_map(|&root| self.project_node(forest, root))
            .collect()
    }

    /// Project the forest into a single tree.
    ///
    /// Several roots get wrapped in a synthetic root; an empty forest yields `None`.
    #[instrument(level = "debug", skip_all)]
    pub fn project(&self, forest: &OrgForest) -> Option<Projection> {
        let mut roots = self.project_forest(forest);
        match roots.len() {
            0 => None,
            1 => roots.pop().map(|root| Projection {
                root,
                synthetic_root_id: None,
            }),
            count => {
                let taken: HashSet<&str> = forest.iter().map(|(_, _, n)| n.data.id.as_str()).collect();
                let id = generate_unique_id(self.id_length, |candidate| taken.contains(candidate));
                let mut attributes = BTreeMap::new();
                attributes.insert(attr::ID.to_string(), id.clone());
                attributes.insert(attr::COLLAPSED.to_string(), "false".to_string());
                attributes.insert(attr::CHILD_COUNT.to_string(), count.to_string());
                Some(Projection {
                    root: DisplayNode {
                        name: self.root_name.clone(),
                        attributes,
                        children: Some(roots),
                    },
                    synthetic_root_id: Some(id),
                })
            }
        }
    }

    fn project_node(&self, forest: &OrgForest, idx: Index) -> Option<DisplayNode> {
        let node = forest.get_node(idx)?;
        let data = &node.data;

        let mut attributes = BTreeMap::new();
        attributes.insert(attr::ID.to_string(), data.id.clone());
        if !data.title.trim().is_empty() {
            attributes.insert(attr::TITLE.to_string(), data.title.clone());
        }
        if !data.department.trim().is_empty() {
            attributes.insert(attr::DEPARTMENT.to_string(), data.department.clone());
        }
        if !data.image_url.is_empty() {
            attributes.insert(attr::IMAGE_URL.to_string(), data.image_url.clone());
        }
        attributes.insert(attr::COLLAPSED.to_string(), node.collapsed.to_string());
        attributes.insert(attr::CHILD_COUNT.to_string(), node.children.len().to_string());

        let children = if node.collapsed || node.children.is_empty() {
            None
        } else {
            Some(
                node.children
                    .iter()
                    .filter_map(|&child| self.project_node(forest, child))
                    .collect(),
            )
        };

        let name = if data.name.trim().is_empty() {
            self.default_name.clone()
        } else {
            data.name.clone()
        };

        Some(DisplayNode {
            name,
            attributes,
            children,
        })
    }
}

/// Project with default settings.
pub fn project(forest: &OrgForest) -> Option<DisplayNode> {
    Projector::new().project(forest).map(|p| p.root)
}
