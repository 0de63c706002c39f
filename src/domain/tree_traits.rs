/*
Plain-text view of the forest for terminals.
Collapsed nodes show a marker with the number of hidden direct reports instead of their subtree.
 */
use termtree::Tree;
use tracing::instrument;

use crate::domain::arena::OrgForest;
use crate::domain::entities::OrgNode;

pub trait TreeNodeConvert {
    fn to_tree_string(&self) -> Vec<Tree<String>>;
}

fn label(node: &OrgNode) -> String {
    if node.collapsed && !node.children.is_empty() {
        format!("{} [+{}]", node.data, node.children.len())
    } else {
        node.data.to_string()
    }
}

impl TreeNodeConvert for OrgNode {
    fn to_tree_string(&self) -> Vec<Tree<String>> {
        let leaves: Vec<_> = if self.collapsed {
            Vec::new()
        } else {
            self.children
                .iter()
                .flat_map(|c| c.to_tree_string())
                .collect()
        };
        vec![Tree::new(label(self)).with_leaves(leaves)]
    }
}

impl TreeNodeConvert for OrgForest {
    #[instrument(level = "debug", skip(self))]
    fn to_tree_string(&self) -> Vec<Tree<String>> {
        self.to_nodes()
            .iter()
            .flat_map(|node| node.to_tree_string())
            .collect()
    }
}
