//! Text rendering of the visible panorama tree.

use generational_arena::Index;
use termtree::Tree;
use tracing::instrument;

use crate::domain::arena::{RenderNode, RenderTree};

pub trait TreeNodeConvert {
    fn to_tree_string(&self) -> Tree<String>;
}

/// `+` marks a collapsed node with parked children, `-` an expanded one.
fn label(node: &RenderNode) -> String {
    let marker = match (node.data.node_type.is_expandable(), node.expand) {
        (true, false) if node.has_child => " [+]",
        (true, true) if node.has_child => " [-]",
        _ => "",
    };
    format!("{}{}", node.data, marker)
}

impl TreeNodeConvert for RenderTree {
    #[instrument(level = "debug", skip(self))]
    fn to_tree_string(&self) -> Tree<String> {
        fn build_tree(tree: &RenderTree, node_idx: Index) -> Option<Tree<String>> {
            let node = tree.get(node_idx)?;
            let leaves: Vec<Tree<String>> = node
                .visible_children()
                .iter()
                .filter_map(|&child| build_tree(tree, child))
                .collect();
            Some(Tree::new(label(node)).with_leaves(leaves))
        }

        self.root()
            .and_then(|root| build_tree(self, root))
            .unwrap_or_else(|| Tree::new("Empty tree".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::testing::{business_node, logical_entity, subject_domain};

    #[test]
    fn given_collapsed_business_node_when_printing_then_marks_it() {
        let sd = subject_domain(
            "sd1",
            vec![business_node("bo1", vec![logical_entity("le1")])],
        );
        let mut tree = RenderTree::transform(Some(&sd));

        let collapsed = tree.to_tree_string().to_string();
        assert!(collapsed.contains("bo1 [business-object] [+]"));
        assert!(!collapsed.contains("le1"));

        tree.toggle_one("bo1");
        let expanded = tree.to_tree_string().to_string();
        assert!(expanded.contains("bo1 [business-object] [-]"));
        assert!(expanded.contains("le1 [logical-entity]"));
    }

    #[test]
    fn given_empty_tree_when_printing_then_says_so() {
        let tree = RenderTree::new();
        assert_eq!(tree.to_tree_string().to_string().trim(), "Empty tree");
    }
}
