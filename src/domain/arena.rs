use std::collections::HashMap;
use std::fmt;

use generational_arena::{Arena, Index};
use serde::Serialize;
use tracing::{debug, instrument, warn};

use crate::domain::entities::{DomainNode, NodeType};

/// Data payload for render nodes: a domain node without its subtree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeData {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    pub parent_id: Option<String>,
    pub path_id: String,
    pub path_name: String,
    pub asset_count: u64,
    pub classified_count: u64,
}

impl From<&DomainNode> for NodeData {
    fn from(node: &DomainNode) -> Self {
        Self {
            id: node.id.clone(),
            name: node.name.clone(),
            node_type: node.node_type,
            parent_id: node.parent_id.clone(),
            path_id: node.path_id.clone(),
            path_name: node.path_name.clone(),
            asset_count: node.asset_count,
            classified_count: node.classified_count,
        }
    }
}

impl fmt::Display for NodeData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.name, self.node_type)
    }
}

/// Render node in the arena-based panorama tree.
///
/// For expandable types `children` is `Some` exactly when `expand` is set and
/// then mirrors `temp_child`; the parked list itself is never cleared.
#[derive(Debug)]
pub struct RenderNode {
    pub data: NodeData,
    /// Index of parent node in the arena, None for the root
    pub parent: Option<Index>,
    pub expand: bool,
    pub has_child: bool,
    /// Currently visible children
    pub children: Option<Vec<Index>>,
    /// Children held aside while collapsed
    pub temp_child: Vec<Index>,
}

impl RenderNode {
    /// Visible children, empty when collapsed or capped.
    pub fn visible_children(&self) -> &[Index] {
        self.children.as_deref().unwrap_or(&[])
    }

    fn set_expanded(&mut self, expand: bool) {
        self.expand = expand;
        self.children = if expand {
            Some(self.temp_child.clone())
        } else {
            None
        };
    }
}

/// Arena-based render tree for one top-level group.
///
/// Every effective mutation bumps `generation`; callers compare generations
/// instead of node identity to decide whether a relayout is due.
///
/// Ids are expected to be unique within a group. If the source repeats one,
/// every node is still materialized but id lookups (`node`, `toggle_one`,
/// `expand_to_ids`, layout) resolve to the one inserted last in pre-order.
#[derive(Debug, Default)]
pub struct RenderTree {
    arena: Arena<RenderNode>,
    root: Option<Index>,
    by_id: HashMap<String, Index>,
    generation: u64,
}

impl RenderTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the render tree of a freshly fetched domain subtree.
    ///
    /// `None` yields an empty tree. Business-level nodes start collapsed with
    /// their subtree parked; logical entities and data views stop recursion.
    #[instrument(level = "debug", skip_all, fields(root = domain.map(|d| d.id.as_str())))]
    pub fn transform(domain: Option<&DomainNode>) -> Self {
        let mut tree = Self::new();
        if let Some(node) = domain {
            tree.insert_subtree(node, None);
            debug!("transform: {} nodes", tree.len());
        }
        tree
    }

    fn insert_subtree(&mut self, node: &DomainNode, parent: Option<Index>) -> Index {
        let node_type = node.node_type;
        let idx = self.arena.insert(RenderNode {
            data: NodeData::from(node),
            parent,
            expand: !node_type.is_expandable(),
            has_child: !node.children().is_empty(),
            children: None,
            temp_child: Vec::new(),
        });
        if self.by_id.insert(node.id.clone(), idx).is_some() {
            warn!("duplicate node id {}, later node wins lookups", node.id);
        }
        if parent.is_none() {
            self.root = Some(idx);
        }

        if node_type.caps_recursion() {
            return idx;
        }

        let child_indices: Vec<Index> = node
            .children()
            .iter()
            .map(|child| self.insert_subtree(child, Some(idx)))
            .collect();

        if let Some(render_node) = self.arena.get_mut(idx) {
            if node_type.is_expandable() {
                render_node.temp_child = child_indices;
            } else {
                render_node.children = Some(child_indices);
            }
        }
        idx
    }

    /// Flip the expand state of one expandable node.
    ///
    /// Returns `None` for an empty tree, otherwise the generation after the
    /// call. Unknown ids and non-expandable nodes leave the tree unchanged.
    #[instrument(level = "debug", skip(self))]
    pub fn toggle_one(&mut self, target_id: &str) -> Option<u64> {
        self.root?;
        match self.index_of(target_id).and_then(|idx| self.arena.get_mut(idx)) {
            Some(node) if node.data.node_type.is_expandable() => {
                let expand = !node.expand;
                node.set_expanded(expand);
                self.generation += 1;
                debug!("toggle_one: {} expand={}", target_id, expand);
            }
            Some(_) => debug!("toggle_one: {} is not expandable", target_id),
            None => debug!("toggle_one: {} not in tree", target_id),
        }
        Some(self.generation)
    }

    /// Collapse every expandable node.
    #[instrument(level = "debug", skip(self))]
    pub fn toggle_all(&mut self) -> Option<u64> {
        self.root?;
        let mut changed = false;
        for (_, node) in self.arena.iter_mut() {
            if node.data.node_type.is_expandable() && (node.expand || node.children.is_some()) {
                node.set_expanded(false);
                changed = true;
            }
        }
        if changed {
            self.generation += 1;
        }
        Some(self.generation)
    }

    /// Force the listed nodes expanded.
    ///
    /// Returns `None` when no listed node changed state, so the caller can
    /// skip the relayout.
    #[instrument(level = "debug", skip(self, ids))]
    pub fn expand_to_ids<S: AsRef<str>>(&mut self, ids: &[S]) -> Option<u64> {
        self.root?;
        let mut changed = false;
        for id in ids {
            let Some(idx) = self.index_of(id.as_ref()) else {
                continue;
            };
            if let Some(node) = self.arena.get_mut(idx) {
                if !node.expand {
                    node.set_expanded(true);
                    changed = true;
                }
            }
        }
        if !changed {
            debug!("expand_to_ids: nothing to expand");
            return None;
        }
        self.generation += 1;
        Some(self.generation)
    }

    pub fn root(&self) -> Option<Index> {
        self.root
    }

    pub fn root_node(&self) -> Option<&RenderNode> {
        self.root.and_then(|idx| self.arena.get(idx))
    }

    pub fn get(&self, idx: Index) -> Option<&RenderNode> {
        self.arena.get(idx)
    }

    pub fn index_of(&self, id: &str) -> Option<Index> {
        self.by_id.get(id).copied()
    }

    pub fn node(&self, id: &str) -> Option<&RenderNode> {
        self.index_of(id).and_then(|idx| self.arena.get(idx))
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Number of materialized nodes, visible or parked.
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Pre-order iterator over the visible nodes.
    pub fn iter(&self) -> VisibleIterator<'_> {
        VisibleIterator::new(self)
    }

    /// Ids of a node's visible children.
    pub fn child_ids(&self, id: &str) -> Option<Vec<&str>> {
        let node = self.node(id)?;
        Some(self.ids_of(node.visible_children()))
    }

    /// Ids of a node's parked children.
    pub fn temp_child_ids(&self, id: &str) -> Option<Vec<&str>> {
        let node = self.node(id)?;
        Some(self.ids_of(&node.temp_child))
    }

    fn ids_of(&self, indices: &[Index]) -> Vec<&str> {
        indices
            .iter()
            .filter_map(|&idx| self.arena.get(idx))
            .map(|node| node.data.id.as_str())
            .collect()
    }

    /// Structural copy of the tree for comparisons and output.
    pub fn snapshot(&self) -> Option<RenderSnapshot> {
        self.root.and_then(|idx| self.snapshot_at(idx))
    }

    fn snapshot_at(&self, idx: Index) -> Option<RenderSnapshot> {
        let node = self.arena.get(idx)?;
        let collect = |indices: &[Index]| -> Vec<RenderSnapshot> {
            indices.iter().filter_map(|&i| self.snapshot_at(i)).collect()
        };
        Some(RenderSnapshot {
            data: node.data.clone(),
            expand: node.expand,
            has_child: node.has_child,
            children: node.children.as_deref().map(collect),
            temp_child: collect(&node.temp_child),
        })
    }
}

/// Nested, owned view of a render subtree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderSnapshot {
    #[serde(flatten)]
    pub data: NodeData,
    pub expand: bool,
    pub has_child: bool,
    pub children: Option<Vec<RenderSnapshot>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub temp_child: Vec<RenderSnapshot>,
}

pub struct VisibleIterator<'a> {
    tree: &'a RenderTree,
    stack: Vec<Index>,
}

impl<'a> VisibleIterator<'a> {
    fn new(tree: &'a RenderTree) -> Self {
        let stack = tree.root().into_iter().collect();
        Self { tree, stack }
    }
}

impl<'a> Iterator for VisibleIterator<'a> {
    type Item = (Index, &'a RenderNode);

    fn next(&mut self) -> Option<Self::Item> {
        let current_idx = self.stack.pop()?;
        let node = self.tree.get(current_idx)?;
        // Push children in reverse order for left-to-right traversal
        self.stack.extend(node.visible_children().iter().rev());
        Some((current_idx, node))
    }
}
