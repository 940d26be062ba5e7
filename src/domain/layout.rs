//! Two-tier tree layout: compact box for the group and its subject domains,
//! indented list for everything below a subject domain.
//!
//! Both algorithms are pure functions over an owned [`LayoutInput`] tree and
//! place each node's top-left corner relative to the layout root at `(0, 0)`.
//! Gaps are applied as padding on every side of a node, so adjacent boxes end
//! up `2 * gap` apart.

use generational_arena::Index;
use serde::Serialize;

use crate::domain::arena::RenderTree;
use crate::domain::entities::{NodeSize, NodeType};

/// Side of a node box an edge attaches to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Top,
    Right,
    Bottom,
    Left,
}

/// Gap and indent constants of both layout passes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutOptions {
    /// Horizontal padding per side in the compact pass
    pub h_gap: f64,
    /// Vertical padding per side in the compact pass
    pub v_gap: f64,
    /// Vertical padding per side in the indented pass
    pub indented_v_gap: f64,
    /// Horizontal offset of a child relative to its parent in the indented pass
    pub indent: f64,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            h_gap: 8.0,
            v_gap: 9.0,
            indented_v_gap: 4.0,
            indent: 28.0,
        }
    }
}

/// Input tree of a layout pass.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutInput {
    pub id: String,
    pub node_type: NodeType,
    pub size: NodeSize,
    /// Width drawn right of the node's left edge, at least `size.width`
    pub span: f64,
    pub children: Vec<LayoutInput>,
}

impl LayoutInput {
    pub fn new(id: impl Into<String>, node_type: NodeType) -> Self {
        Self {
            id: id.into(),
            node_type,
            size: node_type.size(),
            span: node_type.size().width,
            children: Vec::new(),
        }
    }

    pub fn with_children(mut self, children: Vec<LayoutInput>) -> Self {
        self.children = children;
        self
    }

    /// Reserve room for content hanging off to the right of the node box.
    pub fn with_span(mut self, span: f64) -> Self {
        self.span = span.max(self.size.width);
        self
    }

    /// Project the visible subtree below `idx`, cut at `max_depth` levels.
    fn from_tree(tree: &RenderTree, idx: Index, max_depth: Option<usize>) -> Option<Self> {
        let node = tree.get(idx)?;
        let children = match max_depth {
            Some(0) => Vec::new(),
            _ => node
                .visible_children()
                .iter()
                .filter_map(|&child| Self::from_tree(tree, child, max_depth.map(|d| d - 1)))
                .collect(),
        };
        Some(Self::new(node.data.id.clone(), node.data.node_type).with_children(children))
    }
}

/// Computed placement of one node; mirrors the input tree shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutResult {
    pub id: String,
    pub node_type: NodeType,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Side this node's children attach to
    pub anchor: Side,
    pub children: Vec<LayoutResult>,
}

impl LayoutResult {
    /// Copy of this subtree moved by `(dx, dy)`.
    pub fn offset(&self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            children: self.children.iter().map(|c| c.offset(dx, dy)).collect(),
            ..self.clone()
        }
    }

    /// Pre-order walk over the subtree.
    pub fn walk(&self) -> Vec<&LayoutResult> {
        let mut out = Vec::new();
        let mut stack = vec![self];
        while let Some(current) = stack.pop() {
            out.push(current);
            stack.extend(current.children.iter().rev());
        }
        out
    }

    /// Parent → child pairs in pre-order.
    pub fn edges(&self) -> Vec<(&LayoutResult, &LayoutResult)> {
        self.walk()
            .into_iter()
            .flat_map(|parent| parent.children.iter().map(move |child| (parent, child)))
            .collect()
    }

    pub fn find(&self, id: &str) -> Option<&LayoutResult> {
        self.walk().into_iter().find(|r| r.id == id)
    }

    /// Distance from this node's left edge to the rightmost edge in the subtree.
    pub fn span(&self) -> f64 {
        self.walk()
            .into_iter()
            .map(|r| r.x + r.width)
            .fold(self.x + self.width, f64::max)
            - self.x
    }
}

/// Top-down compact layout.
///
/// Siblings are packed left to right with their subtree extents touching;
/// each parent is centered over the span of its children. A node's own
/// extent covers its `span`, and the node sits at the left of that block.
pub fn compact_box(input: &LayoutInput, opts: &LayoutOptions) -> LayoutResult {
    let placed = place_compact(input, opts, 0.0, 0.0, true);
    placed.offset(-placed.x, -placed.y)
}

fn compact_extent(input: &LayoutInput, opts: &LayoutOptions) -> f64 {
    let own = input.span + 2.0 * opts.h_gap;
    let children: f64 = input.children.iter().map(|c| compact_extent(c, opts)).sum();
    own.max(children)
}

fn place_compact(
    input: &LayoutInput,
    opts: &LayoutOptions,
    left: f64,
    top: f64,
    is_root: bool,
) -> LayoutResult {
    let extent = compact_extent(input, opts);
    let padded_width = input.span + 2.0 * opts.h_gap;
    let padded_height = input.size.height + 2.0 * opts.v_gap;

    let children_extent: f64 = input.children.iter().map(|c| compact_extent(c, opts)).sum();
    let mut cursor = left + (extent - children_extent) / 2.0;
    let children = input
        .children
        .iter()
        .map(|child| {
            let placed = place_compact(child, opts, cursor, top + padded_height, false);
            cursor += compact_extent(child, opts);
            placed
        })
        .collect();

    LayoutResult {
        id: input.id.clone(),
        node_type: input.node_type,
        x: left + (extent - padded_width) / 2.0 + opts.h_gap,
        y: top + opts.v_gap,
        width: input.size.width,
        height: input.size.height,
        anchor: compact_anchor(input.node_type, is_root),
        children,
    }
}

/// The root group anchors children from its bottom edge, all others from the right.
fn compact_anchor(node_type: NodeType, is_root: bool) -> Side {
    if is_root && node_type == NodeType::Group {
        Side::Bottom
    } else {
        Side::Right
    }
}

/// Left-to-right indented list layout.
///
/// Nodes are stacked in pre-order; each node sits `indent` right of its
/// parent unless it is a subject domain.
pub fn indented(input: &LayoutInput, opts: &LayoutOptions) -> LayoutResult {
    let mut cursor = 0.0;
    place_indented(input, opts, None, &mut cursor)
}

fn place_indented(
    input: &LayoutInput,
    opts: &LayoutOptions,
    parent_x: Option<f64>,
    cursor: &mut f64,
) -> LayoutResult {
    let x = match parent_x {
        None => 0.0,
        Some(px) if input.node_type == NodeType::SubjectDomain => px,
        Some(px) => px + opts.indent,
    };
    let y = *cursor;
    *cursor += input.size.height + 2.0 * opts.indented_v_gap;

    let children = input
        .children
        .iter()
        .map(|child| place_indented(child, opts, Some(x), cursor))
        .collect();

    LayoutResult {
        id: input.id.clone(),
        node_type: input.node_type,
        x,
        y,
        width: input.size.width,
        height: input.size.height,
        anchor: Side::Right,
        children,
    }
}

/// Compact layout of the root group and its direct children, deeper tiers stripped.
///
/// Each direct child reserves the width of its indented sub-layout, so
/// neighbouring columns never overlap.
pub fn compact_layout(tree: &RenderTree, opts: &LayoutOptions) -> Option<LayoutResult> {
    let mut input = LayoutInput::from_tree(tree, tree.root()?, Some(1))?;
    input.children = input
        .children
        .into_iter()
        .map(|child| match indented_layout(tree, &child.id, opts) {
            Some(local) => child.with_span(local.span()),
            None => child,
        })
        .collect();
    Some(compact_box(&input, opts))
}

/// Indented layout of the full visible subtree below `id`.
pub fn indented_layout(tree: &RenderTree, id: &str, opts: &LayoutOptions) -> Option<LayoutResult> {
    let input = LayoutInput::from_tree(tree, tree.index_of(id)?, None)?;
    Some(indented(&input, opts))
}
