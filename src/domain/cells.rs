//! Node and edge descriptors handed to the rendering surface.

use std::collections::HashSet;

use serde::Serialize;
use tracing::debug;

use crate::domain::arena::{NodeData, RenderTree};
use crate::domain::entities::{NodeSize, NodeType};
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::layout::{compact_layout, indented_layout, LayoutOptions, LayoutResult, Side};
use crate::domain::viewport::{BBox, Point};

/// Deterministic id of a node's inbound port.
pub fn in_port_id(node_id: &str) -> String {
    format!("{node_id}-in")
}

/// Deterministic id of a node's outbound port.
pub fn out_port_id(node_id: &str) -> String {
    format!("{node_id}-out")
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Port {
    pub id: String,
    pub group: Side,
}

/// Interactive payload of a node cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodePayload {
    #[serde(flatten)]
    pub data: NodeData,
    pub expand: bool,
    pub has_child: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CanvasNode {
    pub id: String,
    pub shape: String,
    pub position: Point,
    pub width: f64,
    pub height: f64,
    pub data: NodePayload,
    /// Inbound port first, outbound second
    pub ports: [Port; 2],
}

impl CanvasNode {
    pub fn new(
        data: NodePayload,
        shape: &str,
        position: Point,
        size: NodeSize,
        in_side: Side,
        out_side: Side,
    ) -> Self {
        let id = data.data.id.clone();
        Self {
            ports: [
                Port {
                    id: in_port_id(&id),
                    group: in_side,
                },
                Port {
                    id: out_port_id(&id),
                    group: out_side,
                },
            ],
            id,
            shape: shape.to_string(),
            position,
            width: size.width,
            height: size.height,
            data,
        }
    }

    pub fn bbox(&self) -> BBox {
        BBox::new(self.position.x, self.position.y, self.width, self.height)
    }

    pub fn node_type(&self) -> NodeType {
        self.data.data.node_type
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Terminal {
    pub cell: String,
    pub port: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CanvasEdge {
    pub id: String,
    pub source: Terminal,
    pub target: Terminal,
}

impl CanvasEdge {
    /// Edge from `source`'s outbound port to `target`'s inbound port.
    pub fn connect(source: &str, target: &str) -> Self {
        Self {
            id: format!("{source}-{target}"),
            source: Terminal {
                cell: source.to_string(),
                port: out_port_id(source),
            },
            target: Terminal {
                cell: target.to_string(),
                port: in_port_id(target),
            },
        }
    }
}

/// Full cell set replacing the surface content on every relayout.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CellSet {
    pub nodes: Vec<CanvasNode>,
    pub edges: Vec<CanvasEdge>,
}

impl CellSet {
    pub fn node(&self, id: &str) -> Option<&CanvasNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Check that every edge endpoint names a port of the cell it points at.
    pub fn validate(&self) -> DomainResult<()> {
        let ports: HashSet<(&str, &str)> = self
            .nodes
            .iter()
            .flat_map(|n| n.ports.iter().map(move |p| (n.id.as_str(), p.id.as_str())))
            .collect();
        for edge in &self.edges {
            for end in [&edge.source, &edge.target] {
                if !ports.contains(&(end.cell.as_str(), end.port.as_str())) {
                    return Err(DomainError::DanglingPort {
                        edge: edge.id.clone(),
                        port: end.port.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Bounding box of all nodes.
    pub fn bbox(&self) -> Option<BBox> {
        self.nodes.iter().map(CanvasNode::bbox).reduce(|a, b| a.union(&b))
    }
}

/// Lay out the visible tree and emit its cells.
///
/// The compact pass places the root group and its direct children; each of
/// those children is then laid out as an indented list anchored at its
/// compact position.
pub fn combine(tree: &RenderTree, opts: &LayoutOptions) -> Option<CellSet> {
    let top = compact_layout(tree, opts)?;
    let mut cells = CellSet::default();

    push_node(&mut cells, tree, &top, Side::Top);
    for tier2 in &top.children {
        cells.edges.push(CanvasEdge::connect(&top.id, &tier2.id));
        let placed = indented_layout(tree, &tier2.id, opts)
            .map(|local| local.offset(tier2.x, tier2.y))
            .unwrap_or_else(|| tier2.clone());
        push_node(&mut cells, tree, &placed, in_side(top.anchor));
        for (parent, child) in placed.edges() {
            push_node(&mut cells, tree, child, in_side(parent.anchor));
            cells.edges.push(CanvasEdge::connect(&parent.id, &child.id));
        }
    }
    debug!(
        "combine: {} nodes, {} edges",
        cells.nodes.len(),
        cells.edges.len()
    );
    Some(cells)
}

/// A child's inbound port faces the side its parent anchors from.
fn in_side(parent_anchor: Side) -> Side {
    match parent_anchor {
        Side::Bottom => Side::Top,
        _ => Side::Left,
    }
}

fn push_node(cells: &mut CellSet, tree: &RenderTree, placed: &LayoutResult, in_side: Side) {
    let Some(node) = tree.node(&placed.id) else {
        return;
    };
    let payload = NodePayload {
        data: node.data.clone(),
        expand: node.expand,
        has_child: node.has_child,
    };
    cells.nodes.push(CanvasNode::new(
        payload,
        placed.node_type.shape(),
        Point::new(placed.x, placed.y),
        placed.node_type.size(),
        in_side,
        placed.anchor,
    ));
}
