//! Canvas synchronizer
//!
//! Applies layout results to a rendering surface and owns the viewport
//! operations. Every render replaces the full cell set.

use serde::Serialize;
use tracing::{debug, instrument, warn};

use crate::domain::{
    combine, BBox, CanvasNode, DomainNode, DomainResult, LayoutOptions, NodeData, NodePayload,
    NodeType, Point, RenderTree, Side, SIBLING_NODE_SHAPE, SIBLING_NODE_SIZE,
};
use crate::infrastructure::traits::CanvasSurface;

/// What a render call did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RenderOutcome {
    /// Nothing to draw yet, e.g. data still loading
    Skipped,
    /// Tree is not a fully formed group subtree; surface left untouched
    Invalid { reason: String },
    Rendered {
        nodes: usize,
        edges: usize,
        generation: u64,
    },
}

impl RenderOutcome {
    pub fn is_rendered(&self) -> bool {
        matches!(self, RenderOutcome::Rendered { .. })
    }
}

/// Placement constants of the sibling strip.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StripOptions {
    /// Distance between the left edges of neighbouring strip nodes
    pub spacing: f64,
    /// Gap between the focused group's right edge and the first right-hand node
    pub leading_gap: f64,
    /// Vertical offset from the focused group's top edge
    pub y_offset: f64,
}

impl Default for StripOptions {
    fn default() -> Self {
        Self {
            spacing: 236.0,
            leading_gap: 16.0,
            y_offset: 12.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CanvasSynchronizer {
    layout: LayoutOptions,
    strip: StripOptions,
    fit_padding: f64,
    root_top_offset: f64,
}

impl Default for CanvasSynchronizer {
    fn default() -> Self {
        Self::new(LayoutOptions::default(), StripOptions::default(), 20.0, 40.0)
    }
}

impl CanvasSynchronizer {
    pub fn new(
        layout: LayoutOptions,
        strip: StripOptions,
        fit_padding: f64,
        root_top_offset: f64,
    ) -> Self {
        Self {
            layout,
            strip,
            fit_padding,
            root_top_offset,
        }
    }

    pub fn layout_options(&self) -> &LayoutOptions {
        &self.layout
    }

    /// Lay out `tree` and replace the surface content with the result.
    ///
    /// # Errors
    /// `DomainError::DanglingPort` if the layout emitted an edge to a port
    /// that no node carries.
    #[instrument(level = "debug", skip_all, fields(generation = tree.generation()))]
    pub fn render(
        &self,
        surface: &mut dyn CanvasSurface,
        tree: &RenderTree,
    ) -> DomainResult<RenderOutcome> {
        let Some(root) = tree.root_node() else {
            debug!("render: no tree loaded");
            return Ok(RenderOutcome::Skipped);
        };
        if root.data.id.is_empty() {
            debug!("render: root has no id");
            return Ok(RenderOutcome::Skipped);
        }
        if root.data.node_type != NodeType::Group {
            warn!(
                "render: refusing {} rooted tree {}",
                root.data.node_type, root.data.id
            );
            return Ok(RenderOutcome::Invalid {
                reason: format!("root {} is a {}, expected a group", root.data.id, root.data.node_type),
            });
        }
        let Some(cells) = combine(tree, &self.layout) else {
            return Ok(RenderOutcome::Skipped);
        };
        cells.validate()?;

        let outcome = RenderOutcome::Rendered {
            nodes: cells.nodes.len(),
            edges: cells.edges.len(),
            generation: tree.generation(),
        };
        surface.reset_cells(cells);
        debug!("render: {:?}", outcome);
        Ok(outcome)
    }

    /// Place the other top-level groups in a strip flanking the focused one.
    ///
    /// Groups before the focused one go left, closest first; groups after it
    /// go right. Returns the placed nodes, empty when the focused group is
    /// not on the surface or not in `groups`.
    #[instrument(level = "debug", skip(self, surface, groups))]
    pub fn render_sibling_strip(
        &self,
        surface: &mut dyn CanvasSurface,
        groups: &[DomainNode],
        focused_id: &str,
    ) -> Vec<CanvasNode> {
        let Some(origin) = surface.node_bbox(focused_id) else {
            debug!("render_sibling_strip: focused group not on surface");
            return Vec::new();
        };
        let Some(pos) = groups.iter().position(|g| g.id == focused_id) else {
            debug!("render_sibling_strip: focused group not in group list");
            return Vec::new();
        };
        let y = origin.y + self.strip.y_offset;

        let left = groups[..pos]
            .iter()
            .rev()
            .enumerate()
            .map(|(k, g)| (g, origin.x - self.strip.spacing * (k + 1) as f64));
        let right = groups[pos + 1..].iter().enumerate().map(|(k, g)| {
            (
                g,
                origin.right() + self.strip.leading_gap + self.strip.spacing * k as f64,
            )
        });

        let placed: Vec<CanvasNode> = left
            .chain(right)
            .map(|(group, x)| sibling_node(group, Point::new(x, y)))
            .collect();
        surface.add_nodes(placed.clone());
        placed
    }

    /// Zoom to an absolute multiple; returns the effective, clamped scale.
    pub fn zoom_to(&self, surface: &mut dyn CanvasSurface, multiple: f64) -> f64 {
        surface.viewport_mut().zoom_to(multiple)
    }

    /// Apply a wheel step; false when it was suppressed at a bound.
    pub fn wheel_zoom(&self, surface: &mut dyn CanvasSurface, delta: f64, cursor: Point) -> bool {
        surface.viewport_mut().wheel_zoom(delta, cursor)
    }

    /// Pan by a screen-space delta; returns the resulting translation.
    pub fn pan(&self, surface: &mut dyn CanvasSurface, dx: f64, dy: f64) -> Point {
        surface.viewport_mut().pan(dx, dy)
    }

    /// Fit all content into the surface. None on an empty surface.
    pub fn zoom_to_fit(&self, surface: &mut dyn CanvasSurface) -> Option<f64> {
        let content = surface.content_bbox()?;
        Some(surface.viewport_mut().zoom_to_fit(&content, self.fit_padding))
    }

    /// Center the viewport on a node; false when the node is not on the surface.
    pub fn center_on_node(&self, surface: &mut dyn CanvasSurface, id: &str) -> bool {
        self.with_bbox(surface, id, |vp, bbox| vp.center_on(bbox))
    }

    /// First-paint positioning: root centered horizontally, pinned near the top.
    pub fn center_and_nudge_root(&self, surface: &mut dyn CanvasSurface, id: &str) -> bool {
        let top = self.root_top_offset;
        self.with_bbox(surface, id, |vp, bbox| vp.center_and_nudge(bbox, top))
    }

    fn with_bbox(
        &self,
        surface: &mut dyn CanvasSurface,
        id: &str,
        apply: impl FnOnce(&mut crate::domain::Viewport, &BBox),
    ) -> bool {
        match surface.node_bbox(id) {
            Some(bbox) => {
                apply(surface.viewport_mut(), &bbox);
                true
            }
            None => {
                debug!("viewport: node {} not on surface", id);
                false
            }
        }
    }
}

fn sibling_node(group: &DomainNode, position: Point) -> CanvasNode {
    let payload = NodePayload {
        data: NodeData::from(group),
        expand: false,
        has_child: !group.children().is_empty(),
    };
    CanvasNode::new(
        payload,
        SIBLING_NODE_SHAPE,
        position,
        SIBLING_NODE_SIZE,
        Side::Left,
        Side::Right,
    )
}
