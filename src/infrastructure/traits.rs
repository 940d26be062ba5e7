//! I/O boundary traits for testability
//!
//! These traits abstract the data source and the rendering surface, allowing
//! services to be tested with in-memory implementations.

use std::io;
use std::path::Path;

use crate::application::ApplicationResult;
use crate::domain::{BBox, CanvasEdge, CanvasNode, CellSet, DomainNode, Viewport};

/// Filesystem abstraction for testability.
pub trait FileSystem: Send + Sync {
    /// Read file contents to string.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Check if path is a file.
    fn is_file(&self, path: &Path) -> bool;
}

/// Real filesystem implementation using std::fs.
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }
}

/// Backend listing API of the asset hierarchy.
pub trait GroupSource: Send + Sync {
    /// Flat list of top-level groups, without subtrees.
    fn fetch_group_list(&self) -> ApplicationResult<Vec<DomainNode>>;

    /// One group's full subtree.
    fn fetch_group_subtree(&self, group_id: &str) -> ApplicationResult<DomainNode>;
}

/// Rendering surface: cell storage plus viewport state.
pub trait CanvasSurface {
    /// Replace the entire cell set; nodes (and their ports) go in before edges.
    fn reset_cells(&mut self, cells: CellSet);

    /// Add nodes on top of the current cell set, replacing nodes with the same id.
    fn add_nodes(&mut self, nodes: Vec<CanvasNode>);

    fn nodes(&self) -> &[CanvasNode];

    fn edges(&self) -> &[CanvasEdge];

    fn viewport(&self) -> &Viewport;

    fn viewport_mut(&mut self) -> &mut Viewport;

    fn node_bbox(&self, id: &str) -> Option<BBox> {
        self.nodes().iter().find(|n| n.id == id).map(CanvasNode::bbox)
    }

    /// Bounding box of every node on the surface.
    fn content_bbox(&self) -> Option<BBox> {
        self.nodes()
            .iter()
            .map(CanvasNode::bbox)
            .reduce(|a, b| a.union(&b))
    }
}

/// Surface keeping cells in memory, used by the CLI and tests.
#[derive(Debug)]
pub struct MemoryCanvas {
    nodes: Vec<CanvasNode>,
    edges: Vec<CanvasEdge>,
    viewport: Viewport,
    resets: usize,
}

impl MemoryCanvas {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            nodes: Vec::new(),
            edges: Vec::new(),
            viewport,
            resets: 0,
        }
    }

    /// Number of full cell resets so far.
    pub fn resets(&self) -> usize {
        self.resets
    }
}

impl CanvasSurface for MemoryCanvas {
    fn reset_cells(&mut self, cells: CellSet) {
        self.nodes = cells.nodes;
        self.edges = cells.edges;
        self.resets += 1;
    }

    fn add_nodes(&mut self, nodes: Vec<CanvasNode>) {
        for node in nodes {
            match self.nodes.iter_mut().find(|n| n.id == node.id) {
                Some(existing) => *existing = node,
                None => self.nodes.push(node),
            }
        }
    }

    fn nodes(&self) -> &[CanvasNode] {
        &self.nodes
    }

    fn edges(&self) -> &[CanvasEdge] {
        &self.edges
    }

    fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }
}
