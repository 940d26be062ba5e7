//! Domain layer: panorama tree, layout and viewport math
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod cells;
pub mod entities;
pub mod error;
pub mod layout;
pub mod tree_traits;
pub mod viewport;

pub use arena::{NodeData, RenderNode, RenderSnapshot, RenderTree};
pub use cells::{combine, CanvasEdge, CanvasNode, CellSet, NodePayload, Port};
pub use entities::*;
pub use error::{DomainError, DomainResult};
pub use layout::{compact_layout, indented_layout, LayoutOptions, LayoutResult, Side};
pub use viewport::{BBox, Point, Viewport, ZoomBounds};
