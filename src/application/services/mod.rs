//! Application services

pub mod canvas;
pub mod panorama;

pub use canvas::{CanvasSynchronizer, RenderOutcome, StripOptions};
pub use panorama::{initial_group, GroupCache, PanoramaService, SearchOutcome};
