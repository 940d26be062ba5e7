//! assetmap: layout orchestration for the asset panorama
//!
//! Layers, innermost first:
//! - `domain`: render tree, layout passes, cells and viewport math
//! - `application`: canvas synchronizer and panorama controller
//! - `infrastructure`: group source, surfaces and wiring
//! - `cli`: command line entry points

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
