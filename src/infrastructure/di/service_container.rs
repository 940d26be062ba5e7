//! Service container for dependency injection
//!
//! Wires up the panorama controller with its source, cache and surface.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use crate::application::services::{GroupCache, PanoramaService};
use crate::config::Settings;
use crate::infrastructure::error::{InfraError, InfraResult};
use crate::infrastructure::source::JsonGroupSource;
use crate::infrastructure::traits::{FileSystem, MemoryCanvas, RealFileSystem};

/// Container holding settings and I/O abstractions.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> Self {
        Self::with_deps(settings, Arc::new(RealFileSystem))
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(settings: Settings, fs: Arc<dyn FileSystem>) -> Self {
        let settings = Arc::new(settings);

        Self { settings, fs }
    }

    /// Group dump to read: the explicit path wins over `data_file` from config.
    pub fn data_file(&self, explicit: Option<&Path>) -> Option<PathBuf> {
        explicit
            .map(Path::to_path_buf)
            .or_else(|| self.settings.data_file.clone())
    }

    /// Build a panorama session over `data_file` drawing onto an in-memory surface.
    pub fn panorama(&self, data_file: &Path) -> InfraResult<PanoramaService<MemoryCanvas>> {
        if !self.fs.is_file(data_file) {
            return Err(InfraError::io(
                format!("group dump {}", data_file.display()),
                io::Error::new(io::ErrorKind::NotFound, "not a file"),
            ));
        }
        debug!("panorama: data_file={}", data_file.display());

        let source = Arc::new(JsonGroupSource::new(Arc::clone(&self.fs), data_file));
        let surface = MemoryCanvas::new(self.settings.viewport.viewport());
        Ok(PanoramaService::new(
            source,
            GroupCache::new(),
            self.settings.synchronizer(),
            surface,
        ))
    }
}
