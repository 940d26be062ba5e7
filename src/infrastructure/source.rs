//! Group source backed by a JSON dump of the listing API.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, instrument};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::{DomainError, DomainNode};
use crate::infrastructure::traits::{FileSystem, GroupSource};

/// Reads an array of full group trees from one JSON file on every fetch.
pub struct JsonGroupSource {
    fs: Arc<dyn FileSystem>,
    path: PathBuf,
}

impl JsonGroupSource {
    pub fn new(fs: Arc<dyn FileSystem>, path: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            path: path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> ApplicationResult<Vec<DomainNode>> {
        let content = self
            .fs
            .read_to_string(&self.path)
            .with_path_context("read group dump", &self.path)?;
        serde_json::from_str(&content).map_err(|e| ApplicationError::OperationFailed {
            context: format!("parse group dump {}", self.path.display()),
            source: Box::new(e),
        })
    }
}

impl GroupSource for JsonGroupSource {
    #[instrument(level = "debug", skip(self))]
    fn fetch_group_list(&self) -> ApplicationResult<Vec<DomainNode>> {
        let groups: Vec<DomainNode> = self
            .load()?
            .iter()
            .map(DomainNode::without_children)
            .collect();
        debug!("fetch_group_list: {} groups", groups.len());
        Ok(groups)
    }

    #[instrument(level = "debug", skip(self))]
    fn fetch_group_subtree(&self, group_id: &str) -> ApplicationResult<DomainNode> {
        self.load()?
            .into_iter()
            .find(|g| g.id == group_id)
            .ok_or_else(|| DomainError::UnknownGroup(group_id.to_string()).into())
    }
}
