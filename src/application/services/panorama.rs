//! Panorama controller
//!
//! Turns UI events into tree mutations, relayouts and viewport moves.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::application::services::canvas::{CanvasSynchronizer, RenderOutcome};
use crate::application::ApplicationResult;
use crate::domain::{ancestor_ids, DomainNode, Point, RenderTree};
use crate::infrastructure::traits::{CanvasSurface, GroupSource};

/// Render trees of the groups visited this session, keyed by group id.
///
/// Append-only: a group is transformed once and keeps its expand state.
#[derive(Debug, Default)]
pub struct GroupCache {
    trees: HashMap<String, RenderTree>,
}

impl GroupCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, group_id: &str) -> bool {
        self.trees.contains_key(group_id)
    }

    pub fn get(&self, group_id: &str) -> Option<&RenderTree> {
        self.trees.get(group_id)
    }

    pub fn get_mut(&mut self, group_id: &str) -> Option<&mut RenderTree> {
        self.trees.get_mut(group_id)
    }

    /// Insert a tree unless the group is already cached.
    pub fn insert(&mut self, group_id: impl Into<String>, tree: RenderTree) {
        self.trees.entry(group_id.into()).or_insert(tree);
    }

    pub fn len(&self) -> usize {
        self.trees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trees.is_empty()
    }
}

/// Group to show first: the first with any classified or asset count, else the first.
pub fn initial_group(groups: &[DomainNode]) -> Option<&DomainNode> {
    groups
        .iter()
        .find(|g| g.has_assets())
        .or_else(|| groups.first())
}

/// Result of a search selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchOutcome {
    /// `Skipped` when every ancestor was already expanded
    pub render: RenderOutcome,
    pub centered: bool,
}

pub struct PanoramaService<C: CanvasSurface> {
    source: Arc<dyn GroupSource>,
    cache: GroupCache,
    sync: CanvasSynchronizer,
    surface: C,
    groups: Vec<DomainNode>,
    current: Option<String>,
}

impl<C: CanvasSurface> PanoramaService<C> {
    /// Create a controller; the cache is owned for the panorama session.
    pub fn new(
        source: Arc<dyn GroupSource>,
        cache: GroupCache,
        sync: CanvasSynchronizer,
        surface: C,
    ) -> Self {
        Self {
            source,
            cache,
            sync,
            surface,
            groups: Vec::new(),
            current: None,
        }
    }

    /// Fetch the group list, show the initial group and pin its root near the top.
    #[instrument(level = "debug", skip(self))]
    pub fn open(&mut self) -> ApplicationResult<RenderOutcome> {
        self.groups = self.source.fetch_group_list()?;
        let Some(first) = initial_group(&self.groups).map(|g| g.id.clone()) else {
            info!("open: no groups available");
            return Ok(RenderOutcome::Skipped);
        };
        let outcome = self.on_select_group(&first)?;
        if outcome.is_rendered() {
            self.sync.center_and_nudge_root(&mut self.surface, &first);
        }
        Ok(outcome)
    }

    /// Switch to a group, fetching and transforming it on first visit.
    #[instrument(level = "debug", skip(self))]
    pub fn on_select_group(&mut self, group_id: &str) -> ApplicationResult<RenderOutcome> {
        if !self.cache.contains(group_id) {
            let domain = self.source.fetch_group_subtree(group_id)?;
            self.cache
                .insert(group_id, RenderTree::transform(Some(&domain)));
            debug!("on_select_group: cached {} groups", self.cache.len());
        }
        self.current = Some(group_id.to_string());
        self.redraw()
    }

    #[instrument(level = "debug", skip(self))]
    pub fn on_toggle(&mut self, node_id: &str) -> ApplicationResult<RenderOutcome> {
        let Some(tree) = self.current_tree_mut() else {
            return Ok(RenderOutcome::Skipped);
        };
        if tree.toggle_one(node_id).is_none() {
            return Ok(RenderOutcome::Skipped);
        }
        self.redraw()
    }

    #[instrument(level = "debug", skip(self))]
    pub fn on_toggle_all(&mut self) -> ApplicationResult<RenderOutcome> {
        let Some(tree) = self.current_tree_mut() else {
            return Ok(RenderOutcome::Skipped);
        };
        if tree.toggle_all().is_none() {
            return Ok(RenderOutcome::Skipped);
        }
        self.redraw()
    }

    /// Reveal a search hit: expand its ancestors, relayout only if that
    /// changed anything, then center on it.
    #[instrument(level = "debug", skip(self))]
    pub fn on_search_select(
        &mut self,
        node_id: &str,
        path_id: &str,
    ) -> ApplicationResult<SearchOutcome> {
        let ancestors = ancestor_ids(path_id, node_id);
        let changed = self
            .current_tree_mut()
            .and_then(|tree| tree.expand_to_ids(&ancestors));
        let render = match changed {
            Some(_) => self.redraw()?,
            None => RenderOutcome::Skipped,
        };
        let centered = self.sync.center_on_node(&mut self.surface, node_id);
        Ok(SearchOutcome { render, centered })
    }

    pub fn on_zoom(&mut self, multiple: f64) -> f64 {
        self.sync.zoom_to(&mut self.surface, multiple)
    }

    pub fn on_wheel(&mut self, delta: f64, cursor: Point) -> bool {
        self.sync.wheel_zoom(&mut self.surface, delta, cursor)
    }

    pub fn on_pan(&mut self, dx: f64, dy: f64) -> Point {
        self.sync.pan(&mut self.surface, dx, dy)
    }

    pub fn on_fit(&mut self) -> Option<f64> {
        self.sync.zoom_to_fit(&mut self.surface)
    }

    fn redraw(&mut self) -> ApplicationResult<RenderOutcome> {
        let Some(group_id) = self.current.as_deref() else {
            return Ok(RenderOutcome::Skipped);
        };
        let Some(tree) = self.cache.get(group_id) else {
            return Ok(RenderOutcome::Skipped);
        };
        let outcome = self.sync.render(&mut self.surface, tree)?;
        if outcome.is_rendered() {
            self.sync
                .render_sibling_strip(&mut self.surface, &self.groups, group_id);
        }
        Ok(outcome)
    }

    fn current_tree_mut(&mut self) -> Option<&mut RenderTree> {
        let group_id = self.current.as_deref()?;
        self.cache.get_mut(group_id)
    }

    pub fn current_tree(&self) -> Option<&RenderTree> {
        self.cache.get(self.current.as_deref()?)
    }

    pub fn current_group(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn groups(&self) -> &[DomainNode] {
        &self.groups
    }

    pub fn cache(&self) -> &GroupCache {
        &self.cache
    }

    pub fn surface(&self) -> &C {
        &self.surface
    }

    /// Hand back the cache when the panorama session ends.
    pub fn into_cache(self) -> GroupCache {
        self.cache
    }
}
