//! Tests for PanoramaService driven by the JSON group source

use std::path::PathBuf;
use std::sync::Arc;

use assetmap::application::services::{
    CanvasSynchronizer, GroupCache, PanoramaService, RenderOutcome,
};
use assetmap::application::ApplicationError;
use assetmap::config::Settings;
use assetmap::domain::{DomainError, Point, Viewport, ZoomBounds};
use assetmap::infrastructure::di::ServiceContainer;
use assetmap::infrastructure::traits::{CanvasSurface, MemoryCanvas, RealFileSystem};
use assetmap::infrastructure::{InfraError, JsonGroupSource};
use assetmap::util::testing::init_test_setup;

fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/resources/panorama.json")
}

fn open_panorama() -> PanoramaService<MemoryCanvas> {
    init_test_setup();
    let container = ServiceContainer::new(Settings::default());
    container.panorama(&fixture_path()).expect("panorama session")
}

fn surface_ids(panorama: &PanoramaService<MemoryCanvas>) -> Vec<&str> {
    panorama
        .surface()
        .nodes()
        .iter()
        .map(|n| n.id.as_str())
        .collect()
}

#[test]
fn given_group_dump_when_opening_then_shows_first_group_with_assets() {
    let mut panorama = open_panorama();

    let outcome = panorama.open().unwrap();

    assert_eq!(
        outcome,
        RenderOutcome::Rendered {
            nodes: 6,
            edges: 5,
            generation: 0
        }
    );
    assert_eq!(panorama.current_group(), Some("g2"));
    assert_eq!(panorama.groups().len(), 3);
    assert!(panorama.groups().iter().all(|g| g.child.is_none()));
    assert_eq!(
        surface_ids(&panorama),
        vec!["g2", "sd-a", "bo-a1", "ba-a2", "sd-b", "bo-b1", "g1", "g3"]
    );

    // root pinned near the top, centered horizontally
    let surface = panorama.surface();
    let root = surface.node_bbox("g2").unwrap();
    let vp = surface.viewport();
    assert_eq!(vp.to_screen(Point::new(root.x, root.y)).y, 40.0);
    assert_eq!(vp.to_screen(root.center()).x, vp.width / 2.0);
}

#[test]
fn given_open_panorama_when_toggling_business_object_then_relayouts() {
    let mut panorama = open_panorama();
    panorama.open().unwrap();

    let outcome = panorama.on_toggle("bo-a1").unwrap();

    assert_eq!(
        outcome,
        RenderOutcome::Rendered {
            nodes: 8,
            edges: 7,
            generation: 1
        }
    );
    let surface = panorama.surface();
    let ba = surface.node_bbox("ba-a2").unwrap();
    assert_eq!((ba.x, ba.y), (-94.0, 432.0));
    // strip is redrawn on every relayout
    assert!(surface.node_bbox("g1").is_some());
    assert!(surface.node_bbox("g3").is_some());
}

#[test]
fn given_unknown_node_when_toggling_then_rerenders_same_generation() {
    let mut panorama = open_panorama();
    panorama.open().unwrap();

    let outcome = panorama.on_toggle("nope").unwrap();

    assert!(matches!(outcome, RenderOutcome::Rendered { generation: 0, .. }));
}

#[test]
fn given_visited_group_when_reselecting_then_expand_state_kept() {
    let mut panorama = open_panorama();
    panorama.open().unwrap();
    panorama.on_toggle("bo-a1").unwrap();

    panorama.on_select_group("g3").unwrap();
    assert_eq!(panorama.current_group(), Some("g3"));
    assert_eq!(surface_ids(&panorama), vec!["g3", "sd-c", "g2", "g1"]);

    let outcome = panorama.on_select_group("g2").unwrap();

    assert!(matches!(outcome, RenderOutcome::Rendered { nodes: 8, .. }));
    assert!(panorama.current_tree().unwrap().node("bo-a1").unwrap().expand);
    assert_eq!(panorama.cache().len(), 2);
}

#[test]
fn given_collapsed_ancestor_when_search_selecting_then_expands_and_centers() {
    let mut panorama = open_panorama();
    panorama.open().unwrap();

    let first = panorama
        .on_search_select("le-a3", "g2/sd-a/ba-a2/le-a3")
        .unwrap();

    assert!(first.render.is_rendered());
    assert!(first.centered);
    let surface = panorama.surface();
    let hit = surface.node_bbox("le-a3").unwrap();
    let vp = surface.viewport();
    assert_eq!(
        vp.to_screen(hit.center()),
        Point::new(vp.width / 2.0, vp.height / 2.0)
    );

    let again = panorama
        .on_search_select("le-a3", "g2/sd-a/ba-a2/le-a3")
        .unwrap();
    assert_eq!(again.render, RenderOutcome::Skipped);
    assert!(again.centered);
}

#[test]
fn given_open_panorama_when_zooming_then_clamped_and_fit_in_bounds() {
    let mut panorama = open_panorama();
    panorama.open().unwrap();

    assert_eq!(panorama.on_zoom(9.0), 4.0);
    assert_eq!(panorama.on_zoom(0.0), 0.2);
    assert!(!panorama.on_wheel(-0.1, Point::new(0.0, 0.0)));

    let fit = panorama.on_fit().unwrap();
    assert!((0.2..=4.0).contains(&fit));
}

#[test]
fn given_open_panorama_when_panning_then_root_moves_on_screen() {
    let mut panorama = open_panorama();
    panorama.open().unwrap();
    let root = panorama.surface().node_bbox("g2").unwrap();
    let before = panorama.surface().viewport().to_screen(Point::new(root.x, root.y));

    panorama.on_pan(-50.0, 25.0);

    let after = panorama.surface().viewport().to_screen(Point::new(root.x, root.y));
    assert_eq!(after, Point::new(before.x - 50.0, before.y + 25.0));
}

#[test]
fn given_unknown_group_when_selecting_then_domain_error() {
    let mut panorama = open_panorama();
    panorama.open().unwrap();

    let err = panorama.on_select_group("g9").unwrap_err();

    assert!(matches!(
        err,
        ApplicationError::Domain(DomainError::UnknownGroup(ref id)) if id == "g9"
    ));
    assert_eq!(panorama.current_group(), Some("g2"));
}

#[test]
fn given_missing_dump_when_building_panorama_then_io_error() {
    let container = ServiceContainer::new(Settings::default());

    let result = container.panorama(&fixture_path().with_file_name("missing.json"));

    assert!(matches!(result, Err(InfraError::Io { .. })));
}

#[test]
fn given_empty_dump_when_opening_then_skipped() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("groups.json");
    std::fs::write(&path, "[]").unwrap();
    let source = Arc::new(JsonGroupSource::new(Arc::new(RealFileSystem), &path));
    let surface = MemoryCanvas::new(Viewport::new(800.0, 600.0, ZoomBounds::default()));
    let mut panorama = PanoramaService::new(
        source,
        GroupCache::new(),
        CanvasSynchronizer::default(),
        surface,
    );

    assert_eq!(panorama.open().unwrap(), RenderOutcome::Skipped);
    assert_eq!(panorama.on_toggle_all().unwrap(), RenderOutcome::Skipped);
    assert_eq!(panorama.surface().resets(), 0);
}

#[test]
fn given_finished_session_when_handing_back_cache_then_trees_survive() {
    let mut panorama = open_panorama();
    panorama.open().unwrap();
    panorama.on_toggle("bo-a1").unwrap();

    let cache = panorama.into_cache();

    assert!(cache.contains("g2"));
    assert!(cache.get("g2").unwrap().node("bo-a1").unwrap().expand);
}
