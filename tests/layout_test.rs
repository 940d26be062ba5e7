//! Tests for the two-tier layout and the combined cell set

use std::collections::HashMap;

use assetmap::domain::layout::{compact_box, indented, LayoutInput};
use assetmap::domain::{
    combine, compact_layout, indented_layout, DomainNode, LayoutOptions, NodeType, RenderTree,
    Side,
};
use assetmap::util::testing::{
    business_activity, business_node, group, logical_entity, subject_domain,
};

fn finance() -> DomainNode {
    group(
        "g2",
        vec![
            subject_domain(
                "sd-a",
                vec![
                    business_node("bo-a1", vec![logical_entity("le-a1"), logical_entity("le-a2")]),
                    business_activity("ba-a2", vec![logical_entity("le-a3")]),
                ],
            ),
            subject_domain("sd-b", vec![business_node("bo-b1", vec![])]),
        ],
    )
}

fn positions(tree: &RenderTree) -> HashMap<String, (f64, f64)> {
    combine(tree, &LayoutOptions::default())
        .unwrap()
        .nodes
        .into_iter()
        .map(|n| (n.id, (n.position.x, n.position.y)))
        .collect()
}

#[test]
fn given_collapsed_group_when_combining_then_places_both_tiers() {
    let tree = RenderTree::transform(Some(&finance()));

    let placed = positions(&tree);

    assert_eq!(placed.len(), 6);
    assert_eq!(placed["g2"], (0.0, 0.0));
    assert_eq!(placed["sd-a"], (-122.0, 112.0));
    assert_eq!(placed["sd-b"], (128.0, 112.0));
    assert_eq!(placed["bo-a1"], (-94.0, 192.0));
    assert_eq!(placed["ba-a2"], (-94.0, 272.0));
    assert_eq!(placed["bo-b1"], (156.0, 192.0));
}

#[test]
fn given_expanded_business_object_when_combining_then_following_siblings_shift_down() {
    let mut tree = RenderTree::transform(Some(&finance()));
    tree.toggle_one("bo-a1");

    let placed = positions(&tree);

    assert_eq!(placed["le-a1"], (-66.0, 272.0));
    assert_eq!(placed["le-a2"], (-66.0, 352.0));
    assert_eq!(placed["ba-a2"], (-94.0, 432.0));
    assert_eq!(placed["sd-b"], (128.0, 112.0));
}

#[test]
fn given_fixed_tree_when_combining_twice_then_identical() {
    let mut tree = RenderTree::transform(Some(&finance()));
    tree.toggle_one("ba-a2");

    let first = combine(&tree, &LayoutOptions::default());
    let second = combine(&tree, &LayoutOptions::default());

    assert_eq!(first, second);
}

#[test]
fn given_siblings_when_compact_then_gap_at_least_h_gap() {
    let opts = LayoutOptions::default();
    let input = LayoutInput::new("g", NodeType::Group).with_children(vec![
        LayoutInput::new("sd1", NodeType::SubjectDomain),
        LayoutInput::new("sd2", NodeType::SubjectDomain),
        LayoutInput::new("sd3", NodeType::SubjectDomain),
    ]);

    let result = compact_box(&input, &opts);

    for pair in result.children.windows(2) {
        let gap = pair[1].x - (pair[0].x + pair[0].width);
        assert!(gap >= opts.h_gap, "gap {gap} between {} and {}", pair[0].id, pair[1].id);
        assert_eq!(pair[0].y, pair[1].y);
    }
    let parent_bottom = result.y + result.height;
    assert!(result.children[0].y - parent_bottom >= opts.v_gap);
}

#[test]
fn given_stacked_nodes_when_indented_then_gap_at_least_indented_v_gap() {
    let opts = LayoutOptions::default();
    let input = LayoutInput::new("sd", NodeType::SubjectDomain).with_children(vec![
        LayoutInput::new("bo1", NodeType::BusinessObject)
            .with_children(vec![LayoutInput::new("le1", NodeType::LogicalEntity)]),
        LayoutInput::new("bo2", NodeType::BusinessObject),
        LayoutInput::new("ba1", NodeType::BusinessActivity),
    ]);

    let result = indented(&input, &opts);

    let stacked = result.walk();
    for pair in stacked.windows(2) {
        let gap = pair[1].y - (pair[0].y + pair[0].height);
        assert!(gap >= opts.indented_v_gap, "gap {gap} below {}", pair[0].id);
    }
}

#[test]
fn given_subject_domain_when_combining_then_sub_layout_offset_by_compact_position() {
    let mut tree = RenderTree::transform(Some(&finance()));
    tree.toggle_one("bo-a1");
    let opts = LayoutOptions::default();

    let top = compact_layout(&tree, &opts).unwrap();
    let placed = positions(&tree);

    for sd in &top.children {
        let local = indented_layout(&tree, &sd.id, &opts).unwrap();
        for node in local.walk() {
            assert_eq!(
                placed[&node.id],
                (node.x + sd.x, node.y + sd.y),
                "{} under {}",
                node.id,
                sd.id
            );
        }
    }
}

#[test]
fn given_combined_cells_then_ports_follow_parent_anchor() {
    let mut tree = RenderTree::transform(Some(&finance()));
    tree.toggle_one("bo-a1");

    let cells = combine(&tree, &LayoutOptions::default()).unwrap();
    cells.validate().unwrap();

    let root = cells.node("g2").unwrap();
    assert_eq!(root.ports[1].group, Side::Bottom);
    let sd = cells.node("sd-a").unwrap();
    assert_eq!(sd.ports[0].id, "sd-a-in");
    assert_eq!(sd.ports[0].group, Side::Top);
    assert_eq!(sd.ports[1].group, Side::Right);
    let le = cells.node("le-a1").unwrap();
    assert_eq!(le.ports[0].group, Side::Left);
    assert_eq!(le.shape, "logical-entity-node");

    let edge_ids: Vec<&str> = cells.edges.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(
        edge_ids,
        vec![
            "g2-sd-a",
            "sd-a-bo-a1",
            "sd-a-ba-a2",
            "bo-a1-le-a1",
            "bo-a1-le-a2",
            "g2-sd-b",
            "sd-b-bo-b1",
        ]
    );
}

#[test]
fn given_deep_business_chain_next_to_populated_domain_when_combining_then_no_boxes_overlap() {
    let domain = group(
        "g",
        vec![
            subject_domain(
                "sa",
                vec![business_activity(
                    "ba",
                    vec![business_node(
                        "bo",
                        vec![business_node("bo2", vec![logical_entity("le")])],
                    )],
                )],
            ),
            subject_domain(
                "sb",
                vec![
                    business_node("bb", vec![]),
                    business_node("bb2", vec![]),
                    business_node("bb3", vec![]),
                ],
            ),
        ],
    );
    let mut tree = RenderTree::transform(Some(&domain));
    tree.expand_to_ids(&["ba", "bo", "bo2"]).unwrap();

    let cells = combine(&tree, &LayoutOptions::default()).unwrap();

    assert_eq!(cells.nodes.len(), 10);
    let boxes: Vec<_> = cells.nodes.iter().map(|n| (n.id.as_str(), n.bbox())).collect();
    for (i, (a_id, a)) in boxes.iter().enumerate() {
        for (b_id, b) in &boxes[i + 1..] {
            let overlap = a.x < b.right() && b.x < a.right() && a.y < b.bottom() && b.y < a.bottom();
            assert!(!overlap, "{a_id} {a:?} overlaps {b_id} {b:?}");
        }
    }
    let bo2 = cells.node("bo2").unwrap().bbox();
    let bb3 = cells.node("bb3").unwrap().bbox();
    assert_eq!((bo2.x, bo2.right()), (-66.0, 140.0));
    assert_eq!(bb3.x, 184.0);
}

#[test]
fn given_empty_tree_when_combining_then_none() {
    let tree = RenderTree::new();
    assert!(combine(&tree, &LayoutOptions::default()).is_none());
    assert!(compact_layout(&tree, &LayoutOptions::default()).is_none());
}
