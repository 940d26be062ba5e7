//! Test support: one-time tracing setup and domain tree builders.

use std::env;
use std::sync::Once;

use tracing::{debug, info};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

use crate::domain::{DomainNode, NodeType};

static TEST_SETUP: Once = Once::new();

pub fn init_test_setup() {
    TEST_SETUP.call_once(|| {
        if env::var("RUST_LOG").is_err() {
            env::set_var("RUST_LOG", "assetmap=trace");
        }
        // global logging subscriber, used by all tracing log macros
        setup_test_logging();
        info!("Test Setup complete");
    });
}

fn setup_test_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

    let subscriber = tracing_subscriber::registry().with(
        fmt::layer()
            .with_test_writer()
            .with_target(true)
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(env_filter),
    );

    // Only set if we haven't already set a global subscriber
    if tracing::dispatcher::has_been_set() {
        debug!("Tracing subscriber already set");
    } else {
        subscriber.try_init().unwrap_or_else(|e| {
            eprintln!("Error: Failed to set up logging: {}", e);
        });
    }
}

fn node(id: &str, node_type: NodeType, children: Vec<DomainNode>) -> DomainNode {
    let mut node = DomainNode::new(id, id, node_type);
    if !children.is_empty() {
        node.child = Some(children);
    }
    node
}

pub fn group(id: &str, children: Vec<DomainNode>) -> DomainNode {
    let mut root = node(id, NodeType::Group, children);
    assign_paths(&mut root, None);
    root
}

pub fn subject_domain(id: &str, children: Vec<DomainNode>) -> DomainNode {
    node(id, NodeType::SubjectDomain, children)
}

pub fn business_node(id: &str, children: Vec<DomainNode>) -> DomainNode {
    node(id, NodeType::BusinessObject, children)
}

pub fn business_activity(id: &str, children: Vec<DomainNode>) -> DomainNode {
    node(id, NodeType::BusinessActivity, children)
}

pub fn logical_entity(id: &str) -> DomainNode {
    node(id, NodeType::LogicalEntity, Vec::new())
}

/// Fill `parent_id`, `path_id` and `path_name` down from `node`.
pub fn assign_paths(node: &mut DomainNode, parent: Option<&DomainNode>) {
    match parent {
        Some(p) => {
            node.parent_id = Some(p.id.clone());
            node.path_id = format!("{}/{}", p.path_id, node.id);
            node.path_name = format!("{}/{}", p.path_name, node.name);
        }
        None => {
            node.parent_id = None;
            node.path_id = node.id.clone();
            node.path_name = node.name.clone();
        }
    }
    let snapshot = node.without_children();
    if let Some(children) = node.child.as_mut() {
        for child in children.iter_mut() {
            assign_paths(child, Some(&snapshot));
        }
    }
}
