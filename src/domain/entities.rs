//! Domain entities: core data structures

use std::fmt;

use serde::{Deserialize, Serialize};

/// Classification tier of a node in the asset hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeType {
    Group,
    #[serde(alias = "subject-domain", alias = "subjectDomain")]
    SubjectDomain,
    #[serde(alias = "business-object", alias = "businessObject")]
    BusinessObject,
    #[serde(alias = "business-activity", alias = "businessActivity")]
    BusinessActivity,
    #[serde(alias = "logical-entity", alias = "logicalEntity")]
    LogicalEntity,
    #[serde(alias = "data-view", alias = "dataView")]
    DataView,
}

impl NodeType {
    /// Business-level nodes start collapsed and may be toggled.
    pub fn is_expandable(self) -> bool {
        matches!(self, NodeType::BusinessObject | NodeType::BusinessActivity)
    }

    /// Nodes whose descendants are never shown inline in the tree.
    pub fn caps_recursion(self) -> bool {
        matches!(self, NodeType::LogicalEntity | NodeType::DataView)
    }

    /// Fixed box size of the visual component for this type.
    pub fn size(self) -> NodeSize {
        match self {
            NodeType::Group => NodeSize::new(240.0, 94.0),
            NodeType::SubjectDomain => NodeSize::new(234.0, 72.0),
            NodeType::BusinessObject | NodeType::BusinessActivity => NodeSize::new(206.0, 72.0),
            NodeType::LogicalEntity | NodeType::DataView => NodeSize::new(178.0, 72.0),
        }
    }

    /// Shape tag of the visual component rendering this type.
    pub fn shape(self) -> &'static str {
        match self {
            NodeType::Group => "group-node",
            NodeType::SubjectDomain => "subject-domain-node",
            NodeType::BusinessObject => "business-object-node",
            NodeType::BusinessActivity => "business-activity-node",
            NodeType::LogicalEntity => "logical-entity-node",
            NodeType::DataView => "data-view-node",
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            NodeType::Group => "group",
            NodeType::SubjectDomain => "subject-domain",
            NodeType::BusinessObject => "business-object",
            NodeType::BusinessActivity => "business-activity",
            NodeType::LogicalEntity => "logical-entity",
            NodeType::DataView => "data-view",
        };
        f.write_str(label)
    }
}

/// Width and height of a node box in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NodeSize {
    pub width: f64,
    pub height: f64,
}

impl NodeSize {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Box size of the nodes in the sibling strip.
pub const SIBLING_NODE_SIZE: NodeSize = NodeSize::new(220.0, 70.0);

/// Shape tag of the nodes in the sibling strip.
pub const SIBLING_NODE_SHAPE: &str = "sibling-group-node";

/// Raw entity as returned by the backend listing API.
///
/// Never mutated by the view layer; a group's subtree is fetched wholesale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainNode {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    #[serde(default, alias = "parentId")]
    pub parent_id: Option<String>,
    /// Slash-delimited ancestry ids, e.g. `g1/sd1/bo1`
    #[serde(default, alias = "pathId")]
    pub path_id: String,
    /// Slash-delimited ancestry names
    #[serde(default, alias = "pathName")]
    pub path_name: String,
    #[serde(default, alias = "assetCount")]
    pub asset_count: u64,
    #[serde(default, alias = "classifiedCount")]
    pub classified_count: u64,
    /// Ordered children; absent and `null` both mean none
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub child: Option<Vec<DomainNode>>,
}

impl DomainNode {
    pub fn new(id: impl Into<String>, name: impl Into<String>, node_type: NodeType) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            node_type,
            parent_id: None,
            path_id: String::new(),
            path_name: String::new(),
            asset_count: 0,
            classified_count: 0,
            child: None,
        }
    }

    /// Children as a slice, empty when absent.
    pub fn children(&self) -> &[DomainNode] {
        self.child.as_deref().unwrap_or(&[])
    }

    /// A copy of this node without its subtree, as the group list returns it.
    pub fn without_children(&self) -> Self {
        Self {
            child: None,
            ..self.clone()
        }
    }

    /// Whether any classified or asset count is non-zero.
    pub fn has_assets(&self) -> bool {
        self.asset_count > 0 || self.classified_count > 0
    }
}

/// Ancestor ids of `node_id` encoded in a slash-delimited `path_id`, root first.
///
/// The node's own id is dropped when it terminates the path.
pub fn ancestor_ids(path_id: &str, node_id: &str) -> Vec<String> {
    let mut ids: Vec<String> = path_id
        .split('/')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .collect();
    if ids.last().map(String::as_str) == Some(node_id) {
        ids.pop();
    }
    ids
}
