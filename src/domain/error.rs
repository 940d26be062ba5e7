//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent invariant violations of the panorama model.
/// These are independent of infrastructure concerns.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("node not found: {0}")]
    UnknownNode(String),

    #[error("group not found: {0}")]
    UnknownGroup(String),

    /// Layout produced an edge whose endpoint port is not on any node.
    #[error("edge {edge} references missing port: {port}")]
    DanglingPort { edge: String, port: String },
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
