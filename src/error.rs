//! Error types for clustering evaluation and dynamic community detection.

use thiserror::Error;

use crate::graph::NodeId;

/// Result alias used throughout the library.
pub type Result<T> = std::result::Result<T, EvalError>;

/// Errors raised by graph mutation, measures, the orchestrator and the
/// algebraic distance estimator.
///
/// Degenerate numeric inputs (no edges, zero entropy, empty pair sets) are
/// resolved by per-measure conventions and never produce an error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    /// A node id does not refer to a node currently in the graph.
    #[error("node {0} does not exist")]
    NodeNotFound(NodeId),

    /// No edge between the two nodes.
    #[error("edge ({0}, {1}) does not exist")]
    EdgeNotFound(NodeId, NodeId),

    /// The edge is already present; parallel edges are not supported.
    #[error("edge ({0}, {1}) already exists")]
    EdgeExists(NodeId, NodeId),

    /// A node addition event names an id other than the one the graph hands out.
    #[error("node addition expected id {expected}, event carries {found}")]
    UnexpectedNodeId {
        /// Id the graph would assign next.
        expected: NodeId,
        /// Id carried by the event.
        found: NodeId,
    },

    /// A node of the graph has no cluster assignment.
    #[error("node {node} has no cluster assignment")]
    UnassignedNode {
        /// The offending node.
        node: NodeId,
    },

    /// Invalid parameter combination, detected at construction or run start.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Operation not allowed in the current lifecycle state.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// A query was issued before the required preprocessing step.
    #[error("{0} has not been preprocessed")]
    NotInitialized(&'static str),

    /// A dynamic graph source produced a batch covering the wrong number of time steps.
    #[error("source produced {found} time steps, expected {expected}")]
    SourceContract {
        /// Requested number of time steps.
        expected: u64,
        /// Time steps contained in the batch.
        found: u64,
    },
}
