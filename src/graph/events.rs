//! Structural events driving a dynamic graph

use serde::{Deserialize, Serialize};

use crate::graph::{EdgeWeight, NodeId};

/// One atomic mutation of a dynamic graph.
///
/// Order within a batch matters; `TimeStep` closes one simulated time unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GraphEvent {
    NodeAddition { node: NodeId },
    NodeRemoval { node: NodeId },
    EdgeAddition { u: NodeId, v: NodeId, weight: EdgeWeight },
    EdgeRemoval { u: NodeId, v: NodeId },
    EdgeWeightUpdate { u: NodeId, v: NodeId, weight: EdgeWeight },
    TimeStep,
}

impl GraphEvent {
    pub fn is_time_step(&self) -> bool {
        matches!(self, GraphEvent::TimeStep)
    }

    /// Nodes whose neighborhood is changed by this event
    pub fn touched_nodes(&self) -> Vec<NodeId> {
        match *self {
            GraphEvent::NodeAddition { node } | GraphEvent::NodeRemoval { node } => vec![node],
            GraphEvent::EdgeAddition { u, v, .. }
            | GraphEvent::EdgeRemoval { u, v }
            | GraphEvent::EdgeWeightUpdate { u, v, .. } => vec![u, v],
            GraphEvent::TimeStep => Vec::new(),
        }
    }
}

/// Count the time step markers contained in a batch
pub fn count_time_steps(events: &[GraphEvent]) -> u64 {
    events.iter().filter(|e| e.is_time_step()).count() as u64
}
