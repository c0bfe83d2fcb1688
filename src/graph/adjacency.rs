//! Mutable weighted undirected graph with dense node ids

use petgraph::graph::UnGraph;
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};

use crate::error::{EvalError, Result};
use crate::graph::GraphEvent;

/// Dense node identifier in `[0, upper_node_id_bound)`
pub type NodeId = usize;

/// Edge weight type
pub type EdgeWeight = f64;

/// Undirected weighted graph supporting node/edge insertion and removal.
///
/// Removed node ids are never reused, so ids of a growing and shrinking graph
/// stay stable and partitions can be indexed by them directly.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Graph {
    /// Adjacency lists; a self-loop is stored once in its node's list
    adjacency: Vec<Vec<(NodeId, EdgeWeight)>>,

    /// Whether an id currently refers to a node
    present: Vec<bool>,

    /// Weighted degree per node, self-loops counted twice
    volumes: Vec<EdgeWeight>,

    node_count: usize,

    edge_count: usize,

    total_weight: EdgeWeight,
}

impl Graph {
    /// Create a graph with `n` isolated nodes `0..n`
    pub fn new(n: usize) -> Self {
        Self {
            adjacency: vec![Vec::new(); n],
            present: vec![true; n],
            volumes: vec![0.0; n],
            node_count: n,
            edge_count: 0,
            total_weight: 0.0,
        }
    }

    /// Import an undirected petgraph graph, projecting edge payloads to weights.
    /// Parallel edges are merged by summing their weights.
    pub fn from_petgraph<N, E, F>(graph: &UnGraph<N, E>, mut weight: F) -> Result<Self>
    where
        F: FnMut(&E) -> EdgeWeight,
    {
        let mut result = Self::new(graph.node_count());
        for edge in graph.edge_references() {
            let u = edge.source().index();
            let v = edge.target().index();
            let w = weight(edge.weight());
            match result.weight(u, v) {
                Some(existing) => result.set_weight(u, v, existing + w)?,
                None => result.add_edge(u, v, w)?,
            }
        }
        Ok(result)
    }

    /// One past the largest id ever handed out
    pub fn upper_node_id_bound(&self) -> usize {
        self.present.len()
    }

    pub fn number_of_nodes(&self) -> usize {
        self.node_count
    }

    pub fn number_of_edges(&self) -> usize {
        self.edge_count
    }

    pub fn has_node(&self, u: NodeId) -> bool {
        self.present.get(u).copied().unwrap_or(false)
    }

    /// Iterate over the ids of present nodes in ascending order
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.present
            .iter()
            .enumerate()
            .filter(|(_, &present)| present)
            .map(|(u, _)| u)
    }

    /// Present node ids collected into a vector (handy for parallel iteration)
    pub fn node_list(&self) -> Vec<NodeId> {
        self.nodes().collect()
    }

    /// Neighbors of `u` with edge weights; empty for absent nodes
    pub fn neighbors(&self, u: NodeId) -> &[(NodeId, EdgeWeight)] {
        self.adjacency.get(u).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of incident edges
    pub fn degree(&self, u: NodeId) -> usize {
        self.neighbors(u).len()
    }

    /// Sum of incident edge weights; a self-loop contributes twice
    pub fn weighted_degree(&self, u: NodeId) -> EdgeWeight {
        self.volumes.get(u).copied().unwrap_or(0.0)
    }

    pub fn total_edge_weight(&self) -> EdgeWeight {
        self.total_weight
    }

    pub fn weight(&self, u: NodeId, v: NodeId) -> Option<EdgeWeight> {
        self.neighbors(u)
            .iter()
            .find(|&&(x, _)| x == v)
            .map(|&(_, w)| w)
    }

    pub fn has_edge(&self, u: NodeId, v: NodeId) -> bool {
        self.weight(u, v).is_some()
    }

    /// Iterate over every edge once as `(u, v, w)` with `u <= v`
    pub fn edges(&self) -> impl Iterator<Item = (NodeId, NodeId, EdgeWeight)> + '_ {
        self.adjacency.iter().enumerate().flat_map(|(u, list)| {
            list.iter()
                .filter(move |&&(v, _)| u <= v)
                .map(move |&(v, w)| (u, v, w))
        })
    }

    /// Append a node and return its id
    pub fn add_node(&mut self) -> NodeId {
        let id = self.present.len();
        self.adjacency.push(Vec::new());
        self.present.push(true);
        self.volumes.push(0.0);
        self.node_count += 1;
        id
    }

    /// Remove a node together with its incident edges
    pub fn remove_node(&mut self, u: NodeId) -> Result<()> {
        self.check_node(u)?;
        let incident: Vec<NodeId> = self.adjacency[u].iter().map(|&(v, _)| v).collect();
        for v in incident {
            self.remove_edge(u, v)?;
        }
        self.present[u] = false;
        self.volumes[u] = 0.0;
        self.node_count -= 1;
        Ok(())
    }

    pub fn add_edge(&mut self, u: NodeId, v: NodeId, w: EdgeWeight) -> Result<()> {
        self.check_node(u)?;
        self.check_node(v)?;
        if self.has_edge(u, v) {
            return Err(EvalError::EdgeExists(u, v));
        }

        self.adjacency[u].push((v, w));
        if u != v {
            self.adjacency[v].push((u, w));
        }
        self.volumes[u] += w;
        self.volumes[v] += w;
        self.edge_count += 1;
        self.total_weight += w;
        Ok(())
    }

    /// Remove an edge and return its former weight
    pub fn remove_edge(&mut self, u: NodeId, v: NodeId) -> Result<EdgeWeight> {
        self.check_node(u)?;
        self.check_node(v)?;
        let w = Self::detach(&mut self.adjacency[u], v).ok_or(EvalError::EdgeNotFound(u, v))?;
        if u != v {
            Self::detach(&mut self.adjacency[v], u);
        }
        self.volumes[u] -= w;
        self.volumes[v] -= w;
        self.edge_count -= 1;
        self.total_weight -= w;
        Ok(w)
    }

    pub fn set_weight(&mut self, u: NodeId, v: NodeId, w: EdgeWeight) -> Result<()> {
        self.check_node(u)?;
        self.check_node(v)?;
        let old = self.weight(u, v).ok_or(EvalError::EdgeNotFound(u, v))?;
        Self::reweight(&mut self.adjacency[u], v, w);
        if u != v {
            Self::reweight(&mut self.adjacency[v], u, w);
        }
        let delta = w - old;
        self.volumes[u] += delta;
        self.volumes[v] += delta;
        self.total_weight += delta;
        Ok(())
    }

    /// Apply one event. `TimeStep` markers leave the structure unchanged.
    pub fn apply(&mut self, event: &GraphEvent) -> Result<()> {
        match *event {
            GraphEvent::NodeAddition { node } => {
                let expected = self.upper_node_id_bound();
                if node != expected {
                    return Err(EvalError::UnexpectedNodeId {
                        expected,
                        found: node,
                    });
                }
                self.add_node();
            }
            GraphEvent::NodeRemoval { node } => self.remove_node(node)?,
            GraphEvent::EdgeAddition { u, v, weight } => self.add_edge(u, v, weight)?,
            GraphEvent::EdgeRemoval { u, v } => {
                self.remove_edge(u, v)?;
            }
            GraphEvent::EdgeWeightUpdate { u, v, weight } => self.set_weight(u, v, weight)?,
            GraphEvent::TimeStep => {}
        }
        Ok(())
    }

    fn check_node(&self, u: NodeId) -> Result<()> {
        if self.has_node(u) {
            Ok(())
        } else {
            Err(EvalError::NodeNotFound(u))
        }
    }

    fn detach(list: &mut Vec<(NodeId, EdgeWeight)>, target: NodeId) -> Option<EdgeWeight> {
        let pos = list.iter().position(|&(x, _)| x == target)?;
        Some(list.swap_remove(pos).1)
    }

    fn reweight(list: &mut [(NodeId, EdgeWeight)], target: NodeId, w: EdgeWeight) {
        if let Some(entry) = list.iter_mut().find(|(x, _)| *x == target) {
            entry.1 = w;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> Graph {
        let mut g = Graph::new(3);
        g.add_edge(0, 1, 1.0).unwrap();
        g.add_edge(1, 2, 2.0).unwrap();
        g.add_edge(0, 2, 3.0).unwrap();
        g
    }

    #[test]
    fn test_volumes_and_total_weight() {
        let g = triangle();
        assert_eq!(g.number_of_edges(), 3);
        assert_eq!(g.total_edge_weight(), 6.0);
        assert_eq!(g.weighted_degree(0), 4.0);
        assert_eq!(g.weighted_degree(1), 3.0);
        assert_eq!(g.weighted_degree(2), 5.0);
        assert_eq!(g.weight(2, 1), Some(2.0));
    }

    #[test]
    fn test_self_loop_counts_twice_in_volume() {
        let mut g = Graph::new(2);
        g.add_edge(0, 0, 1.5).unwrap();
        assert_eq!(g.weighted_degree(0), 3.0);
        assert_eq!(g.total_edge_weight(), 1.5);
        assert_eq!(g.edges().count(), 1);
        g.remove_edge(0, 0).unwrap();
        assert_eq!(g.weighted_degree(0), 0.0);
    }

    #[test]
    fn test_remove_node_drops_incident_edges() {
        let mut g = triangle();
        g.remove_node(0).unwrap();
        assert!(!g.has_node(0));
        assert_eq!(g.number_of_nodes(), 2);
        assert_eq!(g.number_of_edges(), 1);
        assert_eq!(g.total_edge_weight(), 2.0);
        assert_eq!(g.weighted_degree(2), 2.0);
        assert_eq!(g.upper_node_id_bound(), 3);
        assert_eq!(g.nodes().collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(g.remove_node(0), Err(EvalError::NodeNotFound(0)));
    }

    #[test]
    fn test_set_weight_updates_aggregates() {
        let mut g = triangle();
        g.set_weight(0, 1, 4.0).unwrap();
        assert_eq!(g.total_edge_weight(), 9.0);
        assert_eq!(g.weighted_degree(1), 6.0);
        assert_eq!(g.set_weight(0, 0, 1.0), Err(EvalError::EdgeNotFound(0, 0)));
    }

    #[test]
    fn test_rejects_parallel_edges() {
        let mut g = triangle();
        assert_eq!(g.add_edge(1, 0, 1.0), Err(EvalError::EdgeExists(1, 0)));
    }

    #[test]
    fn test_apply_checks_node_ids() {
        let mut g = Graph::new(2);
        g.apply(&GraphEvent::NodeAddition { node: 2 }).unwrap();
        assert_eq!(
            g.apply(&GraphEvent::NodeAddition { node: 7 }),
            Err(EvalError::UnexpectedNodeId {
                expected: 3,
                found: 7
            })
        );
        g.apply(&GraphEvent::EdgeAddition {
            u: 0,
            v: 2,
            weight: 1.0,
        })
        .unwrap();
        g.apply(&GraphEvent::TimeStep).unwrap();
        assert_eq!(g.number_of_edges(), 1);
    }

    #[test]
    fn test_from_petgraph_merges_parallel_edges() {
        let mut pg = UnGraph::<(), f64>::new_undirected();
        let a = pg.add_node(());
        let b = pg.add_node(());
        let c = pg.add_node(());
        pg.add_edge(a, b, 1.0);
        pg.add_edge(b, a, 2.0);
        pg.add_edge(b, c, 0.5);

        let g = Graph::from_petgraph(&pg, |w| *w).unwrap();
        assert_eq!(g.number_of_nodes(), 3);
        assert_eq!(g.number_of_edges(), 2);
        assert_eq!(g.weight(0, 1), Some(3.0));
        assert_eq!(g.total_edge_weight(), 3.5);
    }
}
