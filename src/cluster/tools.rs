//! Structural predicates over clusterings

use std::collections::HashMap;

use crate::cluster::{ClusterId, Partition};
use crate::error::{EvalError, Result};
use crate::graph::Graph;

/// True iff every node of `graph` has a cluster assignment in `zeta`
pub fn is_proper_clustering(graph: &Graph, zeta: &Partition) -> bool {
    graph.nodes().all(|u| zeta.contains(u))
}

/// Like [`is_proper_clustering`], reporting the first unassigned node
pub fn ensure_proper_clustering(graph: &Graph, zeta: &Partition) -> Result<()> {
    match graph.nodes().find(|&u| !zeta.contains(u)) {
        Some(node) => Err(EvalError::UnassignedNode { node }),
        None => Ok(()),
    }
}

/// True iff `first` and `second` group the nodes of `graph` identically,
/// regardless of the cluster ids used.
pub fn equal_clusterings(first: &Partition, second: &Partition, graph: &Graph) -> bool {
    let mut forward: HashMap<ClusterId, ClusterId> = HashMap::new();
    let mut backward: HashMap<ClusterId, ClusterId> = HashMap::new();

    for u in graph.nodes() {
        let (a, b) = match (first.subset_of(u), second.subset_of(u)) {
            (Some(a), Some(b)) => (a, b),
            (None, None) => continue,
            _ => return false,
        };
        if *forward.entry(a).or_insert(b) != b || *backward.entry(b).or_insert(a) != a {
            return false;
        }
    }
    true
}

/// Number of distinct clusters among the graph's nodes
pub fn number_of_clusters(graph: &Graph, zeta: &Partition) -> usize {
    let mut ids: Vec<ClusterId> = graph.nodes().filter_map(|u| zeta.subset_of(u)).collect();
    ids.sort_unstable();
    ids.dedup();
    ids.len()
}

pub fn is_one_clustering(graph: &Graph, zeta: &Partition) -> bool {
    is_proper_clustering(graph, zeta) && number_of_clusters(graph, zeta) <= 1
}

pub fn is_singleton_clustering(graph: &Graph, zeta: &Partition) -> bool {
    is_proper_clustering(graph, zeta) && number_of_clusters(graph, zeta) == graph.number_of_nodes()
}
