//! Quality measures scoring a single clustering against a graph

use std::collections::{BTreeSet, HashMap};

use rayon::prelude::*;

use crate::cluster::{ClusterId, Partition};
use crate::error::{EvalError, Result};
use crate::graph::{Graph, NodeId};

/// Below this node count the parallel measures fall back to a sequential pass
pub const PARALLEL_NODE_THRESHOLD: usize = 256;

/// Scores one clustering of a graph; never mutates its inputs
pub trait QualityMeasure {
    fn quality(&self, zeta: &Partition, graph: &Graph) -> Result<f64>;
}

/// Dense slot per cluster id assigned to a node of the graph; ids may be
/// arbitrary `usize` values, so volumes are indexed by slot instead of id
fn dense_slots(graph: &Graph, zeta: &Partition) -> HashMap<ClusterId, usize> {
    let ids: BTreeSet<ClusterId> = graph.nodes().filter_map(|u| zeta.subset_of(u)).collect();
    ids.into_iter().enumerate().map(|(slot, c)| (c, slot)).collect()
}

/// Per-cluster aggregates shared by modularity and coverage
#[derive(Debug, Clone, PartialEq)]
struct ClusterSums {
    /// Intra-cluster edge weight, each edge counted from both endpoints
    intra: f64,

    /// Summed weighted degree per cluster slot
    volumes: Vec<f64>,
}

impl ClusterSums {
    fn empty(clusters: usize) -> Self {
        Self {
            intra: 0.0,
            volumes: vec![0.0; clusters],
        }
    }

    /// Twice the total edge weight
    fn total(&self) -> f64 {
        self.volumes.iter().sum()
    }

    fn add_node(
        &mut self,
        graph: &Graph,
        zeta: &Partition,
        slots: &HashMap<ClusterId, usize>,
        u: NodeId,
    ) -> Result<()> {
        let c = zeta
            .subset_of(u)
            .ok_or(EvalError::UnassignedNode { node: u })?;
        let slot = slots[&c];

        // intra and volume take the same additions for an all-internal
        // neighborhood, which keeps the one-clustering exact
        let mut intra = 0.0;
        let mut volume = 0.0;
        for &(v, w) in graph.neighbors(u) {
            let w = if v == u { 2.0 * w } else { w };
            volume += w;
            if zeta.subset_of(v) == Some(c) {
                intra += w;
            }
        }

        self.intra += intra;
        self.volumes[slot] += volume;
        Ok(())
    }

    fn merge(mut self, other: Self) -> Self {
        self.intra += other.intra;
        for (a, b) in self.volumes.iter_mut().zip(other.volumes) {
            *a += b;
        }
        self
    }

    fn modularity(&self) -> f64 {
        let total = self.total();
        if total == 0.0 {
            return 0.0;
        }
        let expected: f64 = self.volumes.iter().map(|d| (d / total).powi(2)).sum();
        self.intra / total - expected
    }

    fn coverage(&self) -> f64 {
        let total = self.total();
        if total == 0.0 {
            return 0.0;
        }
        self.intra / total
    }
}

fn sequential_sums(graph: &Graph, zeta: &Partition) -> Result<ClusterSums> {
    let slots = dense_slots(graph, zeta);
    let mut sums = ClusterSums::empty(slots.len());
    for u in graph.nodes() {
        sums.add_node(graph, zeta, &slots, u)?;
    }
    Ok(sums)
}

/// Thread-local sums per rayon split, merged by element-wise addition
fn parallel_sums(graph: &Graph, zeta: &Partition) -> Result<ClusterSums> {
    let slots = dense_slots(graph, zeta);
    let clusters = slots.len();
    let nodes = graph.node_list();

    nodes
        .par_iter()
        .try_fold(
            || ClusterSums::empty(clusters),
            |mut sums, &u| -> Result<ClusterSums> {
                sums.add_node(graph, zeta, &slots, u)?;
                Ok(sums)
            },
        )
        .try_reduce(|| ClusterSums::empty(clusters), |a, b| Ok(a.merge(b)))
}

fn sums_with_threshold(graph: &Graph, zeta: &Partition, threshold: usize) -> Result<ClusterSums> {
    if graph.number_of_nodes() < threshold {
        sequential_sums(graph, zeta)
    } else {
        parallel_sums(graph, zeta)
    }
}

/// Newman modularity `Σ_c [ w_c / W − (d_c / 2W)² ]`, computed with a parallel
/// reduction for large graphs.
///
/// Agrees with [`ModularitySequential`] to within `1e-12`. A graph without
/// edge weight scores `0.0`.
#[derive(Debug, Clone, Copy)]
pub struct Modularity {
    parallel_threshold: usize,
}

impl Default for Modularity {
    fn default() -> Self {
        Self {
            parallel_threshold: PARALLEL_NODE_THRESHOLD,
        }
    }
}

impl Modularity {
    pub fn new() -> Self {
        Self::default()
    }

    /// Node count from which the parallel reduction is used (0 forces it)
    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }
}

impl QualityMeasure for Modularity {
    fn quality(&self, zeta: &Partition, graph: &Graph) -> Result<f64> {
        let sums = sums_with_threshold(graph, zeta, self.parallel_threshold)?;
        let q = sums.modularity();
        log::debug!("modularity of {} clusters: {}", zeta.number_of_subsets(), q);
        Ok(q)
    }
}

/// Single-threaded modularity, kept as the reference for cross-checking
#[derive(Debug, Clone, Copy, Default)]
pub struct ModularitySequential;

impl QualityMeasure for ModularitySequential {
    fn quality(&self, zeta: &Partition, graph: &Graph) -> Result<f64> {
        Ok(sequential_sums(graph, zeta)?.modularity())
    }
}

/// Fraction of the total edge weight lying inside clusters
#[derive(Debug, Clone, Copy, Default)]
pub struct Coverage;

impl QualityMeasure for Coverage {
    fn quality(&self, zeta: &Partition, graph: &Graph) -> Result<f64> {
        Ok(sums_with_threshold(graph, zeta, PARALLEL_NODE_THRESHOLD)?.coverage())
    }
}
