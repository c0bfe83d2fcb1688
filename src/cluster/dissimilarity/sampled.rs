//! Sampling approximations of the structural Rand measures

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::cluster::dissimilarity::contingency::assignments;
use crate::cluster::dissimilarity::DissimilarityMeasure;
use crate::cluster::tools::ensure_proper_clustering;
use crate::cluster::Partition;
use crate::error::{EvalError, Result};
use crate::graph::{Graph, NodeId};

const DEFAULT_SEED: u64 = 42;

fn check_samples(max_samples: usize) -> Result<()> {
    if max_samples == 0 {
        return Err(EvalError::InvalidConfig("max_samples must be positive".into()));
    }
    Ok(())
}

/// Estimates [`NodeStructuralRandMeasure`](super::NodeStructuralRandMeasure)
/// from `max_samples` uniformly drawn pairs of distinct nodes.
///
/// The estimate is deterministic for a fixed seed and approaches the exact
/// value as the sample count grows.
#[derive(Debug, Clone, Copy)]
pub struct SampledNodeStructuralRandMeasure {
    max_samples: usize,
    seed: u64,
}

impl SampledNodeStructuralRandMeasure {
    pub fn new(max_samples: usize) -> Result<Self> {
        check_samples(max_samples)?;
        Ok(Self {
            max_samples,
            seed: DEFAULT_SEED,
        })
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn max_samples(&self) -> usize {
        self.max_samples
    }
}

impl DissimilarityMeasure for SampledNodeStructuralRandMeasure {
    fn dissimilarity(&self, graph: &Graph, first: &Partition, second: &Partition) -> Result<f64> {
        ensure_proper_clustering(graph, first)?;
        ensure_proper_clustering(graph, second)?;

        let nodes: Vec<NodeId> = graph.node_list();
        let n = nodes.len();
        if n < 2 {
            return Ok(0.0);
        }

        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut agreements = 0usize;
        for _ in 0..self.max_samples {
            let i = rng.random_range(0..n);
            let mut j = rng.random_range(0..n - 1);
            if j >= i {
                j += 1;
            }
            let (u, v) = (nodes[i], nodes[j]);
            if first.in_same_subset(u, v) == second.in_same_subset(u, v) {
                agreements += 1;
            }
        }

        Ok(1.0 - agreements as f64 / self.max_samples as f64)
    }
}

/// Estimates [`GraphStructuralRandMeasure`](super::GraphStructuralRandMeasure)
/// from `max_samples` uniformly drawn edges.
#[derive(Debug, Clone, Copy)]
pub struct SampledGraphStructuralRandMeasure {
    max_samples: usize,
    seed: u64,
}

impl SampledGraphStructuralRandMeasure {
    pub fn new(max_samples: usize) -> Result<Self> {
        check_samples(max_samples)?;
        Ok(Self {
            max_samples,
            seed: DEFAULT_SEED,
        })
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn max_samples(&self) -> usize {
        self.max_samples
    }
}

impl DissimilarityMeasure for SampledGraphStructuralRandMeasure {
    fn dissimilarity(&self, graph: &Graph, first: &Partition, second: &Partition) -> Result<f64> {
        ensure_proper_clustering(graph, first)?;
        ensure_proper_clustering(graph, second)?;

        let edges: Vec<(NodeId, NodeId)> = graph.edges().map(|(u, v, _)| (u, v)).collect();
        if edges.is_empty() {
            return Ok(0.0);
        }

        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut agreements = 0usize;
        for _ in 0..self.max_samples {
            let (u, v) = edges[rng.random_range(0..edges.len())];
            let (a_u, b_u) = assignments(first, second, u)?;
            let (a_v, b_v) = assignments(first, second, v)?;
            if (a_u == a_v) == (b_u == b_v) {
                agreements += 1;
            }
        }

        Ok(1.0 - agreements as f64 / self.max_samples as f64)
    }
}
