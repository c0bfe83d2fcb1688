//! Algebraic distance: node dissimilarity from iterated local averaging of random loads

use ndarray::{Array2, ArrayView2, ArrayViewMut1, Axis};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use crate::config::{AlgebraicDistanceConfig, Norm};
use crate::distance::NodeDistance;
use crate::error::{EvalError, Result};
use crate::graph::{Graph, NodeId};

/// Algebraic distance estimator over a fixed graph.
///
/// Each of `num_systems` load vectors starts uniformly random and is relaxed
/// `num_iters` times with
///
/// ```text
/// load'(v) = (1 − ω)·load(v) + ω · Σ_u w(v,u)·load(u) / Σ_u w(v,u)
/// ```
///
/// Nodes that end up with similar loads across systems are close. The loads
/// are computed once by [`NodeDistance::preprocess`] and reused by every query
/// until `preprocess` is called again.
pub struct AlgebraicDistance<'g> {
    graph: &'g Graph,
    config: AlgebraicDistanceConfig,

    /// `loads[[s, v]]`: load of node `v` in system `s`
    loads: Array2<f64>,

    preprocessed: bool,
}

impl<'g> AlgebraicDistance<'g> {
    pub fn new(graph: &'g Graph, config: AlgebraicDistanceConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            graph,
            config,
            loads: Array2::zeros((config.num_systems, graph.upper_node_id_bound())),
            preprocessed: false,
        })
    }

    pub fn config(&self) -> &AlgebraicDistanceConfig {
        &self.config
    }

    /// Current load matrix, one row per system
    pub fn loads(&self) -> ArrayView2<'_, f64> {
        self.loads.view()
    }

    pub fn is_preprocessed(&self) -> bool {
        self.preprocessed
    }

    /// Distance of every edge as `(u, v, distance)` with `u <= v`
    pub fn edge_distances(&self) -> Result<Vec<(NodeId, NodeId, f64)>> {
        self.ensure_preprocessed()?;
        let edges: Vec<(NodeId, NodeId)> = self.graph.edges().map(|(u, v, _)| (u, v)).collect();
        Ok(edges
            .par_iter()
            .map(|&(u, v)| (u, v, self.aggregate(u, v)))
            .collect())
    }

    fn ensure_preprocessed(&self) -> Result<()> {
        if self.preprocessed {
            Ok(())
        } else {
            Err(EvalError::NotInitialized("algebraic distance"))
        }
    }

    fn aggregate(&self, u: NodeId, v: NodeId) -> f64 {
        let (loads_u, loads_v) = (self.loads.column(u), self.loads.column(v));
        let diffs = loads_u
            .iter()
            .zip(loads_v.iter())
            .map(|(a, b)| (a - b).abs());

        match self.config.norm {
            Norm::Sum => diffs.sum(),
            Norm::Euclidean => diffs.map(|d| d * d).sum::<f64>().sqrt(),
            Norm::Max => diffs.fold(0.0, f64::max),
        }
    }

    fn random_init(graph: &Graph, row: &mut ArrayViewMut1<'_, f64>, seed: u64) {
        let mut rng = StdRng::seed_from_u64(seed);
        for (v, load) in row.iter_mut().enumerate() {
            *load = if graph.has_node(v) { rng.random::<f64>() } else { 0.0 };
        }
    }

    /// Jacobi relaxation of one system; isolated nodes keep their load
    fn relax(graph: &Graph, row: &mut ArrayViewMut1<'_, f64>, omega: f64, iterations: usize) {
        let mut next = vec![0.0; row.len()];
        for _ in 0..iterations {
            for (v, slot) in next.iter_mut().enumerate() {
                let current = row[v];
                let (mut weighted, mut weight_sum) = (0.0, 0.0);
                for &(u, w) in graph.neighbors(v) {
                    weighted += w * row[u];
                    weight_sum += w;
                }
                *slot = if weight_sum > 0.0 {
                    (1.0 - omega) * current + omega * weighted / weight_sum
                } else {
                    current
                };
            }
            for (load, &value) in row.iter_mut().zip(next.iter()) {
                *load = value;
            }
        }
    }
}

impl NodeDistance for AlgebraicDistance<'_> {
    fn preprocess(&mut self) -> Result<()> {
        let AlgebraicDistanceConfig {
            num_systems,
            num_iters,
            omega,
            seed,
            ..
        } = self.config;
        log::info!(
            "Computing algebraic distance loads: {} systems, {} iterations, omega {}",
            num_systems,
            num_iters,
            omega
        );

        let graph = self.graph;
        self.loads = Array2::zeros((num_systems, graph.upper_node_id_bound()));
        self.loads
            .axis_iter_mut(Axis(0))
            .into_par_iter()
            .enumerate()
            .for_each(|(s, mut row)| {
                Self::random_init(graph, &mut row, seed.wrapping_add(s as u64));
                Self::relax(graph, &mut row, omega, num_iters);
            });

        self.preprocessed = true;
        Ok(())
    }

    fn distance(&self, u: NodeId, v: NodeId) -> Result<f64> {
        self.ensure_preprocessed()?;
        for node in [u, v] {
            if !self.graph.has_node(node) {
                return Err(EvalError::NodeNotFound(node));
            }
        }
        Ok(self.aggregate(u, v))
    }
}
