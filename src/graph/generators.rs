//! Static graph generators used for fixtures and baselines

use itertools::Itertools;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::cluster::Partition;
use crate::graph::Graph;

/// Seeded generator of static unit-weight graphs
pub struct GraphGenerator {
    rng: StdRng,
}

impl Default for GraphGenerator {
    fn default() -> Self {
        Self::with_seed(42)
    }
}

impl GraphGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Complete graph on `n` nodes
    pub fn make_complete_graph(&mut self, n: usize) -> Graph {
        let mut graph = Graph::new(n);
        for (u, v) in (0..n).tuple_combinations() {
            graph
                .add_edge(u, v, 1.0)
                .expect("complete graph pairs are distinct and in range");
        }
        graph
    }

    /// G(n, p): every pair is connected independently with probability `p`
    /// (clamped to [0, 1])
    pub fn make_erdos_renyi_graph(&mut self, n: usize, p: f64) -> Graph {
        let p = p.clamp(0.0, 1.0);
        let mut graph = Graph::new(n);
        for (u, v) in (0..n).tuple_combinations() {
            if self.rng.random_bool(p) {
                graph
                    .add_edge(u, v, 1.0)
                    .expect("each node pair is drawn once");
            }
        }
        graph
    }

    /// Planted partition graph: node `u` belongs to cluster `u % k`; pairs inside
    /// a cluster connect with `p_in`, pairs across clusters with `p_out`.
    /// Returns the graph and the planted clustering.
    pub fn make_clustered_random_graph(
        &mut self,
        n: usize,
        k: usize,
        p_in: f64,
        p_out: f64,
    ) -> (Graph, Partition) {
        let k = k.max(1);
        let (p_in, p_out) = (p_in.clamp(0.0, 1.0), p_out.clamp(0.0, 1.0));

        let mut truth = Partition::new(n);
        for u in 0..n {
            truth.add_to_subset(u % k, u);
        }

        let mut graph = Graph::new(n);
        for (u, v) in (0..n).tuple_combinations() {
            let p = if u % k == v % k { p_in } else { p_out };
            if self.rng.random_bool(p) {
                graph
                    .add_edge(u, v, 1.0)
                    .expect("each node pair is drawn once");
            }
        }
        (graph, truth)
    }
}
