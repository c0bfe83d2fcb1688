//! Canonical baseline clusterings

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::cluster::Partition;
use crate::graph::Graph;

/// Produces one-, singleton- and random clusterings of a graph's present nodes.
///
/// Absent node ids stay unassigned.
pub struct ClusteringGenerator {
    rng: StdRng,
}

impl Default for ClusteringGenerator {
    fn default() -> Self {
        Self::with_seed(42)
    }
}

impl ClusteringGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// All nodes share cluster 0
    pub fn make_one_clustering(&self, graph: &Graph) -> Partition {
        let mut zeta = Partition::new(graph.upper_node_id_bound());
        for u in graph.nodes() {
            zeta.add_to_subset(0, u);
        }
        zeta
    }

    /// Each node in its own cluster
    pub fn make_singleton_clustering(&self, graph: &Graph) -> Partition {
        let mut zeta = Partition::new(graph.upper_node_id_bound());
        for u in graph.nodes() {
            zeta.to_singleton(u);
        }
        zeta
    }

    /// Each node drawn uniformly into one of `k` clusters (`k` of 0 is treated as 1)
    pub fn make_random_clustering(&mut self, graph: &Graph, k: usize) -> Partition {
        let k = k.max(1);
        let mut zeta = Partition::new(graph.upper_node_id_bound());
        for u in graph.nodes() {
            zeta.add_to_subset(self.rng.random_range(0..k), u);
        }
        zeta
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::tools::is_proper_clustering;

    #[test]
    fn test_baselines_are_proper() {
        let mut g = Graph::new(20);
        g.remove_node(3).unwrap();
        let mut gen = ClusteringGenerator::new();

        let one = gen.make_one_clustering(&g);
        let singleton = gen.make_singleton_clustering(&g);
        let random = gen.make_random_clustering(&g, 4);

        for zeta in [&one, &singleton, &random] {
            assert!(is_proper_clustering(&g, zeta));
            assert_eq!(zeta.subset_of(3), None);
        }
        assert_eq!(one.number_of_subsets(), 1);
        assert_eq!(singleton.number_of_subsets(), 19);
        assert!(random.number_of_subsets() <= 4);
    }

    #[test]
    fn test_random_clusterings_advance_rng() {
        let g = Graph::new(100);
        let mut gen = ClusteringGenerator::with_seed(1);
        let a = gen.make_random_clustering(&g, 2);
        let b = gen.make_random_clustering(&g, 2);
        assert_ne!(a, b);
    }
}
