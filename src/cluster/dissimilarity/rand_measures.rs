//! Rand-index style dissimilarities over node pairs and over edges

use rayon::prelude::*;

use crate::cluster::dissimilarity::contingency::assignments;
use crate::cluster::dissimilarity::{Contingency, DissimilarityMeasure};
use crate::cluster::Partition;
use crate::error::Result;
use crate::graph::Graph;

/// Rand distance over all unordered node pairs:
/// `1 − (n11 + n00) / C(n, 2)`.
///
/// Graphs with fewer than two nodes score `0.0`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NodeStructuralRandMeasure;

impl DissimilarityMeasure for NodeStructuralRandMeasure {
    fn dissimilarity(&self, graph: &Graph, first: &Partition, second: &Partition) -> Result<f64> {
        let counts = Contingency::over_graph(graph, first, second)?.pair_counts();
        let total = counts.total();
        if total == 0 {
            return Ok(0.0);
        }
        Ok(1.0 - (counts.n11 + counts.n00) as f64 / total as f64)
    }
}

/// Edge agreement counts of two clusterings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct EdgeAgreement {
    /// Edges inside a cluster in both clusterings
    pub e11: u64,
    /// Edges between clusters in both clusterings
    pub e00: u64,
    /// Edges considered
    pub edges: u64,
}

impl EdgeAgreement {
    fn merge(self, other: Self) -> Self {
        Self {
            e11: self.e11 + other.e11,
            e00: self.e00 + other.e00,
            edges: self.edges + other.edges,
        }
    }

    pub fn dissimilarity(&self) -> f64 {
        if self.edges == 0 {
            return 0.0;
        }
        1.0 - (self.e11 + self.e00) as f64 / self.edges as f64
    }
}

/// Rand distance restricted to the edges of the graph:
/// `1 − (e11 + e00) / m` with `m` the number of edges.
///
/// Edgeless graphs score `0.0`.
#[derive(Debug, Clone, Copy, Default)]
pub struct GraphStructuralRandMeasure;

impl DissimilarityMeasure for GraphStructuralRandMeasure {
    fn dissimilarity(&self, graph: &Graph, first: &Partition, second: &Partition) -> Result<f64> {
        let nodes = graph.node_list();
        let agreement = nodes
            .par_iter()
            .map(|&u| -> Result<EdgeAgreement> {
                let mut local = EdgeAgreement::default();
                let (a_u, b_u) = assignments(first, second, u)?;
                for &(v, _) in graph.neighbors(u) {
                    if v < u {
                        continue;
                    }
                    let (a_v, b_v) = assignments(first, second, v)?;
                    let together_first = a_u == a_v;
                    let together_second = b_u == b_v;
                    if together_first && together_second {
                        local.e11 += 1;
                    } else if !together_first && !together_second {
                        local.e00 += 1;
                    }
                    local.edges += 1;
                }
                Ok(local)
            })
            .try_reduce(EdgeAgreement::default, |x, y| Ok(x.merge(y)))?;

        log::debug!(
            "graph structural rand: e11={} e00={} m={}",
            agreement.e11,
            agreement.e00,
            agreement.edges
        );
        Ok(agreement.dissimilarity())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::ClusteringGenerator;
    use crate::graph::GraphGenerator;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_node_rand_small_example() {
        let g = Graph::new(4);
        let a = Partition::from_labels(&[0, 0, 1, 1]);
        let b = Partition::from_labels(&[0, 0, 0, 1]);
        // n11 + n00 = 3 of 6 pairs
        assert_abs_diff_eq!(
            NodeStructuralRandMeasure.dissimilarity(&g, &a, &b).unwrap(),
            0.5,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_graph_rand_counts_edges_only() {
        let mut g = Graph::new(4);
        g.add_edge(0, 1, 1.0).unwrap();
        g.add_edge(1, 2, 1.0).unwrap();
        g.add_edge(2, 3, 1.0).unwrap();
        let a = Partition::from_labels(&[0, 0, 1, 1]);
        let b = Partition::from_labels(&[0, 0, 0, 1]);
        // (0,1) e11, (1,2) disagrees, (2,3) disagrees
        assert_abs_diff_eq!(
            GraphStructuralRandMeasure.dissimilarity(&g, &a, &b).unwrap(),
            2.0 / 3.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_one_vs_singleton_is_maximal() {
        let g = GraphGenerator::new().make_complete_graph(12);
        let gen = ClusteringGenerator::new();
        let one = gen.make_one_clustering(&g);
        let singleton = gen.make_singleton_clustering(&g);
        assert_eq!(
            NodeStructuralRandMeasure.dissimilarity(&g, &one, &singleton).unwrap(),
            1.0
        );
        assert_eq!(
            GraphStructuralRandMeasure.dissimilarity(&g, &one, &singleton).unwrap(),
            1.0
        );
    }

    #[test]
    fn test_edgeless_graph_scores_zero() {
        let g = Graph::new(3);
        let gen = ClusteringGenerator::new();
        let one = gen.make_one_clustering(&g);
        let singleton = gen.make_singleton_clustering(&g);
        assert_eq!(
            GraphStructuralRandMeasure.dissimilarity(&g, &one, &singleton).unwrap(),
            0.0
        );
    }
}
