//! Jaccard dissimilarity over co-clustered node pairs

use crate::cluster::dissimilarity::{Contingency, DissimilarityMeasure};
use crate::cluster::Partition;
use crate::error::Result;
use crate::graph::Graph;

/// `1 − n11 / (n11 + n10 + n01)`: the share of pairs grouped by at least one
/// clustering that are not grouped by both.
///
/// When no pair is grouped by either clustering the result is `0.0`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JaccardMeasure;

impl DissimilarityMeasure for JaccardMeasure {
    fn dissimilarity(&self, graph: &Graph, first: &Partition, second: &Partition) -> Result<f64> {
        let counts = Contingency::over_graph(graph, first, second)?.pair_counts();
        let either_same = counts.n11 + counts.n10 + counts.n01;
        if either_same == 0 {
            return Ok(0.0);
        }
        Ok(1.0 - counts.n11 as f64 / either_same as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::ClusteringGenerator;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_jaccard_small_example() {
        let g = Graph::new(4);
        let a = Partition::from_labels(&[0, 0, 1, 1]);
        let b = Partition::from_labels(&[0, 0, 0, 1]);
        // n11 = 1, n10 = 1, n01 = 2
        assert_abs_diff_eq!(
            JaccardMeasure.dissimilarity(&g, &a, &b).unwrap(),
            0.75,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_two_singletons_compare_equal() {
        let g = Graph::new(10);
        let singleton = ClusteringGenerator::new().make_singleton_clustering(&g);
        assert_eq!(
            JaccardMeasure.dissimilarity(&g, &singleton, &singleton).unwrap(),
            0.0
        );
    }
}
