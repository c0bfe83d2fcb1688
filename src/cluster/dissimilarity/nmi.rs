//! Normalized mutual information distances.
//!
//! With `H` the entropy (natural log) and `I` the mutual information of the
//! contingency table, the normalized mutual information is the geometric-mean
//! normalization of Strehl & Ghosh (2002):
//!
//! ```text
//! NMI(A, B) = I(A; B) / sqrt(H(A) · H(B))
//! ```
//!
//! and the distance is `1 − NMI`, clamped to `[0, 1]`. If either entropy is
//! zero the normalizer vanishes and the distance is `0.0`. Tables describing
//! the same grouping up to relabeling also yield exactly `0.0`.

use std::collections::HashMap;

use crate::cluster::dissimilarity::{Contingency, DissimilarityMeasure};
use crate::cluster::{ClusterId, Partition};
use crate::error::Result;
use crate::graph::Graph;

fn entropy(counts: &HashMap<ClusterId, u64>, total: f64) -> f64 {
    counts
        .values()
        .map(|&c| {
            let p = c as f64 / total;
            if p > 0.0 {
                -p * p.ln()
            } else {
                0.0
            }
        })
        .sum()
}

fn mutual_information(table: &Contingency, total: f64) -> f64 {
    table
        .joint
        .iter()
        .map(|(&(a, b), &count)| {
            let n_a = table.first[&a] as f64;
            let n_b = table.second[&b] as f64;
            let p = count as f64 / total;
            p * (count as f64 * total / (n_a * n_b)).ln()
        })
        .sum()
}

/// `1 − NMI` for the given contingency table
pub(crate) fn nmi_distance(table: &Contingency) -> f64 {
    if table.total == 0 || table.is_bijection() {
        return 0.0;
    }

    let total = table.total as f64;
    let h_first = entropy(&table.first, total);
    let h_second = entropy(&table.second, total);
    if h_first == 0.0 || h_second == 0.0 {
        log::debug!(
            "zero entropy (H1={}, H2={}), NMI distance defined as 0",
            h_first,
            h_second
        );
        return 0.0;
    }

    let mi = mutual_information(table, total);
    let nmi = mi / (h_first * h_second).sqrt();
    log::debug!("H1={} H2={} MI={} NMI={}", h_first, h_second, mi, nmi);
    (1.0 - nmi).clamp(0.0, 1.0)
}

/// NMI distance of two clusterings that both assign every node of the graph
#[derive(Debug, Clone, Copy, Default)]
pub struct NmiDistance;

impl DissimilarityMeasure for NmiDistance {
    fn dissimilarity(&self, graph: &Graph, first: &Partition, second: &Partition) -> Result<f64> {
        let table = Contingency::over_graph(graph, first, second)?;
        Ok(nmi_distance(&table))
    }
}

/// NMI distance tolerant of clusterings taken at different times of a dynamic
/// graph: only nodes present in the graph and assigned by both clusterings are
/// compared. No common node yields `0.0`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DynamicNmiDistance;

impl DissimilarityMeasure for DynamicNmiDistance {
    fn dissimilarity(&self, graph: &Graph, first: &Partition, second: &Partition) -> Result<f64> {
        let table = Contingency::over_common_nodes(graph, first, second);
        if (table.total as usize) < graph.number_of_nodes() {
            log::debug!(
                "dynamic NMI compares {} of {} nodes",
                table.total,
                graph.number_of_nodes()
            );
        }
        Ok(nmi_distance(&table))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::ClusteringGenerator;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_independent_clusterings_are_maximally_distant() {
        let g = Graph::new(4);
        let a = Partition::from_labels(&[0, 0, 1, 1]);
        let b = Partition::from_labels(&[0, 1, 0, 1]);
        assert_abs_diff_eq!(NmiDistance.dissimilarity(&g, &a, &b).unwrap(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_relabeled_clustering_has_zero_distance() {
        let g = Graph::new(6);
        let a = Partition::from_labels(&[0, 0, 1, 1, 2, 2]);
        let b = Partition::from_labels(&[5, 5, 3, 3, 8, 8]);
        assert_eq!(NmiDistance.dissimilarity(&g, &a, &b).unwrap(), 0.0);
    }

    #[test]
    fn test_known_value() {
        let g = Graph::new(4);
        let a = Partition::from_labels(&[0, 0, 1, 1]);
        let b = Partition::from_labels(&[0, 0, 0, 1]);
        let ln2 = 2f64.ln();
        let h_a = ln2;
        let h_b = -(0.75 * 0.75f64.ln() + 0.25 * 0.25f64.ln());
        let mi = 0.5 * (0.5f64 / (0.5 * 0.75)).ln()
            + 0.25 * (0.25f64 / (0.5 * 0.75)).ln()
            + 0.25 * (0.25f64 / (0.5 * 0.25)).ln();
        let expected = 1.0 - mi / (h_a * h_b).sqrt();
        assert_abs_diff_eq!(
            NmiDistance.dissimilarity(&g, &a, &b).unwrap(),
            expected,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_dynamic_restricts_to_common_nodes() {
        let mut g = Graph::new(4);
        let gen = ClusteringGenerator::new();
        let old = gen.make_singleton_clustering(&g);
        g.add_node();
        g.add_node();
        let mut new = old.clone();
        new.to_singleton(4);
        new.to_singleton(5);

        assert!(NmiDistance.dissimilarity(&g, &old, &new).is_err());
        assert_eq!(DynamicNmiDistance.dissimilarity(&g, &old, &new).unwrap(), 0.0);
    }

    #[test]
    fn test_dynamic_without_common_nodes() {
        let g = Graph::new(3);
        let empty = Partition::new(3);
        let one = ClusteringGenerator::new().make_one_clustering(&g);
        assert_eq!(DynamicNmiDistance.dissimilarity(&g, &empty, &one).unwrap(), 0.0);
    }
}
