//! Joint cluster-size counts of two clusterings and the pair statistics derived from them

use std::collections::HashMap;

use rayon::prelude::*;

use crate::cluster::{ClusterId, Partition};
use crate::error::{EvalError, Result};
use crate::graph::{Graph, NodeId};

/// Contingency table of two clusterings over a node set
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Contingency {
    /// Nodes per (first cluster, second cluster) pair
    pub joint: HashMap<(ClusterId, ClusterId), u64>,

    /// Nodes per cluster of the first clustering
    pub first: HashMap<ClusterId, u64>,

    /// Nodes per cluster of the second clustering
    pub second: HashMap<ClusterId, u64>,

    /// Number of nodes counted
    pub total: u64,
}

/// Unordered node pairs classified by co-membership in two clusterings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PairCounts {
    /// Together in both
    pub n11: u64,
    /// Together in the first only
    pub n10: u64,
    /// Together in the second only
    pub n01: u64,
    /// Separated in both
    pub n00: u64,
}

impl PairCounts {
    pub fn total(&self) -> u64 {
        self.n11 + self.n10 + self.n01 + self.n00
    }
}

fn pairs(x: u64) -> u64 {
    x * x.saturating_sub(1) / 2
}

impl Contingency {
    fn add(&mut self, a: ClusterId, b: ClusterId) {
        *self.joint.entry((a, b)).or_insert(0) += 1;
        *self.first.entry(a).or_insert(0) += 1;
        *self.second.entry(b).or_insert(0) += 1;
        self.total += 1;
    }

    fn merge(mut self, other: Self) -> Self {
        for (key, count) in other.joint {
            *self.joint.entry(key).or_insert(0) += count;
        }
        for (key, count) in other.first {
            *self.first.entry(key).or_insert(0) += count;
        }
        for (key, count) in other.second {
            *self.second.entry(key).or_insert(0) += count;
        }
        self.total += other.total;
        self
    }

    /// Table over every node of `graph`; both clusterings must assign all of them
    pub fn over_graph(graph: &Graph, first: &Partition, second: &Partition) -> Result<Self> {
        let nodes = graph.node_list();
        nodes
            .par_iter()
            .try_fold(Contingency::default, |mut table, &u| -> Result<Contingency> {
                let (a, b) = assignments(first, second, u)?;
                table.add(a, b);
                Ok(table)
            })
            .try_reduce(Contingency::default, |x, y| Ok(x.merge(y)))
    }

    /// Table over the nodes of `graph` assigned in both clusterings; others are skipped
    pub fn over_common_nodes(graph: &Graph, first: &Partition, second: &Partition) -> Self {
        let nodes = graph.node_list();
        nodes
            .par_iter()
            .fold(Contingency::default, |mut table, &u| {
                if let (Some(a), Some(b)) = (first.subset_of(u), second.subset_of(u)) {
                    table.add(a, b);
                }
                table
            })
            .reduce(Contingency::default, Contingency::merge)
    }

    /// True iff the two clusterings induce the same grouping of the counted nodes
    pub fn is_bijection(&self) -> bool {
        self.joint.len() == self.first.len() && self.joint.len() == self.second.len()
    }

    pub fn pair_counts(&self) -> PairCounts {
        let same_first: u64 = self.first.values().map(|&c| pairs(c)).sum();
        let same_second: u64 = self.second.values().map(|&c| pairs(c)).sum();
        let n11: u64 = self.joint.values().map(|&c| pairs(c)).sum();
        let n10 = same_first - n11;
        let n01 = same_second - n11;
        PairCounts {
            n11,
            n10,
            n01,
            n00: pairs(self.total) - n11 - n10 - n01,
        }
    }
}

pub(crate) fn assignments(
    first: &Partition,
    second: &Partition,
    u: NodeId,
) -> Result<(ClusterId, ClusterId)> {
    let a = first
        .subset_of(u)
        .ok_or(EvalError::UnassignedNode { node: u })?;
    let b = second
        .subset_of(u)
        .ok_or(EvalError::UnassignedNode { node: u })?;
    Ok((a, b))
}
