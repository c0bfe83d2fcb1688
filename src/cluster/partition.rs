//! Node-to-cluster assignment over a dense node universe

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::graph::NodeId;

/// Cluster identifier
pub type ClusterId = usize;

/// Assignment of node ids to cluster ids.
///
/// Entry `u` is `None` while node `u` is unassigned (or absent from the graph).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Partition {
    data: Vec<Option<ClusterId>>,

    /// Strictly larger than every cluster id in use and next fresh id,
    /// saturating at `ClusterId::MAX`
    upper_bound: ClusterId,
}

impl Partition {
    /// Partition over `n` entries, all unassigned
    pub fn new(n: usize) -> Self {
        Self {
            data: vec![None; n],
            upper_bound: 0,
        }
    }

    /// Partition where every entry is assigned, `labels[u]` being node `u`'s cluster
    pub fn from_labels(labels: &[ClusterId]) -> Self {
        let data: Vec<Option<ClusterId>> = labels.iter().map(|&c| Some(c)).collect();
        Self::from(data)
    }

    pub fn number_of_elements(&self) -> usize {
        self.data.len()
    }

    /// One past the largest cluster id in use
    pub fn upper_bound(&self) -> ClusterId {
        self.upper_bound
    }

    pub fn subset_of(&self, u: NodeId) -> Option<ClusterId> {
        self.data.get(u).copied().flatten()
    }

    pub fn contains(&self, u: NodeId) -> bool {
        self.subset_of(u).is_some()
    }

    /// Assign `u` to cluster `c`, growing the partition if `u` is out of range
    pub fn add_to_subset(&mut self, c: ClusterId, u: NodeId) {
        self.ensure_len(u + 1);
        self.data[u] = Some(c);
        self.upper_bound = self.upper_bound.max(c.saturating_add(1));
    }

    pub fn move_to_subset(&mut self, c: ClusterId, u: NodeId) {
        self.add_to_subset(c, u);
    }

    /// Put `u` into a fresh cluster of its own and return that cluster's id
    pub fn to_singleton(&mut self, u: NodeId) -> ClusterId {
        let c = self.upper_bound;
        self.add_to_subset(c, u);
        c
    }

    /// Mark `u` unassigned
    pub fn remove(&mut self, u: NodeId) {
        if let Some(entry) = self.data.get_mut(u) {
            *entry = None;
        }
    }

    /// Append one unassigned entry and return its index
    pub fn extend(&mut self) -> NodeId {
        self.data.push(None);
        self.data.len() - 1
    }

    pub fn ensure_len(&mut self, n: usize) {
        if self.data.len() < n {
            self.data.resize(n, None);
        }
    }

    /// Every entry gets its own cluster, cluster id equal to the index
    pub fn all_to_singletons(&mut self) {
        for (u, entry) in self.data.iter_mut().enumerate() {
            *entry = Some(u);
        }
        self.upper_bound = self.data.len();
    }

    /// Every entry joins cluster 0
    pub fn all_to_one(&mut self) {
        self.data.iter_mut().for_each(|entry| *entry = Some(0));
        self.upper_bound = if self.data.is_empty() { 0 } else { 1 };
    }

    pub fn in_same_subset(&self, u: NodeId, v: NodeId) -> bool {
        match (self.subset_of(u), self.subset_of(v)) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }

    /// Distinct cluster ids in use
    pub fn subset_ids(&self) -> BTreeSet<ClusterId> {
        self.data.iter().flatten().copied().collect()
    }

    pub fn number_of_subsets(&self) -> usize {
        self.subset_ids().len()
    }

    /// Members of every cluster, in ascending node order
    pub fn subsets(&self) -> BTreeMap<ClusterId, Vec<NodeId>> {
        let mut subsets: BTreeMap<ClusterId, Vec<NodeId>> = BTreeMap::new();
        for (u, c) in self.iter() {
            if let Some(c) = c {
                subsets.entry(c).or_default().push(u);
            }
        }
        subsets
    }

    pub fn subset_sizes(&self) -> BTreeMap<ClusterId, usize> {
        let mut sizes = BTreeMap::new();
        for c in self.data.iter().flatten() {
            *sizes.entry(*c).or_insert(0) += 1;
        }
        sizes
    }

    /// Renumber cluster ids to `0..k` in first-seen order and return `k`
    pub fn compact(&mut self) -> usize {
        let mut map: HashMap<ClusterId, ClusterId> = HashMap::new();
        for c in self.data.iter_mut().flatten() {
            let next = map.len();
            *c = *map.entry(*c).or_insert(next);
        }
        self.upper_bound = map.len();
        map.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, Option<ClusterId>)> + '_ {
        self.data.iter().copied().enumerate()
    }

    pub fn as_slice(&self) -> &[Option<ClusterId>] {
        &self.data
    }
}

impl From<Vec<Option<ClusterId>>> for Partition {
    fn from(data: Vec<Option<ClusterId>>) -> Self {
        let upper_bound = data
            .iter()
            .flatten()
            .max()
            .map_or(0, |&c| c.saturating_add(1));
        Self { data, upper_bound }
    }
}
