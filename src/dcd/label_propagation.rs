//! Incremental label propagation over a dynamic graph

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::cluster::{ClusterId, Partition};
use crate::dcd::IncrementalDetector;
use crate::error::Result;
use crate::graph::{Graph, GraphEvent, NodeId};

/// How nodes touched by an event are prepared before propagation resumes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UpdateStrategy {
    /// Move touched nodes into fresh singleton clusters
    Isolate,
    /// Keep the labels of touched nodes and only reactivate them
    Keep,
}

/// Weighted label propagation restricted to nodes whose neighborhood changed.
///
/// A node adopts the label carrying the largest edge weight among its
/// neighbors; ties keep the current label, otherwise the smallest label wins.
/// A node that changes label activates its neighbors for the next round.
pub struct DynamicLabelPropagation {
    name: String,
    strategy: UpdateStrategy,
    max_iterations: usize,
    labels: Partition,
    active: Vec<bool>,
}

impl DynamicLabelPropagation {
    pub fn new(strategy: UpdateStrategy) -> Self {
        Self {
            name: format!("DynamicLabelPropagation<{:?}>", strategy),
            strategy,
            max_iterations: 100,
            labels: Partition::default(),
            active: Vec::new(),
        }
    }

    /// Upper bound on propagation rounds per update
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations.max(1);
        self
    }

    pub fn strategy(&self) -> UpdateStrategy {
        self.strategy
    }

    fn activate(&mut self, u: NodeId) {
        if self.active.len() <= u {
            self.active.resize(u + 1, false);
        }
        self.active[u] = true;
    }

    fn touch(&mut self, graph: &Graph, u: NodeId) {
        if !graph.has_node(u) {
            return;
        }
        if self.strategy == UpdateStrategy::Isolate {
            self.labels.to_singleton(u);
        }
        self.activate(u);
    }

    /// Label with the heaviest incident weight, or `None` if `u` has no labeled neighbor
    fn dominant_label(&self, graph: &Graph, u: NodeId) -> Option<ClusterId> {
        let mut weights: BTreeMap<ClusterId, f64> = BTreeMap::new();
        for &(v, w) in graph.neighbors(u) {
            if v == u {
                continue;
            }
            if let Some(label) = self.labels.subset_of(v) {
                *weights.entry(label).or_insert(0.0) += w;
            }
        }

        let best = weights.values().copied().fold(f64::NEG_INFINITY, f64::max);
        if let Some(current) = self.labels.subset_of(u) {
            if weights.get(&current) == Some(&best) {
                return Some(current);
            }
        }
        weights
            .into_iter()
            .find(|&(_, w)| w == best)
            .map(|(label, _)| label)
    }
}

impl IncrementalDetector for DynamicLabelPropagation {
    fn name(&self) -> &str {
        &self.name
    }

    fn attach(&mut self, graph: &Graph) -> Result<()> {
        self.labels = Partition::new(graph.upper_node_id_bound());
        self.active = vec![false; graph.upper_node_id_bound()];
        for u in graph.nodes() {
            self.labels.to_singleton(u);
            self.active[u] = true;
        }
        Ok(())
    }

    fn process_batch(&mut self, graph: &Graph, batch: &[GraphEvent]) -> Result<()> {
        self.labels.ensure_len(graph.upper_node_id_bound());
        for event in batch {
            match *event {
                GraphEvent::NodeRemoval { node } => {
                    let former = self.labels.subset_of(node);
                    self.labels.remove(node);
                    if let Some(flag) = self.active.get_mut(node) {
                        *flag = false;
                    }
                    // the rest of its cluster lost support
                    if let Some(c) = former {
                        let members: Vec<NodeId> = graph
                            .nodes()
                            .filter(|&u| self.labels.subset_of(u) == Some(c))
                            .collect();
                        for u in members {
                            self.activate(u);
                        }
                    }
                }
                GraphEvent::NodeAddition { node } => {
                    if graph.has_node(node) {
                        self.labels.to_singleton(node);
                        self.activate(node);
                    }
                }
                GraphEvent::TimeStep => {}
                _ => {
                    for u in event.touched_nodes() {
                        self.touch(graph, u);
                    }
                }
            }
        }
        Ok(())
    }

    fn update(&mut self, graph: &Graph) -> Result<()> {
        let bound = graph.upper_node_id_bound();
        self.labels.ensure_len(bound);
        if self.active.len() < bound {
            self.active.resize(bound, false);
        }
        for u in graph.nodes() {
            if !self.labels.contains(u) {
                self.labels.to_singleton(u);
                self.active[u] = true;
            }
        }

        let mut rounds = 0;
        let mut moved_total = 0;
        loop {
            let frontier: Vec<NodeId> = graph.nodes().filter(|&u| self.active[u]).collect();
            if frontier.is_empty() {
                break;
            }
            let mut next = vec![false; bound];
            let mut moved = 0;

            for u in frontier {
                let Some(best) = self.dominant_label(graph, u) else {
                    continue;
                };
                if self.labels.subset_of(u) != Some(best) {
                    self.labels.move_to_subset(best, u);
                    moved += 1;
                    for &(v, _) in graph.neighbors(u) {
                        next[v] = true;
                    }
                }
            }

            self.active = next;
            rounds += 1;
            moved_total += moved;
            if moved == 0 || rounds >= self.max_iterations {
                break;
            }
        }

        // whatever stays active is picked up by the next update
        log::debug!(
            "{}: {} label moves in {} rounds, {} clusters",
            self.name,
            moved_total,
            rounds,
            self.labels.number_of_subsets()
        );
        Ok(())
    }

    fn partition(&self) -> Partition {
        self.labels.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::tools::{equal_clusterings, is_proper_clustering};

    fn two_cliques() -> Graph {
        let mut g = Graph::new(8);
        for base in [0, 4] {
            for u in base..base + 4 {
                for v in (u + 1)..base + 4 {
                    g.add_edge(u, v, 1.0).unwrap();
                }
            }
        }
        g
    }

    #[test]
    fn test_finds_disconnected_cliques() {
        let g = two_cliques();
        let mut lp = DynamicLabelPropagation::new(UpdateStrategy::Isolate);
        lp.attach(&g).unwrap();
        lp.update(&g).unwrap();

        let expected = Partition::from_labels(&[0, 0, 0, 0, 1, 1, 1, 1]);
        assert!(equal_clusterings(&lp.partition(), &expected, &g));
    }

    #[test]
    fn test_new_node_joins_its_neighbors() {
        let g = two_cliques();
        for strategy in [UpdateStrategy::Isolate, UpdateStrategy::Keep] {
            let mut lp = DynamicLabelPropagation::new(strategy);
            lp.attach(&g).unwrap();
            lp.update(&g).unwrap();

            let mut graph = g.clone();
            let batch = vec![
                GraphEvent::NodeAddition { node: 8 },
                GraphEvent::EdgeAddition { u: 8, v: 5, weight: 1.0 },
                GraphEvent::EdgeAddition { u: 8, v: 6, weight: 1.0 },
                GraphEvent::TimeStep,
            ];
            for e in &batch {
                graph.apply(e).unwrap();
            }
            lp.process_batch(&graph, &batch).unwrap();
            lp.update(&graph).unwrap();

            let zeta = lp.partition();
            assert!(is_proper_clustering(&graph, &zeta));
            assert!(zeta.in_same_subset(8, 5), "{:?}", strategy);
        }
    }

    #[test]
    fn test_removed_nodes_become_unassigned() {
        let g = two_cliques();
        let mut lp = DynamicLabelPropagation::new(UpdateStrategy::Keep);
        lp.attach(&g).unwrap();
        lp.update(&g).unwrap();

        let mut graph = g.clone();
        let batch = vec![GraphEvent::NodeRemoval { node: 3 }, GraphEvent::TimeStep];
        graph.apply(&batch[0]).unwrap();
        lp.process_batch(&graph, &batch).unwrap();
        lp.update(&graph).unwrap();

        let zeta = lp.partition();
        assert_eq!(zeta.subset_of(3), None);
        assert!(is_proper_clustering(&graph, &zeta));
    }

    #[test]
    fn test_node_removal_reactivates_former_neighbors() {
        let g = two_cliques();
        for strategy in [UpdateStrategy::Isolate, UpdateStrategy::Keep] {
            let mut lp = DynamicLabelPropagation::new(strategy);
            lp.attach(&g).unwrap();
            lp.update(&g).unwrap();
            assert!(lp.active.iter().all(|&a| !a));

            let mut graph = g.clone();
            graph.remove_node(3).unwrap();
            // incident edges reported before the removal itself
            let mut batch: Vec<GraphEvent> = (0..3)
                .map(|v| GraphEvent::EdgeRemoval { u: 3, v })
                .collect();
            batch.extend([GraphEvent::NodeRemoval { node: 3 }, GraphEvent::TimeStep]);
            lp.process_batch(&graph, &batch).unwrap();
            assert!((0..3).all(|u| lp.active[u]), "{:?}", strategy);
            assert!(!lp.active[3]);

            lp.update(&graph).unwrap();
            let zeta = lp.partition();
            assert!(is_proper_clustering(&graph, &zeta));
            assert!(zeta.in_same_subset(0, 2), "{:?}", strategy);
            assert!(!zeta.in_same_subset(0, 4), "{:?}", strategy);
        }
    }

    #[test]
    fn test_bare_node_removal_reactivates_its_cluster() {
        let g = two_cliques();
        let mut lp = DynamicLabelPropagation::new(UpdateStrategy::Keep);
        lp.attach(&g).unwrap();
        lp.update(&g).unwrap();

        let mut graph = g.clone();
        graph.remove_node(3).unwrap();
        lp.process_batch(&graph, &[GraphEvent::NodeRemoval { node: 3 }])
            .unwrap();
        assert!((0..3).all(|u| lp.active[u]));
        assert!((4..8).all(|u| !lp.active[u]));
    }

    #[test]
    fn test_update_without_attach_labels_everything() {
        let g = two_cliques();
        let mut lp = DynamicLabelPropagation::new(UpdateStrategy::Keep).with_max_iterations(1);
        lp.update(&g).unwrap();
        assert!(is_proper_clustering(&g, &lp.partition()));
    }
}
