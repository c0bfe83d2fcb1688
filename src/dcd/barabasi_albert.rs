//! Preferential attachment growth as a dynamic graph source

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::dcd::DynamicGraphSource;
use crate::error::{EvalError, Result};
use crate::graph::{GraphEvent, NodeId};

/// Grows a Barabási–Albert graph: every time step adds one node attached to
/// `k` distinct existing nodes chosen with probability proportional to degree.
///
/// The initial graph is a clique on `k + 1` nodes.
pub struct DynamicBarabasiAlbertGenerator {
    k: usize,
    rng: StdRng,

    /// Every edge contributes both endpoints; uniform draws from this list are
    /// degree-proportional draws of nodes
    endpoints: Vec<NodeId>,

    next_node: NodeId,
    initialized: bool,
}

impl DynamicBarabasiAlbertGenerator {
    pub fn new(k: usize) -> Result<Self> {
        if k == 0 {
            return Err(EvalError::InvalidConfig(
                "attachments per node must be positive".into(),
            ));
        }
        Ok(Self {
            k,
            rng: StdRng::seed_from_u64(42),
            endpoints: Vec::new(),
            next_node: 0,
            initialized: false,
        })
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    fn connect(&mut self, events: &mut Vec<GraphEvent>, u: NodeId, v: NodeId) {
        events.push(GraphEvent::EdgeAddition { u, v, weight: 1.0 });
        self.endpoints.push(u);
        self.endpoints.push(v);
    }

    fn add_node(&mut self, events: &mut Vec<GraphEvent>) -> NodeId {
        let node = self.next_node;
        self.next_node += 1;
        events.push(GraphEvent::NodeAddition { node });
        node
    }
}

impl DynamicGraphSource for DynamicBarabasiAlbertGenerator {
    fn initialize(&mut self) -> Result<Vec<GraphEvent>> {
        if self.initialized {
            return Err(EvalError::InvalidState("source already initialized".into()));
        }

        let mut events = Vec::new();
        let seeds: Vec<NodeId> = (0..=self.k).map(|_| self.add_node(&mut events)).collect();
        for (i, &u) in seeds.iter().enumerate() {
            for &v in &seeds[i + 1..] {
                self.connect(&mut events, u, v);
            }
        }

        self.initialized = true;
        Ok(events)
    }

    fn generate_time_steps(&mut self, delta_t: u64) -> Result<Vec<GraphEvent>> {
        if !self.initialized {
            return Err(EvalError::InvalidState("source not initialized".into()));
        }

        let mut events = Vec::new();
        for _ in 0..delta_t {
            // draw targets before the new node joins the endpoint list
            let mut targets: Vec<NodeId> = Vec::with_capacity(self.k);
            while targets.len() < self.k {
                let candidate = self.endpoints[self.rng.random_range(0..self.endpoints.len())];
                if !targets.contains(&candidate) {
                    targets.push(candidate);
                }
            }

            let node = self.add_node(&mut events);
            for target in targets {
                self.connect(&mut events, node, target);
            }
            events.push(GraphEvent::TimeStep);
        }
        Ok(events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::events::count_time_steps;
    use crate::graph::Graph;

    #[test]
    fn test_initial_clique() {
        let mut gen = DynamicBarabasiAlbertGenerator::new(3).unwrap();
        let mut g = Graph::default();
        for e in gen.initialize().unwrap() {
            g.apply(&e).unwrap();
        }
        assert_eq!(g.number_of_nodes(), 4);
        assert_eq!(g.number_of_edges(), 6);
        assert!(gen.initialize().is_err());
    }

    #[test]
    fn test_growth_per_time_step() {
        let mut gen = DynamicBarabasiAlbertGenerator::new(2).unwrap().with_seed(3);
        let mut g = Graph::default();
        assert!(gen.generate_time_steps(1).is_err());
        for e in gen.initialize().unwrap() {
            g.apply(&e).unwrap();
        }

        let batch = gen.generate_time_steps(5).unwrap();
        assert_eq!(count_time_steps(&batch), 5);
        for e in &batch {
            g.apply(e).unwrap();
        }
        assert_eq!(g.number_of_nodes(), 8);
        assert_eq!(g.number_of_edges(), 3 + 5 * 2);
        assert!((3..8).all(|u| g.degree(u) >= 2));
    }

    #[test]
    fn test_zero_attachments_rejected() {
        assert!(DynamicBarabasiAlbertGenerator::new(0).is_err());
    }
}
