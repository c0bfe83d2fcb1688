//! Dissimilarity measures comparing two clusterings of the same graph.
//!
//! All measures are symmetric and return a value in `[0, 1]`; identical
//! groupings score `0.0`. Pair statistics are derived exactly from a
//! contingency table built with a parallel fold over nodes, so no measure
//! enumerates all `O(n²)` node pairs except the sampled estimators, which
//! draw a fixed number of pairs instead.

pub mod contingency;
pub mod jaccard;
pub mod nmi;
pub mod rand_measures;
pub mod sampled;

pub use contingency::{Contingency, PairCounts};
pub use jaccard::JaccardMeasure;
pub use nmi::{DynamicNmiDistance, NmiDistance};
pub use rand_measures::{GraphStructuralRandMeasure, NodeStructuralRandMeasure};
pub use sampled::{SampledGraphStructuralRandMeasure, SampledNodeStructuralRandMeasure};

use crate::cluster::Partition;
use crate::error::Result;
use crate::graph::Graph;

/// Compares two clusterings of a graph
pub trait DissimilarityMeasure {
    fn dissimilarity(&self, graph: &Graph, first: &Partition, second: &Partition) -> Result<f64>;
}
