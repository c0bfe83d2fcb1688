//! Pairwise node distances

pub mod algebraic;

pub use algebraic::AlgebraicDistance;

use crate::error::Result;
use crate::graph::NodeId;

/// A stateful node distance oracle: `preprocess` once, then query repeatedly
pub trait NodeDistance {
    /// (Re)compute the internal state; required before the first query
    fn preprocess(&mut self) -> Result<()>;

    fn distance(&self, u: NodeId, v: NodeId) -> Result<f64>;
}
