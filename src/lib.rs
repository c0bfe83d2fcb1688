//! Quality and dissimilarity measures for graph clusterings, dynamic community
//! detection evaluation and algebraic node distances

pub mod config;
pub mod error;
pub mod graph;
pub mod cluster;
pub mod distance;
pub mod dcd;

pub use error::{EvalError, Result};
