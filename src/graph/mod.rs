//! Graph representation, structural events and generators

pub mod adjacency;
pub mod events;
pub mod generators;

pub use adjacency::{EdgeWeight, Graph, NodeId};
pub use events::GraphEvent;
pub use generators::GraphGenerator;
