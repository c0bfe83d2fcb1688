//! Dynamic community detection: event sources, incremental detectors and the
//! orchestrator that drives them through simulated time.

pub mod barabasi_albert;
pub mod label_propagation;
pub mod setup;

pub use barabasi_albert::DynamicBarabasiAlbertGenerator;
pub use label_propagation::{DynamicLabelPropagation, UpdateStrategy};
pub use setup::{DynCdSetup, RunState, Timeline};

use crate::cluster::Partition;
use crate::error::Result;
use crate::graph::{Graph, GraphEvent};

/// Stateful producer of graph events; advances with every call and cannot rewind
pub trait DynamicGraphSource {
    /// Events building the initial graph, starting from an empty graph
    fn initialize(&mut self) -> Result<Vec<GraphEvent>>;

    /// Events covering exactly `delta_t` time units, each closed by a
    /// [`GraphEvent::TimeStep`] marker
    fn generate_time_steps(&mut self, delta_t: u64) -> Result<Vec<GraphEvent>>;
}

/// Community detector that follows a dynamic graph incrementally.
///
/// Detectors only read the graph; the orchestrator applies every event before
/// handing the batch over. Sibling detectors are notified in no particular order.
pub trait IncrementalDetector: Send {
    fn name(&self) -> &str;

    /// Bind to the initial graph before the first batch
    fn attach(&mut self, graph: &Graph) -> Result<()>;

    /// Record the events of one interval; `graph` already reflects them.
    /// The orchestrator precedes every node removal with removals of the
    /// node's incident edges.
    fn process_batch(&mut self, graph: &Graph, batch: &[GraphEvent]) -> Result<()>;

    /// Bring the internal clustering up to date with `graph`
    fn update(&mut self, graph: &Graph) -> Result<()>;

    /// Current clustering
    fn partition(&self) -> Partition;
}
