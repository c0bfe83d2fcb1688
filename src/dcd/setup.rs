//! Orchestrator running incremental detectors against a dynamic graph source

use rayon::prelude::*;
use serde::Serialize;

use crate::cluster::tools::ensure_proper_clustering;
use crate::cluster::{DissimilarityMeasure, Partition};
use crate::config::DynCdConfig;
use crate::dcd::{DynamicGraphSource, IncrementalDetector};
use crate::error::{EvalError, Result};
use crate::graph::events::count_time_steps;
use crate::graph::{Graph, GraphEvent};

/// Lifecycle of a [`DynCdSetup`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RunState {
    Idle,
    Running,
    Completed,
}

/// Clustering snapshots of one detector, one per simulated interval
#[derive(Debug, Clone, Serialize)]
pub struct Timeline {
    detector: String,
    snapshots: Vec<Partition>,
}

impl Timeline {
    fn new(detector: &str) -> Self {
        Self {
            detector: detector.to_string(),
            snapshots: Vec::new(),
        }
    }

    pub fn detector(&self) -> &str {
        &self.detector
    }

    pub fn snapshots(&self) -> &[Partition] {
        &self.snapshots
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn first(&self) -> Option<&Partition> {
        self.snapshots.first()
    }

    pub fn last(&self) -> Option<&Partition> {
        self.snapshots.last()
    }
}

/// Drives a dynamic graph source and a set of incremental detectors through
/// simulated time.
///
/// Per interval of `delta_t` time units: the next event batch is applied to
/// the working graph, every detector processes it and updates, then each
/// detector's partition is appended to its timeline. The run ends when the
/// simulated time reaches `t_max`.
pub struct DynCdSetup {
    source: Box<dyn DynamicGraphSource>,
    detectors: Vec<Box<dyn IncrementalDetector>>,
    config: DynCdConfig,
    graph: Graph,
    timelines: Vec<Timeline>,
    time: u64,
    state: RunState,
}

impl DynCdSetup {
    pub fn new(
        source: Box<dyn DynamicGraphSource>,
        detectors: Vec<Box<dyn IncrementalDetector>>,
        config: DynCdConfig,
    ) -> Result<Self> {
        config.validate()?;
        if detectors.is_empty() {
            return Err(EvalError::InvalidConfig(
                "at least one detector is required".into(),
            ));
        }

        let timelines = detectors.iter().map(|d| Timeline::new(d.name())).collect();
        Ok(Self {
            source,
            detectors,
            config,
            graph: Graph::default(),
            timelines,
            time: 0,
            state: RunState::Idle,
        })
    }

    /// Run the simulation to `t_max`. Only allowed once, from `Idle`.
    pub fn run(&mut self) -> Result<()> {
        if self.state != RunState::Idle {
            return Err(EvalError::InvalidState(format!(
                "run requested in state {:?}",
                self.state
            )));
        }
        self.state = RunState::Running;
        log::info!(
            "Starting dynamic community detection with {} detectors, t_max {}, delta_t {}",
            self.detectors.len(),
            self.config.t_max,
            self.config.delta_t
        );

        for event in self.source.initialize()? {
            self.graph.apply(&event)?;
        }
        for detector in self.detectors.iter_mut() {
            detector.attach(&self.graph)?;
        }
        log::info!(
            "Initial graph with {} nodes and {} edges",
            self.graph.number_of_nodes(),
            self.graph.number_of_edges()
        );

        while self.time < self.config.t_max {
            self.step()?;
        }

        self.state = RunState::Completed;
        log::info!(
            "Dynamic community detection complete at time {}: {} nodes, {} edges",
            self.time,
            self.graph.number_of_nodes(),
            self.graph.number_of_edges()
        );
        Ok(())
    }

    /// One interval: apply, notify, snapshot
    fn step(&mut self) -> Result<()> {
        let delta_t = self.config.delta_t;
        let batch = self.source.generate_time_steps(delta_t)?;
        let steps = count_time_steps(&batch);
        if steps != delta_t {
            return Err(EvalError::SourceContract {
                expected: delta_t,
                found: steps,
            });
        }

        let forwarded = self.apply_batch(&batch)?;
        self.time += steps;

        let graph = &self.graph;
        self.detectors
            .par_iter_mut()
            .try_for_each(|detector| -> Result<()> {
                detector.process_batch(graph, &forwarded)?;
                detector.update(graph)
            })?;

        for (detector, timeline) in self.detectors.iter().zip(self.timelines.iter_mut()) {
            let zeta = detector.partition();
            if self.config.check_snapshots {
                ensure_proper_clustering(graph, &zeta)?;
            }
            timeline.snapshots.push(zeta);
        }

        log::debug!(
            "time {}: {} events, {} nodes, {} edges",
            self.time,
            batch.len(),
            graph.number_of_nodes(),
            graph.number_of_edges()
        );
        Ok(())
    }

    /// Apply `batch` to the working graph and return the batch detectors see:
    /// every node removal is preceded by removals of its incident edges, which
    /// the graph drops implicitly
    fn apply_batch(&mut self, batch: &[GraphEvent]) -> Result<Vec<GraphEvent>> {
        let mut forwarded = Vec::with_capacity(batch.len());
        for event in batch {
            if let GraphEvent::NodeRemoval { node } = *event {
                if self.graph.has_node(node) {
                    forwarded.extend(
                        self.graph
                            .neighbors(node)
                            .iter()
                            .map(|&(v, _)| GraphEvent::EdgeRemoval { u: node, v }),
                    );
                }
            }
            self.graph.apply(event)?;
            forwarded.push(*event);
        }
        Ok(forwarded)
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// Simulated time reached so far
    pub fn time(&self) -> u64 {
        self.time
    }

    pub fn config(&self) -> &DynCdConfig {
        &self.config
    }

    /// The working graph
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn graph_copy(&self) -> Graph {
        self.graph.clone()
    }

    /// Timelines in detector registration order
    pub fn timelines(&self) -> &[Timeline] {
        &self.timelines
    }

    pub fn timeline(&self, detector: usize) -> Option<&Timeline> {
        self.timelines.get(detector)
    }

    /// For every detector, the dissimilarity of each snapshot to its
    /// predecessor, evaluated on the final graph. Requires a completed run.
    pub fn snapshot_dissimilarities(
        &self,
        measure: &dyn DissimilarityMeasure,
    ) -> Result<Vec<Vec<f64>>> {
        if self.state != RunState::Completed {
            return Err(EvalError::InvalidState(format!(
                "snapshot comparison requested in state {:?}",
                self.state
            )));
        }
        self.timelines
            .iter()
            .map(|timeline| {
                timeline
                    .snapshots
                    .windows(2)
                    .map(|pair| measure.dissimilarity(&self.graph, &pair[0], &pair[1]))
                    .collect::<Result<Vec<f64>>>()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::DynamicNmiDistance;
    use crate::dcd::{DynamicBarabasiAlbertGenerator, DynamicLabelPropagation, UpdateStrategy};
    use std::sync::{Arc, Mutex};

    fn detectors() -> Vec<Box<dyn IncrementalDetector>> {
        vec![
            Box::new(DynamicLabelPropagation::new(UpdateStrategy::Isolate)),
            Box::new(DynamicLabelPropagation::new(UpdateStrategy::Keep)),
        ]
    }

    fn source() -> Box<dyn DynamicGraphSource> {
        Box::new(DynamicBarabasiAlbertGenerator::new(2).unwrap())
    }

    /// Emits one time step too few per batch
    struct ShortSource;

    impl DynamicGraphSource for ShortSource {
        fn initialize(&mut self) -> Result<Vec<GraphEvent>> {
            Ok(vec![GraphEvent::NodeAddition { node: 0 }])
        }

        fn generate_time_steps(&mut self, delta_t: u64) -> Result<Vec<GraphEvent>> {
            Ok(vec![GraphEvent::TimeStep; delta_t as usize - 1])
        }
    }

    /// Reports a partition that forgets every node
    struct ForgetfulDetector;

    impl IncrementalDetector for ForgetfulDetector {
        fn name(&self) -> &str {
            "forgetful"
        }

        fn attach(&mut self, _graph: &Graph) -> Result<()> {
            Ok(())
        }

        fn process_batch(&mut self, _graph: &Graph, _batch: &[GraphEvent]) -> Result<()> {
            Ok(())
        }

        fn update(&mut self, _graph: &Graph) -> Result<()> {
            Ok(())
        }

        fn partition(&self) -> Partition {
            Partition::default()
        }
    }

    /// A star around node 1 whose center is removed in the first interval
    struct StarRemovalSource;

    impl DynamicGraphSource for StarRemovalSource {
        fn initialize(&mut self) -> Result<Vec<GraphEvent>> {
            let mut events: Vec<GraphEvent> =
                (0..4).map(|node| GraphEvent::NodeAddition { node }).collect();
            for v in [0, 2, 3] {
                events.push(GraphEvent::EdgeAddition { u: 1, v, weight: 1.0 });
            }
            Ok(events)
        }

        fn generate_time_steps(&mut self, _delta_t: u64) -> Result<Vec<GraphEvent>> {
            Ok(vec![GraphEvent::NodeRemoval { node: 1 }, GraphEvent::TimeStep])
        }
    }

    /// Keeps every batch it is handed
    struct RecordingDetector {
        seen: Arc<Mutex<Vec<GraphEvent>>>,
    }

    impl IncrementalDetector for RecordingDetector {
        fn name(&self) -> &str {
            "recording"
        }

        fn attach(&mut self, _graph: &Graph) -> Result<()> {
            Ok(())
        }

        fn process_batch(&mut self, _graph: &Graph, batch: &[GraphEvent]) -> Result<()> {
            self.seen.lock().unwrap().extend_from_slice(batch);
            Ok(())
        }

        fn update(&mut self, _graph: &Graph) -> Result<()> {
            Ok(())
        }

        fn partition(&self) -> Partition {
            Partition::from_labels(&[0, 0, 0, 0])
        }
    }

    #[test]
    fn test_node_removal_reports_incident_edges() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let detector = RecordingDetector { seen: seen.clone() };
        let mut setup = DynCdSetup::new(
            Box::new(StarRemovalSource),
            vec![Box::new(detector)],
            DynCdConfig::new(1, 1),
        )
        .unwrap();
        setup.run().unwrap();
        assert_eq!(setup.graph().number_of_edges(), 0);

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 5);
        let mut former: Vec<_> = seen[..3]
            .iter()
            .map(|e| match *e {
                GraphEvent::EdgeRemoval { u: 1, v } => v,
                other => panic!("unexpected event {:?}", other),
            })
            .collect();
        former.sort_unstable();
        assert_eq!(former, vec![0, 2, 3]);
        assert_eq!(&seen[3..], &[GraphEvent::NodeRemoval { node: 1 }, GraphEvent::TimeStep]);
    }

    #[test]
    fn test_rejects_bad_configuration() {
        assert!(DynCdSetup::new(source(), detectors(), DynCdConfig::new(10, 3)).is_err());
        assert!(DynCdSetup::new(source(), Vec::new(), DynCdConfig::new(12, 3)).is_err());
    }

    #[test]
    fn test_records_one_snapshot_per_interval() {
        let mut setup = DynCdSetup::new(source(), detectors(), DynCdConfig::new(12, 3)).unwrap();
        assert_eq!(setup.state(), RunState::Idle);
        setup.run().unwrap();

        assert_eq!(setup.state(), RunState::Completed);
        assert_eq!(setup.time(), 12);
        // clique of 3 plus one node per time unit
        assert_eq!(setup.graph().number_of_nodes(), 15);
        assert_eq!(setup.timelines().len(), 2);
        for timeline in setup.timelines() {
            assert_eq!(timeline.len(), 4);
        }
        assert_eq!(
            setup.timeline(1).unwrap().detector(),
            "DynamicLabelPropagation<Keep>"
        );
    }

    #[test]
    fn test_runs_only_once() {
        let mut setup = DynCdSetup::new(source(), detectors(), DynCdConfig::new(6, 6)).unwrap();
        setup.run().unwrap();
        assert!(matches!(setup.run(), Err(EvalError::InvalidState(_))));
    }

    #[test]
    fn test_source_contract_is_enforced() {
        let mut setup =
            DynCdSetup::new(Box::new(ShortSource), detectors(), DynCdConfig::new(4, 2)).unwrap();
        assert_eq!(
            setup.run(),
            Err(EvalError::SourceContract {
                expected: 2,
                found: 1
            })
        );
        assert_eq!(setup.state(), RunState::Running);
    }

    #[test]
    fn test_improper_snapshots_fail_the_run() {
        let mut setup = DynCdSetup::new(
            source(),
            vec![Box::new(ForgetfulDetector)],
            DynCdConfig::new(2, 1),
        )
        .unwrap();
        assert!(matches!(
            setup.run(),
            Err(EvalError::UnassignedNode { .. })
        ));
    }

    #[test]
    fn test_snapshot_dissimilarities() {
        let mut setup = DynCdSetup::new(source(), detectors(), DynCdConfig::new(10, 2)).unwrap();
        assert!(setup.snapshot_dissimilarities(&DynamicNmiDistance).is_err());
        setup.run().unwrap();

        let series = setup.snapshot_dissimilarities(&DynamicNmiDistance).unwrap();
        assert_eq!(series.len(), 2);
        for distances in series {
            assert_eq!(distances.len(), 4);
            assert!(distances.iter().all(|d| (0.0..=1.0).contains(d)));
        }
    }
}
