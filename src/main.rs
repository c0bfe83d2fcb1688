use anyhow::Result;
use clap::{Parser, ValueEnum};
use serde::Serialize;

use graph_cluster_eval::cluster::{
    ClusteringGenerator, Coverage, DissimilarityMeasure, DynamicNmiDistance,
    GraphStructuralRandMeasure, JaccardMeasure, Modularity, ModularitySequential, NmiDistance,
    NodeStructuralRandMeasure, QualityMeasure, SampledGraphStructuralRandMeasure,
    SampledNodeStructuralRandMeasure,
};
use graph_cluster_eval::config::{AlgebraicDistanceConfig, DynCdConfig, Norm};
use graph_cluster_eval::dcd::{
    DynCdSetup, DynamicBarabasiAlbertGenerator, DynamicLabelPropagation, IncrementalDetector,
    UpdateStrategy,
};
use graph_cluster_eval::distance::{AlgebraicDistance, NodeDistance};
use graph_cluster_eval::graph::GraphGenerator;

/// Tolerance for the parallel/sequential modularity cross-check
const MODULARITY_TOLERANCE: f64 = 1e-12;

#[derive(Copy, Clone, Debug, ValueEnum)]
enum NormArg {
    Sum,
    Euclidean,
    Max,
}

impl From<NormArg> for Norm {
    fn from(arg: NormArg) -> Self {
        match arg {
            NormArg::Sum => Norm::Sum,
            NormArg::Euclidean => Norm::Euclidean,
            NormArg::Max => Norm::Max,
        }
    }
}

#[derive(Parser, Debug)]
#[clap(
    name = "graph-cluster-eval",
    about = "Evaluate graph clusterings and dynamic community detection on generated graphs"
)]
struct Cli {
    /// Nodes of the static random graph
    #[clap(long, default_value = "500")]
    nodes: usize,

    /// Edge probability of the static random graph
    #[clap(long, default_value = "0.2")]
    edge_prob: f64,

    /// Clusters of the random clustering
    #[clap(long, default_value = "10")]
    clusters: usize,

    /// Samples drawn by the sampled Rand measures
    #[clap(long, default_value = "10000")]
    samples: usize,

    /// Simulated time horizon of the dynamic run
    #[clap(long, default_value = "60")]
    t_max: u64,

    /// Simulated interval between snapshots
    #[clap(long, default_value = "6")]
    delta_t: u64,

    /// Edges attached per new node in the dynamic generator
    #[clap(long, default_value = "2")]
    attachments: usize,

    /// Load vectors of the algebraic distance
    #[clap(long, default_value = "10")]
    num_systems: usize,

    /// Relaxation rounds of the algebraic distance
    #[clap(long, default_value = "20")]
    num_iters: usize,

    /// Relaxation factor of the algebraic distance
    #[clap(long, default_value = "0.5")]
    omega: f64,

    /// Norm aggregating algebraic distance systems
    #[clap(long, value_enum, default_value = "euclidean")]
    norm: NormArg,

    /// Seed for every random generator
    #[clap(long, default_value = "42")]
    seed: u64,

    /// Number of worker threads (0 = use all available cores)
    #[clap(long, default_value = "0")]
    threads: usize,

    /// Verbose logging
    #[clap(long, short)]
    verbose: bool,
}

#[derive(Serialize)]
struct QualitySummary {
    modularity_parallel: f64,
    modularity_sequential: f64,
    coverage: f64,
    one_clustering_modularity: f64,
    singleton_coverage: f64,
}

#[derive(Serialize)]
struct DissimilaritySummary {
    jaccard: f64,
    node_structural_rand: f64,
    graph_structural_rand: f64,
    sampled_node_structural_rand: f64,
    sampled_graph_structural_rand: f64,
    nmi_distance: f64,
}

#[derive(Serialize)]
struct DetectorSummary {
    detector: String,
    snapshots: usize,
    final_clusters: usize,
    final_modularity: f64,
    first_to_last_nmi_distance: f64,
    successive_nmi_distances: Vec<f64>,
}

#[derive(Serialize)]
struct Summary {
    nodes: usize,
    edges: usize,
    quality: QualitySummary,
    random_vs_singleton: DissimilaritySummary,
    mean_edge_algebraic_distance: f64,
    dynamic_nodes: usize,
    dynamic_edges: usize,
    detectors: Vec<DetectorSummary>,
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Cli::parse();

    // Configure logging
    let log_level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp_millis()
        .init();

    // Set number of threads
    let num_threads = if args.threads > 0 {
        args.threads
    } else {
        num_cpus::get()
    };

    log::info!("Using {} worker threads", num_threads);
    rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build_global()?;

    // 1. Static graph and baseline clusterings
    let graph =
        GraphGenerator::with_seed(args.seed).make_erdos_renyi_graph(args.nodes, args.edge_prob);
    log::info!(
        "Generated graph with {} nodes and {} edges",
        graph.number_of_nodes(),
        graph.number_of_edges()
    );

    let mut clustering_gen = ClusteringGenerator::with_seed(args.seed);
    let random = clustering_gen.make_random_clustering(&graph, args.clusters);
    let one = clustering_gen.make_one_clustering(&graph);
    let singleton = clustering_gen.make_singleton_clustering(&graph);

    // 2. Quality
    let modularity_parallel = Modularity::new()
        .with_parallel_threshold(0)
        .quality(&random, &graph)?;
    let modularity_sequential = ModularitySequential.quality(&random, &graph)?;
    if (modularity_parallel - modularity_sequential).abs() >= MODULARITY_TOLERANCE {
        log::warn!(
            "Parallel and sequential modularity diverge: {} vs {}",
            modularity_parallel,
            modularity_sequential
        );
    }
    let quality = QualitySummary {
        modularity_parallel,
        modularity_sequential,
        coverage: Coverage.quality(&random, &graph)?,
        one_clustering_modularity: Modularity::new().quality(&one, &graph)?,
        singleton_coverage: Coverage.quality(&singleton, &graph)?,
    };

    // 3. Dissimilarity
    let sampled_node = SampledNodeStructuralRandMeasure::new(args.samples)?.with_seed(args.seed);
    let sampled_graph = SampledGraphStructuralRandMeasure::new(args.samples)?.with_seed(args.seed);
    let random_vs_singleton = DissimilaritySummary {
        jaccard: JaccardMeasure.dissimilarity(&graph, &random, &singleton)?,
        node_structural_rand: NodeStructuralRandMeasure.dissimilarity(&graph, &random, &singleton)?,
        graph_structural_rand: GraphStructuralRandMeasure
            .dissimilarity(&graph, &random, &singleton)?,
        sampled_node_structural_rand: sampled_node.dissimilarity(&graph, &random, &singleton)?,
        sampled_graph_structural_rand: sampled_graph.dissimilarity(&graph, &random, &singleton)?,
        nmi_distance: NmiDistance.dissimilarity(&graph, &random, &singleton)?,
    };

    // 4. Algebraic distance
    let ad_config = AlgebraicDistanceConfig::new(
        args.num_systems,
        args.num_iters,
        args.omega,
        args.norm.into(),
    )
    .with_seed(args.seed);
    let mut algebraic = AlgebraicDistance::new(&graph, ad_config)?;
    algebraic.preprocess()?;
    let edge_distances = algebraic.edge_distances()?;
    let mean_edge_algebraic_distance = if edge_distances.is_empty() {
        0.0
    } else {
        edge_distances.iter().map(|&(_, _, d)| d).sum::<f64>() / edge_distances.len() as f64
    };

    // 5. Dynamic community detection
    let source = DynamicBarabasiAlbertGenerator::new(args.attachments)?.with_seed(args.seed);
    let detectors: Vec<Box<dyn IncrementalDetector>> = vec![
        Box::new(DynamicLabelPropagation::new(UpdateStrategy::Isolate)),
        Box::new(DynamicLabelPropagation::new(UpdateStrategy::Keep)),
    ];
    let mut setup = DynCdSetup::new(
        Box::new(source),
        detectors,
        DynCdConfig::new(args.t_max, args.delta_t),
    )?;
    setup.run()?;

    let final_graph = setup.graph();
    let successive = setup.snapshot_dissimilarities(&DynamicNmiDistance)?;
    let mut detector_summaries = Vec::new();
    for (timeline, successive_nmi_distances) in setup.timelines().iter().zip(successive) {
        let (first, last) = match (timeline.first(), timeline.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => continue,
        };
        detector_summaries.push(DetectorSummary {
            detector: timeline.detector().to_string(),
            snapshots: timeline.len(),
            final_clusters: last.number_of_subsets(),
            final_modularity: Modularity::new().quality(last, final_graph)?,
            first_to_last_nmi_distance: DynamicNmiDistance.dissimilarity(final_graph, first, last)?,
            successive_nmi_distances,
        });
    }

    // 6. Report
    let summary = Summary {
        nodes: graph.number_of_nodes(),
        edges: graph.number_of_edges(),
        quality,
        random_vs_singleton,
        mean_edge_algebraic_distance,
        dynamic_nodes: final_graph.number_of_nodes(),
        dynamic_edges: final_graph.number_of_edges(),
        detectors: detector_summaries,
    };
    println!("{}", serde_json::to_string_pretty(&summary)?);

    log::info!("Evaluation complete");

    Ok(())
}
