//! Clusterings of a graph and the measures evaluating them

pub mod dissimilarity;
pub mod generator;
pub mod partition;
pub mod quality;
pub mod tools;

pub use dissimilarity::{
    DissimilarityMeasure, DynamicNmiDistance, GraphStructuralRandMeasure, JaccardMeasure,
    NmiDistance, NodeStructuralRandMeasure, SampledGraphStructuralRandMeasure,
    SampledNodeStructuralRandMeasure,
};
pub use generator::ClusteringGenerator;
pub use partition::{ClusterId, Partition};
pub use quality::{Coverage, Modularity, ModularitySequential, QualityMeasure};
