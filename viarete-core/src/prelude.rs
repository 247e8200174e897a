// Re-export key components
pub use crate::algo::{
    build_corridor, clean_topology, extract_centerlines, merge_networks, polygonize,
    sample_network,
};
pub use crate::loading::{AreaBoundary, NetworkSource, NetworkType, PipelineConfig};
pub use crate::pipeline::{AreaOutput, AreaReport, BatchEntry, Stage, run_area, run_batch};
pub use crate::projection::{AreaProjection, Reproject};

// Core data types
pub use crate::Error;
pub use crate::model::{Block, CleanedNetwork, ProjectedNetwork, RoadEdge, RoadId, SamplePoint};
