//! Road-network skeleton extraction and street-view sampling
//!
//! Turns a raw street network, acquired within an administrative
//! boundary, into a topologically clean road skeleton and a set of
//! evenly spaced, geo-referenced sample points:
//!
//! 1. merge the per-sub-polygon graphs and drop noise edges
//! 2. buffer the edges into a road corridor polygon
//! 3. extract the corridor's medial-axis centerlines
//! 4. clean the topology (pseudo-node merge, dangling-line pruning)
//! 5. polygonize block faces and sample the cleaned lines
//!
//! Network acquisition and coordinate reprojection are collaborator
//! seams ([`NetworkSource`], [`projection::Reproject`]); everything
//! else is deterministic geometry.

pub mod algo;
pub mod error;
pub mod loading;
pub mod model;
pub mod output;
pub mod pipeline;
pub mod prelude;
pub mod projection;

pub use error::Error;
pub use loading::{AreaBoundary, NetworkSource, NetworkType, PipelineConfig};
pub use model::{Block, CleanedNetwork, ProjectedNetwork, RoadEdge, RoadId, SamplePoint};
pub use pipeline::{AreaArtifacts, AreaOutput, AreaReport, BatchEntry, run_area, run_batch};
pub use projection::{AreaProjection, Reproject};
