//! Data model for road-network skeleton extraction
//!
//! Contains types for the projected street network, the cleaned
//! topology and the derived sampling artifacts.

pub mod components;
pub mod network;

pub use components::{Block, RoadEdge, RoadId, SamplePoint};
pub use network::{CleanedNetwork, ProjectedNetwork};
