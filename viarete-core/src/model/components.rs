//! Network components - edges, block faces and sample points

use geo::{LineString, Polygon};
use serde::Serialize;

/// Identifier of a road line within one area run.
pub type RoadId = usize;

/// Street segment in the projected metric frame.
#[derive(Debug, Clone)]
pub struct RoadEdge {
    /// Polyline geometry, meters.
    pub geometry: LineString<f64>,
    /// Length in meters.
    pub length: f64,
}

impl RoadEdge {
    pub fn new(geometry: LineString<f64>, length: f64) -> Self {
        Self { geometry, length }
    }
}

/// Closed block face reconstructed from the cleaned network.
#[derive(Debug, Clone)]
pub struct Block {
    /// Face ring in the projected metric frame.
    pub geometry: Polygon<f64>,
    /// Enclosed area in square meters.
    pub area: f64,
}

/// One equidistant sample along a cleaned road line.
///
/// Created once by the sampler and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SamplePoint {
    /// Sequential id, unique across the whole area run.
    pub id: usize,
    /// Source road line the point was interpolated on.
    pub road_id: RoadId,
    /// Zero-based index of the point within its road line.
    pub seq: usize,
    /// Distance from the line start, meters.
    pub distance: f64,
    /// Geographic longitude, rounded to 6 decimals.
    pub longitude: f64,
    /// Geographic latitude, rounded to 6 decimals.
    pub latitude: f64,
}
