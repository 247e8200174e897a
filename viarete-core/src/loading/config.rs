use serde::Deserialize;

use super::NetworkType;
use crate::Error;

/// Tunable parameters of the extraction pipeline.
///
/// A value of this type is passed explicitly into the pipeline entry
/// points; there is no process-wide configuration state. Defaults match
/// the field-calibrated values used for 50 m street-view sampling.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Sampling interval along cleaned lines, meters.
    pub step_meters: f64,
    /// Acquired edges shorter than this are dropped while merging.
    pub min_edge_length: f64,
    /// Corridor radius buffered around every edge, meters.
    pub buffer_distance: f64,
    /// Boundary vertex spacing used when extracting the medial axis.
    pub centerline_interp_dist: f64,
    /// Dangling lines shorter than this are pruned; longer spurs survive.
    pub dangling_min_length: f64,
    /// Grid size used to snap endpoints into planar-graph nodes, meters.
    pub snap_tolerance: f64,
    /// Which edge classes the network source should return.
    pub network_type: NetworkType,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            step_meters: 50.0,
            min_edge_length: 50.0,
            buffer_distance: 50.0,
            centerline_interp_dist: 10.0,
            dangling_min_length: 50.0,
            snap_tolerance: 0.05,
            network_type: NetworkType::All,
        }
    }
}

impl PipelineConfig {
    pub fn validate(&self) -> Result<(), Error> {
        let positive = [
            ("step_meters", self.step_meters),
            ("min_edge_length", self.min_edge_length),
            ("buffer_distance", self.buffer_distance),
            ("centerline_interp_dist", self.centerline_interp_dist),
            ("dangling_min_length", self.dangling_min_length),
            ("snap_tolerance", self.snap_tolerance),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(Error::InvalidData(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }
        Ok(())
    }
}
