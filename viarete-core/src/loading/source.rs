//! Seam to the external street-network supplier

use geo::Polygon;
use serde::Deserialize;

use crate::projection::Reproject;
use crate::{Error, ProjectedNetwork};

/// Street-network filter, mirroring the usual presets of map data
/// extractors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkType {
    #[default]
    All,
    Drive,
    Walk,
    Bike,
}

/// External street-network supplier.
///
/// Implementations download or read the graph covering one boundary
/// polygon (geographic frame) and hand it back already projected to the
/// metric frame via `reproject`. They apply their own timeout and retry
/// policy; the pipeline treats every error as opaque, logs it and skips
/// the sub-polygon.
pub trait NetworkSource {
    /// Returns `Ok(None)` when the source holds no edges inside `polygon`.
    fn acquire(
        &self,
        polygon: &Polygon<f64>,
        network_type: NetworkType,
        reproject: &dyn Reproject,
    ) -> Result<Option<ProjectedNetwork>, Error>;
}
