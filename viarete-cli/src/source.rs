//! File-backed network source
//!
//! Reads pre-extracted street edges (GeoJSON line features, geographic
//! frame) from a directory once, then serves every polygon request by
//! clipping against the loaded edge set. Stands in for a live map-data
//! acquirer; the files are assumed to be pre-filtered by network type.

use std::path::Path;

use geo::{Euclidean, Geometry, Intersects, Length, LineString, Polygon};
use geojson::GeoJson;
use tracing::{debug, info};
use viarete_core::prelude::*;

pub struct GeoJsonNetworkSource {
    lines: Vec<LineString<f64>>,
}

impl GeoJsonNetworkSource {
    /// Loads every `*.geojson` / `*.json` file under `dir`.
    pub fn from_dir(dir: &Path) -> Result<Self, Error> {
        let mut paths: Vec<_> = std::fs::read_dir(dir)?
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| {
                matches!(
                    path.extension().and_then(|e| e.to_str()),
                    Some("geojson") | Some("json")
                )
            })
            .collect();
        paths.sort();

        let mut lines = Vec::new();
        for path in &paths {
            let raw = std::fs::read_to_string(path)?;
            let geojson: GeoJson = raw
                .parse::<GeoJson>()
                .map_err(|e| Error::InvalidData(format!("{}: {e}", path.display())))?;
            collect_lines(&geojson, &mut lines)?;
        }
        info!(
            "loaded {} network lines from {} files in {}",
            lines.len(),
            paths.len(),
            dir.display()
        );
        Ok(Self { lines })
    }
}

fn collect_lines(geojson: &GeoJson, out: &mut Vec<LineString<f64>>) -> Result<(), Error> {
    let geometries: Vec<&geojson::Geometry> = match geojson {
        GeoJson::FeatureCollection(fc) => {
            fc.features.iter().filter_map(|f| f.geometry.as_ref()).collect()
        }
        GeoJson::Feature(f) => f.geometry.iter().collect(),
        GeoJson::Geometry(g) => vec![g],
    };
    for geometry in geometries {
        let geometry: Geometry<f64> = Geometry::try_from(&geometry.value)
            .map_err(|e| Error::InvalidData(format!("network geometry: {e}")))?;
        push_lines(geometry, out);
    }
    Ok(())
}

fn push_lines(geometry: Geometry<f64>, out: &mut Vec<LineString<f64>>) {
    match geometry {
        Geometry::LineString(line) => out.push(line),
        Geometry::MultiLineString(lines) => out.extend(lines.0),
        Geometry::GeometryCollection(gc) => {
            for g in gc.0 {
                push_lines(g, out);
            }
        }
        other => debug!("ignoring non-line network geometry: {other:?}"),
    }
}

impl NetworkSource for GeoJsonNetworkSource {
    fn acquire(
        &self,
        polygon: &Polygon<f64>,
        _network_type: NetworkType,
        reproject: &dyn Reproject,
    ) -> Result<Option<ProjectedNetwork>, Error> {
        let mut edges = Vec::new();
        for line in &self.lines {
            if !polygon.intersects(line) {
                continue;
            }
            let metric = LineString::new(reproject.to_metric(&line.0)?);
            let length = Euclidean.length(&metric);
            edges.push(RoadEdge::new(metric, length));
        }
        if edges.is_empty() {
            Ok(None)
        } else {
            Ok(Some(ProjectedNetwork::new(edges)))
        }
    }
}
