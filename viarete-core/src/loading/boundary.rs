//! Administrative boundary loading and normalization

use std::path::Path;

use geo::{Geometry, MultiPolygon, Polygon};
use geojson::GeoJson;

use crate::Error;

/// Administrative area boundary in geographic coordinates (WGS84
/// lon/lat degrees), exploded into simple polygons.
#[derive(Debug, Clone)]
pub struct AreaBoundary {
    pub name: String,
    polygons: Vec<Polygon<f64>>,
}

impl AreaBoundary {
    pub fn new(name: impl Into<String>, polygons: Vec<Polygon<f64>>) -> Result<Self, Error> {
        let polygons: Vec<Polygon<f64>> = polygons
            .into_iter()
            .filter(|p| p.exterior().0.len() >= 4)
            .collect();
        if polygons.is_empty() {
            return Err(Error::EmptyBoundary);
        }
        for polygon in &polygons {
            ensure_geographic(polygon)?;
        }
        Ok(Self {
            name: name.into(),
            polygons,
        })
    }

    /// Parses a GeoJSON document, collecting every polygon it contains.
    /// Multi-polygons are exploded into their parts.
    pub fn from_geojson_str(name: impl Into<String>, raw: &str) -> Result<Self, Error> {
        let geojson: GeoJson = raw.parse::<GeoJson>()?;
        let mut polygons = Vec::new();
        collect_polygons(&geojson, &mut polygons)?;
        Self::new(name, polygons)
    }

    /// Reads a boundary file; the area name is the file stem.
    pub fn from_geojson_file(path: &Path) -> Result<Self, Error> {
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .ok_or_else(|| Error::InvalidData(format!("not a file path: {}", path.display())))?;
        let raw = std::fs::read_to_string(path)?;
        Self::from_geojson_str(name, &raw)
    }

    pub fn polygons(&self) -> &[Polygon<f64>] {
        &self.polygons
    }

    /// All parts combined into one multi-polygon.
    pub fn multi_polygon(&self) -> MultiPolygon<f64> {
        MultiPolygon::new(self.polygons.clone())
    }
}

fn collect_polygons(geojson: &GeoJson, out: &mut Vec<Polygon<f64>>) -> Result<(), Error> {
    match geojson {
        GeoJson::FeatureCollection(fc) => {
            for feature in &fc.features {
                if let Some(geometry) = &feature.geometry {
                    collect_from_geometry(geometry, out)?;
                }
            }
        }
        GeoJson::Feature(feature) => {
            if let Some(geometry) = &feature.geometry {
                collect_from_geometry(geometry, out)?;
            }
        }
        GeoJson::Geometry(geometry) => collect_from_geometry(geometry, out)?,
    }
    Ok(())
}

fn collect_from_geometry(
    geometry: &geojson::Geometry,
    out: &mut Vec<Polygon<f64>>,
) -> Result<(), Error> {
    let geometry: Geometry<f64> = Geometry::try_from(&geometry.value)?;
    collect_from_geo(geometry, out);
    Ok(())
}

fn collect_from_geo(geometry: Geometry<f64>, out: &mut Vec<Polygon<f64>>) {
    match geometry {
        Geometry::Polygon(p) => out.push(p),
        Geometry::MultiPolygon(mp) => out.extend(mp.0),
        Geometry::GeometryCollection(gc) => {
            for g in gc.0 {
                collect_from_geo(g, out);
            }
        }
        other => {
            log::debug!("ignoring non-polygon boundary geometry: {other:?}");
        }
    }
}

/// The pipeline expects boundaries in lon/lat degrees; projected input
/// here would silently produce garbage corridors later.
fn ensure_geographic(polygon: &Polygon<f64>) -> Result<(), Error> {
    let in_range = polygon
        .exterior()
        .0
        .iter()
        .chain(polygon.interiors().iter().flat_map(|r| r.0.iter()))
        .all(|c| c.x.is_finite() && c.y.is_finite() && c.x.abs() <= 180.0 && c.y.abs() <= 90.0);
    if in_range {
        Ok(())
    } else {
        Err(Error::InvalidData(
            "boundary coordinates are not geographic lon/lat degrees".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SQUARE: &str = r#"{
        "type": "FeatureCollection",
        "features": [{
            "type": "Feature",
            "properties": {"name": "test"},
            "geometry": {
                "type": "Polygon",
                "coordinates": [[[116.0, 39.0], [116.1, 39.0], [116.1, 39.1], [116.0, 39.1], [116.0, 39.0]]]
            }
        }]
    }"#;

    #[test]
    fn parses_feature_collection() {
        let boundary = AreaBoundary::from_geojson_str("dongcheng", SQUARE).unwrap();
        assert_eq!(boundary.name, "dongcheng");
        assert_eq!(boundary.polygons().len(), 1);
    }

    #[test]
    fn explodes_multi_polygon() {
        let raw = r#"{
            "type": "MultiPolygon",
            "coordinates": [
                [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]]],
                [[[2.0, 2.0], [3.0, 2.0], [3.0, 3.0], [2.0, 2.0]]]
            ]
        }"#;
        let boundary = AreaBoundary::from_geojson_str("two", raw).unwrap();
        assert_eq!(boundary.polygons().len(), 2);
        assert_eq!(boundary.multi_polygon().0.len(), 2);
    }

    #[test]
    fn rejects_empty_and_projected_input() {
        assert!(matches!(
            AreaBoundary::from_geojson_str("empty", r#"{"type": "FeatureCollection", "features": []}"#),
            Err(Error::EmptyBoundary)
        ));

        let projected = r#"{
            "type": "Polygon",
            "coordinates": [[[440000.0, 4420000.0], [441000.0, 4420000.0], [441000.0, 4421000.0], [440000.0, 4420000.0]]]
        }"#;
        assert!(matches!(
            AreaBoundary::from_geojson_str("utm", projected),
            Err(Error::InvalidData(_))
        ));
    }
}
