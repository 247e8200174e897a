//! Artifact writers
//!
//! Vector artifacts go out as GeoJSON feature collections, the sample
//! points as a UTF-8 comma-separated table with one header row.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use geo::{LineString, MultiPolygon};
use geojson::{Feature, FeatureCollection, Geometry, Value as GeoJsonValue};
use serde_json::json;

use crate::Error;
use crate::model::{Block, SamplePoint};

/// Road or centerline features with their ids.
pub fn lines_to_geojson(lines: &[LineString<f64>]) -> Result<FeatureCollection, Error> {
    let features = lines
        .iter()
        .enumerate()
        .map(|(id, line)| {
            let geometry = Geometry::new(GeoJsonValue::from(line));
            let value = json!({
                "type": "Feature",
                "geometry": geometry,
                "properties": { "id": id },
            });
            serde_json::from_value::<Feature>(value).map_err(|e| Error::GeoJsonError(e.to_string()))
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(FeatureCollection {
        features,
        bbox: None,
        foreign_members: None,
    })
}

/// The corridor as a single multi-polygon feature.
pub fn corridor_to_geojson(corridor: &MultiPolygon<f64>) -> Result<FeatureCollection, Error> {
    let geometry = Geometry::new(GeoJsonValue::from(corridor));
    let value = json!({
        "type": "Feature",
        "geometry": geometry,
        "properties": { "parts": corridor.0.len() },
    });
    let feature = serde_json::from_value::<Feature>(value).map_err(|e| Error::GeoJsonError(e.to_string()))?;
    Ok(FeatureCollection {
        features: vec![feature],
        bbox: None,
        foreign_members: None,
    })
}

/// Block faces with their enclosed areas.
pub fn blocks_to_geojson(blocks: &[Block]) -> Result<FeatureCollection, Error> {
    let features = blocks
        .iter()
        .enumerate()
        .map(|(id, block)| {
            let geometry = Geometry::new(GeoJsonValue::from(&block.geometry));
            let value = json!({
                "type": "Feature",
                "geometry": geometry,
                "properties": { "id": id, "area": block.area },
            });
            serde_json::from_value::<Feature>(value).map_err(|e| Error::GeoJsonError(e.to_string()))
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(FeatureCollection {
        features,
        bbox: None,
        foreign_members: None,
    })
}

pub fn write_geojson(path: &Path, collection: &FeatureCollection) -> Result<(), Error> {
    let file = File::create(path)?;
    serde_json::to_writer(file, collection).map_err(|e| Error::GeoJsonError(e.to_string()))
}

/// Writes the sample-point table: `ID,Area,Longitude,Latitude`.
pub fn write_sample_points_csv<W: Write>(
    writer: W,
    area: &str,
    points: &[SamplePoint],
) -> Result<(), Error> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(["ID", "Area", "Longitude", "Latitude"])?;
    for point in points {
        csv.write_record([
            point.id.to_string(),
            area.to_string(),
            point.longitude.to_string(),
            point.latitude.to_string(),
        ])?;
    }
    csv.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::line_string;

    #[test]
    fn csv_has_expected_header_and_rows() {
        let points = vec![
            SamplePoint {
                id: 0,
                road_id: 0,
                seq: 0,
                distance: 0.0,
                longitude: 116.404,
                latitude: 39.915,
            },
            SamplePoint {
                id: 1,
                road_id: 0,
                seq: 1,
                distance: 50.0,
                longitude: 116.404512,
                latitude: 39.915733,
            },
        ];
        let mut buffer = Vec::new();
        write_sample_points_csv(&mut buffer, "dongcheng", &points).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let mut rows = text.lines();
        assert_eq!(rows.next(), Some("ID,Area,Longitude,Latitude"));
        assert_eq!(rows.next(), Some("0,dongcheng,116.404,39.915"));
        assert_eq!(rows.next(), Some("1,dongcheng,116.404512,39.915733"));
        assert_eq!(rows.next(), None);
    }

    #[test]
    fn line_features_carry_ids() {
        let lines = vec![
            line_string![(x: 0.0, y: 0.0), (x: 1.0, y: 0.0)],
            line_string![(x: 0.0, y: 1.0), (x: 1.0, y: 1.0)],
        ];
        let collection = lines_to_geojson(&lines).unwrap();
        assert_eq!(collection.features.len(), 2);
        let id = collection.features[1]
            .properties
            .as_ref()
            .and_then(|p| p.get("id"))
            .and_then(|v| v.as_u64());
        assert_eq!(id, Some(1));
    }
}
