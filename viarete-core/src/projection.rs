//! Geographic <-> metric frame conversion
//!
//! The pipeline never assumes a particular reprojection backend: every
//! conversion goes through the [`Reproject`] trait in bulk, so a remote
//! conversion API can stand in for the built-in local projection.

use geo::{Centroid, Coord, LineString, MultiPolygon, Polygon};

use crate::Error;

/// Mean Earth radius, meters (IUGG).
const EARTH_RADIUS_M: f64 = 6_371_008.8;

/// Bulk conversion service between geographic lon/lat degrees and the
/// metric projected frame used by the pipeline.
pub trait Reproject {
    /// Converts lon/lat degree coordinates into the metric frame.
    fn to_metric(&self, coords: &[Coord<f64>]) -> Result<Vec<Coord<f64>>, Error>;

    /// Inverse of [`Reproject::to_metric`].
    fn to_geographic(&self, coords: &[Coord<f64>]) -> Result<Vec<Coord<f64>>, Error>;
}

/// Local equirectangular projection centered on one area.
///
/// Near the projection origin distances are metric, and the inverse is
/// exact up to floating-point rounding. Good for city-sized areas;
/// anything continent-sized should bring its own [`Reproject`] backend.
#[derive(Debug, Clone, Copy)]
pub struct AreaProjection {
    origin: Coord<f64>,
    cos_lat: f64,
}

impl AreaProjection {
    pub fn new(origin: Coord<f64>) -> Result<Self, Error> {
        if !origin.x.is_finite() || !origin.y.is_finite() || origin.y.abs() > 85.0 {
            return Err(Error::InvalidData(format!(
                "projection origin out of range: ({}, {})",
                origin.x, origin.y
            )));
        }
        Ok(Self {
            origin,
            cos_lat: origin.y.to_radians().cos(),
        })
    }

    /// Projection centered on the centroid of the area boundary.
    pub fn centered_on(boundary: &MultiPolygon<f64>) -> Result<Self, Error> {
        let centroid = boundary.centroid().ok_or(Error::EmptyBoundary)?;
        Self::new(centroid.into())
    }

    fn forward(&self, c: Coord<f64>) -> Coord<f64> {
        Coord {
            x: (c.x - self.origin.x).to_radians() * EARTH_RADIUS_M * self.cos_lat,
            y: (c.y - self.origin.y).to_radians() * EARTH_RADIUS_M,
        }
    }

    fn inverse(&self, c: Coord<f64>) -> Coord<f64> {
        Coord {
            x: self.origin.x + (c.x / (EARTH_RADIUS_M * self.cos_lat)).to_degrees(),
            y: self.origin.y + (c.y / EARTH_RADIUS_M).to_degrees(),
        }
    }
}

impl Reproject for AreaProjection {
    fn to_metric(&self, coords: &[Coord<f64>]) -> Result<Vec<Coord<f64>>, Error> {
        Ok(coords.iter().map(|&c| self.forward(c)).collect())
    }

    fn to_geographic(&self, coords: &[Coord<f64>]) -> Result<Vec<Coord<f64>>, Error> {
        Ok(coords.iter().map(|&c| self.inverse(c)).collect())
    }
}

/// Maps a line string through the converter.
pub fn line_to_metric(
    reproject: &dyn Reproject,
    line: &LineString<f64>,
) -> Result<LineString<f64>, Error> {
    Ok(LineString::new(reproject.to_metric(&line.0)?))
}

/// Maps a polygon (exterior and interior rings) through the converter.
pub fn polygon_to_metric(
    reproject: &dyn Reproject,
    polygon: &Polygon<f64>,
) -> Result<Polygon<f64>, Error> {
    let exterior = LineString::new(reproject.to_metric(&polygon.exterior().0)?);
    let interiors = polygon
        .interiors()
        .iter()
        .map(|ring| Ok(LineString::new(reproject.to_metric(&ring.0)?)))
        .collect::<Result<Vec<_>, Error>>()?;
    Ok(Polygon::new(exterior, interiors))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use geo::coord;

    fn beijing() -> AreaProjection {
        AreaProjection::new(coord! { x: 116.4, y: 39.9 }).unwrap()
    }

    #[test]
    fn round_trip_is_exact_within_tolerance() {
        let proj = beijing();
        let metric = proj
            .to_metric(&[coord! { x: 116.41234, y: 39.91234 }])
            .unwrap();
        let back = proj.to_geographic(&metric).unwrap();
        assert_relative_eq!(back[0].x, 116.41234, max_relative = 1e-6);
        assert_relative_eq!(back[0].y, 39.91234, max_relative = 1e-6);

        // and metric -> geographic -> metric
        let metric_again = proj.to_metric(&back).unwrap();
        assert_relative_eq!(metric_again[0].x, metric[0].x, max_relative = 1e-6);
        assert_relative_eq!(metric_again[0].y, metric[0].y, max_relative = 1e-6);
    }

    #[test]
    fn northward_degree_is_about_111_km() {
        let proj = beijing();
        let metric = proj.to_metric(&[coord! { x: 116.4, y: 40.9 }]).unwrap();
        assert_relative_eq!(metric[0].y, 111_194.9, max_relative = 1e-3);
        assert_relative_eq!(metric[0].x, 0.0);
    }

    #[test]
    fn polar_origin_is_rejected() {
        assert!(AreaProjection::new(coord! { x: 0.0, y: 89.0 }).is_err());
    }
}
