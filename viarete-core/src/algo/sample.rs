//! Equidistant sampling along the cleaned network
//!
//! Walks every cleaned line at a fixed interval and reprojects the
//! points to geographic coordinates in one bulk call. Point positions
//! are a pure function of the line geometry, the step and the length;
//! distances are computed multiplicatively so no float error
//! accumulates along a line.

use geo::{Coord, Euclidean, Length, LineInterpolatePoint};
use log::warn;

use crate::model::{CleanedNetwork, RoadId, SamplePoint};
use crate::projection::Reproject;
use crate::Error;

/// Generates sample points at distances `{0, S, 2S, …}` strictly below
/// each line's length, with ids sequential across the whole run.
pub fn sample_network(
    network: &CleanedNetwork,
    step: f64,
    reproject: &dyn Reproject,
) -> Result<Vec<SamplePoint>, Error> {
    let mut metric: Vec<Coord<f64>> = Vec::new();
    let mut provenance: Vec<(RoadId, usize, f64)> = Vec::new();

    for (road_id, line) in network.iter() {
        let length = Euclidean.length(line);
        if !length.is_finite() || length <= 0.0 {
            continue;
        }
        let mut seq = 0;
        loop {
            let distance = seq as f64 * step;
            if distance >= length {
                break;
            }
            match line.line_interpolate_point(distance / length) {
                Some(point) => {
                    metric.push(point.into());
                    provenance.push((road_id, seq, distance));
                }
                None => warn!("interpolation failed on road {road_id} at {distance} m"),
            }
            seq += 1;
        }
    }

    let geographic = reproject.to_geographic(&metric)?;
    Ok(provenance
        .into_iter()
        .zip(geographic)
        .enumerate()
        .map(|(id, ((road_id, seq, distance), c))| SamplePoint {
            id,
            road_id,
            seq,
            distance,
            longitude: round6(c.x),
            latitude: round6(c.y),
        })
        .collect())
}

fn round6(v: f64) -> f64 {
    (v * 1e6).round() / 1e6
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::line_string;

    /// Metric passthrough, for tests that reason in meters.
    struct Identity;

    impl Reproject for Identity {
        fn to_metric(&self, coords: &[Coord<f64>]) -> Result<Vec<Coord<f64>>, Error> {
            Ok(coords.to_vec())
        }
        fn to_geographic(&self, coords: &[Coord<f64>]) -> Result<Vec<Coord<f64>>, Error> {
            Ok(coords.to_vec())
        }
    }

    #[test]
    fn count_law_for_non_multiple_length() {
        let network = CleanedNetwork::new(vec![
            line_string![(x: 0.0, y: 0.0), (x: 237.0, y: 0.0)],
        ]);
        let points = sample_network(&network, 50.0, &Identity).unwrap();
        assert_eq!(points.len(), 5);
        let distances: Vec<f64> = points.iter().map(|p| p.distance).collect();
        assert_eq!(distances, vec![0.0, 50.0, 100.0, 150.0, 200.0]);
    }

    #[test]
    fn count_law_for_exact_multiple_length() {
        let network = CleanedNetwork::new(vec![
            line_string![(x: 0.0, y: 0.0), (x: 1000.0, y: 0.0)],
        ]);
        let points = sample_network(&network, 50.0, &Identity).unwrap();
        // the line end itself is excluded
        assert_eq!(points.len(), 20);
        assert_eq!(points.last().unwrap().distance, 950.0);
    }

    #[test]
    fn ids_are_global_and_sequences_per_line() {
        let network = CleanedNetwork::new(vec![
            line_string![(x: 0.0, y: 0.0), (x: 120.0, y: 0.0)],
            line_string![(x: 0.0, y: 100.0), (x: 80.0, y: 100.0)],
        ]);
        let points = sample_network(&network, 50.0, &Identity).unwrap();
        assert_eq!(points.len(), 5);
        assert_eq!(
            points.iter().map(|p| p.id).collect::<Vec<_>>(),
            vec![0, 1, 2, 3, 4]
        );
        assert_eq!(
            points.iter().map(|p| (p.road_id, p.seq)).collect::<Vec<_>>(),
            vec![(0, 0), (0, 1), (0, 2), (1, 0), (1, 1)]
        );
    }

    #[test]
    fn sampling_is_deterministic() {
        let network = CleanedNetwork::new(vec![
            line_string![(x: 3.7, y: -2.1), (x: 410.3, y: 96.4), (x: 777.0, y: 0.2)],
        ]);
        let a = sample_network(&network, 37.5, &Identity).unwrap();
        let b = sample_network(&network, 37.5, &Identity).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn coordinates_are_rounded_to_six_decimals() {
        let network = CleanedNetwork::new(vec![
            line_string![(x: 0.123456789, y: 0.987654321), (x: 100.0, y: 100.0)],
        ]);
        let points = sample_network(&network, 500.0, &Identity).unwrap();
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].longitude, 0.123457);
        assert_eq!(points[0].latitude, 0.987654);
    }
}
