//! Road corridor construction
//!
//! Every edge is buffered into a rounded capsule per segment and the
//! capsules are unioned into one (possibly multi-part) corridor
//! polygon. Edges that cannot be repaired are skipped, never fatal.

use geo::orient::{Direction, Orient};
use geo::{BooleanOps, Coord, Line, LineString, MultiPolygon, Polygon, RemoveRepeatedPoints};
use log::warn;

use super::planar::coord_distance;
use crate::model::ProjectedNetwork;

/// Vertices used to approximate each semicircular capsule cap.
const CAP_ARC_SEGMENTS: usize = 16;

/// Buffers every edge by `distance` and unions the result. Returns the
/// corridor and the count of edges skipped after failed repair.
pub fn build_corridor(network: &ProjectedNetwork, distance: f64) -> (MultiPolygon<f64>, usize) {
    let mut capsules: Vec<MultiPolygon<f64>> = Vec::new();
    let mut skipped = 0;

    for (index, edge) in network.edges.iter().enumerate() {
        let Some(line) = repair(&edge.geometry) else {
            warn!("edge {index} has unrepairable geometry, skipping");
            skipped += 1;
            continue;
        };
        for segment in line.lines() {
            capsules.push(MultiPolygon::new(vec![capsule(&segment, distance)]));
        }
    }
    (union_all(capsules), skipped)
}

/// One-shot validity fix-up: drop repeated vertices, reject non-finite
/// coordinates and lines degenerated to a point.
fn repair(line: &LineString<f64>) -> Option<LineString<f64>> {
    let line = line.remove_repeated_points();
    if line.0.len() < 2 {
        return None;
    }
    if line.0.iter().any(|c| !c.x.is_finite() || !c.y.is_finite()) {
        return None;
    }
    Some(line)
}

/// Rounded rectangle around one segment: two offset sides plus
/// semicircular caps at both ends.
fn capsule(segment: &Line<f64>, radius: f64) -> Polygon<f64> {
    let length = coord_distance(segment.start, segment.end);
    let (a, b) = (segment.start, segment.end);
    let ux = (b.x - a.x) / length;
    let uy = (b.y - a.y) / length;
    // unit normal, left of travel direction
    let normal_angle = (uy).atan2(ux) + std::f64::consts::FRAC_PI_2;

    let mut ring: Vec<Coord<f64>> = Vec::with_capacity(2 * CAP_ARC_SEGMENTS + 3);
    let offset = |center: Coord<f64>, angle: f64| Coord {
        x: center.x + radius * angle.cos(),
        y: center.y + radius * angle.sin(),
    };

    ring.push(offset(a, normal_angle));
    ring.push(offset(b, normal_angle));
    // cap around the end point
    for i in 1..=CAP_ARC_SEGMENTS {
        let angle = normal_angle - std::f64::consts::PI * i as f64 / CAP_ARC_SEGMENTS as f64;
        ring.push(offset(b, angle));
    }
    ring.push(offset(a, normal_angle - std::f64::consts::PI));
    // cap around the start point
    for i in 1..=CAP_ARC_SEGMENTS {
        let angle =
            normal_angle - std::f64::consts::PI - std::f64::consts::PI * i as f64 / CAP_ARC_SEGMENTS as f64;
        ring.push(offset(a, angle));
    }

    Polygon::new(LineString::new(ring), Vec::new()).orient(Direction::Default)
}

/// Pairwise union tree; far cheaper than a left fold for many parts.
fn union_all(mut parts: Vec<MultiPolygon<f64>>) -> MultiPolygon<f64> {
    while parts.len() > 1 {
        let mut next = Vec::with_capacity(parts.len().div_ceil(2));
        let mut iter = parts.into_iter();
        while let Some(first) = iter.next() {
            match iter.next() {
                Some(second) => next.push(first.union(&second)),
                None => next.push(first),
            }
        }
        parts = next;
    }
    parts
        .into_iter()
        .next()
        .unwrap_or_else(|| MultiPolygon::new(Vec::new()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RoadEdge;
    use approx::assert_relative_eq;
    use geo::line_string;
    use geo::Area;

    #[test]
    fn straight_edge_yields_a_capsule_of_expected_area() {
        let network = ProjectedNetwork::new(vec![RoadEdge::new(
            line_string![(x: 0.0, y: 0.0), (x: 100.0, y: 0.0)],
            100.0,
        )]);
        let (corridor, skipped) = build_corridor(&network, 10.0);
        assert_eq!(skipped, 0);
        assert_eq!(corridor.0.len(), 1);
        // rectangle 100 x 20 plus a full circle of radius 10, modulo
        // the polygonal cap approximation
        assert_relative_eq!(
            corridor.unsigned_area(),
            2000.0 + std::f64::consts::PI * 100.0,
            max_relative = 1e-2
        );
    }

    #[test]
    fn crossing_edges_union_into_one_part() {
        let network = ProjectedNetwork::new(vec![
            RoadEdge::new(line_string![(x: -100.0, y: 0.0), (x: 100.0, y: 0.0)], 200.0),
            RoadEdge::new(line_string![(x: 0.0, y: -100.0), (x: 0.0, y: 100.0)], 200.0),
        ]);
        let (corridor, _) = build_corridor(&network, 10.0);
        assert_eq!(corridor.0.len(), 1);
    }

    #[test]
    fn distant_edges_stay_separate_parts() {
        let network = ProjectedNetwork::new(vec![
            RoadEdge::new(line_string![(x: 0.0, y: 0.0), (x: 100.0, y: 0.0)], 100.0),
            RoadEdge::new(line_string![(x: 0.0, y: 500.0), (x: 100.0, y: 500.0)], 100.0),
        ]);
        let (corridor, _) = build_corridor(&network, 10.0);
        assert_eq!(corridor.0.len(), 2);
    }

    #[test]
    fn unrepairable_edge_is_skipped() {
        let network = ProjectedNetwork::new(vec![
            RoadEdge::new(line_string![(x: f64::NAN, y: 0.0), (x: 100.0, y: 0.0)], 100.0),
            RoadEdge::new(line_string![(x: 5.0, y: 5.0), (x: 5.0, y: 5.0)], 0.0),
            RoadEdge::new(line_string![(x: 0.0, y: 50.0), (x: 100.0, y: 50.0)], 100.0),
        ]);
        let (corridor, skipped) = build_corridor(&network, 10.0);
        assert_eq!(skipped, 2);
        assert_eq!(corridor.0.len(), 1);
    }
}
