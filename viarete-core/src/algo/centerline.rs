//! Medial-axis centerline extraction
//!
//! Approximates the skeleton of each corridor polygon component from
//! the Voronoi diagram of its densified boundary: every pair of
//! adjacent Delaunay faces whose circumcenters both lie strictly inside
//! the component contributes one skeleton segment. Boundary vertex
//! spacing bounds the skeleton complexity.

use geo::{Area, Contains, LineString, MultiPolygon, Point, Polygon, Validation};
use log::warn;
use spade::{DelaunayTriangulation, Point2, Triangulation};

use super::planar::coord_distance;

/// Extracts centerlines for every corridor component. Components that
/// are degenerate or fail triangulation are skipped, never fatal;
/// returns the skeleton segments and the skipped-component count.
pub fn extract_centerlines(
    corridor: &MultiPolygon<f64>,
    interp_dist: f64,
) -> (Vec<LineString<f64>>, usize) {
    let mut lines = Vec::new();
    let mut skipped = 0;

    for (index, component) in corridor.0.iter().enumerate() {
        match component_centerline(component, interp_dist) {
            Some(mut segments) if !segments.is_empty() => lines.append(&mut segments),
            _ => {
                warn!("centerline extraction failed for corridor component {index}, skipping");
                skipped += 1;
            }
        }
    }
    (lines, skipped)
}

fn component_centerline(polygon: &Polygon<f64>, interp_dist: f64) -> Option<Vec<LineString<f64>>> {
    if polygon.exterior().0.len() < 4 || polygon.unsigned_area() <= 0.0 || !polygon.is_valid() {
        return None;
    }

    let mut triangulation: DelaunayTriangulation<Point2<f64>> = DelaunayTriangulation::new();
    for ring in std::iter::once(polygon.exterior()).chain(polygon.interiors()) {
        for point in densify_ring(ring, interp_dist) {
            triangulation.insert(point).ok()?;
        }
    }
    if triangulation.num_vertices() < 3 {
        return None;
    }

    let mut segments = Vec::new();
    for edge in triangulation.undirected_edges() {
        let directed = edge.as_directed();
        let (Some(face_a), Some(face_b)) =
            (directed.face().as_inner(), directed.rev().face().as_inner())
        else {
            continue;
        };
        let [a0, a1, a2] = face_a.vertices();
        let [b0, b1, b2] = face_b.vertices();
        let (Some(a), Some(b)) = (
            circumcenter(a0.position(), a1.position(), a2.position()),
            circumcenter(b0.position(), b1.position(), b2.position()),
        ) else {
            continue;
        };
        if a == b {
            continue;
        }
        if polygon.contains(&Point::from(a)) && polygon.contains(&Point::from(b)) {
            segments.push(LineString::new(vec![a, b]));
        }
    }
    Some(segments)
}

/// Ring boundary resampled so consecutive vertices are at most
/// `interp_dist` apart.
fn densify_ring(ring: &LineString<f64>, interp_dist: f64) -> Vec<Point2<f64>> {
    let mut points = Vec::new();
    for segment in ring.lines() {
        let length = coord_distance(segment.start, segment.end);
        if !length.is_finite() || length == 0.0 {
            continue;
        }
        let pieces = (length / interp_dist).ceil().max(1.0) as usize;
        for i in 0..pieces {
            let t = i as f64 / pieces as f64;
            points.push(Point2::new(
                segment.start.x + t * (segment.end.x - segment.start.x),
                segment.start.y + t * (segment.end.y - segment.start.y),
            ));
        }
    }
    points
}

/// Circumcenter of a triangle; `None` for (nearly) collinear vertices.
fn circumcenter(a: Point2<f64>, b: Point2<f64>, c: Point2<f64>) -> Option<geo::Coord<f64>> {
    let d = 2.0 * (a.x * (b.y - c.y) + b.x * (c.y - a.y) + c.x * (a.y - b.y));
    if d.abs() < 1e-12 {
        return None;
    }
    let a_sq = a.x * a.x + a.y * a.y;
    let b_sq = b.x * b.x + b.y * b.y;
    let c_sq = c.x * c.x + c.y * c.y;
    let x = (a_sq * (b.y - c.y) + b_sq * (c.y - a.y) + c_sq * (a.y - b.y)) / d;
    let y = (a_sq * (c.x - b.x) + b_sq * (a.x - c.x) + c_sq * (b.x - a.x)) / d;
    Some(geo::Coord { x, y })
}
