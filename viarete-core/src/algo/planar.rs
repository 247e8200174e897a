//! Planar line arrangement
//!
//! Turns an arbitrary pile of line strings into a noded planar graph:
//! segments are split at every mutual intersection and endpoints are
//! snapped to a fixed sub-meter grid, so geometrically coincident
//! endpoints become one node even when their coordinates differ by
//! floating-point noise.

use geo::algorithm::line_intersection::{LineIntersection, line_intersection};
use geo::{Coord, Distance, Euclidean, Line, LineString, Point};
use hashbrown::{HashMap, HashSet};
use itertools::Itertools;
use petgraph::stable_graph::{EdgeIndex, NodeIndex, StableUnGraph};
use petgraph::visit::EdgeRef;
use rstar::primitives::{GeomWithData, Rectangle};
use rstar::{AABB, RTree};

/// Cut parameters closer than this to a segment end are ignored.
const PARAM_EPS: f64 = 1e-9;

type GridKey = (i64, i64);
type IndexedRect = GeomWithData<Rectangle<[f64; 2]>, usize>;

/// One arc of the arrangement: a polyline running between two nodes.
#[derive(Debug, Clone)]
pub struct PlanarEdge {
    pub line: LineString<f64>,
    pub length: f64,
}

/// Undirected planar graph with nodes keyed by snapped coordinates.
pub struct PlanarGraph {
    pub(crate) graph: StableUnGraph<Coord<f64>, PlanarEdge>,
    nodes: HashMap<GridKey, NodeIndex>,
    snap: f64,
}

impl PlanarGraph {
    /// Builds the arrangement from raw lines: snap vertices, split all
    /// segments at mutual intersections, drop exact duplicates.
    pub fn from_lines(lines: &[LineString<f64>], snap: f64) -> Self {
        let segments = collect_segments(lines, snap);
        let cuts = find_intersections(&segments, snap);

        let mut planar = Self {
            graph: StableUnGraph::default(),
            nodes: HashMap::new(),
            snap,
        };

        let mut seen: HashSet<(GridKey, GridKey)> = HashSet::new();
        for (segment, mut segment_cuts) in segments.into_iter().zip(cuts) {
            segment_cuts.sort_by(|a, b| a.0.total_cmp(&b.0));
            let mut points = Vec::with_capacity(segment_cuts.len() + 2);
            points.push(segment.start);
            for (_, p) in segment_cuts {
                points.push(p);
            }
            points.push(segment.end);

            for (a, b) in points.into_iter().tuple_windows() {
                planar.insert_segment(a, b, &mut seen);
            }
        }
        planar
    }

    fn insert_segment(&mut self, a: Coord<f64>, b: Coord<f64>, seen: &mut HashSet<(GridKey, GridKey)>) {
        let ka = self.key(a);
        let kb = self.key(b);
        if ka == kb {
            return;
        }
        let pair = if ka <= kb { (ka, kb) } else { (kb, ka) };
        if !seen.insert(pair) {
            return;
        }
        let na = self.node_at(ka, a);
        let nb = self.node_at(kb, b);
        let length = coord_distance(a, b);
        self.graph.add_edge(
            na,
            nb,
            PlanarEdge {
                line: LineString::new(vec![a, b]),
                length,
            },
        );
    }

    fn key(&self, c: Coord<f64>) -> GridKey {
        grid_key(c, self.snap)
    }

    fn node_at(&mut self, key: GridKey, c: Coord<f64>) -> NodeIndex {
        *self.nodes.entry(key).or_insert_with(|| self.graph.add_node(c))
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Count of edge-endpoints incident to the node; a self-loop
    /// contributes two.
    pub fn degree(&self, node: NodeIndex) -> usize {
        self.graph
            .edges(node)
            .map(|e| if e.source() == e.target() { 2 } else { 1 })
            .sum()
    }

    /// Edge polyline oriented so that it starts at `from`.
    pub(crate) fn oriented_line(&self, edge: EdgeIndex, from: NodeIndex) -> LineString<f64> {
        let (source, _) = self.graph.edge_endpoints(edge).expect("edge exists");
        let line = &self.graph[edge].line;
        if source == from {
            line.clone()
        } else {
            let mut reversed = line.clone();
            reversed.0.reverse();
            reversed
        }
    }

    /// Remaining arcs in deterministic (insertion) order.
    pub fn lines(&self) -> Vec<LineString<f64>> {
        self.graph
            .edge_indices()
            .map(|e| self.graph[e].line.clone())
            .collect()
    }
}

fn grid_key(c: Coord<f64>, snap: f64) -> GridKey {
    ((c.x / snap).round() as i64, (c.y / snap).round() as i64)
}

fn snap_coord(c: Coord<f64>, snap: f64) -> Coord<f64> {
    Coord {
        x: (c.x / snap).round() * snap,
        y: (c.y / snap).round() * snap,
    }
}

pub(crate) fn coord_distance(a: Coord<f64>, b: Coord<f64>) -> f64 {
    Euclidean.distance(Point::from(a), Point::from(b))
}

/// Snaps vertices and explodes every line into simple segments,
/// dropping degenerate ones.
fn collect_segments(lines: &[LineString<f64>], snap: f64) -> Vec<Line<f64>> {
    let mut segments = Vec::new();
    for line in lines {
        let coords = line
            .0
            .iter()
            .filter(|c| c.x.is_finite() && c.y.is_finite())
            .map(|&c| snap_coord(c, snap))
            .dedup()
            .collect::<Vec<_>>();
        for (a, b) in coords.into_iter().tuple_windows() {
            segments.push(Line::new(a, b));
        }
    }
    segments
}

/// Finds all pairwise intersections; returns per-segment cut points as
/// `(parameter, snapped coordinate)` pairs. The coordinate is computed
/// once per crossing so both segments split at the identical node.
fn find_intersections(segments: &[Line<f64>], snap: f64) -> Vec<Vec<(f64, Coord<f64>)>> {
    let mut cuts: Vec<Vec<(f64, Coord<f64>)>> = vec![Vec::new(); segments.len()];
    let tree = RTree::bulk_load(
        segments
            .iter()
            .enumerate()
            .map(|(i, s)| IndexedRect::new(segment_rect(s), i))
            .collect(),
    );

    for (i, segment) in segments.iter().enumerate() {
        for candidate in tree.locate_in_envelope_intersecting(&segment_envelope(segment)) {
            let j = candidate.data;
            if j <= i {
                continue;
            }
            match line_intersection(*segment, segments[j]) {
                Some(LineIntersection::SinglePoint { intersection, .. }) => {
                    let snapped = snap_coord(intersection, snap);
                    push_cut(&mut cuts[i], segment, snapped);
                    push_cut(&mut cuts[j], &segments[j], snapped);
                }
                Some(LineIntersection::Collinear { intersection }) => {
                    for p in [intersection.start, intersection.end] {
                        let snapped = snap_coord(p, snap);
                        push_cut(&mut cuts[i], segment, snapped);
                        push_cut(&mut cuts[j], &segments[j], snapped);
                    }
                }
                None => {}
            }
        }
    }
    cuts
}

fn push_cut(cuts: &mut Vec<(f64, Coord<f64>)>, segment: &Line<f64>, p: Coord<f64>) {
    let t = segment_param(segment, p);
    if t > PARAM_EPS && t < 1.0 - PARAM_EPS {
        cuts.push((t, p));
    }
}

fn segment_param(segment: &Line<f64>, p: Coord<f64>) -> f64 {
    let d = segment.end - segment.start;
    let len_sq = d.x * d.x + d.y * d.y;
    if len_sq == 0.0 {
        return 0.0;
    }
    let v = p - segment.start;
    (v.x * d.x + v.y * d.y) / len_sq
}

fn segment_rect(s: &Line<f64>) -> Rectangle<[f64; 2]> {
    Rectangle::from_corners(
        [s.start.x.min(s.end.x), s.start.y.min(s.end.y)],
        [s.start.x.max(s.end.x), s.start.y.max(s.end.y)],
    )
}

fn segment_envelope(s: &Line<f64>) -> AABB<[f64; 2]> {
    AABB::from_corners(
        [s.start.x.min(s.end.x), s.start.y.min(s.end.y)],
        [s.start.x.max(s.end.x), s.start.y.max(s.end.y)],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::line_string;

    const SNAP: f64 = 0.05;

    #[test]
    fn crossing_segments_are_noded() {
        let lines = vec![
            line_string![(x: -10.0, y: 0.0), (x: 10.0, y: 0.0)],
            line_string![(x: 0.0, y: -10.0), (x: 0.0, y: 10.0)],
        ];
        let g = PlanarGraph::from_lines(&lines, SNAP);
        // 4 arms around the shared crossing node
        assert_eq!(g.node_count(), 5);
        assert_eq!(g.edge_count(), 4);
        let crossing = g.nodes[&(0, 0)];
        assert_eq!(g.degree(crossing), 4);
    }

    #[test]
    fn near_coincident_endpoints_become_one_node() {
        let lines = vec![
            line_string![(x: 0.0, y: 0.0), (x: 100.0, y: 0.0)],
            line_string![(x: 100.004, y: 0.004), (x: 200.0, y: 0.0)],
        ];
        let g = PlanarGraph::from_lines(&lines, SNAP);
        assert_eq!(g.node_count(), 3);
        assert_eq!(g.edge_count(), 2);
    }

    #[test]
    fn duplicate_segments_collapse() {
        let lines = vec![
            line_string![(x: 0.0, y: 0.0), (x: 50.0, y: 0.0)],
            line_string![(x: 0.0, y: 0.0), (x: 50.0, y: 0.0)],
        ];
        let g = PlanarGraph::from_lines(&lines, SNAP);
        assert_eq!(g.edge_count(), 1);
    }

    #[test]
    fn collinear_overlap_is_split_at_overlap_ends() {
        let lines = vec![
            line_string![(x: 0.0, y: 0.0), (x: 100.0, y: 0.0)],
            line_string![(x: 50.0, y: 0.0), (x: 150.0, y: 0.0)],
        ];
        let g = PlanarGraph::from_lines(&lines, SNAP);
        // 0-50, 50-100 (shared), 100-150
        assert_eq!(g.edge_count(), 3);
        assert_eq!(g.node_count(), 4);
    }
}
