//! Block-face reconstruction from the cleaned network
//!
//! Rebuilds the planar arrangement of the cleaned lines and traces its
//! bounded faces by angular half-edge walking: the successor of an arc
//! is the clockwise-next outgoing arc after its reverse. Every directed
//! arc belongs to exactly one face, bounded faces come out
//! counter-clockwise, and the unbounded face comes out clockwise and is
//! discarded.
//!
//! Dangling arcs can never border a face and are stripped first,
//! whatever their length; faces with non-positive area or invalid rings
//! indicate structurally degenerate input and are dropped, not repaired.

use fixedbitset::FixedBitSet;
use geo::{Area, Coord, LineString, Polygon, Validation};
use hashbrown::HashMap;
use log::debug;
use petgraph::stable_graph::{EdgeIndex, NodeIndex};

use super::planar::PlanarGraph;
use super::topology::prune_short_danglers;
use crate::model::{Block, CleanedNetwork};

/// Faces below this area are numerical slivers, not blocks.
const MIN_BLOCK_AREA: f64 = 1e-6;

/// Reconstructs closed block polygons from the cleaned network.
pub fn polygonize(network: &CleanedNetwork, snap: f64) -> Vec<Block> {
    let mut graph = PlanarGraph::from_lines(&network.lines, snap);
    // with an infinite threshold every dangling chain is stripped
    prune_short_danglers(&mut graph, f64::INFINITY);
    let blocks = trace_faces(&graph);
    debug!("polygonized {} block faces", blocks.len());
    blocks
}

#[derive(Debug, Clone, Copy)]
struct Arc {
    edge: EdgeIndex,
    from: NodeIndex,
    to: NodeIndex,
}

/// The reverse arc lives next to its partner: `i ^ 1`.
fn build_arcs(graph: &PlanarGraph) -> Vec<Arc> {
    let mut arcs = Vec::with_capacity(graph.edge_count() * 2);
    for edge in graph.graph.edge_indices() {
        if let Some((a, b)) = graph.graph.edge_endpoints(edge) {
            arcs.push(Arc { edge, from: a, to: b });
            arcs.push(Arc { edge, from: b, to: a });
        }
    }
    arcs
}

fn trace_faces(graph: &PlanarGraph) -> Vec<Block> {
    let arcs = build_arcs(graph);
    if arcs.is_empty() {
        return Vec::new();
    }

    // outgoing arcs per node, ordered counter-clockwise by bearing
    let mut outgoing: HashMap<NodeIndex, Vec<usize>> = HashMap::new();
    for (i, arc) in arcs.iter().enumerate() {
        outgoing.entry(arc.from).or_default().push(i);
    }
    let bearings: Vec<f64> = arcs
        .iter()
        .map(|arc| {
            let line = graph.oriented_line(arc.edge, arc.from);
            let d = line.0[1] - line.0[0];
            d.y.atan2(d.x)
        })
        .collect();
    let mut position: HashMap<usize, usize> = HashMap::new();
    for list in outgoing.values_mut() {
        list.sort_by(|&a, &b| bearings[a].total_cmp(&bearings[b]));
        for (pos, &arc) in list.iter().enumerate() {
            position.insert(arc, pos);
        }
    }

    let successor = |arc_id: usize| -> usize {
        let reverse = arc_id ^ 1;
        let at_node = &outgoing[&arcs[reverse].from];
        let pos = position[&reverse];
        at_node[(pos + at_node.len() - 1) % at_node.len()]
    };

    let mut visited = FixedBitSet::with_capacity(arcs.len());
    let mut blocks = Vec::new();

    for start in 0..arcs.len() {
        if visited.contains(start) {
            continue;
        }
        let mut ring: Vec<Coord<f64>> = Vec::new();
        let mut current = start;
        loop {
            visited.insert(current);
            let arc = &arcs[current];
            let line = graph.oriented_line(arc.edge, arc.from);
            let skip = usize::from(!ring.is_empty());
            ring.extend(line.0.into_iter().skip(skip));

            current = successor(current);
            if current == start || visited.contains(current) {
                break;
            }
        }

        if ring.len() < 4 {
            continue;
        }
        if ring.first() != ring.last() {
            continue;
        }
        let polygon = Polygon::new(LineString::new(ring), Vec::new());
        let area = polygon.signed_area();
        if area <= MIN_BLOCK_AREA {
            // the unbounded outer face, or a sliver
            continue;
        }
        if !polygon.is_valid() {
            debug!("dropping self-intersecting block face");
            continue;
        }
        blocks.push(Block {
            geometry: polygon,
            area,
        });
    }
    blocks
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use geo::line_string;

    const SNAP: f64 = 0.05;

    fn square(side: f64) -> Vec<LineString<f64>> {
        vec![
            line_string![(x: 0.0, y: 0.0), (x: side, y: 0.0)],
            line_string![(x: side, y: 0.0), (x: side, y: side)],
            line_string![(x: side, y: side), (x: 0.0, y: side)],
            line_string![(x: 0.0, y: side), (x: 0.0, y: 0.0)],
        ]
    }

    #[test]
    fn one_square_loop_yields_one_block() {
        let network = CleanedNetwork::new(square(100.0));
        let blocks = polygonize(&network, SNAP);
        assert_eq!(blocks.len(), 1);
        assert_relative_eq!(blocks[0].area, 10_000.0, max_relative = 1e-9);
    }

    #[test]
    fn bisected_square_yields_two_blocks() {
        let mut lines = square(100.0);
        lines.push(line_string![(x: 50.0, y: 0.0), (x: 50.0, y: 100.0)]);
        let blocks = polygonize(&CleanedNetwork::new(lines), SNAP);
        assert_eq!(blocks.len(), 2);
        for block in &blocks {
            assert_relative_eq!(block.area, 5_000.0, max_relative = 1e-9);
        }
    }

    #[test]
    fn open_network_yields_no_blocks() {
        let lines = vec![
            line_string![(x: 0.0, y: 0.0), (x: 100.0, y: 0.0)],
            line_string![(x: 100.0, y: 0.0), (x: 100.0, y: 100.0)],
        ];
        assert!(polygonize(&CleanedNetwork::new(lines), SNAP).is_empty());
    }

    #[test]
    fn dangling_spur_does_not_break_faces() {
        let mut lines = square(100.0);
        // a long spur sticking out of the loop; survives cleaning but
        // must not corrupt polygonization
        lines.push(line_string![(x: 100.0, y: 50.0), (x: 180.0, y: 50.0)]);
        let blocks = polygonize(&CleanedNetwork::new(lines), SNAP);
        assert_eq!(blocks.len(), 1);
        assert_relative_eq!(blocks[0].area, 10_000.0, max_relative = 1e-9);
    }

    #[test]
    fn closed_ring_from_single_line_polygonizes() {
        // the shape a cleaned boundary ring takes after pseudo-node
        // merging: one closed line
        let ring = vec![line_string![
            (x: 0.0, y: 0.0), (x: 100.0, y: 0.0), (x: 100.0, y: 100.0),
            (x: 0.0, y: 100.0), (x: 0.0, y: 0.0)
        ]];
        let blocks = polygonize(&CleanedNetwork::new(ring), SNAP);
        assert_eq!(blocks.len(), 1);
        assert_relative_eq!(blocks[0].area, 10_000.0, max_relative = 1e-9);
    }
}
