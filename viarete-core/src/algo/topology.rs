//! Two-phase topology cleaning
//!
//! Phase 1 merges pseudo-nodes (degree-2 vertices that only exist
//! because of how the source lines were segmented) so that the
//! remaining nodes are true junctions or endpoints. Phase 2 prunes
//! short dangling lines with a worklist until a fixed point.
//!
//! Removal in phase 2 is gated by length, not degree: genuinely short
//! stubs are extraction noise and disappear, while long dead-end spurs
//! keep their degree-1 endpoint and survive indefinitely.

use std::collections::VecDeque;

use geo::LineString;
use log::{debug, warn};
use petgraph::stable_graph::{EdgeIndex, NodeIndex};
use petgraph::visit::EdgeRef;

use super::planar::{PlanarEdge, PlanarGraph};
use crate::model::CleanedNetwork;

/// Cleans a centerline arrangement into the final road skeleton.
pub fn clean_topology(
    lines: &[LineString<f64>],
    snap: f64,
    dangling_min_length: f64,
) -> CleanedNetwork {
    let mut graph = PlanarGraph::from_lines(lines, snap);
    merge_pseudo_nodes(&mut graph);
    let removed = prune_short_danglers(&mut graph, dangling_min_length);
    debug!(
        "topology cleaning: {removed} dangling edges pruned, {} lines remain",
        graph.edge_count()
    );
    CleanedNetwork::new(graph.lines())
}

/// Phase 1: splice every pseudo-node. Idempotent.
pub fn merge_pseudo_nodes(graph: &mut PlanarGraph) {
    let nodes: Vec<NodeIndex> = graph.graph.node_indices().collect();
    for node in nodes {
        splice_if_pseudo(graph, node);
    }
}

fn splice_if_pseudo(g: &mut PlanarGraph, node: NodeIndex) {
    if !g.graph.contains_node(node) {
        return;
    }
    let incident: Vec<EdgeIndex> = g.graph.edges(node).map(|e| e.id()).collect();
    if incident.len() != 2 {
        return;
    }
    let (first, second) = (incident[0], incident[1]);
    let (Some((a1, b1)), Some((a2, b2))) =
        (g.graph.edge_endpoints(first), g.graph.edge_endpoints(second))
    else {
        return;
    };
    // a self-loop anchor is a real feature of the arrangement, not a
    // segmentation artifact
    if a1 == b1 || a2 == b2 {
        return;
    }

    let prev = if a1 == node { b1 } else { a1 };
    let next = if a2 == node { b2 } else { a2 };

    let mut coords = g.oriented_line(first, prev).0;
    let continuation = g.oriented_line(second, node).0;
    coords.extend(continuation.into_iter().skip(1));
    let length = g.graph[first].length + g.graph[second].length;

    g.graph.remove_edge(first);
    g.graph.remove_edge(second);
    g.graph.remove_node(node);
    g.graph.add_edge(
        prev,
        next,
        PlanarEdge {
            line: LineString::new(coords),
            length,
        },
    );
}

/// Phase 2: worklist pruning of short dangling lines.
///
/// Keeps explicit degree bookkeeping instead of rescanning the whole
/// edge set every pass; the removal count is hard-capped at the edge
/// count so a bookkeeping bug cannot loop forever.
pub fn prune_short_danglers(g: &mut PlanarGraph, min_length: f64) -> usize {
    let cap = g.graph.edge_count();
    let mut queue: VecDeque<NodeIndex> = g
        .graph
        .node_indices()
        .filter(|&n| g.degree(n) == 1)
        .collect();
    let mut removed = 0;

    while let Some(node) = queue.pop_front() {
        if removed >= cap {
            warn!("dangling prune reached the removal cap of {cap}, stopping");
            break;
        }
        if !g.graph.contains_node(node) || g.degree(node) != 1 {
            continue;
        }
        let Some(edge) = g.graph.edges(node).map(|e| e.id()).next() else {
            continue;
        };
        if g.graph[edge].length >= min_length {
            // long spur: dangling but intentional
            continue;
        }
        let Some((a, b)) = g.graph.edge_endpoints(edge) else {
            continue;
        };
        let other = if a == node { b } else { a };

        g.graph.remove_edge(edge);
        g.graph.remove_node(node);
        removed += 1;

        if other != node {
            match g.degree(other) {
                0 => {
                    g.graph.remove_node(other);
                }
                1 => queue.push_back(other),
                _ => {}
            }
        }
    }
    removed
}
