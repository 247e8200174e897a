//! Merging of per-sub-polygon street graphs

use log::info;

use crate::model::{ProjectedNetwork, RoadEdge};
use crate::Error;

/// Combines the edge sets of all acquired sub-polygon networks and
/// drops edges shorter than `min_edge_length`.
///
/// # Errors
///
/// Returns [`Error::NoNetworkData`] when `networks` is empty, i.e.
/// every sub-polygon acquisition failed; the caller is expected to skip
/// the area and carry on with the batch.
pub fn merge_networks(
    networks: Vec<ProjectedNetwork>,
    min_edge_length: f64,
) -> Result<ProjectedNetwork, Error> {
    if networks.is_empty() {
        return Err(Error::NoNetworkData);
    }
    let parts = networks.len();
    let total: usize = networks.iter().map(ProjectedNetwork::len).sum();

    let edges: Vec<RoadEdge> = networks
        .into_iter()
        .flat_map(|n| n.edges)
        .filter(|e| e.length >= min_edge_length)
        .collect();

    info!(
        "merged {parts} sub-polygon networks: {total} edges, {} after the short-edge filter",
        edges.len()
    );
    Ok(ProjectedNetwork::new(edges))
}
