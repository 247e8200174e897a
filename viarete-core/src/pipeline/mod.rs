//! Per-area pipeline orchestration and the parallel batch runner
//!
//! One area is a stateless unit of work: its stages run strictly in
//! sequence on one thread. Areas are independent, so the batch fans
//! them out with rayon, and any failure — error or panic — is caught
//! at the area boundary and recorded without touching the rest of the
//! batch.

mod report;

pub use report::{AreaReport, Stage, StageRecord};

use std::panic::{AssertUnwindSafe, catch_unwind};

use geo::{LineString, MultiPolygon};
use log::{error, info, warn};
use rayon::prelude::*;

use crate::algo::{
    build_corridor, clean_topology, extract_centerlines, merge_networks, polygonize,
    sample_network,
};
use crate::loading::{AreaBoundary, NetworkSource, PipelineConfig};
use crate::model::{Block, CleanedNetwork, SamplePoint};
use crate::projection::{self, AreaProjection, Reproject};
use crate::Error;

/// Everything one successful area run produces, all in the metric
/// frame except the sample points.
#[derive(Debug, Clone)]
pub struct AreaArtifacts {
    pub corridor: MultiPolygon<f64>,
    pub centerlines: Vec<LineString<f64>>,
    pub cleaned: CleanedNetwork,
    pub blocks: Vec<Block>,
    pub points: Vec<SamplePoint>,
}

#[derive(Debug, Clone)]
pub struct AreaOutput {
    pub artifacts: AreaArtifacts,
    pub report: AreaReport,
}

/// One slot of the batch result, failed areas included.
#[derive(Debug)]
pub struct BatchEntry {
    pub area: String,
    pub result: Result<AreaOutput, Error>,
}

/// Runs the full pipeline for one area.
///
/// # Errors
///
/// Fails when every sub-polygon acquisition came back empty
/// ([`Error::NoNetworkData`]), when no centerline could be extracted
/// ([`Error::NoCenterlines`]), or when a collaborator reports an
/// unrecoverable problem. Per-sub-step failures are logged, counted in
/// the report and never abort the area.
pub fn run_area(
    boundary: &AreaBoundary,
    source: &dyn NetworkSource,
    reproject: &dyn Reproject,
    config: &PipelineConfig,
) -> Result<AreaOutput, Error> {
    config.validate()?;
    let mut report = AreaReport::new(&boundary.name);
    info!(
        "processing area {} ({} sub-polygons)",
        boundary.name,
        boundary.polygons().len()
    );

    let mut acquired = Vec::new();
    let mut failed = 0;
    for (index, polygon) in boundary.polygons().iter().enumerate() {
        match source.acquire(polygon, config.network_type, reproject) {
            Ok(Some(network)) if !network.is_empty() => acquired.push(network),
            Ok(_) => {
                warn!("sub-polygon {index} of {}: no network data", boundary.name);
                failed += 1;
            }
            Err(e) => {
                warn!(
                    "sub-polygon {index} of {}: acquisition failed: {e}",
                    boundary.name
                );
                failed += 1;
            }
        }
    }
    report.record(Stage::Acquire, acquired.len(), failed);

    let merged = merge_networks(acquired, config.min_edge_length)?;
    report.record(Stage::Merge, merged.len(), 0);

    let (corridor, skipped) = build_corridor(&merged, config.buffer_distance);
    report.record(Stage::Buffer, corridor.0.len(), skipped);

    let (mut centerlines, skipped) = extract_centerlines(&corridor, config.centerline_interp_dist);
    if centerlines.is_empty() {
        return Err(Error::NoCenterlines);
    }
    centerlines.extend(boundary_rings(boundary, reproject)?);
    report.record(Stage::Centerline, centerlines.len(), skipped);

    let cleaned = clean_topology(
        &centerlines,
        config.snap_tolerance,
        config.dangling_min_length,
    );
    report.record(Stage::Topology, cleaned.len(), 0);

    let blocks = polygonize(&cleaned, config.snap_tolerance);
    report.record(Stage::Polygonize, blocks.len(), 0);

    let points = sample_network(&cleaned, config.step_meters, reproject)?;
    report.record(Stage::Sample, points.len(), 0);

    info!(
        "area {} done: {} roads, {} blocks, {} sample points",
        boundary.name,
        cleaned.len(),
        blocks.len(),
        points.len()
    );
    Ok(AreaOutput {
        artifacts: AreaArtifacts {
            corridor,
            centerlines,
            cleaned,
            blocks,
            points,
        },
        report,
    })
}

/// Administrative boundary rings in the metric frame; they join the
/// centerline set so the outline takes part in cleaning and sampling.
fn boundary_rings(
    boundary: &AreaBoundary,
    reproject: &dyn Reproject,
) -> Result<Vec<LineString<f64>>, Error> {
    let mut rings = Vec::new();
    for polygon in boundary.polygons() {
        let projected = projection::polygon_to_metric(reproject, polygon)?;
        let (exterior, interiors) = projected.into_inner();
        rings.push(exterior);
        rings.extend(interiors);
    }
    Ok(rings)
}

/// Processes independent areas in parallel. Panics and errors are
/// contained per area; the returned entries preserve input order.
pub fn run_batch(
    boundaries: &[AreaBoundary],
    source: &(dyn NetworkSource + Sync),
    config: &PipelineConfig,
) -> Vec<BatchEntry> {
    boundaries
        .par_iter()
        .map(|boundary| {
            let result = catch_unwind(AssertUnwindSafe(|| {
                let projection = AreaProjection::centered_on(&boundary.multi_polygon())?;
                run_area(boundary, source, &projection, config)
            }))
            .unwrap_or_else(|_| Err(Error::UnrecoverableError("area pipeline panicked")));
            if let Err(e) = &result {
                error!("area {} failed: {e}", boundary.name);
            }
            BatchEntry {
                area: boundary.name.clone(),
                result,
            }
        })
        .collect()
}
