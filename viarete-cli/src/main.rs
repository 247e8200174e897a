//! Batch runner: a directory of boundary GeoJSON files in, per-area
//! road skeletons and sampling points out.

mod source;

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use serde::Serialize;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use viarete_core::output;
use viarete_core::prelude::*;

use crate::source::GeoJsonNetworkSource;

#[derive(Parser)]
#[command(
    name = "viarete",
    version,
    about = "Extract clean road skeletons and street-view sampling points"
)]
struct Cli {
    /// Directory with one boundary GeoJSON file per area
    #[arg(long)]
    boundaries: PathBuf,

    /// Directory with pre-extracted network GeoJSON files
    #[arg(long)]
    network: PathBuf,

    /// Where per-area artifacts are written
    #[arg(long, default_value = "output")]
    output: PathBuf,

    /// TOML file overriding the pipeline parameters
    #[arg(long)]
    config: Option<PathBuf>,

    /// Worker threads for the area batch; defaults to all cores
    #[arg(long)]
    jobs: Option<usize>,
}

#[derive(Serialize)]
struct AreaSummary<'a> {
    area: &'a str,
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    report: Option<&'a AreaReport>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok((completed, failed)) => {
            info!("batch done: {completed} areas completed, {failed} failed");
            if completed == 0 && failed > 0 {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(usize, usize), Error> {
    let config = load_config(cli.config.as_deref())?;
    config.validate()?;

    if let Some(jobs) = cli.jobs
        && let Err(e) = rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build_global()
    {
        warn!("could not size the worker pool: {e}");
    }

    let boundaries = load_boundaries(&cli.boundaries)?;
    if boundaries.is_empty() {
        return Err(Error::InvalidData(format!(
            "no boundary files found in {}",
            cli.boundaries.display()
        )));
    }
    info!("found {} area boundaries", boundaries.len());

    let source = GeoJsonNetworkSource::from_dir(&cli.network)?;
    prepare_output_dirs(&cli.output)?;

    let entries = run_batch(&boundaries, &source, &config);

    let mut completed = 0;
    let mut failed = 0;
    let mut summaries = Vec::with_capacity(entries.len());
    for entry in &entries {
        match &entry.result {
            Ok(output) => {
                if let Err(e) = write_artifacts(&cli.output, &entry.area, output) {
                    error!("writing artifacts for {} failed: {e}", entry.area);
                    failed += 1;
                    summaries.push(AreaSummary {
                        area: &entry.area,
                        status: "write_failed",
                        error: Some(e.to_string()),
                        report: Some(&output.report),
                    });
                    continue;
                }
                completed += 1;
                summaries.push(AreaSummary {
                    area: &entry.area,
                    status: "completed",
                    error: None,
                    report: Some(&output.report),
                });
            }
            Err(e) => {
                failed += 1;
                summaries.push(AreaSummary {
                    area: &entry.area,
                    status: "failed",
                    error: Some(e.to_string()),
                    report: None,
                });
            }
        }
    }

    let summary_file = fs::File::create(cli.output.join("summary.json"))?;
    serde_json::to_writer_pretty(summary_file, &summaries)
        .map_err(|e| Error::InvalidData(format!("summary serialization: {e}")))?;

    Ok((completed, failed))
}

fn load_config(path: Option<&Path>) -> Result<PipelineConfig, Error> {
    match path {
        Some(path) => {
            let raw = fs::read_to_string(path)?;
            toml::from_str(&raw)
                .map_err(|e| Error::InvalidData(format!("{}: {e}", path.display())))
        }
        None => Ok(PipelineConfig::default()),
    }
}

fn load_boundaries(dir: &Path) -> Result<Vec<AreaBoundary>, Error> {
    let mut paths: Vec<_> = fs::read_dir(dir)?
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| {
            matches!(
                path.extension().and_then(|e| e.to_str()),
                Some("geojson") | Some("json")
            )
        })
        .collect();
    paths.sort();

    let mut boundaries = Vec::new();
    for path in paths {
        match AreaBoundary::from_geojson_file(&path) {
            Ok(boundary) => boundaries.push(boundary),
            Err(e) => warn!("skipping boundary {}: {e}", path.display()),
        }
    }
    Ok(boundaries)
}

const ARTIFACT_DIRS: [&str; 5] = [
    "road_points",
    "road_buffers",
    "centerlines",
    "cleaned_topology",
    "polygonized_areas",
];

fn prepare_output_dirs(base: &Path) -> Result<(), Error> {
    for dir in ARTIFACT_DIRS {
        fs::create_dir_all(base.join(dir))?;
    }
    Ok(())
}

fn write_artifacts(base: &Path, area: &str, output: &AreaOutput) -> Result<(), Error> {
    let name = sanitize_filename(area);
    let artifacts = &output.artifacts;

    output::write_geojson(
        &base.join("road_buffers").join(format!("{name}_buffer.geojson")),
        &output::corridor_to_geojson(&artifacts.corridor)?,
    )?;
    output::write_geojson(
        &base
            .join("centerlines")
            .join(format!("{name}_centerline.geojson")),
        &output::lines_to_geojson(&artifacts.centerlines)?,
    )?;
    output::write_geojson(
        &base
            .join("cleaned_topology")
            .join(format!("{name}_cleaned_topology.geojson")),
        &output::lines_to_geojson(&artifacts.cleaned.lines)?,
    )?;
    output::write_geojson(
        &base
            .join("polygonized_areas")
            .join(format!("{name}_polygons.geojson")),
        &output::blocks_to_geojson(&artifacts.blocks)?,
    )?;

    let csv_file = fs::File::create(base.join("road_points").join(format!("point_{name}.csv")))?;
    output::write_sample_points_csv(csv_file, area, &artifacts.points)?;
    Ok(())
}

/// Replaces path-hostile characters so area names are safe file stems.
fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            other => other,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filenames_are_sanitized() {
        assert_eq!(sanitize_filename("east/west: a?"), "east_west_ a_");
        assert_eq!(sanitize_filename("plain"), "plain");
    }

    #[test]
    fn toml_config_overrides_defaults() {
        let config: PipelineConfig =
            toml::from_str("step_meters = 25.0\nnetwork_type = \"drive\"").unwrap();
        assert_eq!(config.step_meters, 25.0);
        assert_eq!(config.network_type, NetworkType::Drive);
        // untouched fields keep their defaults
        assert_eq!(config.buffer_distance, 50.0);
    }
}
