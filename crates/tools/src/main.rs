use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use catalog::{MapDataset, MapRegistry};
use clap::{Parser, Subcommand};
use foundation::math::Vec2;
use projection::Projector;
use render::RecordingBackend;
use serde::Serialize;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use vectormap::{MapOptions, VectorMap};
use viewport::{ViewportState, ZoomConfig};

const DATASET_ENV: &str = "VMAP_DATASET";
const DEFAULT_MAP_ID: &str = "default";

#[derive(Parser, Debug)]
#[command(author, version, about = "Inspect, project and render vector map datasets")]
struct Args {
    /// Map dataset JSON (default: $VMAP_DATASET)
    #[arg(long, global = true)]
    dataset: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print dataset metadata, insets and regions
    Inspect,

    /// Project a lat/lng to container pixels at the fitted transform
    #[command(allow_negative_numbers = true)]
    Project {
        #[arg(long, default_value_t = 900.0)]
        width: f64,

        #[arg(long, default_value_t = 440.0)]
        height: f64,

        lat: f64,
        lng: f64,
    },

    /// Build a map and print the backend commands as JSON
    Render {
        /// MapOptions JSON; `map` may be omitted
        #[arg(long)]
        options: Option<PathBuf>,

        #[arg(long, default_value_t = 900.0)]
        width: f64,

        #[arg(long, default_value_t = 440.0)]
        height: f64,

        /// Zoom steps to apply after construction
        #[arg(long, default_value_t = 0)]
        zoom_in: u32,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let dataset_path = resolve_dataset(args.dataset)?;

    let out = match args.command {
        Command::Inspect => {
            let mut registry = MapRegistry::new();
            let dataset = registry.load_file(DEFAULT_MAP_ID, &dataset_path)?;
            let fingerprint = registry.fingerprint(DEFAULT_MAP_ID).map(str::to_string);
            serde_json::to_string_pretty(&summarize(&dataset, fingerprint))?
        }
        Command::Project {
            width,
            height,
            lat,
            lng,
        } => {
            let mut registry = MapRegistry::new();
            let dataset = registry.load_file(DEFAULT_MAP_ID, &dataset_path)?;
            serde_json::to_string_pretty(&project_point(&dataset, width, height, lat, lng)?)?
        }
        Command::Render {
            options,
            width,
            height,
            zoom_in,
        } => {
            let options = match options {
                Some(path) => MapOptions::from_json_str(&read(&path)?)?,
                None => MapOptions::default(),
            };
            let commands = render_commands(&dataset_path, options, width, height, zoom_in)?;
            serde_json::to_string_pretty(&commands)?
        }
    };

    println!("{out}");
    Ok(())
}

fn resolve_dataset(arg: Option<PathBuf>) -> Result<PathBuf, String> {
    arg.or_else(|| env::var_os(DATASET_ENV).map(PathBuf::from))
        .ok_or_else(|| format!("no dataset given: pass --dataset or set {DATASET_ENV}"))
}

fn read(path: &Path) -> Result<String, String> {
    fs::read_to_string(path).map_err(|e| format!("read {path:?}: {e}"))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DatasetSummary {
    width: f64,
    height: f64,
    central_meridian: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    fingerprint: Option<String>,
    insets: Vec<InsetSummary>,
    regions: Vec<RegionSummary>,
}

#[derive(Debug, Serialize)]
struct InsetSummary {
    left: f64,
    top: f64,
    width: f64,
    height: f64,
}

#[derive(Debug, Serialize)]
struct RegionSummary {
    code: String,
    name: String,
    has_bbox: bool,
}

fn summarize(dataset: &MapDataset, fingerprint: Option<String>) -> DatasetSummary {
    DatasetSummary {
        width: dataset.width,
        height: dataset.height,
        central_meridian: dataset.central_meridian(),
        fingerprint,
        insets: dataset
            .insets
            .iter()
            .map(|i| InsetSummary {
                left: i.left,
                top: i.top,
                width: i.width,
                height: i.height,
            })
            .collect(),
        regions: dataset
            .paths
            .iter()
            .map(|(code, p)| RegionSummary {
                code: code.clone(),
                name: p.name.clone(),
                has_bbox: p.bbox.is_some(),
            })
            .collect(),
    }
}

#[derive(Debug, PartialEq, Serialize)]
struct Projected {
    lat: f64,
    lng: f64,
    /// `None` when the point lies in no inset.
    inset: Option<usize>,
    pixel: Option<Vec2>,
}

fn project_point(
    dataset: &Arc<MapDataset>,
    width: f64,
    height: f64,
    lat: f64,
    lng: f64,
) -> Result<Projected, Box<dyn std::error::Error>> {
    let view = ViewportState::new(
        dataset.width,
        dataset.height,
        width,
        height,
        ZoomConfig::default(),
    )?;
    let projector = Projector::new(dataset);
    let pixel = projector.project(&view.params(), lat, lng);
    debug!(lat, lng, ?pixel, "projected");
    Ok(Projected {
        lat,
        lng,
        inset: projector.inset_index(lat, lng),
        pixel,
    })
}

fn render_commands(
    dataset_path: &Path,
    mut options: MapOptions,
    width: f64,
    height: f64,
    zoom_in: u32,
) -> Result<Vec<render::RenderCommand>, Box<dyn std::error::Error>> {
    if options.map.is_empty() {
        options.map = DEFAULT_MAP_ID.to_string();
    }
    let mut registry = MapRegistry::new();
    registry.load_file(options.map.clone(), dataset_path)?;

    let mut map = VectorMap::new(&registry, RecordingBackend::new(), options, width, height)?;
    for _ in 0..zoom_in {
        if map.zoom_in().is_none() {
            break;
        }
    }
    info!(
        step = map.viewport().zoom_cur_step(),
        scale = map.viewport().scale(),
        "rendered"
    );
    Ok(map.into_backend().drain())
}

#[cfg(test)]
mod tests {
    use super::{Args, Command, project_point, render_commands, resolve_dataset, summarize};
    use catalog::MapRegistry;
    use clap::Parser;
    use pretty_assertions::assert_eq;
    use render::RenderCommand;
    use std::path::PathBuf;
    use vectormap::MapOptions;

    fn demo_path() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets/demo_map.json")
    }

    #[test]
    fn parses_negative_coordinates() {
        let args =
            Args::try_parse_from(["vmap", "project", "--dataset", "x.json", "40.7", "-74.0"])
                .unwrap();
        assert_eq!(args.dataset, Some(PathBuf::from("x.json")));
        match args.command {
            Command::Project { lat, lng, width, .. } => {
                assert_eq!((lat, lng, width), (40.7, -74.0, 900.0));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn explicit_dataset_wins() {
        let p = resolve_dataset(Some(PathBuf::from("a.json"))).unwrap();
        assert_eq!(p, PathBuf::from("a.json"));
    }

    #[test]
    fn summary_lists_regions_in_code_order() {
        let mut reg = MapRegistry::new();
        let ds = reg.load_file("demo", demo_path()).unwrap();
        let s = summarize(&ds, None);
        let codes: Vec<&str> = s.regions.iter().map(|r| r.code.as_str()).collect();
        assert_eq!(codes, vec!["CA", "MX", "US", "US-AK"]);
        assert_eq!(s.insets.len(), 2);
    }

    #[test]
    fn projects_into_the_alaska_panel() {
        let mut reg = MapRegistry::new();
        let ds = reg.load_file("demo", demo_path()).unwrap();
        let out = project_point(&ds, 900.0, 440.0, 61.2, -149.9).unwrap();
        assert_eq!(out.inset, Some(1));
        let p = out.pixel.unwrap();
        assert!(p.x >= 10.0 && p.x <= 210.0, "x = {}", p.x);

        let off = project_point(&ds, 900.0, 440.0, 48.85, 2.35).unwrap();
        assert_eq!((off.inset, off.pixel), (None, None));
    }

    #[test]
    fn render_records_paths_and_zoom() {
        let cmds = render_commands(&demo_path(), MapOptions::default(), 900.0, 440.0, 2).unwrap();
        let paths = cmds
            .iter()
            .filter(|c| matches!(c, RenderCommand::AddPath { .. }))
            .count();
        assert_eq!(paths, 4);
        let last = cmds
            .iter()
            .rev()
            .find_map(|c| match c {
                RenderCommand::ApplyTransform(p) => Some(*p),
                _ => None,
            })
            .unwrap();
        assert!((last.scale - 1.4f64.powi(2)).abs() < 1e-9);
    }
}
