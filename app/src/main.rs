use std::fs;
use std::io::Write;
use std::path::PathBuf;

use chrono::Local;
use clap::Parser;
use env_logger::Builder;
use log::LevelFilter;

use anno_core::annotation::dataset::Dataset;
use anno_parser::parsers::{bin::BinParserProvider, ParserProvider as _};
use anno_session::export::build_label_export;
use anno_session::wire::WireDataset;
use anno_session::{save_boxes, BoxBackend as _, BoxStore, JsonFileBackend};

#[derive(Parser, Debug)]
#[command(
    name = "annotool",
    about = "Headless exporter for VR point-cloud annotations",
    version = "0.0.1"
)]
struct Cli {
    /// Dataset record (JSON)
    #[arg(short, long, required = true, value_name = "FILE")]
    dataset: String,

    /// Raw binary point cloud (stride-N little-endian f32 records)
    #[arg(short, long, required = true, value_name = "FILE")]
    cloud: String,

    /// Stored annotation boxes (JSON, box wire format)
    #[arg(short, long, required = true, value_name = "FILE")]
    boxes: String,

    /// Output path for the exported cuboid annotations (JSON)
    #[arg(short, long, required = true, value_name = "FILE")]
    output: String,

    #[arg(long, default_value_t = 4)]
    stride: usize,

    #[arg(long, default_value_t = 5)]
    decimation: usize,
}

fn read_dataset(path: &str) -> Result<Dataset, Box<dyn std::error::Error>> {
    let raw = fs::read_to_string(path)?;
    let wire: WireDataset = serde_json::from_str(&raw)?;
    Ok(wire.into_model())
}

fn main() {
    Builder::new()
        .format(|buf, record| {
            writeln!(
                buf,
                "{} [{}] - {}",
                Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.args()
            )
        })
        .filter(None, LevelFilter::Info)
        .init();

    let args = Cli::parse();

    log::info!("dataset record: {}", args.dataset);
    log::info!("point cloud: {}", args.cloud);
    log::info!("box file: {}", args.boxes);
    log::info!("output: {}", args.output);

    let start = std::time::Instant::now();

    let dataset = match read_dataset(&args.dataset) {
        Ok(dataset) => dataset,
        Err(e) => {
            log::error!("failed to read dataset record: {}", e);
            return;
        }
    };
    log::info!("dataset {} ({})", dataset.id, dataset.name);

    log::info!("start parsing point cloud...");
    let start_local = std::time::Instant::now();
    let provider = BinParserProvider {
        path: PathBuf::from(&args.cloud),
        stride: args.stride,
        decimation: args.decimation,
        ego_pose: dataset.ego_pose,
    };
    let parser = provider.get_parser();
    let cloud = match parser.parse() {
        Ok(cloud) => cloud,
        Err(e) => {
            log::error!("failed to parse point cloud: {}", e);
            return;
        }
    };
    log::info!(
        "decoded {} points in {:?}; bounds center {:?}, half extents {:?}",
        cloud.len(),
        start_local.elapsed(),
        cloud.bounds.center(),
        cloud.bounds.half_extents()
    );

    log::info!("loading stored boxes...");
    let mut backend = JsonFileBackend::new(&args.boxes);
    let mut store = BoxStore::new(dataset.id.clone());
    match backend.fetch_boxes(store.dataset_id()) {
        Ok(boxes) => {
            log::info!("loaded {} boxes", boxes.len());
            store.load_from_backend(boxes);
        }
        Err(e) => {
            log::error!("failed to load boxes: {}", e);
            return;
        }
    }

    // Write-through so the stored file reflects the loaded state before
    // exporting (also proves the box file is writable).
    if let Err(e) = save_boxes(&mut store, &mut backend) {
        log::error!("failed to sync boxes: {}", e);
        return;
    }

    let accepted: Vec<_> = store
        .boxes()
        .iter()
        .filter(|b| b.accepted)
        .cloned()
        .collect();
    log::info!(
        "exporting {} accepted of {} total boxes",
        accepted.len(),
        store.len()
    );

    let export = build_label_export(&accepted, dataset.ego_pose.as_ref());
    let raw = match serde_json::to_string_pretty(&export) {
        Ok(raw) => raw,
        Err(e) => {
            log::error!("failed to serialize export: {}", e);
            return;
        }
    };
    if let Err(e) = fs::write(&args.output, raw) {
        log::error!("failed to write {}: {}", args.output, e);
        return;
    }

    log::info!("Elapsed: {:?}", start.elapsed());
    log::info!("Finish processing");
}
