use glam::{Affine3A, Vec3};

use anno_interact::brush::BrushEngine;
use anno_parser::parsers::bin::parse_buffer;
use anno_session::export::build_label_export;
use anno_session::{save_boxes, BoxStore, JsonFileBackend};

// Full headless pass over the annotation pipeline: decode a synthetic
// point buffer, brush-select a cluster, fit a box, persist it through
// the file backend, and print the exported cuboid payload.
fn main() {
    // Two clusters in backend space (Z up): one near the origin, one
    // offset along X.
    let mut floats: Vec<f32> = Vec::new();
    for i in 0..20 {
        let t = i as f32 / 19.0;
        floats.extend_from_slice(&[t * 2.0, t, 0.5, 1.0]);
        floats.extend_from_slice(&[8.0 + t, 2.0 - t, 0.25, 1.0]);
    }
    let mut data = vec![0u8; floats.len() * 4];
    for (i, f) in floats.iter().enumerate() {
        data[i * 4..i * 4 + 4].copy_from_slice(&f.to_le_bytes());
    }

    let cloud = parse_buffer(&data, 4, 1, None).unwrap();
    println!(
        "decoded {} points, bounds center {:?}",
        cloud.len(),
        cloud.bounds.center()
    );

    let mut colors = cloud.colors.clone();
    let mut engine = BrushEngine::with_radius(cloud.colors.clone(), 2.0);

    // Sweep the brush across the first cluster.
    engine.press_start(false);
    for step in 0..5 {
        let marker = Vec3::new(step as f32 * 0.5, 0.4, -0.4);
        engine.update_hover(marker, &cloud.positions, &Affine3A::IDENTITY, &mut colors);
    }
    println!("selected {} points", engine.selected_count());

    let fit = engine
        .finish(&cloud.positions, &Affine3A::IDENTITY, &mut colors)
        .expect("non-empty selection");
    println!("fitted box: {:?}", fit);

    let dir = tempfile::tempdir().unwrap();
    let mut backend = JsonFileBackend::new(dir.path().join("boxes.json"));
    let mut store = BoxStore::new("demo-dataset");
    store.add_box(fit.center, fit.size, fit.yaw, true);

    let report = save_boxes(&mut store, &mut backend).unwrap();
    println!("sync report: {:?}", report);

    let export = build_label_export(store.boxes(), None);
    println!("{}", serde_json::to_string_pretty(&export).unwrap());
}
