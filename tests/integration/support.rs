use std::path::{Path, PathBuf};

use speculum::CaptureConfig;

pub const CHAIR: &str = include_str!("../../demos/chair.json");

/// Two boxes sharing one material, far from the origin.
pub const TWO_CRATES: &str = r#"{
    "materials": [
        {"type": "standard", "name": "pine",
         "properties": {"albedo_color": {"color": [0.8, 0.6, 0.3, 1.0]}, "roughness": {"float": 0.7}}}
    ],
    "root": {"name": "crates", "kind": "group", "children": [
        {"name": "a", "kind": "geometry", "transform": {"translation": [40.0, 0.0, 0.0]},
         "mesh": {"name": "crate", "surfaces": [{"material": "pine", "position": [0, 0, 0], "size": [2, 2, 2]}]}},
        {"name": "b", "kind": "geometry", "transform": {"translation": [44.0, 0.0, 0.0]},
         "mesh": {"name": "crate", "surfaces": [{"material": "pine", "position": [0, 0, 0], "size": [2, 2, 2]}]}}
    ]}
}"#;

pub fn write_scene(dir: &Path, name: &str, manifest: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, manifest).unwrap();
    path
}

/// Small, fast configuration with no passes selected.
pub fn config(model: &Path, output_dir: &Path, n_views: i64) -> CaptureConfig {
    let mut config = CaptureConfig::new(model, output_dir);
    config.n_views = n_views;
    config.resolution = 32;
    config.workers = 2;
    config
}

pub fn png_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .filter(|name| name.ends_with(".png"))
        .collect();
    names.sort();
    names
}
