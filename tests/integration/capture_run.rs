use std::sync::Arc;

use speculum::capture::{DatasetMetadata, PngEncoder, METADATA_FILE_NAME};
use speculum::renderer::CpuReferenceRenderer;
use speculum::scene::{JsonSceneLoader, MaterialValue};
use speculum::{CaptureSession, Pass};

use super::support::{config, png_names, write_scene, CHAIR, TWO_CRATES};

fn read_metadata(dir: &std::path::Path) -> DatasetMetadata {
    let json = std::fs::read_to_string(dir.join(METADATA_FILE_NAME)).unwrap();
    serde_json::from_str(&json).unwrap()
}

#[tokio::test]
async fn test_color_pass_four_views() {
    println!("=== Color Pass, Four Views ===");

    let workspace = tempfile::tempdir().unwrap();
    let model = write_scene(workspace.path(), "chair.json", CHAIR);
    let output = workspace.path().join("renders");

    let session = CaptureSession::new(config(&model, &output, 4).with_passes([Pass::Color]));
    let mut renderer = CpuReferenceRenderer::new();
    let summary = session
        .run(&JsonSceneLoader::new(), &mut renderer, Arc::new(PngEncoder))
        .await
        .unwrap();

    assert_eq!(summary.views, 4);
    assert_eq!(summary.frames_dispatched(), 4);
    assert_eq!(summary.frames_saved(), 4);
    assert_eq!(summary.persist_failures(), 0);
    assert!(summary.normalization.is_some());
    assert!(!renderer.is_running());

    assert_eq!(
        png_names(&output),
        vec!["Color_0.png", "Color_1.png", "Color_2.png", "Color_3.png"]
    );
    let frame = image::open(output.join("Color_0.png")).unwrap().to_rgba8();
    assert_eq!(frame.dimensions(), (32, 32));
    assert!(frame.pixels().any(|pixel| pixel.0[3] == 255), "asset should be visible");

    let metadata = read_metadata(&output);
    assert_eq!(metadata.version, 2);
    assert_eq!(metadata.source, "cpu_reference");
    assert_eq!(metadata.views.len(), 4);
    for view in &metadata.views {
        assert_eq!(view.resolution, 32);
        assert_eq!(view.depth_range, 4000.0);
        assert_eq!(view.intrinsics.data[0][2], 16.0);
    }

    println!("Color pass: OK");
}

#[tokio::test]
async fn test_metadata_follows_view_order() {
    let workspace = tempfile::tempdir().unwrap();
    let model = write_scene(workspace.path(), "chair.json", CHAIR);
    let output = workspace.path().join("renders");

    let session = CaptureSession::new(config(&model, &output, 5));
    let mut renderer = CpuReferenceRenderer::new();
    session
        .run(&JsonSceneLoader::new(), &mut renderer, Arc::new(PngEncoder))
        .await
        .unwrap();

    let metadata = read_metadata(&output);
    let z: Vec<f32> = metadata.views.iter().map(|view| view.extrinsics[2][3]).collect();
    assert_eq!(z.len(), 5);
    assert!((z[0] - 1.9).abs() < 1e-5);
    assert!((z[4] + 1.9).abs() < 1e-5);
    assert!(z.windows(2).all(|pair| pair[1] <= pair[0]));
    assert!(png_names(&output).is_empty());
}

#[tokio::test]
async fn test_every_pass_gets_its_own_prefix() {
    println!("=== All Passes ===");

    let workspace = tempfile::tempdir().unwrap();
    let model = write_scene(workspace.path(), "crates.json", TWO_CRATES);
    let output = workspace.path().join("renders");

    let session = CaptureSession::new(
        config(&model, &output, 2).with_passes([Pass::Color, Pass::Albedo, Pass::DepthNormals]),
    );
    let mut renderer = CpuReferenceRenderer::new();
    let summary = session
        .run(&JsonSceneLoader::new(), &mut renderer, Arc::new(PngEncoder))
        .await
        .unwrap();

    let passes: Vec<Pass> = summary.passes.iter().map(|pass| pass.pass).collect();
    assert_eq!(passes, vec![Pass::Color, Pass::Albedo, Pass::DepthNormals]);

    assert!(summary.passes[0].overrides.is_none());
    for pass in &summary.passes[1..] {
        let overrides = pass.overrides.unwrap();
        assert_eq!(overrides.duplicates_created, 1, "shared material duplicated once");
        assert_eq!(overrides.surfaces_overridden, 2);
    }

    assert_eq!(
        png_names(&output),
        vec![
            "Albedo_0.png",
            "Albedo_1.png",
            "Color_0.png",
            "Color_1.png",
            "DepthNormals_0.png",
            "DepthNormals_1.png",
        ]
    );
    println!("All passes: OK");
}

#[tokio::test]
async fn test_albedo_and_orm_share_prefix() {
    let workspace = tempfile::tempdir().unwrap();
    let model = write_scene(workspace.path(), "crates.json", TWO_CRATES);
    let output = workspace.path().join("renders");

    let session = CaptureSession::new(config(&model, &output, 3).with_passes([Pass::Albedo, Pass::Orm]));
    let mut renderer = CpuReferenceRenderer::new();
    let summary = session
        .run(&JsonSceneLoader::new(), &mut renderer, Arc::new(PngEncoder))
        .await
        .unwrap();

    assert_eq!(summary.passes.len(), 2);
    assert_eq!(summary.frames_saved(), 6);
    assert_eq!(png_names(&output), vec!["Albedo_0.png", "Albedo_1.png", "Albedo_2.png"]);
}

#[tokio::test]
async fn test_albedo_template_takes_original_albedo_color() {
    let workspace = tempfile::tempdir().unwrap();
    let model = write_scene(workspace.path(), "crates.json", TWO_CRATES);
    let output = workspace.path().join("renders");

    let mut capture = config(&model, &output, 1).with_passes([Pass::Color, Pass::Albedo]);
    capture.pass_materials.albedo = capture
        .pass_materials
        .albedo
        .clone()
        .with_parameter("albedo_color", MaterialValue::Color([0.0, 1.0, 0.0, 1.0]));
    let session = CaptureSession::new(capture);
    let mut renderer = CpuReferenceRenderer::new();
    session
        .run(&JsonSceneLoader::new(), &mut renderer, Arc::new(PngEncoder))
        .await
        .unwrap();

    // The single view looks down -Z; the first crate covers this pixel.
    let color = image::open(output.join("Color_0.png")).unwrap().to_rgba8();
    let albedo = image::open(output.join("Albedo_0.png")).unwrap().to_rgba8();
    let lit = color.get_pixel(9, 16).0;
    assert_eq!(&lit[..2], &[204, 153]);
    assert_eq!(lit[3], 255);
    assert_eq!(albedo.get_pixel(9, 16).0, lit);
    assert_eq!(albedo.get_pixel(22, 16).0, lit);
}
