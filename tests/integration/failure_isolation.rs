use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use speculum::capture::{ImageEncoder, PngEncoder, METADATA_FILE_NAME};
use speculum::error::PersistError;
use speculum::renderer::{
    AsyncEventReceiver, CameraPose, CpuReferenceRenderer, FrameBuffer, FrameCompletion, RendererError,
    RendererEvent, ViewportConfig,
};
use speculum::scene::{JsonSceneLoader, SceneGraph};
use speculum::{CaptureError, CaptureSession, Pass, Renderer};

use super::support::{config, png_names, write_scene, CHAIR, TWO_CRATES};

/// Fails every frame whose file name ends in `_1.png`.
struct SelectiveEncoder;

impl ImageEncoder for SelectiveEncoder {
    fn encode_and_write(&self, buffer: &FrameBuffer, path: &Path) -> Result<(), PersistError> {
        if path.to_string_lossy().ends_with("_1.png") {
            return Err(PersistError::Worker {
                path: path.to_path_buf(),
                reason: "disk full".into(),
            });
        }
        PngEncoder.encode_and_write(buffer, path)
    }
}

/// Records when each save started and finished.
#[derive(Default)]
struct RecordingEncoder {
    spans: Mutex<Vec<(PathBuf, Instant, Instant)>>,
}

impl ImageEncoder for RecordingEncoder {
    fn encode_and_write(&self, _buffer: &FrameBuffer, path: &Path) -> Result<(), PersistError> {
        let started = Instant::now();
        std::thread::sleep(Duration::from_millis(20));
        self.spans
            .lock()
            .unwrap()
            .push((path.to_path_buf(), started, Instant::now()));
        Ok(())
    }
}

/// Accepts every request and never reports a frame.
#[derive(Default)]
struct SilentRenderer {
    running: bool,
    next_frame: std::sync::atomic::AtomicU64,
    events: Option<(async_channel::Sender<RendererEvent>, async_channel::Receiver<RendererEvent>)>,
}

impl Renderer for SilentRenderer {
    fn name(&self) -> &'static str {
        "silent"
    }

    fn start(&mut self) -> Result<(), RendererError> {
        self.running = true;
        self.events = Some(async_channel::unbounded());
        Ok(())
    }

    fn stop(&mut self) {
        self.running = false;
        self.events = None;
    }

    fn configure(&mut self, _viewport: ViewportConfig) -> Result<(), RendererError> {
        Ok(())
    }

    fn set_scene(&mut self, _scene: Arc<SceneGraph>) -> Result<(), RendererError> {
        Ok(())
    }

    fn request_frame(&self, _pose: &CameraPose) -> Result<FrameCompletion, RendererError> {
        let (_, receiver) = self.events.as_ref().ok_or(RendererError::NotRunning)?;
        let frame = self.next_frame.fetch_add(1, std::sync::atomic::Ordering::SeqCst) + 1;
        Ok(FrameCompletion::new(frame, AsyncEventReceiver::new(receiver.clone())))
    }

    fn current_frame_buffer(&self) -> Result<FrameBuffer, RendererError> {
        Err(RendererError::FrameUnavailable("nothing rendered".into()))
    }
}

#[tokio::test]
async fn test_missing_model_aborts_before_metadata() {
    println!("=== Missing Model ===");

    let workspace = tempfile::tempdir().unwrap();
    let output = workspace.path().join("renders");
    let session = CaptureSession::new(
        config(&workspace.path().join("nope.json"), &output, 4).with_passes([Pass::Color]),
    );

    let mut renderer = CpuReferenceRenderer::new();
    let result = session
        .run(&JsonSceneLoader::new(), &mut renderer, Arc::new(PngEncoder))
        .await;

    assert!(matches!(result, Err(CaptureError::AssetLoad(_))));
    assert!(!output.join(METADATA_FILE_NAME).exists());
    assert!(png_names(&output).is_empty());
    assert!(!renderer.is_running());
    println!("Missing model: OK");
}

#[tokio::test]
async fn test_output_path_that_is_a_file() {
    let workspace = tempfile::tempdir().unwrap();
    let model = write_scene(workspace.path(), "chair.json", CHAIR);
    let output = workspace.path().join("taken");
    std::fs::write(&output, b"not a directory").unwrap();

    let session = CaptureSession::new(config(&model, &output, 2));
    let result = session
        .run(&JsonSceneLoader::new(), &mut CpuReferenceRenderer::new(), Arc::new(PngEncoder))
        .await;
    assert!(matches!(result, Err(CaptureError::OutputDirectory { .. })));
}

#[tokio::test]
async fn test_failed_saves_do_not_stop_the_run() {
    println!("=== Per-file Persist Failures ===");

    let workspace = tempfile::tempdir().unwrap();
    let model = write_scene(workspace.path(), "crates.json", TWO_CRATES);
    let output = workspace.path().join("renders");

    let session = CaptureSession::new(config(&model, &output, 3).with_passes([Pass::Color, Pass::Albedo]));
    let summary = session
        .run(&JsonSceneLoader::new(), &mut CpuReferenceRenderer::new(), Arc::new(SelectiveEncoder))
        .await
        .unwrap();

    assert_eq!(summary.frames_dispatched(), 6);
    assert_eq!(summary.frames_saved(), 4);
    assert_eq!(summary.persist_failures(), 2);
    for pass in &summary.passes {
        assert_eq!(pass.persist_failures, 1);
    }
    assert_eq!(
        png_names(&output),
        vec!["Albedo_0.png", "Albedo_2.png", "Color_0.png", "Color_2.png"]
    );
    assert!(output.join(METADATA_FILE_NAME).exists());
    println!("Persist failures: OK");
}

#[tokio::test]
async fn test_pass_saves_finish_before_next_pass_renders() {
    let workspace = tempfile::tempdir().unwrap();
    let model = write_scene(workspace.path(), "crates.json", TWO_CRATES);
    let output = workspace.path().join("renders");

    let encoder = Arc::new(RecordingEncoder::default());
    let session = CaptureSession::new(config(&model, &output, 4).with_passes([Pass::Color, Pass::Albedo]));
    session
        .run(&JsonSceneLoader::new(), &mut CpuReferenceRenderer::new(), encoder.clone())
        .await
        .unwrap();

    let spans = encoder.spans.lock().unwrap();
    assert_eq!(spans.len(), 8);
    let is_color = |path: &PathBuf| path.to_string_lossy().contains("Color_");
    let last_color_end = spans
        .iter()
        .filter(|(path, _, _)| is_color(path))
        .map(|(_, _, ended)| *ended)
        .max()
        .unwrap();
    let first_albedo_start = spans
        .iter()
        .filter(|(path, _, _)| !is_color(path))
        .map(|(_, started, _)| *started)
        .min()
        .unwrap();
    assert!(last_color_end <= first_albedo_start);
}

#[tokio::test]
async fn test_zero_size_asset_renders_without_normalization() {
    const FLAT: &str = r#"{
        "materials": [],
        "root": {"name": "decal", "kind": "geometry",
                 "mesh": {"name": "point", "surfaces": [{"position": [0, 0, 0], "size": [0, 0, 0]}]}}
    }"#;

    let workspace = tempfile::tempdir().unwrap();
    let model = write_scene(workspace.path(), "flat.json", FLAT);
    let output = workspace.path().join("renders");

    let session = CaptureSession::new(config(&model, &output, 2).with_passes([Pass::Color]));
    let summary = session
        .run(&JsonSceneLoader::new(), &mut CpuReferenceRenderer::new(), Arc::new(PngEncoder))
        .await
        .unwrap();

    assert!(summary.normalization.is_none());
    assert_eq!(summary.frames_saved(), 2);
    assert!(output.join(METADATA_FILE_NAME).exists());
}

#[tokio::test]
async fn test_frames_that_never_complete_are_skipped() {
    let workspace = tempfile::tempdir().unwrap();
    let model = write_scene(workspace.path(), "crates.json", TWO_CRATES);
    let output = workspace.path().join("renders");

    let mut capture = config(&model, &output, 3).with_passes([Pass::Color]);
    capture.frame_timeout = Some(Duration::from_millis(20));
    let session = CaptureSession::new(capture);

    let mut renderer = SilentRenderer::default();
    let summary = session
        .run(&JsonSceneLoader::new(), &mut renderer, Arc::new(PngEncoder))
        .await
        .unwrap();

    assert_eq!(summary.frames_dispatched(), 0);
    assert_eq!(summary.frames_skipped(), 3);
    assert!(png_names(&output).is_empty());

    let metadata = std::fs::read_to_string(output.join(METADATA_FILE_NAME)).unwrap();
    let value: serde_json::Value = serde_json::from_str(&metadata).unwrap();
    assert_eq!(value["source"], "silent");
    assert_eq!(value["views"].as_array().unwrap().len(), 3);
    assert!(!renderer.running);
}
