//! CPU reference renderer.
//!
//! Rendering happens on a dedicated thread fed by a command channel. Each
//! finished frame replaces the shared front buffer and is then announced
//! with [`RendererEvent::FrameRendered`].

mod raster;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Instant;

use crate::renderer::{
    event_channel, AsyncChannelConfig, AsyncEventReceiver, BufferedEventSender, CameraPose,
    FrameBuffer, FrameCompletion, Renderer, RendererError, RendererEvent, ViewportConfig,
};
use crate::scene::SceneGraph;

const RENDERER_ID: &str = "cpu_reference";

enum RenderCommand {
    Configure(ViewportConfig),
    SetScene(Arc<SceneGraph>),
    Render { frame_number: u64, pose: CameraPose },
    Shutdown,
}

type FrontBuffer = Arc<Mutex<Option<FrameBuffer>>>;

pub struct CpuReferenceRenderer {
    commands: Option<async_channel::Sender<RenderCommand>>,
    events: Option<AsyncEventReceiver<RendererEvent>>,
    worker: Option<JoinHandle<()>>,
    front_buffer: FrontBuffer,
    next_frame: AtomicU64,
    viewport: Option<ViewportConfig>,
    scene: Option<Arc<SceneGraph>>,
}

impl CpuReferenceRenderer {
    pub fn new() -> Self {
        Self {
            commands: None,
            events: None,
            worker: None,
            front_buffer: Arc::new(Mutex::new(None)),
            next_frame: AtomicU64::new(0),
            viewport: None,
            scene: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.worker.is_some()
    }

    fn send(&self, command: RenderCommand) -> Result<(), RendererError> {
        let commands = self.commands.as_ref().ok_or(RendererError::NotRunning)?;
        commands
            .try_send(command)
            .map_err(|_| RendererError::Disconnected)
    }
}

impl Default for CpuReferenceRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for CpuReferenceRenderer {
    fn name(&self) -> &'static str {
        RENDERER_ID
    }

    fn start(&mut self) -> Result<(), RendererError> {
        if self.is_running() {
            return Err(RendererError::AlreadyRunning);
        }

        let (command_sender, command_receiver) = async_channel::unbounded();
        let (event_sender, event_receiver) = event_channel(AsyncChannelConfig::unbounded());
        let front_buffer = Arc::clone(&self.front_buffer);

        let worker = std::thread::Builder::new()
            .name("cpu-reference-render".to_string())
            .spawn(move || render_loop(command_receiver, event_sender, front_buffer))
            .map_err(|error| RendererError::CreationFailed(format!("couldn't spawn render thread: {error}")))?;

        self.commands = Some(command_sender);
        self.events = Some(event_receiver);
        self.worker = Some(worker);

        if let Some(viewport) = self.viewport {
            self.send(RenderCommand::Configure(viewport))?;
        }
        if let Some(scene) = &self.scene {
            self.send(RenderCommand::SetScene(Arc::clone(scene)))?;
        }

        tracing::debug!(renderer = RENDERER_ID, "render thread started");
        Ok(())
    }

    fn stop(&mut self) {
        let Some(worker) = self.worker.take() else {
            return;
        };
        if let Some(commands) = self.commands.take() {
            let _ = commands.try_send(RenderCommand::Shutdown);
        }
        if worker.join().is_err() {
            tracing::warn!(renderer = RENDERER_ID, "render thread panicked");
        }
        self.events = None;
        tracing::debug!(renderer = RENDERER_ID, "render thread stopped");
    }

    fn configure(&mut self, viewport: ViewportConfig) -> Result<(), RendererError> {
        viewport.validate()?;
        self.viewport = Some(viewport);
        if self.is_running() {
            self.send(RenderCommand::Configure(viewport))?;
        }
        Ok(())
    }

    fn set_scene(&mut self, scene: Arc<SceneGraph>) -> Result<(), RendererError> {
        if self.is_running() {
            self.send(RenderCommand::SetScene(Arc::clone(&scene)))?;
        }
        self.scene = Some(scene);
        Ok(())
    }

    fn request_frame(&self, pose: &CameraPose) -> Result<FrameCompletion, RendererError> {
        let events = self.events.as_ref().ok_or(RendererError::NotRunning)?;
        if self.viewport.is_none() {
            return Err(RendererError::NotConfigured);
        }
        if self.scene.is_none() {
            return Err(RendererError::NoScene);
        }

        let frame_number = self.next_frame.fetch_add(1, Ordering::Relaxed);
        self.send(RenderCommand::Render {
            frame_number,
            pose: *pose,
        })?;
        Ok(FrameCompletion::new(frame_number, events.clone()))
    }

    fn current_frame_buffer(&self) -> Result<FrameBuffer, RendererError> {
        let front = self
            .front_buffer
            .lock()
            .map_err(|_| RendererError::FrameUnavailable("front buffer lock poisoned".to_string()))?;
        front
            .clone()
            .ok_or_else(|| RendererError::FrameUnavailable("no frame has been rendered yet".to_string()))
    }
}

impl Drop for CpuReferenceRenderer {
    fn drop(&mut self) {
        self.stop();
    }
}

fn render_loop(
    commands: async_channel::Receiver<RenderCommand>,
    events: BufferedEventSender<RendererEvent>,
    front_buffer: FrontBuffer,
) {
    let started = Instant::now();
    let mut viewport: Option<ViewportConfig> = None;
    let mut scene: Option<Arc<SceneGraph>> = None;

    while let Ok(command) = commands.recv_blocking() {
        match command {
            RenderCommand::Configure(config) => viewport = Some(config),
            RenderCommand::SetScene(graph) => scene = Some(graph),
            RenderCommand::Render { frame_number, pose } => {
                let event = match (&viewport, &scene) {
                    (Some(viewport), Some(scene)) => {
                        let render_started = Instant::now();
                        let frame = raster::rasterize(scene, viewport, &pose, frame_number);
                        let render_time_ns = render_started.elapsed().as_nanos() as u64;
                        match front_buffer.lock() {
                            Ok(mut front) => {
                                *front = Some(frame);
                                tracing::trace!(frame = frame_number, render_time_ns, "frame rendered");
                                RendererEvent::FrameRendered {
                                    renderer_id: RENDERER_ID,
                                    frame_number,
                                    frame_time_microseconds: started.elapsed().as_micros() as u64,
                                    render_time_ns,
                                }
                            }
                            Err(_) => RendererEvent::FrameFailed {
                                frame_number,
                                reason: "front buffer lock poisoned".to_string(),
                            },
                        }
                    }
                    _ => RendererEvent::FrameFailed {
                        frame_number,
                        reason: "viewport or scene missing".to_string(),
                    },
                };
                if events.send_blocking(event).is_err() {
                    break;
                }
            }
            RenderCommand::Shutdown => break,
        }
    }

    let _ = events.try_send(RendererEvent::Stopped);
}
