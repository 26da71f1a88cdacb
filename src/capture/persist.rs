//! Asynchronous persistence of captured frames.
//!
//! [`SavePool`] runs encode-and-write jobs on tokio's blocking pool, with at
//! most `workers` jobs in flight. Completion order is unspecified;
//! [`SavePool::join_all`] is the barrier a pass waits on.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinHandle;

use crate::error::PersistError;
use crate::renderer::FrameBuffer;

/// One frame handed over to the pool. Owned by the pool once dispatched.
#[derive(Debug, Clone)]
pub struct CaptureTask {
    pub frame_index: usize,
    pub buffer: FrameBuffer,
    pub path: PathBuf,
}

pub trait ImageEncoder: Send + Sync {
    fn encode_and_write(&self, buffer: &FrameBuffer, path: &Path) -> Result<(), PersistError>;
}

/// RGBA8 PNG writer.
#[derive(Debug, Clone, Copy, Default)]
pub struct PngEncoder;

impl ImageEncoder for PngEncoder {
    fn encode_and_write(&self, buffer: &FrameBuffer, path: &Path) -> Result<(), PersistError> {
        let expected = buffer.expected_len();
        if buffer.pixels().len() != expected {
            return Err(PersistError::BufferSize {
                path: path.to_path_buf(),
                expected,
                actual: buffer.pixels().len(),
            });
        }

        image::save_buffer_with_format(
            path,
            buffer.pixels(),
            buffer.width(),
            buffer.height(),
            image::ColorType::Rgba8,
            image::ImageFormat::Png,
        )
        .map_err(|source| PersistError::Encode {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Completion handle of one dispatched save.
#[derive(Debug)]
pub struct SaveHandle {
    frame_index: usize,
    path: PathBuf,
    join: JoinHandle<Result<(), PersistError>>,
}

impl SaveHandle {
    pub fn frame_index(&self) -> usize {
        self.frame_index
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Waits for the save and returns the written path.
    pub async fn wait(self) -> Result<PathBuf, PersistError> {
        match self.join.await {
            Ok(Ok(())) => Ok(self.path),
            Ok(Err(error)) => Err(error),
            Err(join_error) => Err(PersistError::Worker {
                path: self.path,
                reason: join_error.to_string(),
            }),
        }
    }
}

#[derive(Debug, Default)]
pub struct PersistReport {
    pub saved: Vec<PathBuf>,
    pub failed: Vec<PersistError>,
}

impl PersistReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

pub struct SavePool {
    encoder: Arc<dyn ImageEncoder>,
    permits: Arc<Semaphore>,
    workers: usize,
}

impl SavePool {
    pub fn new(encoder: Arc<dyn ImageEncoder>, workers: usize) -> Self {
        let workers = workers.max(1);
        Self {
            encoder,
            permits: Arc::new(Semaphore::new(workers)),
            workers,
        }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Hands `task` to the pool. Must be called from within a tokio runtime.
    pub fn dispatch(&self, task: CaptureTask) -> SaveHandle {
        let frame_index = task.frame_index;
        let path = task.path.clone();
        let permits = Arc::clone(&self.permits);
        let encoder = Arc::clone(&self.encoder);

        let join = tokio::spawn(async move {
            let _permit = permits.acquire_owned().await.map_err(|_| PersistError::Worker {
                path: task.path.clone(),
                reason: "save pool closed".to_string(),
            })?;

            let worker_path = task.path.clone();
            tokio::task::spawn_blocking(move || {
                tracing::debug!(frame = task.frame_index, path = %task.path.display(), "saving frame");
                encoder.encode_and_write(&task.buffer, &task.path)
            })
            .await
            .map_err(|join_error| PersistError::Worker {
                path: worker_path,
                reason: join_error.to_string(),
            })?
        });

        SaveHandle {
            frame_index,
            path,
            join,
        }
    }

    /// Waits for every handle. Failures are logged and collected, never
    /// short-circuit the barrier.
    pub async fn join_all(handles: Vec<SaveHandle>) -> PersistReport {
        let results = futures::future::join_all(handles.into_iter().map(SaveHandle::wait)).await;

        let mut report = PersistReport::default();
        for result in results {
            match result {
                Ok(path) => report.saved.push(path),
                Err(error) => {
                    tracing::warn!(error = %error, "frame not saved");
                    report.failed.push(error);
                }
            }
        }
        report
    }
}
