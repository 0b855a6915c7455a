use std::fs;
use std::path::PathBuf;

use image::DynamicImage;
use tracing::{info, warn};

use super::{VideoSink, VideoSinkFactory, artifact_path};
use crate::error::AppError;

struct OpenSink {
    sink: Box<dyn VideoSink>,
    path: PathBuf,
    frames: u64,
}

/// Owns the processed-video sink for at most one session at a time.
pub struct Recorder {
    factory: Option<Box<dyn VideoSinkFactory>>,
    movies_dir: PathBuf,
    active: Option<OpenSink>,
}

impl Recorder {
    pub fn new(factory: Option<Box<dyn VideoSinkFactory>>, movies_dir: impl Into<PathBuf>) -> Self {
        Self {
            factory,
            movies_dir: movies_dir.into(),
            active: None,
        }
    }

    /// A recorder that never opens a sink.
    pub fn disabled() -> Self {
        Self::new(None, PathBuf::new())
    }

    pub fn can_record(&self) -> bool {
        self.factory.is_some()
    }

    pub fn is_open(&self) -> bool {
        self.active.is_some()
    }

    pub fn open(&mut self, width: u32, height: u32) -> Result<PathBuf, AppError> {
        if let Some(active) = &self.active {
            return Ok(active.path.clone());
        }
        let factory = self
            .factory
            .as_ref()
            .ok_or_else(|| AppError::VideoSink("no video encoder configured".to_string()))?;

        fs::create_dir_all(&self.movies_dir)?;
        let path = artifact_path(&self.movies_dir, "mp4");
        let mut sink = factory.create(width, height, &path)?;
        sink.start()?;
        info!("Recording {}x{} video to {}", width, height, path.display());
        self.active = Some(OpenSink {
            sink,
            path: path.clone(),
            frames: 0,
        });
        Ok(path)
    }

    pub fn record(&mut self, frame: &DynamicImage) {
        if let Some(active) = &mut self.active {
            match active.sink.record_frame(frame) {
                Ok(()) => active.frames += 1,
                Err(e) => warn!("Dropping video frame: {}", e),
            }
        }
    }

    /// Stops and releases the open sink, if any, returning the finished file. The sink is
    /// released even when `stop` fails.
    pub fn finalize(&mut self) -> Result<Option<PathBuf>, AppError> {
        let Some(mut active) = self.active.take() else {
            return Ok(None);
        };
        if let Err(e) = active.sink.stop() {
            warn!("Video sink failed to stop cleanly: {}", e);
            return Err(e);
        }
        info!(
            "Finalized {} ({} frames)",
            active.path.display(),
            active.frames
        );
        Ok(Some(active.path))
    }
}
