//! Collaborators for running a session without a device: frames come from disk, the live
//! view is the log.
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use image::imageops::FilterType;
use image::{DynamicImage, Rgba, RgbaImage};
use tracing::{debug, info, trace, warn};

use crate::camera::{CameraController, CameraFacing};
use crate::common::Frame;
use crate::error::AppError;
use crate::model::ModelHandle;
use crate::pipeline::{ProcessedFrame, VisionProcessor};
use crate::view::LiveView;

const FRAME_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "bmp"];

enum FrameSource {
    Files(Vec<PathBuf>),
    Blank(DynamicImage),
}

/// Replays a directory of images as the camera preview, looping at the end.
pub struct ReplayCamera {
    source: FrameSource,
    cursor: usize,
    facing: CameraFacing,
}

impl ReplayCamera {
    pub fn from_dir(dir: &Path) -> Result<Self, AppError> {
        let mut frames: Vec<PathBuf> = fs::read_dir(dir)?
            .filter_map(|entry| entry.ok().map(|entry| entry.path()))
            .filter(|path| {
                path.extension()
                    .and_then(|ext| ext.to_str())
                    .map(|ext| ext.to_ascii_lowercase())
                    .is_some_and(|ext| FRAME_EXTENSIONS.contains(&ext.as_str()))
            })
            .collect();
        if frames.is_empty() {
            return Err(AppError::Camera(format!(
                "no frames found in {}",
                dir.display()
            )));
        }
        frames.sort();
        info!("Replaying {} frames from {}", frames.len(), dir.display());
        Ok(Self {
            source: FrameSource::Files(frames),
            cursor: 0,
            facing: CameraFacing::default(),
        })
    }

    /// A camera that keeps showing one black frame.
    pub fn blank(width: u32, height: u32) -> Self {
        let image = RgbaImage::from_pixel(width, height, Rgba([0, 0, 0, 255]));
        Self {
            source: FrameSource::Blank(DynamicImage::ImageRgba8(image)),
            cursor: 0,
            facing: CameraFacing::default(),
        }
    }
}

impl CameraController for ReplayCamera {
    fn capture_preview(&mut self) -> Option<DynamicImage> {
        match &self.source {
            FrameSource::Blank(image) => Some(image.clone()),
            FrameSource::Files(frames) => {
                let path = &frames[self.cursor % frames.len()];
                self.cursor = self.cursor.wrapping_add(1);
                match image::open(path) {
                    Ok(image) => Some(image),
                    Err(e) => {
                        warn!("Skipping unreadable frame {}: {}", path.display(), e);
                        None
                    }
                }
            }
        }
    }

    fn facing(&self) -> CameraFacing {
        self.facing
    }

    fn reopen(&mut self, facing: CameraFacing) -> Result<(), AppError> {
        self.facing = facing;
        self.cursor = 0;
        Ok(())
    }
}

/// Shows frames unchanged and tracks nothing.
pub struct PassthroughVisionProcessor {
    width: u32,
    height: u32,
    tracking_model: Mutex<Option<Arc<dyn ModelHandle>>>,
}

impl PassthroughVisionProcessor {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            tracking_model: Mutex::new(None),
        }
    }

    pub fn has_tracking_model(&self) -> bool {
        self.tracking_model
            .lock()
            .map(|model| model.is_some())
            .unwrap_or(false)
    }
}

#[async_trait]
impl VisionProcessor for PassthroughVisionProcessor {
    fn reset(&self) {
        debug!("Passthrough vision reset");
    }

    async fn process(&self, frame: Frame) -> Result<ProcessedFrame, AppError> {
        let overlay = frame.image().clone();
        let normalized = overlay.resize_exact(self.width, self.height, FilterType::Triangle);
        Ok(ProcessedFrame {
            overlay,
            normalized,
        })
    }

    fn export_trace_for_inference(&self) -> Option<DynamicImage> {
        None
    }

    fn tracking_coordinates(&self) -> String {
        String::new()
    }

    fn model_dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn bind_tracking_model(&self, model: Arc<dyn ModelHandle>) {
        match self.tracking_model.lock() {
            Ok(mut slot) => *slot = Some(model),
            Err(_) => warn!("Tracking model slot poisoned, model not bound"),
        }
    }
}

#[derive(Debug, Default)]
pub struct LogView {
    frames_shown: u64,
}

impl LiveView for LogView {
    fn display(&mut self, overlay: &DynamicImage) {
        self.frames_shown += 1;
        trace!(
            "Frame {} displayed ({}x{})",
            self.frames_shown,
            overlay.width(),
            overlay.height()
        );
    }

    fn set_recording(&mut self, recording: bool) {
        if recording {
            info!("Recording");
        } else {
            info!("Recording stopped after {} frames", self.frames_shown);
            self.frames_shown = 0;
        }
    }

    fn notify(&mut self, message: &str) {
        warn!("{}", message);
    }
}
