use std::path::{Path, PathBuf};

use image::DynamicImage;

use crate::error::AppError;

/// An encoder for the processed video of one session.
pub trait VideoSink: Send {
    fn start(&mut self) -> Result<(), AppError>;
    fn record_frame(&mut self, frame: &DynamicImage) -> Result<(), AppError>;
    fn stop(&mut self) -> Result<(), AppError>;
}

pub trait VideoSinkFactory: Send {
    fn create(&self, width: u32, height: u32, path: &Path) -> Result<Box<dyn VideoSink>, AppError>;
}

pub trait SnapshotSink: Send {
    /// Persists the bitmap and returns where it went.
    fn save(&mut self, image: &DynamicImage) -> Result<PathBuf, AppError>;
}
