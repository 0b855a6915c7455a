use std::fs;
use std::path::PathBuf;

use image::DynamicImage;
use tracing::info;

use super::{SnapshotSink, artifact_path};
use crate::error::AppError;

/// Writes `Processed_<epoch-millis>.jpg` into a pictures directory.
pub struct JpegSnapshotSink {
    pictures_dir: PathBuf,
}

impl JpegSnapshotSink {
    pub fn new(pictures_dir: impl Into<PathBuf>) -> Self {
        Self {
            pictures_dir: pictures_dir.into(),
        }
    }
}

impl SnapshotSink for JpegSnapshotSink {
    fn save(&mut self, image: &DynamicImage) -> Result<PathBuf, AppError> {
        fs::create_dir_all(&self.pictures_dir)?;
        let path = artifact_path(&self.pictures_dir, "jpg");
        // JPEG has no alpha channel.
        DynamicImage::ImageRgb8(image.to_rgb8()).save(&path)?;
        info!("Saved snapshot to {}", path.display());
        Ok(path)
    }
}
