use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::Level;

use crate::error::AppError;

const ENV_PREFIX: &str = "AIRTRACE";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Configuration {
    pub assets_dir: PathBuf,
    pub staging_dir: PathBuf,
    pub movies_dir: PathBuf,
    pub pictures_dir: PathBuf,
    pub tracking_model: String,
    pub classification_model: String,
    pub digit_input_side: u32,
    pub digit_class_count: usize,
    pub export_video: bool,
    pub export_snapshot: bool,
    pub letter_label: String,
    pub event_buffer_size: usize,
    pub log_level: String,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            assets_dir: PathBuf::from("assets"),
            staging_dir: dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("airtrace")
                .join("models"),
            movies_dir: dirs::video_dir().unwrap_or_else(|| PathBuf::from("Movies")),
            pictures_dir: dirs::picture_dir().unwrap_or_else(|| PathBuf::from("Pictures")),
            tracking_model: "YOLOv3_float32.onnx".to_string(),
            classification_model: "DigitRecog_float32.onnx".to_string(),
            digit_input_side: 28,
            digit_class_count: 10,
            export_video: true,
            export_snapshot: true,
            letter_label: "Letter".to_string(),
            event_buffer_size: 64,
            log_level: "info".to_string(),
        }
    }
}

impl Configuration {
    /// Layers an optional TOML file and `AIRTRACE_*` environment overrides on top of the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, AppError> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(true));
        }
        let settings = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;
        Ok(settings.try_deserialize()?)
    }

    pub fn max_log_level(&self) -> Level {
        self.log_level.parse().unwrap_or(Level::INFO)
    }
}
