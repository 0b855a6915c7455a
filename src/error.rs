use thiserror::Error;

use crate::model::{DelegateKind, ModelRole};

// Main Application Error Type

#[derive(Error, Debug)]
pub enum AppError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("Failed to stage asset {name}: {source}")]
    AssetStaging {
        name: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{0} delegate unavailable: {1}")]
    DelegateUnavailable(DelegateKind, String),
    #[error("Failed to construct {role} model: {reason}")]
    ModelConstruction { role: ModelRole, reason: String },
    #[error("Error: {0} model not loaded")]
    ModelUnavailable(ModelRole),
    #[error("Error: no trace bitmap available")]
    MissingTrace,
    #[error("Inference failed: {0}")]
    Inference(String),
    #[error("Vision processing failed: {0}")]
    Vision(String),
    #[error("Video sink error: {0}")]
    VideoSink(String),
    #[error("Camera error: {0}")]
    Camera(String),
    #[error("Presentation hand-off failed: {0}")]
    Presentation(String),
    #[error("Failed to serialize hand-off: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Session error: {0}")]
    Session(String),
}

impl AppError {
    /// Missing-input errors degrade to a label instead of aborting the export.
    pub fn is_missing_input(&self) -> bool {
        matches!(self, AppError::MissingTrace | AppError::ModelUnavailable(_))
    }
}
