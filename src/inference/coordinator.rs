use std::sync::Arc;

use image::DynamicImage;
use tracing::{debug, error, info, warn};

use super::{DigitClassifier, RecognitionMode};
use crate::error::AppError;
use crate::model::{ModelHandle, ModelRole};

/// Turns the exported trace into a label, according to the current recognition mode.
pub struct InferenceCoordinator {
    mode: RecognitionMode,
    classifier: DigitClassifier,
    letter_label: String,
    model: Option<Arc<dyn ModelHandle>>,
}

impl InferenceCoordinator {
    pub fn new(classifier: DigitClassifier, letter_label: impl Into<String>) -> Self {
        Self {
            mode: RecognitionMode::default(),
            classifier,
            letter_label: letter_label.into(),
            model: None,
        }
    }

    pub fn mode(&self) -> RecognitionMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: RecognitionMode) {
        self.mode = mode;
    }

    pub fn toggle_mode(&mut self) -> RecognitionMode {
        self.mode.toggle();
        info!("Recognition mode set to {:?}", self.mode);
        self.mode
    }

    pub fn bind_model(&mut self, model: Arc<dyn ModelHandle>) {
        info!("Classification model bound ({})", model.delegate());
        self.model = Some(model);
    }

    pub fn has_model(&self) -> bool {
        self.model.is_some()
    }

    pub fn classify(&self, trace: Option<&DynamicImage>) -> Result<String, AppError> {
        match self.mode {
            RecognitionMode::Letter => Ok(self.letter_label.clone()),
            RecognitionMode::Digit => {
                let trace = trace.ok_or(AppError::MissingTrace)?;
                let model = self
                    .model
                    .as_ref()
                    .ok_or(AppError::ModelUnavailable(ModelRole::Classification))?;
                let digit = self.classifier.classify(model, trace)?;
                debug!("Classified trace as {}", digit);
                Ok(digit.to_string())
            }
        }
    }

    /// Like [`classify`](Self::classify) but never fails: errors become their message.
    pub fn classify_or_label(&self, trace: Option<&DynamicImage>) -> String {
        self.classify(trace).unwrap_or_else(|e| {
            if e.is_missing_input() {
                warn!("Classification unavailable: {}", e);
            } else {
                error!("Classification failed: {}", e);
            }
            e.to_string()
        })
    }
}
