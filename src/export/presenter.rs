use std::io::Write;

use serde::Serialize;

use crate::error::AppError;

/// What the presentation layer receives when a session ends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HandOff {
    pub label: String,
    pub coordinates: String,
}

pub trait Presenter: Send {
    fn present(&mut self, hand_off: &HandOff) -> Result<(), AppError>;
}

/// Emits each hand-off as one JSON object per line.
pub struct JsonLinePresenter<W> {
    writer: W,
}

impl<W: Write + Send> JsonLinePresenter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write + Send> Presenter for JsonLinePresenter<W> {
    fn present(&mut self, hand_off: &HandOff) -> Result<(), AppError> {
        serde_json::to_writer(&mut self.writer, hand_off)?;
        self.writer
            .write_all(b"\n")
            .and_then(|_| self.writer.flush())
            .map_err(|e| AppError::Presentation(e.to_string()))
    }
}
