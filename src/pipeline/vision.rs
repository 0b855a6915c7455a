use std::sync::Arc;

use async_trait::async_trait;
use image::DynamicImage;

use crate::common::Frame;
use crate::error::AppError;
use crate::model::ModelHandle;

/// What the vision processor hands back for one frame.
#[derive(Clone)]
pub struct ProcessedFrame {
    /// Camera frame with the tracking overlay drawn on it, shown in the live view.
    pub overlay: DynamicImage,
    /// Frame at model dimensions, fed to the video sink.
    pub normalized: DynamicImage,
}

/// The tracking algorithm. It accumulates the trajectory internally across `process` calls.
#[async_trait]
pub trait VisionProcessor: Send + Sync {
    /// Forgets the trajectory and any tracking state from the previous session.
    fn reset(&self);

    async fn process(&self, frame: Frame) -> Result<ProcessedFrame, AppError>;

    /// Renders the accumulated path as a classifier input, if anything was tracked.
    fn export_trace_for_inference(&self) -> Option<DynamicImage>;

    /// The trajectory as `x,y,z;x,y,z;...`.
    fn tracking_coordinates(&self) -> String;

    fn model_dimensions(&self) -> (u32, u32);

    fn bind_tracking_model(&self, model: Arc<dyn ModelHandle>);
}
