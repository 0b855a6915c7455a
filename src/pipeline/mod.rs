//! Per-frame dispatch with single-frame backpressure.
pub mod controller;
pub mod gate;
pub mod stats;
pub mod vision;

pub use controller::{CompletionOutcome, FrameCompletion, FrameDisposition, FramePipeline};
pub use gate::InFlightGate;
pub use stats::FrameStats;
pub use vision::{ProcessedFrame, VisionProcessor};
