use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, trace, warn};
use uuid::Uuid;

use super::{FrameStats, InFlightGate, ProcessedFrame, VisionProcessor};
use crate::camera::CameraController;
use crate::common::Frame;
use crate::error::AppError;
use crate::export::Recorder;
use crate::view::LiveView;

/// Result of one `process` call, marshaled back to the owning context.
pub struct FrameCompletion {
    pub session_id: Uuid,
    pub frame_id: Uuid,
    pub result: Result<ProcessedFrame, AppError>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameDisposition {
    Dispatched(Uuid),
    /// Another frame was still in flight.
    Dropped,
    /// No session is processing.
    Idle,
    /// The camera had no preview bitmap to hand over.
    NoPreview,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionOutcome {
    Applied,
    Stale,
    Failed,
}

pub struct FramePipeline {
    vision: Arc<dyn VisionProcessor>,
    gate: InFlightGate,
    stats: FrameStats,
}

impl FramePipeline {
    pub fn new(vision: Arc<dyn VisionProcessor>) -> Self {
        Self {
            vision,
            gate: InFlightGate::new(),
            stats: FrameStats::default(),
        }
    }

    pub fn vision(&self) -> &Arc<dyn VisionProcessor> {
        &self.vision
    }

    pub fn is_in_flight(&self) -> bool {
        self.gate.is_in_flight()
    }

    pub fn stats(&self) -> FrameStats {
        self.stats
    }

    pub fn reset_stats(&mut self) {
        self.stats.reset();
    }

    /// Dispatches the current preview unless a frame is already in flight.
    ///
    /// `session_id` is `None` while idle. The completion is posted into `completions` from the
    /// processing task, never applied from there.
    pub fn on_frame_available<M>(
        &mut self,
        session_id: Option<Uuid>,
        camera: &mut dyn CameraController,
        completions: &mpsc::Sender<M>,
    ) -> FrameDisposition
    where
        M: From<FrameCompletion> + Send + 'static,
    {
        let Some(session_id) = session_id else {
            return FrameDisposition::Idle;
        };
        self.stats.delivered += 1;

        if !self.gate.try_acquire() {
            self.stats.dropped += 1;
            trace!("Frame dropped, previous frame still in flight");
            return FrameDisposition::Dropped;
        }

        let Some(image) = camera.capture_preview() else {
            self.gate.release();
            debug!("No preview bitmap available");
            return FrameDisposition::NoPreview;
        };

        let frame = Frame::new(session_id, image);
        let frame_id = frame.frame_id();
        self.stats.dispatched += 1;
        debug!("Dispatching frame {}", frame_id);

        let vision = Arc::clone(&self.vision);
        let completions = completions.clone();
        tokio::spawn(async move {
            // A panic inside `process` still yields a completion.
            let result = tokio::spawn(async move { vision.process(frame).await })
                .await
                .unwrap_or_else(|e| {
                    Err(AppError::Vision(format!("frame processing aborted: {e}")))
                });
            let completion = FrameCompletion {
                session_id,
                frame_id,
                result,
            };
            if completions.send(M::from(completion)).await.is_err() {
                debug!("Frame {} finished after the session owner went away", frame_id);
            }
        });

        FrameDisposition::Dispatched(frame_id)
    }

    /// Applies a completion on the owning context. Results for anything but `active_session`
    /// are discarded. The gate is released only after the side effects.
    pub fn on_frame_processed(
        &mut self,
        completion: FrameCompletion,
        active_session: Option<Uuid>,
        view: &mut dyn LiveView,
        recorder: &mut Recorder,
    ) -> CompletionOutcome {
        let outcome = if active_session != Some(completion.session_id) {
            self.stats.stale += 1;
            debug!("Discarding stale frame {}", completion.frame_id);
            CompletionOutcome::Stale
        } else {
            match completion.result {
                Ok(processed) => {
                    view.display(&processed.overlay);
                    recorder.record(&processed.normalized);
                    CompletionOutcome::Applied
                }
                Err(e) => {
                    self.stats.failed += 1;
                    warn!("Frame {} failed: {}", completion.frame_id, e);
                    CompletionOutcome::Failed
                }
            }
        };

        self.gate.release();
        outcome
    }
}
