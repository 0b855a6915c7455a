use std::path::PathBuf;

use tracing::{info, warn};

use super::{HandOff, Presenter, Recorder, SnapshotSink};
use crate::common::coordinates_or_default;
use crate::inference::InferenceCoordinator;
use crate::pipeline::VisionProcessor;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReport {
    pub video: Option<PathBuf>,
    pub snapshot: Option<PathBuf>,
    pub label: String,
    pub coordinates: String,
    pub handed_off: bool,
    /// User-facing notes for steps that did not complete.
    pub failures: Vec<String>,
}

/// The stop sequence: finalize video, save snapshot, classify, collect the trajectory,
/// hand off. Best effort: no step retries and no step's failure skips the later ones.
pub struct ArtifactExporter {
    snapshot_sink: Option<Box<dyn SnapshotSink>>,
    presenter: Box<dyn Presenter>,
}

impl ArtifactExporter {
    /// Snapshots are exported only when a sink is supplied.
    pub fn new(
        snapshot_sink: Option<Box<dyn SnapshotSink>>,
        presenter: Box<dyn Presenter>,
    ) -> Self {
        Self {
            snapshot_sink,
            presenter,
        }
    }

    pub fn run(
        &mut self,
        recorder: &mut Recorder,
        vision: &dyn VisionProcessor,
        inference: &InferenceCoordinator,
    ) -> ExportReport {
        let mut failures = Vec::new();

        let video = match recorder.finalize() {
            Ok(video) => video,
            Err(e) => {
                failures.push(format!("Video not finalized: {e}"));
                None
            }
        };

        // Exported once and shared by the snapshot and the classifier.
        let trace = vision.export_trace_for_inference();

        let snapshot = match (self.snapshot_sink.as_mut(), trace.as_ref()) {
            (Some(sink), Some(trace)) => match sink.save(trace) {
                Ok(path) => Some(path),
                Err(e) => {
                    warn!("Snapshot export failed: {}", e);
                    failures.push(format!("Snapshot not saved: {e}"));
                    None
                }
            },
            (Some(_), None) => {
                info!("Nothing tracked, skipping snapshot");
                None
            }
            (None, _) => None,
        };

        let label = inference.classify_or_label(trace.as_ref());

        let coordinates = coordinates_or_default(&vision.tracking_coordinates());

        let hand_off = HandOff {
            label: label.clone(),
            coordinates: coordinates.clone(),
        };
        let handed_off = match self.presenter.present(&hand_off) {
            Ok(()) => true,
            Err(e) => {
                warn!("Hand-off failed: {}", e);
                failures.push(e.to_string());
                false
            }
        };

        info!("Export finished: label {:?}, handed off: {}", label, handed_off);
        ExportReport {
            video,
            snapshot,
            label,
            coordinates,
            handed_off,
            failures,
        }
    }
}
