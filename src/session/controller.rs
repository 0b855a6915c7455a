use std::ops::ControlFlow;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::{SessionEvent, SessionHandle, SessionState, SessionStateMachine};
use crate::camera::CameraController;
use crate::config::Configuration;
use crate::error::AppError;
use crate::export::{
    ArtifactExporter, ExportReport, JpegSnapshotSink, Presenter, Recorder, SnapshotSink,
    VideoSinkFactory,
};
use crate::inference::{DigitClassifier, InferenceCoordinator, RecognitionMode};
use crate::model::{ModelEvent, ModelLoader, ModelRole};
use crate::pipeline::{
    CompletionOutcome, FrameCompletion, FrameDisposition, FramePipeline, FrameStats,
    VisionProcessor,
};
use crate::view::LiveView;

/// Sole owner of the session's mutable state. Every mutation happens on the task that drives
/// [`run`](Self::run) (or, in tests, on whoever holds `&mut self`).
pub struct SessionController {
    machine: SessionStateMachine,
    pipeline: FramePipeline,
    inference: InferenceCoordinator,
    recorder: Recorder,
    exporter: ArtifactExporter,
    camera: Box<dyn CameraController>,
    view: Box<dyn LiveView>,
    event_tx: mpsc::Sender<SessionEvent>,
    event_rx: mpsc::Receiver<SessionEvent>,
}

impl SessionController {
    pub fn builder(configuration: Configuration) -> SessionControllerBuilder {
        SessionControllerBuilder::new(configuration)
    }

    pub fn handle(&self) -> SessionHandle {
        SessionHandle::new(self.event_tx.clone())
    }

    pub fn state(&self) -> SessionState {
        self.machine.state()
    }

    pub fn mode(&self) -> RecognitionMode {
        self.inference.mode()
    }

    pub fn frame_stats(&self) -> FrameStats {
        self.pipeline.stats()
    }

    pub fn is_frame_in_flight(&self) -> bool {
        self.pipeline.is_in_flight()
    }

    pub fn has_classification_model(&self) -> bool {
        self.inference.has_model()
    }

    /// Starts each loader on its own blocking worker; results arrive as [`SessionEvent::Model`].
    pub fn spawn_model_loaders(
        &self,
        loaders: impl IntoIterator<Item = ModelLoader>,
    ) -> Vec<JoinHandle<()>> {
        loaders
            .into_iter()
            .map(|loader| {
                debug!("Loading {} model in the background", loader.role());
                loader.spawn(self.event_tx.clone())
            })
            .collect()
    }

    pub fn start(&mut self) {
        let Some(session_id) = self.machine.start() else {
            return;
        };
        self.pipeline.reset_stats();
        self.pipeline.vision().reset();

        if self.recorder.can_record() {
            let (width, height) = self.pipeline.vision().model_dimensions();
            if let Err(e) = self.recorder.open(width, height) {
                warn!("Recording without video export: {}", e);
                self.view.notify(&format!("Video export unavailable: {e}"));
            }
        }

        self.view.set_recording(true);
        info!("Session {} started", session_id);
    }

    /// Ends the session and runs the export sequence. `None` if nothing was running.
    pub fn stop(&mut self) -> Option<ExportReport> {
        let session_id = self.machine.stop()?;
        self.view.set_recording(false);

        let stats = self.pipeline.stats();
        info!(
            "Session {} stopped: {} frames delivered, {} dispatched, {} dropped, {} stale",
            session_id, stats.delivered, stats.dispatched, stats.dropped, stats.stale
        );

        let report = self.exporter.run(
            &mut self.recorder,
            self.pipeline.vision().as_ref(),
            &self.inference,
        );
        for failure in &report.failures {
            self.view.notify(failure);
        }
        Some(report)
    }

    /// Never reopens the device under an active recording: the session is stopped first.
    pub fn switch_camera(&mut self) {
        if self.machine.state().is_recording() {
            info!("Stopping session before switching camera");
            self.stop();
        }

        let facing = self.camera.facing().toggled();
        match self.camera.reopen(facing) {
            Ok(()) => info!("Camera switched to {:?}", facing),
            Err(e) => {
                warn!("Camera switch failed: {}", e);
                self.view.notify(&format!("Could not switch camera: {e}"));
            }
        }
    }

    pub fn toggle_mode(&mut self) -> RecognitionMode {
        self.inference.toggle_mode()
    }

    pub fn on_frame_available(&mut self) -> FrameDisposition {
        self.pipeline.on_frame_available(
            self.machine.session_id(),
            self.camera.as_mut(),
            &self.event_tx,
        )
    }

    pub fn on_frame_processed(&mut self, completion: FrameCompletion) -> CompletionOutcome {
        self.pipeline.on_frame_processed(
            completion,
            self.machine.session_id(),
            self.view.as_mut(),
            &mut self.recorder,
        )
    }

    pub fn on_model_event(&mut self, event: ModelEvent) {
        match event {
            ModelEvent::Ready {
                role: ModelRole::Tracking,
                handle,
            } => {
                info!("Tracking model bound ({})", handle.delegate());
                self.pipeline.vision().bind_tracking_model(handle);
            }
            ModelEvent::Ready {
                role: ModelRole::Classification,
                handle,
            } => self.inference.bind_model(handle),
            ModelEvent::Failed { role, error } => {
                warn!("{} model unavailable for this run", role);
                self.view.notify(&error);
            }
        }
    }

    pub fn handle_event(&mut self, event: SessionEvent) -> ControlFlow<()> {
        match event {
            SessionEvent::Start => self.start(),
            SessionEvent::Stop => {
                self.stop();
            }
            SessionEvent::SwitchCamera => self.switch_camera(),
            SessionEvent::ToggleMode => {
                self.toggle_mode();
            }
            SessionEvent::FrameAvailable => {
                self.on_frame_available();
            }
            SessionEvent::FrameProcessed(completion) => {
                self.on_frame_processed(completion);
            }
            SessionEvent::Model(event) => self.on_model_event(event),
            SessionEvent::Shutdown => {
                self.stop();
                return ControlFlow::Break(());
            }
        }
        ControlFlow::Continue(())
    }

    /// Waits for the next event without handling it.
    pub async fn next_event(&mut self) -> Option<SessionEvent> {
        self.event_rx.recv().await
    }

    /// Drains the inbox until [`SessionEvent::Shutdown`].
    pub async fn run(mut self) {
        info!("Session controller running");
        while let Some(event) = self.event_rx.recv().await {
            if self.handle_event(event).is_break() {
                break;
            }
        }
        info!("Session controller stopped");
    }
}

pub struct SessionControllerBuilder {
    configuration: Configuration,
    vision: Option<Arc<dyn VisionProcessor>>,
    camera: Option<Box<dyn CameraController>>,
    view: Option<Box<dyn LiveView>>,
    presenter: Option<Box<dyn Presenter>>,
    video_sink_factory: Option<Box<dyn VideoSinkFactory>>,
    snapshot_sink: Option<Box<dyn SnapshotSink>>,
}

impl SessionControllerBuilder {
    pub fn new(configuration: Configuration) -> Self {
        Self {
            configuration,
            vision: None,
            camera: None,
            view: None,
            presenter: None,
            video_sink_factory: None,
            snapshot_sink: None,
        }
    }

    // Enables video export, this will override the default configuration.
    pub fn export_video(mut self, export_video: bool) -> Self {
        self.configuration.export_video = export_video;
        self
    }

    // Enables snapshot export, this will override the default configuration.
    pub fn export_snapshot(mut self, export_snapshot: bool) -> Self {
        self.configuration.export_snapshot = export_snapshot;
        self
    }

    // Sets the letter-mode label, this will override the default configuration.
    pub fn letter_label(mut self, letter_label: impl Into<String>) -> Self {
        self.configuration.letter_label = letter_label.into();
        self
    }

    // Adjusts the inbox size, this will override the default configuration.
    pub fn event_buffer_size(mut self, event_buffer_size: usize) -> Self {
        self.configuration.event_buffer_size = event_buffer_size;
        self
    }

    pub fn vision(mut self, vision: Arc<dyn VisionProcessor>) -> Self {
        self.vision = Some(vision);
        self
    }

    pub fn camera(mut self, camera: Box<dyn CameraController>) -> Self {
        self.camera = Some(camera);
        self
    }

    pub fn view(mut self, view: Box<dyn LiveView>) -> Self {
        self.view = Some(view);
        self
    }

    pub fn presenter(mut self, presenter: Box<dyn Presenter>) -> Self {
        self.presenter = Some(presenter);
        self
    }

    pub fn video_sink_factory(mut self, factory: Box<dyn VideoSinkFactory>) -> Self {
        self.video_sink_factory = Some(factory);
        self
    }

    // Replaces the JPEG writer used for snapshots.
    pub fn snapshot_sink(mut self, sink: Box<dyn SnapshotSink>) -> Self {
        self.snapshot_sink = Some(sink);
        self
    }

    pub fn build(self) -> Result<SessionController, AppError> {
        let configuration = self.configuration;
        let vision = self
            .vision
            .ok_or(AppError::Session("Vision processor not set".to_string()))?;
        let camera = self
            .camera
            .ok_or(AppError::Session("Camera controller not set".to_string()))?;
        let view = self
            .view
            .ok_or(AppError::Session("Live view not set".to_string()))?;
        let presenter = self
            .presenter
            .ok_or(AppError::Session("Presenter not set".to_string()))?;

        let snapshot_sink = if configuration.export_snapshot {
            Some(self.snapshot_sink.unwrap_or_else(|| {
                Box::new(JpegSnapshotSink::new(configuration.pictures_dir.clone()))
            }))
        } else {
            None
        };
        let video_sink_factory = if configuration.export_video {
            if self.video_sink_factory.is_none() {
                warn!("Video export enabled but no video encoder supplied, video export disabled");
            }
            self.video_sink_factory
        } else {
            None
        };

        let (event_tx, event_rx) = mpsc::channel(configuration.event_buffer_size.max(1));
        Ok(SessionController {
            machine: SessionStateMachine::new(),
            pipeline: FramePipeline::new(vision),
            inference: InferenceCoordinator::new(
                DigitClassifier::new(
                    configuration.digit_input_side,
                    configuration.digit_class_count,
                ),
                configuration.letter_label.clone(),
            ),
            recorder: Recorder::new(video_sink_factory, configuration.movies_dir.clone()),
            exporter: ArtifactExporter::new(snapshot_sink, presenter),
            camera,
            view,
            event_tx,
            event_rx,
        })
    }
}
