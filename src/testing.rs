//! Scripted collaborators shared by the unit tests.
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use image::{DynamicImage, Rgba, RgbaImage};
use tokio::sync::Semaphore;

use crate::camera::{CameraController, CameraFacing};
use crate::common::Frame;
use crate::error::AppError;
use crate::export::{HandOff, Presenter, SnapshotSink, VideoSink, VideoSinkFactory};
use crate::model::{
    AssetSource, Delegate, DelegateKind, InferenceBackend, InterpreterOptions, MappedModel,
    ModelHandle, ModelRole,
};
use crate::pipeline::{ProcessedFrame, VisionProcessor};
use crate::view::LiveView;

/// Ordered record of calls across several fakes.
#[derive(Clone, Default)]
pub struct CallLog {
    entries: Arc<Mutex<Vec<String>>>,
}

impl CallLog {
    pub fn push(&self, entry: impl Into<String>) {
        self.entries.lock().unwrap().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.entries.lock().unwrap().clone()
    }
}

pub struct StaticAssets {
    name: String,
    bytes: Vec<u8>,
}

impl StaticAssets {
    pub fn with(name: &str, bytes: &[u8]) -> Self {
        Self {
            name: name.to_string(),
            bytes: bytes.to_vec(),
        }
    }
}

impl AssetSource for StaticAssets {
    fn open(&self, name: &str) -> io::Result<Box<dyn Read + Send>> {
        if name != self.name {
            return Err(io::Error::new(io::ErrorKind::NotFound, name.to_string()));
        }
        Ok(Box::new(io::Cursor::new(self.bytes.clone())))
    }
}

#[derive(Debug, Clone, Copy)]
pub enum FakeDelegate {
    Attaches,
    Fails,
    Panics,
}

struct ScriptedDelegate {
    kind: DelegateKind,
    behaviour: FakeDelegate,
    attempts: Arc<Mutex<Vec<DelegateKind>>>,
}

impl Delegate for ScriptedDelegate {
    fn kind(&self) -> DelegateKind {
        self.kind
    }

    fn attach(&self, _options: &mut InterpreterOptions) -> Result<(), AppError> {
        self.attempts.lock().unwrap().push(self.kind);
        match self.behaviour {
            FakeDelegate::Attaches => Ok(()),
            FakeDelegate::Fails => Err(AppError::DelegateUnavailable(
                self.kind,
                "scripted".to_string(),
            )),
            FakeDelegate::Panics => panic!("scripted delegate panic"),
        }
    }
}

/// Backend whose delegates are assigned accelerator, then GPU, in list order.
pub struct FakeBackend {
    delegates: Vec<FakeDelegate>,
    attempts: Arc<Mutex<Vec<DelegateKind>>>,
    fail_build: bool,
}

impl FakeBackend {
    pub fn new(delegates: Vec<FakeDelegate>) -> Self {
        Self {
            delegates,
            attempts: Arc::new(Mutex::new(Vec::new())),
            fail_build: false,
        }
    }

    pub fn failing_build(mut self) -> Self {
        self.fail_build = true;
        self
    }

    pub fn attempts(&self) -> Arc<Mutex<Vec<DelegateKind>>> {
        Arc::clone(&self.attempts)
    }
}

impl InferenceBackend for FakeBackend {
    fn name(&self) -> &'static str {
        "fake"
    }

    fn delegates(&self) -> Vec<Box<dyn Delegate>> {
        let kinds = [DelegateKind::HardwareAccelerator, DelegateKind::Gpu];
        self.delegates
            .iter()
            .zip(kinds)
            .map(|(&behaviour, kind)| {
                Box::new(ScriptedDelegate {
                    kind,
                    behaviour,
                    attempts: Arc::clone(&self.attempts),
                }) as Box<dyn Delegate>
            })
            .collect()
    }

    fn build(
        &self,
        role: ModelRole,
        model: &MappedModel,
        options: &InterpreterOptions,
    ) -> Result<Arc<dyn ModelHandle>, AppError> {
        if self.fail_build || model.is_empty() {
            return Err(AppError::Inference(format!("cannot build {role} model")));
        }
        Ok(Arc::new(FakeModel::with_scores(vec![0.0; 10]).on(options.delegate)))
    }
}

type RecordedInputs = Arc<Mutex<Vec<(Vec<f32>, Vec<usize>)>>>;

pub struct FakeModel {
    delegate: DelegateKind,
    scores: Vec<f32>,
    inputs: RecordedInputs,
}

impl FakeModel {
    pub fn with_scores(scores: Vec<f32>) -> Self {
        Self {
            delegate: DelegateKind::Cpu,
            scores,
            inputs: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn on(mut self, delegate: DelegateKind) -> Self {
        self.delegate = delegate;
        self
    }

    pub fn inputs(&self) -> RecordedInputs {
        Arc::clone(&self.inputs)
    }
}

impl ModelHandle for FakeModel {
    fn delegate(&self) -> DelegateKind {
        self.delegate
    }

    fn run(&self, input: &[f32], input_shape: &[usize]) -> Result<Vec<f32>, AppError> {
        self.inputs
            .lock()
            .unwrap()
            .push((input.to_vec(), input_shape.to_vec()));
        Ok(self.scores.clone())
    }
}

fn blank(side: u32) -> DynamicImage {
    DynamicImage::ImageRgba8(RgbaImage::from_pixel(side, side, Rgba([0, 0, 0, 255])))
}

/// Vision processor that counts calls. `held` processors park every `process` call until
/// [`release_all`](Self::release_all).
pub struct ScriptedVision {
    hold: Option<Semaphore>,
    fail: bool,
    panic: bool,
    trace: Option<DynamicImage>,
    coordinates: String,
    process_calls: AtomicUsize,
    reset_calls: AtomicUsize,
    bound_models: AtomicUsize,
}

impl ScriptedVision {
    fn build(hold: bool, fail: bool) -> Self {
        Self {
            hold: hold.then(|| Semaphore::new(0)),
            fail,
            panic: false,
            trace: None,
            coordinates: String::new(),
            process_calls: AtomicUsize::new(0),
            reset_calls: AtomicUsize::new(0),
            bound_models: AtomicUsize::new(0),
        }
    }

    pub fn immediate() -> Self {
        Self::build(false, false)
    }

    pub fn held() -> Self {
        Self::build(true, false)
    }

    pub fn failing() -> Self {
        Self::build(false, true)
    }

    pub fn panicking() -> Self {
        Self {
            panic: true,
            ..Self::build(false, false)
        }
    }

    pub fn with_trace(mut self) -> Self {
        self.trace = Some(blank(28));
        self
    }

    pub fn with_coordinates(mut self, coordinates: &str) -> Self {
        self.coordinates = coordinates.to_string();
        self
    }

    pub fn release_all(&self) {
        if let Some(hold) = &self.hold {
            hold.add_permits(Semaphore::MAX_PERMITS / 2);
        }
    }

    pub fn process_calls(&self) -> usize {
        self.process_calls.load(Ordering::SeqCst)
    }

    pub fn reset_calls(&self) -> usize {
        self.reset_calls.load(Ordering::SeqCst)
    }

    pub fn bound_models(&self) -> usize {
        self.bound_models.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VisionProcessor for ScriptedVision {
    fn reset(&self) {
        self.reset_calls.fetch_add(1, Ordering::SeqCst);
    }

    async fn process(&self, frame: Frame) -> Result<ProcessedFrame, AppError> {
        self.process_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(hold) = &self.hold {
            let _permit = hold
                .acquire()
                .await
                .map_err(|e| AppError::Vision(e.to_string()))?;
        }
        if self.panic {
            panic!("scripted vision panic");
        }
        if self.fail {
            return Err(AppError::Vision("scripted failure".to_string()));
        }
        Ok(ProcessedFrame {
            overlay: frame.image().clone(),
            normalized: frame.image().clone(),
        })
    }

    fn export_trace_for_inference(&self) -> Option<DynamicImage> {
        self.trace.clone()
    }

    fn tracking_coordinates(&self) -> String {
        self.coordinates.clone()
    }

    fn model_dimensions(&self) -> (u32, u32) {
        (28, 28)
    }

    fn bind_tracking_model(&self, _model: Arc<dyn ModelHandle>) {
        self.bound_models.fetch_add(1, Ordering::SeqCst);
    }
}

#[derive(Default)]
struct CameraLog {
    captures: usize,
    reopened: Vec<CameraFacing>,
}

#[derive(Clone)]
pub struct ScriptedCamera {
    preview: Option<DynamicImage>,
    facing: CameraFacing,
    log: Arc<Mutex<CameraLog>>,
}

impl ScriptedCamera {
    pub fn new() -> Self {
        Self {
            preview: Some(blank(64)),
            facing: CameraFacing::Back,
            log: Arc::default(),
        }
    }

    pub fn without_preview() -> Self {
        Self {
            preview: None,
            ..Self::new()
        }
    }

    pub fn captures(&self) -> usize {
        self.log.lock().unwrap().captures
    }

    pub fn reopened(&self) -> Vec<CameraFacing> {
        self.log.lock().unwrap().reopened.clone()
    }
}

impl CameraController for ScriptedCamera {
    fn capture_preview(&mut self) -> Option<DynamicImage> {
        self.log.lock().unwrap().captures += 1;
        self.preview.clone()
    }

    fn facing(&self) -> CameraFacing {
        self.facing
    }

    fn reopen(&mut self, facing: CameraFacing) -> Result<(), AppError> {
        self.log.lock().unwrap().reopened.push(facing);
        self.facing = facing;
        Ok(())
    }
}

#[derive(Default)]
struct ViewLog {
    displayed: usize,
    recording: Vec<bool>,
    notices: Vec<String>,
}

#[derive(Clone, Default)]
pub struct RecordingView {
    log: Arc<Mutex<ViewLog>>,
}

impl RecordingView {
    pub fn displayed(&self) -> usize {
        self.log.lock().unwrap().displayed
    }

    pub fn recording_flags(&self) -> Vec<bool> {
        self.log.lock().unwrap().recording.clone()
    }

    pub fn notices(&self) -> Vec<String> {
        self.log.lock().unwrap().notices.clone()
    }
}

impl LiveView for RecordingView {
    fn display(&mut self, _overlay: &DynamicImage) {
        self.log.lock().unwrap().displayed += 1;
    }

    fn set_recording(&mut self, recording: bool) {
        self.log.lock().unwrap().recording.push(recording);
    }

    fn notify(&mut self, message: &str) {
        self.log.lock().unwrap().notices.push(message.to_string());
    }
}

pub struct ScriptedVideoFactory {
    log: CallLog,
    fail_stop: bool,
}

impl ScriptedVideoFactory {
    pub fn new(log: CallLog) -> Self {
        Self {
            log,
            fail_stop: false,
        }
    }

    pub fn failing_stop(log: CallLog) -> Self {
        Self {
            log,
            fail_stop: true,
        }
    }
}

impl VideoSinkFactory for ScriptedVideoFactory {
    fn create(
        &self,
        width: u32,
        height: u32,
        _path: &Path,
    ) -> Result<Box<dyn VideoSink>, AppError> {
        self.log.push(format!("video.create {width}x{height}"));
        Ok(Box::new(ScriptedVideoSink {
            log: self.log.clone(),
            fail_stop: self.fail_stop,
        }))
    }
}

struct ScriptedVideoSink {
    log: CallLog,
    fail_stop: bool,
}

impl VideoSink for ScriptedVideoSink {
    fn start(&mut self) -> Result<(), AppError> {
        self.log.push("video.start");
        Ok(())
    }

    fn record_frame(&mut self, _frame: &DynamicImage) -> Result<(), AppError> {
        self.log.push("video.frame");
        Ok(())
    }

    fn stop(&mut self) -> Result<(), AppError> {
        self.log.push("video.stop");
        if self.fail_stop {
            return Err(AppError::VideoSink("muxer rejected trailer".to_string()));
        }
        Ok(())
    }
}

pub struct ScriptedSnapshotSink {
    log: CallLog,
    fail: bool,
}

impl ScriptedSnapshotSink {
    pub fn new(log: CallLog) -> Self {
        Self { log, fail: false }
    }

    pub fn failing(log: CallLog) -> Self {
        Self { log, fail: true }
    }
}

impl SnapshotSink for ScriptedSnapshotSink {
    fn save(&mut self, _image: &DynamicImage) -> Result<PathBuf, AppError> {
        self.log.push("snapshot.save");
        if self.fail {
            return Err(AppError::Io(io::Error::other("disk full")));
        }
        Ok(PathBuf::from("Pictures/Processed_0.jpg"))
    }
}

pub struct RecordingPresenter {
    log: CallLog,
    fail: bool,
}

impl RecordingPresenter {
    pub fn new(log: CallLog) -> Self {
        Self { log, fail: false }
    }

    pub fn failing(log: CallLog) -> Self {
        Self { log, fail: true }
    }
}

impl Presenter for RecordingPresenter {
    fn present(&mut self, hand_off: &HandOff) -> Result<(), AppError> {
        if self.fail {
            return Err(AppError::Presentation("presentation layer gone".to_string()));
        }
        self.log
            .push(format!("present {} | {}", hand_off.label, hand_off.coordinates));
        Ok(())
    }
}
