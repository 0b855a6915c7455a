pub mod orchestrator;
pub mod paths;
pub mod presenter;
pub mod recorder;
pub mod sinks;
pub mod snapshot;

pub use orchestrator::{ArtifactExporter, ExportReport};
pub use paths::{artifact_path, artifact_file_name};
pub use presenter::{HandOff, JsonLinePresenter, Presenter};
pub use recorder::Recorder;
pub use sinks::{SnapshotSink, VideoSink, VideoSinkFactory};
pub use snapshot::JpegSnapshotSink;
