//! Model staging, delegate probing and interpreter construction.
//!
//! Each [`ModelRole`] is loaded by one [`ModelLoader`] on a blocking background task. A loader
//! stages its asset into a writable directory, probes the backend's delegates in priority
//! order, maps the staged file read-only and publishes the built [`ModelHandle`] as a
//! [`ModelEvent`]. Nothing in this module is fatal to the caller: failures become
//! [`ModelEvent::Failed`].
pub mod asset;
pub mod backend;
pub mod delegate;
pub mod loader;
pub mod mapped;
#[cfg(feature = "onnx")]
pub mod onnx;
pub mod role;

pub use asset::{AssetSource, DirectoryAssetSource, stage_asset};
pub use backend::{InferenceBackend, ModelHandle};
pub use delegate::{Delegate, DelegateAttempt, DelegateKind, InterpreterOptions, probe_delegates};
pub use loader::{LoadedModel, ModelEvent, ModelLoader};
pub use mapped::MappedModel;
#[cfg(feature = "onnx")]
pub use onnx::OnnxBackend;
pub use role::ModelRole;
