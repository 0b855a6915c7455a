use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use super::{
    AssetSource, DelegateKind, InferenceBackend, InterpreterOptions, MappedModel, ModelHandle,
    ModelRole, probe_delegates, stage_asset,
};
use crate::config::Configuration;
use crate::error::AppError;

/// Outcome of one background load, published to the owning context.
pub enum ModelEvent {
    Ready {
        role: ModelRole,
        handle: Arc<dyn ModelHandle>,
    },
    Failed {
        role: ModelRole,
        error: String,
    },
}

impl ModelEvent {
    pub fn role(&self) -> ModelRole {
        match self {
            ModelEvent::Ready { role, .. } | ModelEvent::Failed { role, .. } => *role,
        }
    }
}

impl fmt::Debug for ModelEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelEvent::Ready { role, handle } => f
                .debug_struct("Ready")
                .field("role", role)
                .field("delegate", &handle.delegate())
                .finish(),
            ModelEvent::Failed { role, error } => f
                .debug_struct("Failed")
                .field("role", role)
                .field("error", error)
                .finish(),
        }
    }
}

pub struct LoadedModel {
    pub role: ModelRole,
    pub path: PathBuf,
    pub delegate: DelegateKind,
    pub handle: Arc<dyn ModelHandle>,
}

/// Stages, configures and builds one model. Instantiated once per [`ModelRole`].
pub struct ModelLoader {
    role: ModelRole,
    asset_name: String,
    staging_dir: PathBuf,
    source: Arc<dyn AssetSource>,
    backend: Arc<dyn InferenceBackend>,
}

impl ModelLoader {
    pub fn new(
        role: ModelRole,
        asset_name: impl Into<String>,
        staging_dir: impl Into<PathBuf>,
        source: Arc<dyn AssetSource>,
        backend: Arc<dyn InferenceBackend>,
    ) -> Self {
        Self {
            role,
            asset_name: asset_name.into(),
            staging_dir: staging_dir.into(),
            source,
            backend,
        }
    }

    /// Picks the configured asset for `role` and stages it into the configured directory.
    pub fn from_configuration(
        role: ModelRole,
        configuration: &Configuration,
        source: Arc<dyn AssetSource>,
        backend: Arc<dyn InferenceBackend>,
    ) -> Self {
        let asset_name = match role {
            ModelRole::Tracking => &configuration.tracking_model,
            ModelRole::Classification => &configuration.classification_model,
        };
        Self::new(
            role,
            asset_name.clone(),
            configuration.staging_dir.clone(),
            source,
            backend,
        )
    }

    pub fn role(&self) -> ModelRole {
        self.role
    }

    /// Runs the whole load on the calling thread.
    pub fn load(&self) -> Result<LoadedModel, AppError> {
        let path = stage_asset(self.source.as_ref(), &self.asset_name, &self.staging_dir)?;

        let mut options = InterpreterOptions::cpu_baseline();
        let delegates = self.backend.delegates();
        let delegate = probe_delegates(&mut options, &delegates);

        let model = MappedModel::open(&path).map_err(|e| self.construction_error(e))?;
        let handle = self
            .backend
            .build(self.role, &model, &options)
            .map_err(|e| self.construction_error(e))?;

        info!(
            "Loaded {} model {} on {} via {}",
            self.role,
            self.asset_name,
            delegate,
            self.backend.name()
        );
        Ok(LoadedModel {
            role: self.role,
            path,
            delegate,
            handle,
        })
    }

    /// Loads on a blocking worker and publishes exactly one [`ModelEvent`] into `publish`.
    pub fn spawn<M>(self, publish: mpsc::Sender<M>) -> JoinHandle<()>
    where
        M: From<ModelEvent> + Send + 'static,
    {
        tokio::task::spawn_blocking(move || {
            let event = match self.load() {
                Ok(loaded) => ModelEvent::Ready {
                    role: loaded.role,
                    handle: loaded.handle,
                },
                Err(e) => {
                    error!("Failed to load {} model: {}", self.role, e);
                    ModelEvent::Failed {
                        role: self.role,
                        error: e.to_string(),
                    }
                }
            };
            if publish.blocking_send(M::from(event)).is_err() {
                warn!("{} model finished loading after its consumer went away", self.role);
            }
        })
    }

    fn construction_error(&self, error: AppError) -> AppError {
        match error {
            AppError::ModelConstruction { .. } => error,
            other => AppError::ModelConstruction {
                role: self.role,
                reason: other.to_string(),
            },
        }
    }
}
