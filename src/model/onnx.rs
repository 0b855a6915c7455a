//! ONNX Runtime backend.
//!
//! Delegate order maps to NNAPI (hardware AI accelerator), then CUDA (GPU), then the CPU
//! provider that every session falls back to.
use std::sync::{Arc, Mutex};

use ort::execution_providers::{CUDAExecutionProvider, ExecutionProvider, NNAPIExecutionProvider};
use ort::session::Session;
use ort::value::Tensor;

use super::{
    Delegate, DelegateKind, InferenceBackend, InterpreterOptions, MappedModel, ModelHandle,
    ModelRole,
};
use crate::error::AppError;

#[derive(Debug, Default, Clone, Copy)]
pub struct OnnxBackend;

impl OnnxBackend {
    pub fn new() -> Self {
        Self
    }
}

/// Attaches when the provider was compiled in and its runtime libraries resolve.
struct ProviderProbe<P> {
    kind: DelegateKind,
    provider: P,
}

impl<P> Delegate for ProviderProbe<P>
where
    P: ExecutionProvider + Send + Sync,
{
    fn kind(&self) -> DelegateKind {
        self.kind
    }

    fn attach(&self, _options: &mut InterpreterOptions) -> Result<(), AppError> {
        match self.provider.is_available() {
            Ok(true) => Ok(()),
            Ok(false) => Err(AppError::DelegateUnavailable(
                self.kind,
                format!("{} is not available", self.provider.as_str()),
            )),
            Err(e) => Err(AppError::DelegateUnavailable(self.kind, e.to_string())),
        }
    }
}

impl InferenceBackend for OnnxBackend {
    fn name(&self) -> &'static str {
        "onnxruntime"
    }

    fn delegates(&self) -> Vec<Box<dyn Delegate>> {
        vec![
            Box::new(ProviderProbe {
                kind: DelegateKind::HardwareAccelerator,
                provider: NNAPIExecutionProvider::default(),
            }),
            Box::new(ProviderProbe {
                kind: DelegateKind::Gpu,
                provider: CUDAExecutionProvider::default(),
            }),
        ]
    }

    fn build(
        &self,
        role: ModelRole,
        model: &MappedModel,
        options: &InterpreterOptions,
    ) -> Result<Arc<dyn ModelHandle>, AppError> {
        let construction = |e: ort::Error| AppError::ModelConstruction {
            role,
            reason: e.to_string(),
        };

        let builder = Session::builder()
            .map_err(construction)?
            .with_intra_threads(options.num_threads)
            .map_err(construction)?;
        let builder = match options.delegate {
            DelegateKind::HardwareAccelerator => builder.with_execution_providers([
                NNAPIExecutionProvider::default().build().error_on_failure(),
            ]),
            DelegateKind::Gpu => builder.with_execution_providers([
                CUDAExecutionProvider::default().build().error_on_failure(),
            ]),
            DelegateKind::Cpu => Ok(builder),
        }
        .map_err(construction)?;
        let session = builder
            .commit_from_memory(model.bytes())
            .map_err(construction)?;

        Ok(Arc::new(OnnxModel {
            delegate: options.delegate,
            session: Mutex::new(session),
        }))
    }
}

struct OnnxModel {
    delegate: DelegateKind,
    session: Mutex<Session>,
}

impl ModelHandle for OnnxModel {
    fn delegate(&self) -> DelegateKind {
        self.delegate
    }

    fn run(&self, input: &[f32], input_shape: &[usize]) -> Result<Vec<f32>, AppError> {
        let inference = |e: ort::Error| AppError::Inference(e.to_string());

        let shape: Vec<i64> = input_shape.iter().map(|&d| d as i64).collect();
        let tensor = Tensor::from_array((shape, input.to_vec())).map_err(inference)?;
        let session = self
            .session
            .lock()
            .map_err(|_| AppError::Inference("session lock poisoned".to_string()))?;
        let outputs = session
            .run(ort::inputs![tensor].map_err(inference)?)
            .map_err(inference)?;
        let (_, scores) = outputs[0]
            .try_extract_raw_tensor::<f32>()
            .map_err(inference)?;
        Ok(scores.to_vec())
    }
}
