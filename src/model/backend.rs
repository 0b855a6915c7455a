use std::sync::Arc;

use super::{Delegate, DelegateKind, InterpreterOptions, MappedModel, ModelRole};
use crate::error::AppError;

/// A constructed inference engine instance.
pub trait ModelHandle: Send + Sync {
    fn delegate(&self) -> DelegateKind;

    /// Runs one forward pass over a flat `f32` input laid out as `input_shape`.
    fn run(&self, input: &[f32], input_shape: &[usize]) -> Result<Vec<f32>, AppError>;
}

/// Builds [`ModelHandle`]s and advertises which delegates it can bind, best first.
pub trait InferenceBackend: Send + Sync {
    fn name(&self) -> &'static str;

    fn delegates(&self) -> Vec<Box<dyn Delegate>>;

    fn build(
        &self,
        role: ModelRole,
        model: &MappedModel,
        options: &InterpreterOptions,
    ) -> Result<Arc<dyn ModelHandle>, AppError>;
}
