use std::sync::Arc;

use image::DynamicImage;

use super::tensor::trace_to_tensor;
use crate::error::AppError;
use crate::model::ModelHandle;

/// Index of the largest score. Ties resolve to the earliest index; NaN never wins.
pub fn argmax(scores: &[f32]) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (index, &score) in scores.iter().enumerate() {
        match best {
            Some((_, top)) if score <= top || score.is_nan() => {}
            None if score.is_nan() => {}
            _ => best = Some((index, score)),
        }
    }
    best.map(|(index, _)| index)
}

#[derive(Debug, Clone, Copy)]
pub struct DigitClassifier {
    input_side: u32,
    class_count: usize,
}

impl DigitClassifier {
    pub fn new(input_side: u32, class_count: usize) -> Self {
        Self {
            input_side,
            class_count,
        }
    }

    pub fn input_shape(&self) -> [usize; 4] {
        let side = self.input_side as usize;
        [1, side, side, 1]
    }

    pub fn classify(
        &self,
        model: &Arc<dyn ModelHandle>,
        trace: &DynamicImage,
    ) -> Result<usize, AppError> {
        let input = trace_to_tensor(trace, self.input_side);
        let scores = model.run(&input, &self.input_shape())?;
        if scores.len() < self.class_count {
            return Err(AppError::Inference(format!(
                "expected {} class scores, got {}",
                self.class_count,
                scores.len()
            )));
        }
        argmax(&scores[..self.class_count])
            .ok_or_else(|| AppError::Inference("model produced no usable scores".to_string()))
    }
}
