pub mod classifier;
pub mod coordinator;
pub mod mode;
pub mod tensor;

pub use classifier::{DigitClassifier, argmax};
pub use coordinator::InferenceCoordinator;
pub use mode::RecognitionMode;
pub use tensor::{desaturate, pack_red_channel, trace_to_tensor};
