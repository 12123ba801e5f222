// ============================================================
// Layer 5 — ML / Model Layer (Burn)
// ============================================================
// The classifier and everything that runs it.
//
//   model.rs      — multinomial logistic regression
//                   (one Linear layer + softmax)
//
//   trainer.rs    — mini-batch training loop with Adam,
//                   per-epoch validation loss / accuracy
//
//   inferencer.rs — loads stored weights and turns TF-IDF
//                   vectors into class probabilities
//
//   evaluation.rs — accuracy and per-language precision,
//                   recall and F1 on the test split
//
// Everything runs on the CPU ndarray backend; training wraps it
// in Autodiff for gradients.
//
// Reference: Burn Book §3 (Building Blocks), §5 (Training)

use burn::backend::{ndarray::NdArrayDevice, Autodiff, NdArray};

/// Logistic regression model definition
pub mod model;

/// Training loop with validation
pub mod trainer;

/// Inference engine
pub mod inferencer;

/// Accuracy and classification report
pub mod evaluation;

/// Backend used for gradient-based training
pub type TrainBackend = Autodiff<NdArray>;

/// Backend used for inference and validation
pub type InferBackend = NdArray;

/// The device every tensor of this crate is created on.
pub fn device() -> NdArrayDevice {
    NdArrayDevice::default()
}
