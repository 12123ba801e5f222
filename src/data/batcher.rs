// ============================================================
// Layer 4 — Feature Batcher
// ============================================================
// Converts sparse TF-IDF rows into dense burn tensors.
//
// How batching works here:
//   Input:  N sparse rows (index, weight) and N class indices
//   Output: FeatureBatch with
//             features: [N, n_features]  (zeros except the
//                                         row's known n-grams)
//             targets:  [N]
//
//   Each row is scattered into one flat Vec<f32> of length
//   N * n_features, then reshaped:
//   [r1_f1, ..., r1_fF, r2_f1, ..., rN_fF] → [N, F]
//
// Reference: Burn Book §4 (Batcher)

use burn::{prelude::*, tensor::TensorData};

use crate::data::{dataset::FeatureDataset, vectorizer::SparseVector};

/// A mini-batch ready for the classifier forward pass.
#[derive(Debug, Clone)]
pub struct FeatureBatch<B: Backend> {
    /// Dense TF-IDF features, shape [batch_size, n_features]
    pub features: Tensor<B, 2>,

    /// Class index per row, shape [batch_size]
    pub targets: Tensor<B, 1, Int>,
}

/// Holds the device so tensors are created where the model lives.
#[derive(Clone, Debug)]
pub struct FeatureBatcher<B: Backend> {
    device:     B::Device,
    n_features: usize,
}

impl<B: Backend> FeatureBatcher<B> {
    pub fn new(device: B::Device, n_features: usize) -> Self {
        Self { device, n_features }
    }

    /// Stack the rows at `indices` into one batch.
    pub fn batch(&self, dataset: &FeatureDataset, indices: &[usize]) -> FeatureBatch<B> {
        let rows: Vec<&SparseVector> = indices.iter().map(|&i| dataset.row(i).0).collect();
        let targets: Vec<i32> = indices
            .iter()
            .map(|&i| dataset.row(i).1 as i32)
            .collect();

        let features = self.features(&rows);
        let targets  = Tensor::<B, 1, Int>::from_ints(
            TensorData::new(targets, [indices.len()]),
            &self.device,
        );

        FeatureBatch { features, targets }
    }

    /// Dense [rows.len(), n_features] tensor from sparse rows.
    pub fn features(&self, rows: &[&SparseVector]) -> Tensor<B, 2> {
        let mut flat = vec![0.0f32; rows.len() * self.n_features];
        for (r, row) in rows.iter().enumerate() {
            let offset = r * self.n_features;
            for &(i, w) in row.iter() {
                // indices past the vocabulary cannot come from the
                // vectorizer that sized this batcher
                if i < self.n_features {
                    flat[offset + i] = w;
                }
            }
        }

        Tensor::<B, 2>::from_floats(
            TensorData::new(flat, [rows.len(), self.n_features]),
            &self.device,
        )
    }
}
