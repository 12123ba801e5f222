// ============================================================
// Layer 4 — Feature Dataset
// ============================================================
// The vectorised form of a split: one sparse TF-IDF row and one
// class index per sample. Rows stay sparse until the batcher
// densifies a mini-batch.

use anyhow::{ensure, Result};
use rand::{rngs::StdRng, seq::SliceRandom};

use crate::data::vectorizer::SparseVector;

/// Vectorised samples with their encoded class index.
/// Row `i` of `features` belongs to class `targets[i]`.
#[derive(Debug, Clone, Default)]
pub struct FeatureDataset {
    features: Vec<SparseVector>,
    targets:  Vec<usize>,
}

impl FeatureDataset {
    pub fn new(features: Vec<SparseVector>, targets: Vec<usize>) -> Result<Self> {
        ensure!(
            features.len() == targets.len(),
            "{} feature rows but {} targets",
            features.len(),
            targets.len()
        );
        Ok(Self { features, targets })
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn row(&self, index: usize) -> (&SparseVector, usize) {
        (&self.features[index], self.targets[index])
    }

    pub fn features(&self) -> &[SparseVector] {
        &self.features
    }

    pub fn targets(&self) -> &[usize] {
        &self.targets
    }

    /// Row indices grouped into mini-batches of at most `batch_size`.
    /// With an RNG the order is shuffled first.
    pub fn batch_indices(&self, batch_size: usize, rng: Option<&mut StdRng>) -> Vec<Vec<usize>> {
        let mut order: Vec<usize> = (0..self.len()).collect();
        if let Some(rng) = rng {
            order.shuffle(rng);
        }
        order
            .chunks(batch_size.max(1))
            .map(|c| c.to_vec())
            .collect()
    }
}
