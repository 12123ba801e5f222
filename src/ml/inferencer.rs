// ============================================================
// Layer 5 — Inferencer
// ============================================================
use anyhow::{anyhow, Result};

use crate::data::{batcher::FeatureBatcher, vectorizer::SparseVector};
use crate::infra::checkpoint::{DetectorConfig, ModelStore};
use crate::ml::model::{LogisticRegression, LogisticRegressionConfig};
use crate::ml::InferBackend;

pub struct Inferencer {
    model:     LogisticRegression<InferBackend>,
    batcher:   FeatureBatcher<InferBackend>,
    n_classes: usize,
}

impl Inferencer {
    /// Wrap an already trained model (e.g. straight out of the trainer).
    pub fn new(model: LogisticRegression<InferBackend>, model_cfg: &LogisticRegressionConfig) -> Self {
        let batcher = FeatureBatcher::new(crate::ml::device(), model_cfg.n_features);
        Self { model, batcher, n_classes: model_cfg.n_classes }
    }

    /// Rebuild the architecture described by `cfg` and load the stored weights.
    pub fn from_checkpoint(store: &ModelStore, cfg: &DetectorConfig) -> Result<Self> {
        let device    = crate::ml::device();
        let model_cfg = cfg.model_config();
        let model     = store.load_model(model_cfg.init::<InferBackend>(&device), &device)?;
        tracing::info!("Classifier loaded: {} features, {} classes", cfg.n_features, cfg.n_classes);
        Ok(Self::new(model, &model_cfg))
    }

    /// Probability for every class of a single vectorised text.
    pub fn predict_proba(&self, features: &SparseVector) -> Result<Vec<f32>> {
        let mut rows = self.predict_proba_batch(&[features])?;
        rows.pop().ok_or_else(|| anyhow!("classifier returned no output"))
    }

    /// Probabilities for several texts in one forward pass.
    pub fn predict_proba_batch(&self, rows: &[&SparseVector]) -> Result<Vec<Vec<f32>>> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let input = self.batcher.features(rows);
        let flat  = self
            .model
            .predict_proba(input)
            .into_data()
            .to_vec::<f32>()
            .map_err(|e| anyhow!("cannot read classifier output: {e:?}"))?;

        let probs: Vec<Vec<f32>> = flat.chunks(self.n_classes).map(|c| c.to_vec()).collect();
        tracing::trace!("Predicted {} rows over {} classes", probs.len(), self.n_classes);
        Ok(probs)
    }

    /// Most likely class of every row, `batch_size` rows per forward
    /// pass so only one batch is dense at a time.
    pub fn predict_classes(&self, rows: &[SparseVector], batch_size: usize) -> Result<Vec<usize>> {
        let mut predicted = Vec::with_capacity(rows.len());
        for chunk in rows.chunks(batch_size.max(1)) {
            let chunk: Vec<&SparseVector> = chunk.iter().collect();
            predicted.extend(self.predict_proba_batch(&chunk)?.iter().map(|p| argmax(p)));
        }
        Ok(predicted)
    }

    pub fn model(&self) -> &LogisticRegression<InferBackend> {
        &self.model
    }

    pub fn n_classes(&self) -> usize {
        self.n_classes
    }
}

/// Index of the largest probability. Ties go to the lower index.
pub fn argmax(probs: &[f32]) -> usize {
    probs
        .iter()
        .enumerate()
        .fold((0usize, f32::NEG_INFINITY), |best, (i, &p)| if p > best.1 { (i, p) } else { best })
        .0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_argmax() {
        assert_eq!(argmax(&[0.1, 0.7, 0.2]), 1);
        assert_eq!(argmax(&[0.5, 0.5]), 0);
        assert_eq!(argmax(&[]), 0);
    }

    #[test]
    fn test_untrained_model_gives_uniform_probabilities() {
        let model_cfg  = LogisticRegressionConfig::new(4, 2);
        let model      = model_cfg.init::<InferBackend>(&crate::ml::device());
        let inferencer = Inferencer::new(model, &model_cfg);

        let probs = inferencer.predict_proba(&vec![(1, 1.0)]).unwrap();
        assert_eq!(probs, vec![0.5, 0.5]);

        let empty: SparseVector = Vec::new();
        let batch = inferencer.predict_proba_batch(&[&empty, &empty]).unwrap();
        assert_eq!(batch.len(), 2);
    }

    #[test]
    fn test_predict_classes_in_chunks() {
        use burn::module::Param;
        use burn::tensor::Tensor;

        // feature i votes for class i
        let model_cfg = LogisticRegressionConfig::new(2, 2);
        let mut model = model_cfg.init::<InferBackend>(&crate::ml::device());
        model.linear.weight = Param::from_tensor(Tensor::<InferBackend, 2>::from_floats(
            [[1.0, 0.0], [0.0, 1.0]],
            &crate::ml::device(),
        ));
        let inferencer = Inferencer::new(model, &model_cfg);

        let rows: Vec<SparseVector> = vec![
            vec![(1, 1.0)],
            vec![(0, 1.0)],
            vec![(1, 1.0)],
            vec![(0, 1.0)],
            vec![(1, 1.0)],
        ];
        let whole = inferencer.predict_classes(&rows, rows.len()).unwrap();
        assert_eq!(whole, vec![1, 0, 1, 0, 1]);
        assert_eq!(inferencer.predict_classes(&rows, 2).unwrap(), whole);
        assert_eq!(inferencer.predict_classes(&rows, 0).unwrap(), whole);
        assert!(inferencer.predict_classes(&[], 4).unwrap().is_empty());
    }
}
