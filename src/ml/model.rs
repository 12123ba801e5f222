// ============================================================
// Layer 5 — Logistic Regression Model
// ============================================================
// One Linear layer from TF-IDF features to language logits.
// Softmax over the logits gives the class probabilities.
//
//   features [batch, n_features]
//       │  Linear (W: [n_features, n_classes], b: [n_classes])
//       ▼
//   logits   [batch, n_classes] ──softmax──► probabilities
//
// Reference: Burn Book §3 (Modules)

use burn::{
    nn::{loss::CrossEntropyLossConfig, Initializer, Linear, LinearConfig},
    prelude::*,
    tensor::activation::softmax,
};

// NOTE: #[derive(Config)] already generates Clone and Serialize/Deserialize
// internally. Do NOT add them again or you get conflicting impls.
#[derive(Config, Debug)]
pub struct LogisticRegressionConfig {
    /// Vocabulary size of the fitted vectorizer
    pub n_features: usize,
    /// Number of languages seen at training time
    pub n_classes:  usize,
}

impl LogisticRegressionConfig {
    /// Build the model with all weights and biases at zero, so every
    /// language starts equally likely and training is deterministic.
    pub fn init<B: Backend>(&self, device: &B::Device) -> LogisticRegression<B> {
        let linear = LinearConfig::new(self.n_features, self.n_classes)
            .with_initializer(Initializer::Zeros)
            .init(device);
        LogisticRegression { linear }
    }
}

/// Multinomial logistic regression: one linear layer whose logits
/// go through softmax.
#[derive(Module, Debug)]
pub struct LogisticRegression<B: Backend> {
    pub linear: Linear<B>,
}

impl<B: Backend> LogisticRegression<B> {
    /// features: [batch, n_features] → logits: [batch, n_classes]
    pub fn forward(&self, features: Tensor<B, 2>) -> Tensor<B, 2> {
        self.linear.forward(features)
    }

    /// Class probabilities, each row sums to 1.
    pub fn predict_proba(&self, features: Tensor<B, 2>) -> Tensor<B, 2> {
        softmax(self.forward(features), 1)
    }

    /// Half the squared L2 norm of the weights. The bias is not
    /// penalised.
    pub fn l2_penalty(&self) -> Tensor<B, 1> {
        self.linear.weight.val().powf_scalar(2.0).sum().mul_scalar(0.5)
    }

    /// Mean cross-entropy over the batch, plus the logits.
    pub fn forward_loss(
        &self,
        features: Tensor<B, 2>,
        targets:  Tensor<B, 1, Int>,
    ) -> (Tensor<B, 1>, Tensor<B, 2>) {
        let logits = self.forward(features);
        let ce     = CrossEntropyLossConfig::new().init(&logits.device());
        let loss   = ce.forward(logits.clone(), targets);
        (loss, logits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    type B = NdArray;

    #[test]
    fn test_zero_initialised_model_is_uniform() {
        let device = Default::default();
        let model: LogisticRegression<B> = LogisticRegressionConfig::new(3, 4).init(&device);
        let x      = Tensor::<B, 2>::ones([2, 3], &device);
        let probs  = model.predict_proba(x).into_data().to_vec::<f32>().unwrap();
        assert_eq!(probs.len(), 8);
        for p in probs {
            assert!((p - 0.25).abs() < 1e-6);
        }
    }

    #[test]
    fn test_initial_loss_is_ln_of_class_count() {
        let device  = Default::default();
        let model: LogisticRegression<B> = LogisticRegressionConfig::new(2, 3).init(&device);
        let x       = Tensor::<B, 2>::ones([2, 2], &device);
        let targets = Tensor::<B, 1, Int>::from_ints([0, 2], &device);
        let (loss, logits) = model.forward_loss(x, targets);
        assert_eq!(logits.dims(), [2, 3]);
        let loss: f32 = loss.into_scalar().elem();
        assert!((loss - 3f32.ln()).abs() < 1e-5);
    }

    #[test]
    fn test_l2_penalty_ignores_bias() {
        let device = Default::default();
        let mut model: LogisticRegression<B> = LogisticRegressionConfig::new(2, 2).init(&device);
        assert_eq!(model.l2_penalty().into_scalar(), 0.0);

        let weight = Tensor::<B, 2>::from_floats([[1.0, -2.0], [0.0, 2.0]], &device);
        let bias   = Tensor::<B, 1>::from_floats([5.0, 5.0], &device);
        model.linear.weight = burn::module::Param::from_tensor(weight);
        model.linear.bias   = Some(burn::module::Param::from_tensor(bias));

        // 0.5 * (1 + 4 + 0 + 4)
        assert!((model.l2_penalty().into_scalar() - 4.5).abs() < 1e-6);
    }
}
