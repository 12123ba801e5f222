// ============================================================
// Layer 5 — Training Loop
// ============================================================
// Mini-batch training of the logistic regression with Adam.
//
// The objective is the mean cross-entropy plus an L2 penalty on
// the weights scaled by 1 / (C · n_train), which is the per-sample
// form of C-regularised logistic regression. Reported losses are
// the plain cross-entropy.
//
// Burn notes:
//   - Training runs on TrainBackend (Autodiff<NdArray>) for gradients
//   - model.valid() returns the model on InferBackend (NdArray)
//   - the validation batcher therefore uses InferBackend too
//   - argmax(1) returns [batch, 1], flatten before .equal()
//
// Reference: Burn Book §5, Kingma & Ba (2015) Adam

use anyhow::Result;
use burn::{
    module::AutodiffModule,
    optim::{AdamConfig, GradientsParams, Optimizer},
    prelude::*,
};
use rand::{rngs::StdRng, SeedableRng};

use crate::application::train_use_case::TrainConfig;
use crate::data::{batcher::FeatureBatcher, dataset::FeatureDataset};
use crate::infra::metrics::{EpochMetrics, MetricsLogger};
use crate::ml::model::{LogisticRegression, LogisticRegressionConfig};
use crate::ml::{InferBackend, TrainBackend};

/// Train a classifier on `train_dataset`, reporting loss and accuracy
/// on `val_dataset` after every epoch. Returns the trained model on
/// the inference backend.
pub fn run_training(
    cfg:           &TrainConfig,
    model_cfg:     &LogisticRegressionConfig,
    train_dataset: &FeatureDataset,
    val_dataset:   &FeatureDataset,
    metrics:       Option<&MetricsLogger>,
) -> Result<LogisticRegression<InferBackend>> {
    let device = crate::ml::device();
    tracing::info!("Using device: {:?}", device);

    // ── Build model ───────────────────────────────────────────────────────────
    let mut model: LogisticRegression<TrainBackend> = model_cfg.init(&device);
    tracing::info!(
        "Model ready: {} features → {} classes",
        model_cfg.n_features,
        model_cfg.n_classes
    );

    // ── Adam optimiser ────────────────────────────────────────────────────────
    let mut optim = AdamConfig::new().with_epsilon(1e-8).init();
    let l2 = l2_weight(cfg.c, train_dataset.len());
    tracing::info!("L2 penalty weight: {:.6} (C={})", l2, cfg.c);

    let train_batcher = FeatureBatcher::<TrainBackend>::new(device.clone(), model_cfg.n_features);
    let val_batcher   = FeatureBatcher::<InferBackend>::new(device.clone(), model_cfg.n_features);

    // Seeded so the batch order, and with zero init the whole run, is reproducible
    let mut rng = StdRng::seed_from_u64(cfg.seed);

    let mut best: Option<EpochMetrics> = None;

    // ── Epoch loop ────────────────────────────────────────────────────────────
    for epoch in 1..=cfg.epochs {
        let mut train_loss_sum = 0.0f64;
        let mut train_batches  = 0usize;

        for indices in train_dataset.batch_indices(cfg.batch_size, Some(&mut rng)) {
            let batch   = train_batcher.batch(train_dataset, &indices);
            let (ce, _) = model.forward_loss(batch.features, batch.targets);

            train_loss_sum += ce.clone().into_scalar().elem::<f64>();
            train_batches  += 1;

            let loss = ce + model.l2_penalty().mul_scalar(l2);

            // Backward pass + Adam update
            let grads = loss.backward();
            let grads = GradientsParams::from_grads(grads, &model);
            model     = optim.step(cfg.lr, model, grads);
        }

        let avg_train_loss = if train_batches > 0 {
            train_loss_sum / train_batches as f64
        } else {
            f64::NAN
        };

        // ── Validation phase ──────────────────────────────────────────────────
        let (val_loss, val_accuracy) =
            validate(&model.valid(), val_dataset, &val_batcher, cfg.batch_size);

        tracing::info!(
            "Epoch {:>3}/{} | train_loss={:.4} | val_loss={:.4} | val_acc={:.1}%",
            epoch,
            cfg.epochs,
            avg_train_loss,
            val_loss,
            val_accuracy * 100.0,
        );

        let row = EpochMetrics::new(epoch, avg_train_loss, val_loss, val_accuracy);
        if let Some(logger) = metrics {
            logger.log(&row)?;
        }
        if best.as_ref().map_or(true, |b| row.is_improvement(b.val_loss)) {
            best = Some(row);
        }
    }

    match best {
        Some(b) if !b.val_loss.is_nan() => tracing::info!(
            "Training complete. Lowest val_loss {:.4} at epoch {} (val_acc={:.1}%)",
            b.val_loss,
            b.epoch,
            b.val_accuracy * 100.0,
        ),
        _ => tracing::info!("Training complete"),
    }
    Ok(model.valid())
}

/// Per-sample weight of the L2 penalty. C ≤ 0 disables it.
fn l2_weight(c: f64, n_train: usize) -> f64 {
    if c <= 0.0 || n_train == 0 {
        0.0
    } else {
        1.0 / (c * n_train as f64)
    }
}

/// Average loss and accuracy of `model` over `dataset`.
/// An empty dataset gives (NaN, 0.0).
fn validate(
    model:      &LogisticRegression<InferBackend>,
    dataset:    &FeatureDataset,
    batcher:    &FeatureBatcher<InferBackend>,
    batch_size: usize,
) -> (f64, f64) {
    let mut loss_sum = 0.0f64;
    let mut batches  = 0usize;
    let mut correct  = 0usize;

    for indices in dataset.batch_indices(batch_size, None) {
        let batch          = batcher.batch(dataset, &indices);
        let (loss, logits) = model.forward_loss(batch.features, batch.targets.clone());

        loss_sum += loss.into_scalar().elem::<f64>();
        batches  += 1;

        // argmax(1) returns shape [batch, 1], flatten to [batch]
        let predicted = logits.argmax(1).flatten::<1>(0, 1);
        let hits: i64 = predicted
            .equal(batch.targets)
            .int()
            .sum()
            .into_scalar()
            .elem::<i64>();
        correct += hits as usize;
    }

    let avg_loss = if batches > 0 { loss_sum / batches as f64 } else { f64::NAN };
    let accuracy = if dataset.is_empty() { 0.0 } else { correct as f64 / dataset.len() as f64 };
    (avg_loss, accuracy)
}
