// ============================================================
// Layer 6 — Model Store
// ============================================================
// Saves and restores the trained model artifact.
//
// What gets saved (once, at the end of training):
//   1. detector_config.json — training config, label list and
//                             the feature / class counts
//   2. vectorizer.json      — vocabulary + idf (VectorizerStore)
//   3. classifier.mpk.gz    — classifier weights
//
// Why save the config separately?
//   The classifier weights only make sense with the exact
//   architecture (n_features, n_classes) and label order they
//   were trained with. The config lets the inferencer rebuild
//   that architecture before loading the weights.
//
// Burn's NamedMpkGzFileRecorder (full precision):
//   - Serialises parameters to MessagePack
//   - Compresses with gzip
//   - Keeps f32 weights, so a reloaded model predicts exactly
//     what the freshly trained one did
//   - Loading fails if the architecture doesn't match
//
// Layout:
//   model/
//     detector_config.json
//     vectorizer.json
//     classifier.mpk.gz
//     metrics.csv           ← written by MetricsLogger
//
// Reference: Burn Book §5 (Records and Checkpointing)

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{anyhow, Context, Result};
use burn::{
    prelude::*,
    record::{FullPrecisionSettings, NamedMpkGzFileRecorder},
};
use serde::{Deserialize, Serialize};

use crate::application::train_use_case::TrainConfig;
use crate::domain::error::DetectorError;
use crate::ml::model::{LogisticRegression, LogisticRegressionConfig};

const CONFIG_FILE: &str = "detector_config.json";
// the recorder appends ".mpk.gz"
const MODEL_STEM: &str  = "classifier";
const MODEL_FILE: &str  = "classifier.mpk.gz";

type WeightRecorder = NamedMpkGzFileRecorder<FullPrecisionSettings>;

/// Everything needed to rebuild the classifier and decode its output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectorConfig {
    /// The configuration the model was trained with
    pub train: TrainConfig,

    /// Label of each class index, sorted
    pub labels: Vec<String>,

    pub n_features: usize,
    pub n_classes:  usize,

    /// Accuracy on the held-out test split, if there was one
    pub test_accuracy: Option<f64>,
}

impl DetectorConfig {
    pub fn model_config(&self) -> LogisticRegressionConfig {
        LogisticRegressionConfig::new(self.n_features, self.n_classes)
    }
}

/// Manages the files of one model directory.
pub struct ModelStore {
    dir: PathBuf,
}

impl ModelStore {
    /// Point at a model directory. Nothing is created until a save.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// True when config and weights are both present.
    pub fn is_trained(&self) -> bool {
        self.dir.join(CONFIG_FILE).is_file() && self.dir.join(MODEL_FILE).is_file()
    }

    /// Fail with `NotTrained` unless the artifact files exist.
    pub fn ensure_trained(&self) -> Result<(), DetectorError> {
        if self.is_trained() {
            Ok(())
        } else {
            Err(DetectorError::NotTrained { dir: self.dir.clone() })
        }
    }

    /// Save the classifier weights.
    pub fn save_model<B: Backend>(&self, model: &LogisticRegression<B>) -> Result<()> {
        self.create_dir()?;
        let path = self.dir.join(MODEL_STEM);

        model
            .clone()
            .save_file(path.clone(), &WeightRecorder::new())
            .map_err(|e| anyhow!("Failed to save classifier to '{}': {e:?}", path.display()))?;

        tracing::debug!("Saved classifier weights to '{}'", self.dir.join(MODEL_FILE).display());
        Ok(())
    }

    /// Load stored weights into `model`, which must already have
    /// the stored architecture.
    pub fn load_model<B: Backend>(
        &self,
        model:  LogisticRegression<B>,
        device: &B::Device,
    ) -> Result<LogisticRegression<B>> {
        self.ensure_trained()?;
        let path = self.dir.join(MODEL_STEM);

        model
            .load_file(path.clone(), &WeightRecorder::new(), device)
            .map_err(|e| {
                DetectorError::ArtifactMismatch {
                    dir:    self.dir.clone(),
                    reason: format!("cannot load classifier weights: {e:?}"),
                }
                .into()
            })
    }

    /// Save the detector configuration as pretty JSON.
    pub fn save_config(&self, cfg: &DetectorConfig) -> Result<()> {
        self.create_dir()?;
        let path = self.dir.join(CONFIG_FILE);
        let json = serde_json::to_string_pretty(cfg)?;

        fs::write(&path, json)
            .with_context(|| format!("Cannot write config to '{}'", path.display()))?;

        tracing::debug!("Saved detector config to '{}'", path.display());
        Ok(())
    }

    /// Load and sanity-check the detector configuration.
    pub fn load_config(&self) -> Result<DetectorConfig> {
        self.ensure_trained()?;
        let path = self.dir.join(CONFIG_FILE);

        let json = fs::read_to_string(&path)
            .with_context(|| format!("Cannot read config from '{}'", path.display()))?;
        let cfg: DetectorConfig = serde_json::from_str(&json)
            .with_context(|| format!("Malformed config '{}'", path.display()))?;

        if cfg.labels.len() != cfg.n_classes || cfg.n_classes == 0 {
            return Err(DetectorError::ArtifactMismatch {
                dir:    self.dir.clone(),
                reason: format!("{} labels for {} classes", cfg.labels.len(), cfg.n_classes),
            }
            .into());
        }

        Ok(cfg)
    }

    fn create_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Cannot create model directory '{}'", self.dir.display()))
    }
}
