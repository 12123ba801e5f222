// ============================================================
// Layer 2 — TrainUseCase
// ============================================================
// Orchestrates the full training pipeline in order:
//
//   Step 1: Load the CSV dataset          (Layer 4 - data)
//   Step 2: Stratified train/test split   (Layer 4 - data)
//   Step 3: Fit the TF-IDF vectorizer     (Layer 4 - data)
//   Step 4: Encode labels + vectorise     (Layer 4 - data)
//   Step 5: Run training loop             (Layer 5 - ml)
//   Step 6: Evaluate on the test split    (Layer 5 - ml)
//   Step 7: Save the artifact             (Layer 6 - infra)
//   Step 8: Sample prediction preview     (Layer 2 - detector)
//
// Reference: Rust Book §13 (Iterators and Closures)
//            Burn Book §5 (Training)

use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::application::detect_use_case::LanguageDetector;
use crate::data::{
    dataset::FeatureDataset,
    loader::CsvLoader,
    splitter::stratified_split,
    vectorizer::{TfidfVectorizer, VectorizerParams},
};
use crate::domain::{
    detection::Analysis,
    sample::{sorted_labels, Sample},
    traits::SampleSource,
};
use crate::infra::{
    checkpoint::{DetectorConfig, ModelStore},
    metrics::MetricsLogger,
    vectorizer_store::VectorizerStore,
};
use crate::ml::{
    evaluation::ClassificationReport,
    inferencer::Inferencer,
    model::LogisticRegressionConfig,
    trainer::run_training,
};

// ─── Training Configuration ──────────────────────────────────────────────────
// All hyperparameters for a training run.
// Serialisable so it is stored in detector_config.json next to the
// model it produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainConfig {
    pub dataset:       String,
    pub model_dir:     String,
    pub epochs:        usize,
    pub batch_size:    usize,
    pub lr:            f64,
    /// Inverse L2 regularisation strength; smaller is stronger
    pub c:             f64,
    pub test_fraction: f64,
    pub seed:          u64,
    pub max_features:  usize,
    pub min_df:        usize,
    pub max_df:        f32,
    pub ngram_min:     usize,
    pub ngram_max:     usize,
}

impl Default for TrainConfig {
    fn default() -> Self {
        let vectorizer = VectorizerParams::default();
        Self {
            dataset:       "dataset/language_data.csv".to_string(),
            model_dir:     "model".to_string(),
            epochs:        30,
            batch_size:    64,
            lr:            0.05,
            c:             1.0,
            test_fraction: 0.2,
            seed:          42,
            max_features:  vectorizer.max_features,
            min_df:        vectorizer.min_df,
            max_df:        vectorizer.max_df,
            ngram_min:     vectorizer.ngram_min,
            ngram_max:     vectorizer.ngram_max,
        }
    }
}

impl TrainConfig {
    pub fn vectorizer_params(&self) -> VectorizerParams {
        VectorizerParams {
            ngram_min:    self.ngram_min,
            ngram_max:    self.ngram_max,
            max_features: self.max_features,
            min_df:       self.min_df,
            max_df:       self.max_df,
        }
    }
}

// ─── TrainSummary ─────────────────────────────────────────────────────────────
/// What a finished training run reports back to the CLI.
#[derive(Debug)]
pub struct TrainSummary {
    pub model_dir:  PathBuf,
    pub n_samples:  usize,
    pub n_train:    usize,
    pub n_test:     usize,
    pub labels:     Vec<String>,
    pub n_features: usize,
    /// `None` when the test split came out empty
    pub report:     Option<ClassificationReport>,
    /// First test sample (or first training sample) run through the
    /// freshly trained detector
    pub preview:    Option<(Sample, Analysis)>,
}

// ─── TrainUseCase ─────────────────────────────────────────────────────────────
pub struct TrainUseCase {
    config: TrainConfig,
}

impl TrainUseCase {
    pub fn new(config: TrainConfig) -> Self {
        Self { config }
    }

    /// Train on the CSV dataset named in the config.
    pub fn execute(&self) -> Result<TrainSummary> {
        let loader = CsvLoader::new(&self.config.dataset);
        self.execute_with(&loader)
    }

    /// Train on any sample source.
    pub fn execute_with(&self, source: &impl SampleSource) -> Result<TrainSummary> {
        let cfg = &self.config;

        // ── Step 1: Load samples ──────────────────────────────────────────────
        let samples   = source.load_all()?;
        let n_samples = samples.len();
        let labels    = sorted_labels(&samples);
        tracing::info!("{} samples across {} languages", n_samples, labels.len());

        // ── Step 2: Stratified split ──────────────────────────────────────────
        // Every language keeps at least one training sample
        let (train, test) = stratified_split(samples, cfg.test_fraction, cfg.seed);
        tracing::info!("Split: {} train, {} test", train.len(), test.len());

        // ── Step 3: Fit the vectorizer on training texts only ─────────────────
        let train_texts: Vec<String> = train.iter().map(|s| s.text.clone()).collect();
        let vectorizer = TfidfVectorizer::fit(cfg.vectorizer_params(), &train_texts)?;

        // ── Step 4: Encode labels and vectorise both splits ───────────────────
        let label_index: HashMap<&str, usize> = labels
            .iter()
            .enumerate()
            .map(|(i, l)| (l.as_str(), i))
            .collect();

        let encode = |split: &[Sample]| -> Result<FeatureDataset> {
            let features = split.iter().map(|s| vectorizer.transform(&s.text)).collect();
            let targets  = split.iter().map(|s| label_index[s.language.as_str()]).collect();
            FeatureDataset::new(features, targets)
        };
        let train_dataset = encode(&train)?;
        let test_dataset  = encode(&test)?;

        // ── Step 5: Train ─────────────────────────────────────────────────────
        let model_cfg = LogisticRegressionConfig::new(vectorizer.n_features(), labels.len());
        let metrics   = MetricsLogger::create(&cfg.model_dir)?;
        let model     = run_training(cfg, &model_cfg, &train_dataset, &test_dataset, Some(&metrics))?;
        tracing::info!("Epoch metrics written to '{}'", metrics.csv_path().display());

        // ── Step 6: Evaluate ──────────────────────────────────────────────────
        let inferencer = Inferencer::new(model, &model_cfg);
        let report = if test_dataset.is_empty() {
            tracing::warn!("Test split is empty, skipping evaluation");
            None
        } else {
            let predicted = inferencer.predict_classes(test_dataset.features(), cfg.batch_size)?;
            let report = ClassificationReport::new(&labels, test_dataset.targets(), &predicted);
            tracing::info!("Test accuracy: {:.4}", report.accuracy);
            Some(report)
        };

        // ── Step 7: Save the artifact ─────────────────────────────────────────
        let store = ModelStore::new(&cfg.model_dir);
        store.save_model(inferencer.model())?;
        VectorizerStore::new(&cfg.model_dir).save(&vectorizer)?;
        store.save_config(&DetectorConfig {
            train:         cfg.clone(),
            labels:        labels.clone(),
            n_features:    vectorizer.n_features(),
            n_classes:     labels.len(),
            test_accuracy: report.as_ref().map(|r| r.accuracy),
        })?;
        tracing::info!("Model saved to '{}'", store.dir().display());

        // ── Step 8: Preview one prediction ────────────────────────────────────
        let n_features = vectorizer.n_features();
        let detector   = LanguageDetector::from_parts(vectorizer, inferencer, labels.clone())?;
        let preview = match test.first().or_else(|| train.first()) {
            Some(sample) => {
                let analysis = detector.analyze(&sample.text, false)?;
                Some((sample.clone(), analysis))
            }
            None => None,
        };

        Ok(TrainSummary {
            model_dir: store.dir().to_path_buf(),
            n_samples,
            n_train: train.len(),
            n_test: test.len(),
            labels,
            n_features,
            report,
            preview,
        })
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// A tiny three-language corpus with clearly separated scripts.
    pub(crate) fn toy_corpus() -> Vec<Sample> {
        let english = [
            "the cat sat on the mat",
            "where is the train station",
            "this is a small house",
            "the weather is nice today",
            "i like to read books",
            "we walk in the park",
        ];
        let russian = [
            "кошка сидит на ковре",
            "где находится вокзал",
            "это маленький дом",
            "сегодня хорошая погода",
            "я люблю читать книги",
            "мы гуляем в парке",
        ];
        let greek = [
            "η γάτα κάθεται στο χαλί",
            "πού είναι ο σταθμός",
            "αυτό είναι ένα μικρό σπίτι",
            "ο καιρός είναι ωραίος σήμερα",
            "μου αρέσει να διαβάζω βιβλία",
            "περπατάμε στο πάρκο",
        ];

        english
            .iter()
            .map(|t| Sample::new(*t, "English"))
            .chain(russian.iter().map(|t| Sample::new(*t, "Russian")))
            .chain(greek.iter().map(|t| Sample::new(*t, "Greek")))
            .collect()
    }

    pub(crate) fn toy_config(model_dir: &std::path::Path) -> TrainConfig {
        TrainConfig {
            model_dir:  model_dir.to_string_lossy().into_owned(),
            epochs:     40,
            batch_size: 8,
            lr:         0.1,
            min_df:     1,
            max_df:     1.0,
            ..TrainConfig::default()
        }
    }

    #[test]
    fn test_default_vectorizer_params() {
        assert_eq!(TrainConfig::default().vectorizer_params(), VectorizerParams::default());
    }

    #[test]
    fn test_training_writes_full_artifact() {
        let dir     = tempfile::tempdir().unwrap();
        let summary = TrainUseCase::new(toy_config(dir.path()))
            .execute_with(&toy_corpus())
            .unwrap();

        assert_eq!(summary.n_samples, 18);
        assert_eq!(summary.n_train + summary.n_test, 18);
        assert_eq!(summary.labels, vec!["English", "Greek", "Russian"]);
        assert!(summary.report.is_some());

        for file in ["detector_config.json", "vectorizer.json", "classifier.mpk.gz", "metrics.csv"] {
            assert!(dir.path().join(file).is_file(), "{file} missing");
        }

        let (sample, analysis) = summary.preview.unwrap();
        assert_eq!(analysis.detected_language.as_deref(), Some(sample.language.as_str()));
    }

    #[test]
    fn test_missing_dataset_fails() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = TrainConfig {
            dataset: dir.path().join("nope.csv").to_string_lossy().into_owned(),
            ..toy_config(dir.path())
        };
        assert!(TrainUseCase::new(cfg).execute().is_err());
    }
}
