// ============================================================
// Layer 2 — Language Detector
// ============================================================
// Loads a trained artifact once and answers many queries:
//
//   detect        → language + confidence (+ probabilities)
//   analyze       → detect + text statistics
//   analyze_page  → analyze + per-line breakdown
//
// The artifact is immutable after loading, so a detector can be
// shared freely by the CLI, the word detector and the REPL.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{ensure, Result};

use crate::data::{preprocessor::Preprocessor, vectorizer::TfidfVectorizer};
use crate::domain::{
    detection::{Analysis, Detection, LineAnalysis, PageAnalysis},
    error::DetectorError,
    stats::TextStats,
};
use crate::infra::{checkpoint::ModelStore, vectorizer_store::VectorizerStore};
use crate::ml::inferencer::{argmax, Inferencer};

pub struct LanguageDetector {
    vectorizer:   TfidfVectorizer,
    inferencer:   Inferencer,
    labels:       Vec<String>,
    preprocessor: Preprocessor,
}

impl LanguageDetector {
    /// Load the artifact stored in `model_dir`.
    ///
    /// Fails with [`DetectorError::NotTrained`] when nothing has been
    /// trained there yet, and with [`DetectorError::ArtifactMismatch`]
    /// when the stored pieces don't fit together.
    pub fn load(model_dir: impl AsRef<Path>) -> Result<Self> {
        let dir   = model_dir.as_ref();
        let store = ModelStore::new(dir);
        let cfg   = store.load_config()?;

        let vectorizer = VectorizerStore::new(dir).load()?;
        if vectorizer.n_features() != cfg.n_features {
            return Err(DetectorError::ArtifactMismatch {
                dir:    dir.to_path_buf(),
                reason: format!(
                    "vectorizer has {} features, classifier expects {}",
                    vectorizer.n_features(),
                    cfg.n_features
                ),
            }
            .into());
        }

        let inferencer = Inferencer::from_checkpoint(&store, &cfg)?;
        let detector   = Self::from_parts(vectorizer, inferencer, cfg.labels)?;

        tracing::info!(
            "Detector loaded from '{}'. Supported languages: {}",
            dir.display(),
            detector.labels.join(", ")
        );
        Ok(detector)
    }

    /// Assemble a detector from freshly trained parts.
    pub fn from_parts(
        vectorizer: TfidfVectorizer,
        inferencer: Inferencer,
        labels:     Vec<String>,
    ) -> Result<Self> {
        ensure!(
            labels.len() == inferencer.n_classes(),
            "{} labels for a classifier with {} classes",
            labels.len(),
            inferencer.n_classes()
        );
        Ok(Self { vectorizer, inferencer, labels, preprocessor: Preprocessor::new() })
    }

    /// Probability of every label for `text`, in label order.
    /// `None` for blank text.
    pub fn probabilities(&self, text: &str) -> Result<Option<Vec<f32>>> {
        let text = self.preprocessor.normalize_input(text);
        if text.trim().is_empty() {
            return Ok(None);
        }
        let features = self.vectorizer.transform(&text);
        Ok(Some(self.inferencer.predict_proba(&features)?))
    }

    /// Map label → probability for a probability row.
    pub fn label_map(&self, probs: &[f32]) -> BTreeMap<String, f32> {
        self.labels.iter().cloned().zip(probs.iter().copied()).collect()
    }

    /// Best label and its probability for a probability row.
    pub fn best(&self, probs: &[f32]) -> (String, f32) {
        let idx = argmax(probs);
        (self.labels[idx].clone(), probs.get(idx).copied().unwrap_or(0.0))
    }

    pub fn detect(&self, text: &str, with_probabilities: bool) -> Result<Detection> {
        let Some(probs) = self.probabilities(text)? else {
            return Ok(Detection::empty());
        };

        let (language, confidence) = self.best(&probs);
        tracing::debug!("Detected {} ({:.3})", language, confidence);

        Ok(Detection {
            language: Some(language),
            confidence,
            probabilities: with_probabilities.then(|| self.label_map(&probs)),
            message: None,
        })
    }

    /// Detection combined with the statistics of `text`.
    pub fn analyze(&self, text: &str, with_probabilities: bool) -> Result<Analysis> {
        let detection = self.detect(text, with_probabilities)?;
        Ok(Analysis::new(detection, TextStats::of(text)))
    }

    /// Analyse a whole page, then every non-blank line on its own.
    pub fn analyze_page(&self, text: &str, with_probabilities: bool) -> Result<PageAnalysis> {
        let overall = self.analyze(text, with_probabilities)?;

        let mut line_breakdown        = Vec::new();
        let mut languages_present     = Vec::new();
        let mut language_distribution = BTreeMap::new();

        for (i, line) in text.split('\n').enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let line_result = self.analyze(line, false)?;
            let stats       = &line_result.statistics;

            if let Some(language) = &line_result.detected_language {
                if !languages_present.contains(language) {
                    languages_present.push(language.clone());
                }
                *language_distribution.entry(language.clone()).or_insert(0) += 1;
            }

            line_breakdown.push(LineAnalysis {
                line_number:     i + 1,
                text:            line.to_string(),
                language:        line_result.detected_language.clone(),
                confidence:      line_result.confidence,
                letter_count:    stats.letters,
                word_count:      stats.words,
                character_count: stats.characters_no_spaces,
            });
        }

        Ok(PageAnalysis { overall, line_breakdown, languages_present, language_distribution })
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }
}
