// ============================================================
// Layer 3 — Sample Domain Type
// ============================================================
// One training record: a piece of text and the language it is
// written in. The field names match the CSV header
// (`text,language`) so serde can deserialise rows directly.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A raw (text, language) pair from the training corpus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sample {
    /// The raw text as it appears in the dataset
    pub text: String,

    /// The language label, e.g. "English" or "Russian"
    pub language: String,
}

impl Sample {
    pub fn new(text: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            text:     text.into(),
            language: language.into(),
        }
    }
}

/// Count samples per language label.
/// BTreeMap keeps the output sorted for stable log lines.
pub fn label_distribution(samples: &[Sample]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for s in samples {
        *counts.entry(s.language.clone()).or_insert(0) += 1;
    }
    counts
}

/// Sorted, de-duplicated label set. The position of a label in
/// this list is its class index in the classifier.
pub fn sorted_labels(samples: &[Sample]) -> Vec<String> {
    label_distribution(samples).into_keys().collect()
}
