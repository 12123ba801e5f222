// ============================================================
// Layer 4 — Dataset Loader
// ============================================================
// Reads labelled samples from a UTF-8 CSV file using the csv
// crate. The file must have a header row with (at least) the
// columns `text` and `language`:
//
//   text,language
//   "Hello, how are you?",English
//   "Hola, ¿cómo estás?",Spanish
//
// Rows that fail to deserialise or have an empty text/label are
// logged and skipped rather than failing the whole run.

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::data::preprocessor::Preprocessor;
use crate::domain::error::DetectorError;
use crate::domain::sample::{label_distribution, Sample};
use crate::domain::traits::SampleSource;

/// Loads samples from a CSV file.
/// Implements the SampleSource trait from Layer 3.
pub struct CsvLoader {
    path: PathBuf,
}

impl CsvLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SampleSource for CsvLoader {
    fn load_all(&self) -> Result<Vec<Sample>> {
        if !self.path.exists() {
            return Err(DetectorError::DatasetNotFound { path: self.path.clone() }.into());
        }

        tracing::info!("Loading dataset from '{}'", self.path.display());

        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::Headers)
            .from_path(&self.path)
            .with_context(|| format!("Cannot open dataset '{}'", self.path.display()))?;

        let preprocessor = Preprocessor::new();
        let mut samples  = Vec::new();
        let mut skipped  = 0usize;

        for (row, record) in reader.deserialize::<Sample>().enumerate() {
            match record {
                Ok(raw) => {
                    let text     = preprocessor.clean(&raw.text);
                    let language = raw.language.trim().to_string();
                    if text.is_empty() || language.is_empty() {
                        skipped += 1;
                        continue;
                    }
                    samples.push(Sample { text, language });
                }
                Err(e) => {
                    // row + 2: one for the header, one for 1-based numbering
                    tracing::warn!("Skipping row {} of '{}': {}", row + 2, self.path.display(), e);
                    skipped += 1;
                }
            }
        }

        if samples.is_empty() {
            return Err(DetectorError::EmptyDataset { path: self.path.clone() }.into());
        }

        tracing::info!("Loaded {} samples ({} skipped)", samples.len(), skipped);
        for (language, count) in label_distribution(&samples) {
            tracing::info!("  {:<20} {}", language, count);
        }

        Ok(samples)
    }
}
