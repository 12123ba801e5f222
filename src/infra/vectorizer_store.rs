// ============================================================
// Layer 6 — Vectorizer Store
// ============================================================
// Persists the fitted TF-IDF vectorizer as JSON next to the
// classifier weights, so detection uses exactly the vocabulary
// and idf weights the classifier was trained on.

use std::{fs, path::PathBuf};

use anyhow::{Context, Result};

use crate::data::vectorizer::TfidfVectorizer;
use crate::domain::error::DetectorError;

const VECTORIZER_FILE: &str = "vectorizer.json";

pub struct VectorizerStore {
    dir: PathBuf,
}

impl VectorizerStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Write the vectorizer to `{dir}/vectorizer.json`.
    pub fn save(&self, vectorizer: &TfidfVectorizer) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Cannot create model directory '{}'", self.dir.display()))?;
        let path = self.dir.join(VECTORIZER_FILE);

        // Compact JSON: the vocabulary can hold thousands of entries
        let json = serde_json::to_string(vectorizer)?;
        fs::write(&path, json)
            .with_context(|| format!("Cannot write vectorizer to '{}'", path.display()))?;

        tracing::info!(
            "Vectorizer with {} features saved to '{}'",
            vectorizer.n_features(),
            path.display()
        );
        Ok(())
    }

    /// Load a previously saved vectorizer.
    pub fn load(&self) -> Result<TfidfVectorizer> {
        let path = self.dir.join(VECTORIZER_FILE);
        if !path.is_file() {
            return Err(DetectorError::NotTrained { dir: self.dir.clone() }.into());
        }

        let json = fs::read_to_string(&path)
            .with_context(|| format!("Cannot read vectorizer from '{}'", path.display()))?;

        serde_json::from_str(&json).map_err(|e| {
            DetectorError::ArtifactMismatch {
                dir:    self.dir.clone(),
                reason: format!("malformed vectorizer: {e}"),
            }
            .into()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::vectorizer::VectorizerParams;

    #[test]
    fn test_save_and_load() {
        let dir    = tempfile::tempdir().unwrap();
        let store  = VectorizerStore::new(dir.path());
        let params = VectorizerParams { min_df: 1, max_df: 1.0, ..VectorizerParams::default() };
        let docs   = vec!["kirja koulu".to_string(), "livre école".to_string()];
        let v      = TfidfVectorizer::fit(params, &docs).unwrap();

        store.save(&v).unwrap();
        let loaded = store.load().unwrap();
        assert_eq!(loaded.terms(), v.terms());
        assert_eq!(loaded.transform("école"), v.transform("école"));
    }

    #[test]
    fn test_missing_vectorizer_is_not_trained() {
        let dir = tempfile::tempdir().unwrap();
        let err = VectorizerStore::new(dir.path()).load().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DetectorError>(),
            Some(DetectorError::NotTrained { .. })
        ));
    }
}
