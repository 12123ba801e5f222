// ============================================================
// Layer 4 — Character n-gram TF-IDF Vectorizer
// ============================================================
// Turns text into sparse TF-IDF feature vectors built from
// character n-grams taken inside word boundaries ("char_wb"):
//
//   "Hola mundo", n = 1..=3
//     words:   " hola "  " mundo "
//     1-grams: ' ' 'h' 'o' 'l' 'a' ' ' ...
//     2-grams: " h" "ho" "ol" "la" "a " ...
//     3-grams: " ho" "hol" "ola" "la " ...
//
// Character n-grams work for every script, need no tokenizer,
// and are robust to the short inputs a detector gets (single
// words, one line of OCR output).
//
// Fitting:
//   1. df(t)  = number of documents containing n-gram t
//   2. keep   min_df <= df(t) <= max_df * n_docs
//   3. keep   the max_features most frequent n-grams overall
//   4. sort   the vocabulary lexicographically → feature index
//   5. idf(t) = ln((1 + n_docs) / (1 + df(t))) + 1
//
// Transforming:
//   weight(t) = count(t in text) * idf(t), then L2-normalised.
//
// Reference: Manning et al., Introduction to Information Retrieval §6.2

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::domain::error::DetectorError;

/// A sparse feature vector: (feature index, weight), sorted by index.
pub type SparseVector = Vec<(usize, f32)>;

/// Hyperparameters of the vectorizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorizerParams {
    /// Smallest n-gram length (inclusive)
    pub ngram_min: usize,

    /// Largest n-gram length (inclusive)
    pub ngram_max: usize,

    /// Upper bound on the vocabulary size
    pub max_features: usize,

    /// Minimum number of documents an n-gram must appear in
    pub min_df: usize,

    /// Maximum fraction of documents an n-gram may appear in
    pub max_df: f32,
}

impl Default for VectorizerParams {
    fn default() -> Self {
        Self {
            ngram_min:    1,
            ngram_max:    3,
            max_features: 5000,
            min_df:       2,
            max_df:       0.95,
        }
    }
}

/// A fitted TF-IDF vectorizer. Immutable once fitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "StoredVectorizer", into = "StoredVectorizer")]
pub struct TfidfVectorizer {
    params: VectorizerParams,

    /// Vocabulary in feature-index order
    terms: Vec<String>,

    /// n-gram → feature index
    index: HashMap<String, usize>,

    /// Inverse document frequency per feature
    idf: Vec<f32>,
}

impl TfidfVectorizer {
    /// Learn the vocabulary and idf weights from `documents`.
    pub fn fit(params: VectorizerParams, documents: &[String]) -> Result<Self, DetectorError> {
        let n_docs = documents.len();

        // ── Step 1: document and corpus frequencies ───────────────────────────
        let mut df: HashMap<String, usize> = HashMap::new();
        let mut tf: HashMap<String, usize> = HashMap::new();

        for doc in documents {
            let grams = char_wb_ngrams(doc, params.ngram_min, params.ngram_max);
            let mut seen: HashSet<&str> = HashSet::new();
            for g in &grams {
                *tf.entry(g.clone()).or_insert(0) += 1;
                if seen.insert(g.as_str()) {
                    *df.entry(g.clone()).or_insert(0) += 1;
                }
            }
        }

        // ── Step 2: prune by document frequency ───────────────────────────────
        let max_doc_count = params.max_df as f64 * n_docs as f64;
        let mut kept: Vec<(String, usize)> = df
            .iter()
            .filter(|&(_, &d)| d >= params.min_df && (d as f64) <= max_doc_count)
            .map(|(t, _)| (t.clone(), tf[t]))
            .collect();

        // ── Step 3: cap the vocabulary size ───────────────────────────────────
        if kept.len() > params.max_features {
            kept.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
            kept.truncate(params.max_features);
        }

        if kept.is_empty() {
            return Err(DetectorError::EmptyVocabulary {
                min_df:    params.min_df,
                max_df:    params.max_df,
                documents: n_docs,
            });
        }

        // ── Step 4: index the vocabulary in lexicographic order ───────────────
        let mut terms: Vec<String> = kept.into_iter().map(|(t, _)| t).collect();
        terms.sort();

        // ── Step 5: smooth idf ────────────────────────────────────────────────
        let idf: Vec<f32> = terms
            .iter()
            .map(|t| {
                let d = df[t] as f64;
                (((1.0 + n_docs as f64) / (1.0 + d)).ln() + 1.0) as f32
            })
            .collect();

        tracing::info!(
            "Vectorizer fitted: {} features from {} documents (n-grams {}..={})",
            terms.len(),
            n_docs,
            params.ngram_min,
            params.ngram_max,
        );

        Ok(Self::from_parts(params, terms, idf))
    }

    fn from_parts(params: VectorizerParams, terms: Vec<String>, idf: Vec<f32>) -> Self {
        let index = terms
            .iter()
            .enumerate()
            .map(|(i, t)| (t.clone(), i))
            .collect();
        Self { params, terms, index, idf }
    }

    /// TF-IDF vector of `text`, L2-normalised.
    /// Text without any known n-gram yields an empty vector.
    pub fn transform(&self, text: &str) -> SparseVector {
        let mut counts: BTreeMap<usize, f32> = BTreeMap::new();
        for g in char_wb_ngrams(text, self.params.ngram_min, self.params.ngram_max) {
            if let Some(&i) = self.index.get(&g) {
                *counts.entry(i).or_insert(0.0) += 1.0;
            }
        }

        let mut vector: SparseVector = counts
            .into_iter()
            .map(|(i, c)| (i, c * self.idf[i]))
            .collect();

        let norm = vector.iter().map(|(_, w)| w * w).sum::<f32>().sqrt();
        if norm > 0.0 {
            for (_, w) in vector.iter_mut() {
                *w /= norm;
            }
        }
        vector
    }

    /// Number of features (vocabulary size)
    pub fn n_features(&self) -> usize {
        self.terms.len()
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }
}

/// Character n-grams inside word boundaries.
///
/// The text is lowercased and split on whitespace. Each word is
/// padded with one space on both sides; for every `n` the padded
/// word is slid over. A padded word no longer than `n` is emitted
/// once as a whole and longer n are skipped for that word.
pub fn char_wb_ngrams(text: &str, ngram_min: usize, ngram_max: usize) -> Vec<String> {
    let lowered = text.to_lowercase();
    let mut grams = Vec::new();

    for word in lowered.split_whitespace() {
        let padded: Vec<char> = std::iter::once(' ')
            .chain(word.chars())
            .chain(std::iter::once(' '))
            .collect();
        let len = padded.len();

        for n in ngram_min.max(1)..=ngram_max {
            if len <= n {
                grams.push(padded.iter().collect());
                break;
            }
            for start in 0..=(len - n) {
                grams.push(padded[start..start + n].iter().collect());
            }
        }
    }

    grams
}

// ─── Persistence shape ────────────────────────────────────────────────────────
// The lookup index is derived from `terms`, so only terms and
// idf go to disk.
#[derive(Serialize, Deserialize)]
struct StoredVectorizer {
    params: VectorizerParams,
    terms:  Vec<String>,
    idf:    Vec<f32>,
}

impl From<TfidfVectorizer> for StoredVectorizer {
    fn from(v: TfidfVectorizer) -> Self {
        Self { params: v.params, terms: v.terms, idf: v.idf }
    }
}

impl TryFrom<StoredVectorizer> for TfidfVectorizer {
    type Error = String;

    fn try_from(s: StoredVectorizer) -> Result<Self, Self::Error> {
        if s.terms.len() != s.idf.len() {
            return Err(format!(
                "vectorizer has {} terms but {} idf weights",
                s.terms.len(),
                s.idf.len()
            ));
        }
        Ok(Self::from_parts(s.params, s.terms, s.idf))
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn docs(texts: &[&str]) -> Vec<String> {
        texts.iter().map(|t| t.to_string()).collect()
    }

    fn permissive() -> VectorizerParams {
        VectorizerParams { min_df: 1, max_df: 1.0, ..VectorizerParams::default() }
    }

    #[test]
    fn test_char_wb_ngrams_pads_words() {
        let grams = char_wb_ngrams("Ab", 2, 3);
        // padded " ab " → 2-grams then 3-grams
        assert_eq!(grams, vec![" a", "ab", "b ", " ab", "ab "]);
    }

    #[test]
    fn test_short_word_is_emitted_once() {
        // padded " a " has length 3: one 3-gram, no 4-grams
        let grams = char_wb_ngrams("a", 3, 4);
        assert_eq!(grams, vec![" a "]);
    }

    #[test]
    fn test_ngrams_for_non_latin_scripts() {
        let grams = char_wb_ngrams("书", 1, 2);
        assert_eq!(grams, vec![" ", "书", " ", " 书", "书 "]);
    }

    #[test]
    fn test_vocabulary_is_sorted() {
        let v = TfidfVectorizer::fit(permissive(), &docs(&["hola", "hello"])).unwrap();
        let mut sorted = v.terms().to_vec();
        sorted.sort();
        assert_eq!(v.terms(), sorted.as_slice());
    }

    #[test]
    fn test_min_df_prunes_rare_ngrams() {
        let params = VectorizerParams { min_df: 2, max_df: 1.0, ..VectorizerParams::default() };
        let v = TfidfVectorizer::fit(params, &docs(&["abc", "abd"])).unwrap();
        assert!(v.terms().iter().any(|t| t == "ab"));
        assert!(!v.terms().iter().any(|t| t == "bc"));
    }

    #[test]
    fn test_max_df_prunes_ubiquitous_ngrams() {
        let params = VectorizerParams { min_df: 1, max_df: 0.5, ..VectorizerParams::default() };
        let v = TfidfVectorizer::fit(params, &docs(&["xa", "xb", "xc", "xd"])).unwrap();
        // " x" occurs in every document
        assert!(!v.terms().iter().any(|t| t == " x"));
        assert!(v.terms().iter().any(|t| t == "xa"));
    }

    #[test]
    fn test_max_features_caps_vocabulary() {
        let params = VectorizerParams { max_features: 4, ..permissive() };
        let v = TfidfVectorizer::fit(params, &docs(&["the cat", "the dog", "the bird"])).unwrap();
        assert_eq!(v.n_features(), 4);
    }

    #[test]
    fn test_empty_vocabulary_is_an_error() {
        let params = VectorizerParams { min_df: 5, ..VectorizerParams::default() };
        let err = TfidfVectorizer::fit(params, &docs(&["one", "two"])).unwrap_err();
        assert!(matches!(err, DetectorError::EmptyVocabulary { documents: 2, .. }));
    }

    #[test]
    fn test_transform_is_l2_normalised() {
        let v = TfidfVectorizer::fit(permissive(), &docs(&["bonjour le monde", "hello world"])).unwrap();
        let x = v.transform("bonjour monde");
        let norm: f32 = x.iter().map(|(_, w)| w * w).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
        assert!(x.windows(2).all(|w| w[0].0 < w[1].0));
    }

    #[test]
    fn test_unknown_text_gives_empty_vector() {
        // the padding-only " " unigram would match any word
        let params = VectorizerParams { ngram_min: 2, ..permissive() };
        let v = TfidfVectorizer::fit(params, &docs(&["abc"])).unwrap();
        assert!(v.transform("ЖЖЖ").is_empty());
        assert!(v.transform("").is_empty());
        assert!(v.transform("   ").is_empty());
    }

    #[test]
    fn test_rare_ngrams_get_higher_idf() {
        let v = TfidfVectorizer::fit(permissive(), &docs(&["aa", "ab", "ac"])).unwrap();
        let idf = |t: &str| v.idf[v.index[t]];
        // " a" is in all three documents, "ab" in one
        assert!(idf("ab") > idf(" a"));
        assert!((idf(" a") - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_serde_round_trip_rebuilds_index() {
        let v = TfidfVectorizer::fit(permissive(), &docs(&["hola mundo", "hello world"])).unwrap();
        let json = serde_json::to_string(&v).unwrap();
        let back: TfidfVectorizer = serde_json::from_str(&json).unwrap();
        assert_eq!(back.transform("hola"), v.transform("hola"));
    }

    #[test]
    fn test_inconsistent_stored_vectorizer_is_rejected() {
        let json = r#"{"params":{"ngram_min":1,"ngram_max":3,"max_features":10,"min_df":1,"max_df":1.0},
                       "terms":["a","b"],"idf":[1.0]}"#;
        assert!(serde_json::from_str::<TfidfVectorizer>(json).is_err());
    }
}
