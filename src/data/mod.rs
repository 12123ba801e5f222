// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Everything from the raw CSV file to tensor batches.
//
// The pipeline flows in this order:
//
//   language_data.csv
//       │
//       ▼
//   CsvLoader         → reads (text, language) rows
//       │
//       ▼
//   Preprocessor      → cleans text (whitespace, control chars)
//       │
//       ▼
//   stratified_split  → train / test sets per language
//       │
//       ▼
//   TfidfVectorizer   → character n-gram TF-IDF sparse vectors
//       │
//       ▼
//   FeatureDataset    → sparse rows + class indices
//       │
//       ▼
//   FeatureBatcher    → dense tensor mini-batches for the classifier
//
// Reference: Rust Book §13 (Iterators and Closures)

/// Loads labelled samples from a CSV file
pub mod loader;

/// Cleans and normalises raw text
pub mod preprocessor;

/// Seeded and stratified train/test splitting
pub mod splitter;

/// Character n-gram TF-IDF feature extraction
pub mod vectorizer;

/// In-memory vectorised dataset
pub mod dataset;

/// Dense tensor batches from sparse rows
pub mod batcher;
