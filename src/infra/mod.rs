// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Everything that touches the model directory on disk:
//
//   checkpoint.rs       — DetectorConfig + classifier weights
//                         (burn recorder). Detects a missing
//                         artifact and reports "not trained".
//
//   vectorizer_store.rs — the fitted TF-IDF vectorizer as JSON
//
//   metrics.rs          — per-epoch training metrics CSV
//
//   ocr.rs              — text from image inputs via tesseract
//
// Reference: Rust Book §9 (Error Handling with anyhow)
//            Burn Book §5 (Checkpointing)

/// Detector config and classifier weight persistence
pub mod checkpoint;

/// Vectorizer persistence
pub mod vectorizer_store;

/// Training metrics CSV logger
pub mod metrics;

/// Image input detection and OCR
pub mod ocr;
