// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain Rust types and traits that describe what the detector
// works with: training samples, detection results, text
// statistics and the errors a caller can act on.
//
// Rules for this layer:
//   - NO burn types
//   - NO file I/O
//   - Only structs, enums, traits and pure functions
//
// Reference: Rust Book §5 (Structs), §10 (Traits)

/// A labelled training record read from the dataset
pub mod sample;

/// Text statistics (character, letter, word, line counts)
pub mod stats;

/// Detection and analysis result types
pub mod detection;

/// Typed errors surfaced to the user with a remediation hint
pub mod error;

// Core abstractions that other layers implement
pub mod traits;
