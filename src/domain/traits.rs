// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The training use case programs against this trait so the
// sample source can be swapped:
//   - CsvLoader implements SampleSource (the dataset file)
//   - an in-memory Vec<Sample> implements SampleSource (tests)
//
// Reference: Rust Book §10 (Traits: Defining Shared Behaviour)

use anyhow::Result;

use crate::domain::sample::Sample;

// ─── SampleSource ─────────────────────────────────────────────────────────────
/// Any component that can produce labelled training samples.
pub trait SampleSource {
    /// Load every available sample from this source.
    fn load_all(&self) -> Result<Vec<Sample>>;
}

impl SampleSource for Vec<Sample> {
    fn load_all(&self) -> Result<Vec<Sample>> {
        Ok(self.clone())
    }
}
