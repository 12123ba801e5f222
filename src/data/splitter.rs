// ============================================================
// Layer 4 — Train/Test Splitter
// ============================================================
// Shuffles samples and splits them into:
//   - a training set used to fit the vectorizer and classifier
//   - a test set used for the accuracy / classification report
//
// The split is stratified by language: every label is shuffled
// and split on its own, so rare languages still show up in both
// sets. Each label keeps at least one training sample, otherwise
// the classifier would never learn it.
//
// A seeded StdRng makes the split reproducible between runs.
//
// Reference: rand crate documentation (SliceRandom, SeedableRng)

use std::collections::BTreeMap;

use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

use crate::domain::sample::Sample;

/// Stratified split of labelled samples into (train, test).
///
/// For each label `round(count * test_fraction)` samples go to the
/// test set, capped so at least one sample stays in training. Both
/// outputs are shuffled.
pub fn stratified_split(samples: Vec<Sample>, test_fraction: f64, seed: u64) -> (Vec<Sample>, Vec<Sample>) {
    let mut rng = StdRng::seed_from_u64(seed);

    // BTreeMap so iteration order (and therefore the RNG stream) is stable
    let mut by_label: BTreeMap<String, Vec<Sample>> = BTreeMap::new();
    for s in samples {
        by_label.entry(s.language.clone()).or_default().push(s);
    }

    let mut train = Vec::new();
    let mut test  = Vec::new();

    for (_, mut group) in by_label {
        group.shuffle(&mut rng);
        let n_test = ((group.len() as f64) * test_fraction).round() as usize;
        let n_test = n_test.min(group.len().saturating_sub(1));
        let held   = group.split_off(group.len() - n_test);
        train.extend(group);
        test.extend(held);
    }

    train.shuffle(&mut rng);
    test.shuffle(&mut rng);

    tracing::debug!("Stratified split: {} train, {} test", train.len(), test.len());
    (train, test)
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::sample::label_distribution;

    fn corpus(per_label: &[(&str, usize)]) -> Vec<Sample> {
        per_label
            .iter()
            .flat_map(|&(label, n)| (0..n).map(move |i| Sample::new(format!("{label} {i}"), label)))
            .collect()
    }

    #[test]
    fn test_same_seed_same_split() {
        let (a, _) = stratified_split(corpus(&[("English", 10), ("French", 10)]), 0.3, 42);
        let (b, _) = stratified_split(corpus(&[("English", 10), ("French", 10)]), 0.3, 42);
        assert_eq!(a, b);
    }

    #[test]
    fn test_empty_dataset() {
        let (train, test) = stratified_split(Vec::new(), 0.2, 42);
        assert!(train.is_empty());
        assert!(test.is_empty());
    }

    #[test]
    fn test_stratified_keeps_label_proportions() {
        let samples       = corpus(&[("English", 10), ("French", 20)]);
        let (train, test) = stratified_split(samples, 0.2, 42);
        let test_dist     = label_distribution(&test);
        assert_eq!(test_dist["English"], 2);
        assert_eq!(test_dist["French"], 4);
        assert_eq!(train.len(), 24);
    }

    #[test]
    fn test_stratified_singleton_label_stays_in_training() {
        let samples       = corpus(&[("Latin", 1), ("Greek", 5)]);
        let (train, test) = stratified_split(samples, 0.5, 42);
        assert!(train.iter().any(|s| s.language == "Latin"));
        assert!(test.iter().all(|s| s.language != "Latin"));
        assert_eq!(train.len() + test.len(), 6);
    }
}
