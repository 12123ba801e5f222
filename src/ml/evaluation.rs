// ============================================================
// Layer 5 — Evaluation
// ============================================================
// Accuracy and a per-language classification report computed
// from (actual, predicted) class index pairs.
//
//   precision(l) = TP / (TP + FP)   — how often "l" was right
//   recall(l)    = TP / (TP + FN)   — how much of "l" was found
//   f1(l)        = harmonic mean of precision and recall
//   support(l)   = number of test samples labelled l
//
// A ratio with a zero denominator is reported as 0.

use std::fmt;

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelMetrics {
    pub label:     String,
    pub precision: f64,
    pub recall:    f64,
    pub f1:        f64,
    pub support:   usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationReport {
    pub per_label:       Vec<LabelMetrics>,
    pub accuracy:        f64,
    pub macro_precision: f64,
    pub macro_recall:    f64,
    pub macro_f1:        f64,
    pub total:           usize,
}

impl ClassificationReport {
    /// Build the report. `labels[i]` names class index `i`.
    pub fn new(labels: &[String], actual: &[usize], predicted: &[usize]) -> Self {
        let n = labels.len();
        let mut tp = vec![0usize; n];
        let mut fp = vec![0usize; n];
        let mut fn_ = vec![0usize; n];
        let mut correct = 0usize;

        for (&a, &p) in actual.iter().zip(predicted) {
            if a == p {
                tp[a] += 1;
                correct += 1;
            } else {
                fp[p] += 1;
                fn_[a] += 1;
            }
        }

        let per_label: Vec<LabelMetrics> = labels
            .iter()
            .enumerate()
            .map(|(i, label)| {
                let precision = ratio(tp[i], tp[i] + fp[i]);
                let recall    = ratio(tp[i], tp[i] + fn_[i]);
                let f1 = if precision + recall > 0.0 {
                    2.0 * precision * recall / (precision + recall)
                } else {
                    0.0
                };
                LabelMetrics {
                    label: label.clone(),
                    precision,
                    recall,
                    f1,
                    support: tp[i] + fn_[i],
                }
            })
            .collect();

        let mean = |f: fn(&LabelMetrics) -> f64| {
            if per_label.is_empty() {
                0.0
            } else {
                per_label.iter().map(f).sum::<f64>() / per_label.len() as f64
            }
        };

        Self {
            macro_precision: mean(|m| m.precision),
            macro_recall:    mean(|m| m.recall),
            macro_f1:        mean(|m| m.f1),
            accuracy:        ratio(correct, actual.len()),
            total:           actual.len(),
            per_label,
        }
    }
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 { 0.0 } else { num as f64 / den as f64 }
}

impl fmt::Display for ClassificationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self
            .per_label
            .iter()
            .map(|m| m.label.chars().count())
            .max()
            .unwrap_or(0)
            .max("macro avg".len());

        writeln!(f, "{:>width$}  {:>9} {:>9} {:>9} {:>9}", "", "precision", "recall", "f1-score", "support")?;
        for m in &self.per_label {
            writeln!(
                f,
                "{:>width$}  {:>9.2} {:>9.2} {:>9.2} {:>9}",
                m.label, m.precision, m.recall, m.f1, m.support
            )?;
        }
        writeln!(f)?;
        writeln!(f, "{:>width$}  {:>9} {:>9} {:>9.2} {:>9}", "accuracy", "", "", self.accuracy, self.total)?;
        write!(
            f,
            "{:>width$}  {:>9.2} {:>9.2} {:>9.2} {:>9}",
            "macro avg", self.macro_precision, self.macro_recall, self.macro_f1, self.total
        )
    }
}
