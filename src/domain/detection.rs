// ============================================================
// Layer 3 — Detection Result Types
// ============================================================
// What the detector hands back to callers. All types derive
// Serialize so the CLI can print them as JSON with --json.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::domain::stats::TextStats;

/// Message attached to the result for blank input
pub const EMPTY_TEXT_MESSAGE: &str = "Empty text provided";

/// The result of classifying one piece of text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Detection {
    /// Best-matching label, `None` for blank input
    pub language: Option<String>,

    /// Probability of `language`, in [0, 1]
    pub confidence: f32,

    /// Probability for every known label, when requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub probabilities: Option<BTreeMap<String, f32>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Detection {
    /// The result for empty or whitespace-only text.
    pub fn empty() -> Self {
        Self {
            language:      None,
            confidence:    0.0,
            probabilities: None,
            message:       Some(EMPTY_TEXT_MESSAGE.to_string()),
        }
    }
}

/// Detection combined with text statistics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Analysis {
    pub detected_language: Option<String>,
    pub confidence:        f32,
    pub statistics:        TextStats,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub all_probabilities: Option<BTreeMap<String, f32>>,
}

impl Analysis {
    pub fn new(detection: Detection, statistics: TextStats) -> Self {
        Self {
            detected_language: detection.language,
            confidence:        detection.confidence,
            statistics,
            all_probabilities: detection.probabilities,
        }
    }
}

/// Per-line entry of a page analysis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineAnalysis {
    /// 1-based line number in the original page
    pub line_number:     usize,
    pub text:            String,
    pub language:        Option<String>,
    pub confidence:      f32,
    pub letter_count:    usize,
    pub word_count:      usize,
    pub character_count: usize,
}

/// Whole-page analysis plus a breakdown of every non-blank line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageAnalysis {
    #[serde(flatten)]
    pub overall:               Analysis,
    pub line_breakdown:        Vec<LineAnalysis>,
    /// Languages in the order they first appear on the page
    pub languages_present:     Vec<String>,
    pub language_distribution: BTreeMap<String, usize>,
}

/// Detection result for a single word or character sequence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WordDetection {
    pub word:              String,
    pub language:          Option<String>,
    pub confidence:        f32,
    pub all_probabilities: BTreeMap<String, f32>,
}

/// A group of words under a user-supplied language label,
/// e.g. `French: livre (book), école (school)`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabeledSection {
    pub label: String,
    pub words: Vec<WordDetection>,
}

/// Sort a probability map by descending probability and keep `top`.
pub fn top_probabilities(probs: &BTreeMap<String, f32>, top: usize) -> Vec<(&str, f32)> {
    let mut sorted: Vec<(&str, f32)> = probs.iter().map(|(k, v)| (k.as_str(), *v)).collect();
    sorted.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    sorted.truncate(top);
    sorted
}
