// ============================================================
// Layer 3 — Text Statistics
// ============================================================
// Pure counting functions over a string. No model is needed,
// so `stats` works even before training.
//
// Counting rules:
//   total_characters      — Unicode scalar values
//   characters_no_spaces  — scalars other than U+0020
//   letters               — scalars inside LETTER_RANGES
//   words                 — whitespace-separated tokens
//   spaces                — U+0020 only (tabs/newlines excluded)
//   lines                 — '\n'-separated segments; "" has 1 line

use serde::{Deserialize, Serialize};

/// Inclusive code point ranges counted as letters.
/// Covers Latin, Greek through Latin Extended Additional, Cyrillic,
/// Arabic, Syriac, Samaritan through CJK Extension A, CJK Unified
/// Ideographs and Hangul syllables.
const LETTER_RANGES: &[(char, char)] = &[
    ('a', 'z'),
    ('A', 'Z'),
    ('\u{00C0}', '\u{024F}'),
    ('\u{0370}', '\u{1EFF}'),
    ('\u{0400}', '\u{04FF}'),
    ('\u{0600}', '\u{06FF}'),
    ('\u{0700}', '\u{074F}'),
    ('\u{0750}', '\u{077F}'),
    ('\u{0800}', '\u{4DBF}'),
    ('\u{4E00}', '\u{9FFF}'),
    ('\u{AC00}', '\u{D7AF}'),
];

/// Counts describing a piece of text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextStats {
    pub total_characters:     usize,
    pub characters_no_spaces: usize,
    pub letters:              usize,
    pub words:                usize,
    pub spaces:               usize,
    pub lines:                usize,
}

impl TextStats {
    /// Compute every statistic for `text` in one call.
    pub fn of(text: &str) -> Self {
        Self {
            total_characters:     text.chars().count(),
            characters_no_spaces: count_characters(text),
            letters:              count_letters(text),
            words:                count_words(text),
            spaces:               count_spaces(text),
            lines:                text.split('\n').count(),
        }
    }
}

/// Characters excluding plain spaces.
pub fn count_characters(text: &str) -> usize {
    text.chars().filter(|&c| c != ' ').count()
}

pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Letters from the scripts listed in `LETTER_RANGES`.
pub fn count_letters(text: &str) -> usize {
    text.chars().filter(|&c| is_letter(c)).count()
}

pub fn count_spaces(text: &str) -> usize {
    text.chars().filter(|&c| c == ' ').count()
}

fn is_letter(c: char) -> bool {
    LETTER_RANGES.iter().any(|&(lo, hi)| lo <= c && c <= hi)
}
