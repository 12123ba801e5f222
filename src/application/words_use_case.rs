// ============================================================
// Layer 2 — Word Detector
// ============================================================
// Language detection for single words and short word lists,
// including lists grouped under a language label:
//
//   Chinese (中文): 书 (book), 学习 (study)
//   French: livre (book), école (school)
//
// Parenthesised glosses are dropped before detection; each
// remaining word is classified on its own.

use std::collections::BTreeSet;

use anyhow::Result;
use regex::Regex;
use serde::Serialize;

use crate::application::detect_use_case::LanguageDetector;
use crate::domain::detection::{LabeledSection, WordDetection};

/// Confidence above which a word counts as a confident detection
pub const HIGH_CONFIDENCE: f32 = 0.9;

/// How a free-form word input should be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordInput {
    /// `Label: w1, w2` lines
    Labeled,
    /// `w1, w2, w3`
    List,
    /// one word or character sequence
    Single,
}

impl WordInput {
    pub fn classify(text: &str) -> Self {
        if text.contains(':') && text.contains('\n') {
            WordInput::Labeled
        } else if text.contains(',') && !text.contains(':') {
            WordInput::List
        } else {
            WordInput::Single
        }
    }
}

/// Totals over a set of word detections.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WordSummary {
    pub total_words:        usize,
    pub high_confidence:    usize,
    pub detected_languages: BTreeSet<String>,
}

impl WordSummary {
    pub fn of<'a>(words: impl IntoIterator<Item = &'a WordDetection>) -> Self {
        let mut summary = WordSummary {
            total_words:        0,
            high_confidence:    0,
            detected_languages: BTreeSet::new(),
        };
        for w in words {
            summary.total_words += 1;
            if w.confidence > HIGH_CONFIDENCE {
                summary.high_confidence += 1;
            }
            if let Some(language) = &w.language {
                summary.detected_languages.insert(language.clone());
            }
        }
        summary
    }
}

pub struct WordDetector<'a> {
    detector: &'a LanguageDetector,
    gloss:    Regex,
    label:    Regex,
}

impl<'a> WordDetector<'a> {
    pub fn new(detector: &'a LanguageDetector) -> Result<Self> {
        Ok(Self {
            detector,
            gloss: Regex::new(r"\s*\([^)]*\)")?,
            label: Regex::new(r"^([^:]+?)(?:\s*\([^)]+\))?:\s*(.+)$")?,
        })
    }

    /// Detect the language of one word. Always carries the full
    /// probability map; blank input gives no language and an empty map.
    pub fn detect_word(&self, word: &str) -> Result<WordDetection> {
        let word = word.trim();
        let Some(probs) = self.detector.probabilities(word)? else {
            return Ok(WordDetection {
                word:              word.to_string(),
                language:          None,
                confidence:        0.0,
                all_probabilities: Default::default(),
            });
        };

        let (language, confidence) = self.detector.best(&probs);
        Ok(WordDetection {
            word: word.to_string(),
            language: Some(language),
            confidence,
            all_probabilities: self.detector.label_map(&probs),
        })
    }

    /// Detect every word of a comma-separated list.
    pub fn detect_words(&self, text: &str) -> Result<Vec<WordDetection>> {
        self.parse_word_list(text)
            .iter()
            .map(|w| self.detect_word(w))
            .collect()
    }

    /// `"livre (book), école (school)"` → `["livre", "école"]`
    pub fn parse_word_list(&self, text: &str) -> Vec<String> {
        self.gloss
            .replace_all(text, "")
            .split(',')
            .map(str::trim)
            .filter(|w| !w.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Group the words of labelled lines by their label, in the order
    /// labels first appear. A repeated label extends its section
    /// rather than replacing the words collected so far, so every
    /// input word ends up in exactly one section.
    /// A line without a leading label continues the previous section
    /// when it still has a `:` in it.
    pub fn parse_labeled_input(&self, text: &str) -> Vec<(String, Vec<String>)> {
        let mut sections: Vec<(String, Vec<String>)> = Vec::new();
        let mut current: Option<usize> = None;

        for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
            let (index, words_text) = if let Some(caps) = self.label.captures(line) {
                let label = self.gloss.replace_all(caps[1].trim(), "").trim().to_string();
                let index = match sections.iter().position(|(l, _)| *l == label) {
                    Some(i) => i,
                    None => {
                        sections.push((label, Vec::new()));
                        sections.len() - 1
                    }
                };
                (index, caps[2].to_string())
            } else {
                match (current, line.split_once(':')) {
                    (Some(i), Some((_, rest))) => (i, rest.to_string()),
                    _ => continue,
                }
            };

            current = Some(index);
            let words = self.parse_word_list(&words_text);
            sections[index].1.extend(words);
        }

        sections
    }

    /// Parse labelled input and detect every word of every section.
    pub fn analyze_labeled_input(&self, text: &str) -> Result<Vec<LabeledSection>> {
        self.parse_labeled_input(text)
            .into_iter()
            .map(|(label, words)| {
                let words = words
                    .iter()
                    .map(|w| self.detect_word(w))
                    .collect::<Result<Vec<_>>>()?;
                tracing::debug!("Section '{}': {} words", label, words.len());
                Ok(LabeledSection { label, words })
            })
            .collect()
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::train_use_case::{
        tests::{toy_config, toy_corpus},
        TrainUseCase,
    };
    use std::collections::BTreeMap;

    fn with_words<T>(f: impl FnOnce(&WordDetector) -> T) -> T {
        let dir = tempfile::tempdir().unwrap();
        TrainUseCase::new(toy_config(dir.path()))
            .execute_with(&toy_corpus())
            .unwrap();
        let detector = LanguageDetector::load(dir.path()).unwrap();
        let words    = WordDetector::new(&detector).unwrap();
        f(&words)
    }

    fn detection(language: Option<&str>, confidence: f32) -> WordDetection {
        WordDetection {
            word:              "w".to_string(),
            language:          language.map(str::to_string),
            confidence,
            all_probabilities: BTreeMap::new(),
        }
    }

    #[test]
    fn test_classify_input() {
        assert_eq!(WordInput::classify("French: livre\nGreek: βιβλίο"), WordInput::Labeled);
        assert_eq!(WordInput::classify("书, livre, книга"), WordInput::List);
        assert_eq!(WordInput::classify("French: livre, ami"), WordInput::Single);
        assert_eq!(WordInput::classify("книга"), WordInput::Single);
    }

    #[test]
    fn test_summary_counts() {
        let words = vec![
            detection(Some("Greek"), 0.95),
            detection(Some("Russian"), 0.5),
            detection(Some("Greek"), 0.91),
            detection(None, 0.0),
        ];
        let s = WordSummary::of(&words);
        assert_eq!(s.total_words, 4);
        assert_eq!(s.high_confidence, 2);
        assert_eq!(s.detected_languages.into_iter().collect::<Vec<_>>(), vec!["Greek", "Russian"]);
    }

    #[test]
    fn test_word_parsing_and_detection() {
        with_words(|w| {
            assert_eq!(
                w.parse_word_list("livre (book), école (school),, ami "),
                vec!["livre", "école", "ami"]
            );
            assert!(w.parse_word_list(" , ( only gloss ) ").is_empty());

            let sections = w.parse_labeled_input(
                "Russian (Русский): книга (book), школа (school)\n\
                 \n\
                 Greek (Ελληνικά): βιβλίο (book)\n\
                 : σχολείο\n\
                 Russian: друг (friend)\n\
                 no label here",
            );
            assert_eq!(
                sections,
                vec![
                    ("Russian".to_string(), vec!["книга".to_string(), "школа".to_string(), "друг".to_string()]),
                    ("Greek".to_string(), vec!["βιβλίο".to_string(), "σχολείο".to_string()]),
                ]
            );

            let blank = w.detect_word("   ").unwrap();
            assert!(blank.language.is_none());
            assert_eq!(blank.confidence, 0.0);

            let word = w.detect_word(" книга ").unwrap();
            assert_eq!(word.word, "книга");
            assert_eq!(word.language.as_deref(), Some("Russian"));
            assert_eq!(word.all_probabilities.len(), 3);

            let list = w.detect_words("книга (book), βιβλίο").unwrap();
            assert_eq!(list.len(), 2);
            assert_eq!(list[1].language.as_deref(), Some("Greek"));

            let analysed = w.analyze_labeled_input("Greek: βιβλίο, φίλος\nRussian: друг").unwrap();
            assert_eq!(analysed.len(), 2);
            assert_eq!(analysed[0].label, "Greek");
            assert_eq!(analysed[0].words.len(), 2);
        });
    }
}
