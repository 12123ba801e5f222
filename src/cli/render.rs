// ============================================================
// Layer 1 — Output Rendering
// ============================================================
// Human-readable reports for every command, written to any
// `io::Write` so the one-shot commands (stdout) and the REPL
// share the same layout. `--json` bypasses all of this and
// prints the result types through serde_json.

use std::io::{self, Write};

use serde::Serialize;

use crate::application::{train_use_case::TrainSummary, words_use_case::WordSummary};
use crate::domain::{
    detection::{top_probabilities, Analysis, LabeledSection, PageAnalysis, WordDetection},
    stats::TextStats,
};

const RULE_WIDTH: usize = 70;

/// Probabilities at or below this are left out of listings
const MIN_SHOWN_PROBABILITY: f32 = 0.001;

/// Line previews in page breakdowns are cut to this many characters
const PREVIEW_CHARS: usize = 60;

pub fn heading(out: &mut impl Write, title: &str) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", "=".repeat(RULE_WIDTH))?;
    writeln!(out, "{title}")?;
    writeln!(out, "{}", "=".repeat(RULE_WIDTH))
}

pub fn rule(out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "{}", "-".repeat(RULE_WIDTH))
}

pub fn json(out: &mut impl Write, value: &impl Serialize) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

pub fn stats(out: &mut impl Write, title: &str, s: &TextStats) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{title}:")?;
    writeln!(out, "  • Total Characters: {}", s.total_characters)?;
    writeln!(out, "  • Characters (no spaces): {}", s.characters_no_spaces)?;
    writeln!(out, "  • Letters: {}", s.letters)?;
    writeln!(out, "  • Words: {}", s.words)?;
    writeln!(out, "  • Spaces: {}", s.spaces)?;
    writeln!(out, "  • Lines: {}", s.lines)
}

fn probabilities(
    out:   &mut impl Write,
    probs: &std::collections::BTreeMap<String, f32>,
    top:   usize,
) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "All Language Probabilities:")?;
    for (language, p) in top_probabilities(probs, top) {
        if p > MIN_SHOWN_PROBABILITY {
            writeln!(out, "  • {language}: {p:.4} ({:.2}%)", p * 100.0)?;
        }
    }
    Ok(())
}

pub fn analysis(out: &mut impl Write, a: &Analysis) -> io::Result<()> {
    heading(out, "ANALYSIS RESULTS")?;
    writeln!(out)?;
    writeln!(out, "Detected Language: {}", a.detected_language.as_deref().unwrap_or("unknown"))?;
    writeln!(out, "Confidence: {:.4} ({:.2}%)", a.confidence, a.confidence * 100.0)?;
    stats(out, "Text Statistics", &a.statistics)?;
    if let Some(probs) = &a.all_probabilities {
        probabilities(out, probs, 10)?;
    }
    Ok(())
}

pub fn page(out: &mut impl Write, p: &PageAnalysis) -> io::Result<()> {
    let a = &p.overall;
    heading(out, "ANALYSIS RESULTS")?;
    writeln!(out)?;
    writeln!(out, "Overall Detected Language: {}", a.detected_language.as_deref().unwrap_or("unknown"))?;
    writeln!(out, "Confidence: {:.4}", a.confidence)?;
    if !p.languages_present.is_empty() {
        writeln!(out, "Languages Found in Page: {}", p.languages_present.join(", "))?;
    }
    stats(out, "Overall Statistics", &a.statistics)?;
    if let Some(probs) = &a.all_probabilities {
        probabilities(out, probs, probs.len())?;
    }

    if p.line_breakdown.is_empty() {
        return Ok(());
    }
    writeln!(out)?;
    writeln!(out, "Line-by-Line Breakdown:")?;
    rule(out)?;
    for line in &p.line_breakdown {
        writeln!(out)?;
        writeln!(out, "Line {}:", line.line_number)?;
        writeln!(out, "  Text: {}", preview(&line.text))?;
        writeln!(
            out,
            "  Language: {} (confidence: {:.4})",
            line.language.as_deref().unwrap_or("unknown"),
            line.confidence
        )?;
        writeln!(
            out,
            "  Letters: {}, Words: {}, Characters: {}",
            line.letter_count, line.word_count, line.character_count
        )?;
    }
    Ok(())
}

fn preview(text: &str) -> String {
    if text.chars().count() > PREVIEW_CHARS {
        let cut: String = text.chars().take(PREVIEW_CHARS).collect();
        format!("{cut}...")
    } else {
        text.to_string()
    }
}

pub fn word(out: &mut impl Write, w: &WordDetection, show_probabilities: bool) -> io::Result<()> {
    writeln!(out, "  Word: {}", w.word)?;
    writeln!(out, "    → Detected Language: {}", w.language.as_deref().unwrap_or("unknown"))?;
    writeln!(out, "    → Confidence: {:.4} ({:.2}%)", w.confidence, w.confidence * 100.0)?;
    if show_probabilities && !w.all_probabilities.is_empty() {
        let top: Vec<String> = top_probabilities(&w.all_probabilities, 3)
            .into_iter()
            .map(|(language, p)| format!("{language}({p:.2})"))
            .collect();
        writeln!(out, "    → Top probabilities: {}", top.join(", "))?;
    }
    Ok(())
}

pub fn words(out: &mut impl Write, words: &[WordDetection], show_probabilities: bool) -> io::Result<()> {
    heading(out, if words.len() == 1 { "DETECTION RESULT" } else { "DETECTION RESULTS" })?;
    for w in words {
        word(out, w, show_probabilities)?;
    }
    Ok(())
}

pub fn sections(out: &mut impl Write, sections: &[LabeledSection]) -> io::Result<()> {
    heading(out, "LANGUAGE DETECTION RESULTS")?;
    for section in sections {
        writeln!(out)?;
        writeln!(out, "{}:", section.label)?;
        rule(out)?;
        for w in &section.words {
            word(out, w, false)?;
        }
    }
    word_summary(out, &WordSummary::of(sections.iter().flat_map(|s| &s.words)))
}

pub fn word_summary(out: &mut impl Write, s: &WordSummary) -> io::Result<()> {
    heading(out, "SUMMARY")?;
    writeln!(out)?;
    writeln!(out, "Total words analyzed: {}", s.total_words)?;
    writeln!(out, "Detections with high confidence (>0.9): {}", s.high_confidence)?;
    let languages: Vec<&str> = s.detected_languages.iter().map(String::as_str).collect();
    writeln!(out)?;
    writeln!(out, "Languages detected: {}", languages.join(", "))
}

pub fn train_summary(out: &mut impl Write, s: &TrainSummary) -> io::Result<()> {
    heading(out, "TRAINING COMPLETE")?;
    writeln!(out)?;
    writeln!(out, "Samples:   {} ({} train, {} test)", s.n_samples, s.n_train, s.n_test)?;
    writeln!(out, "Languages: {} ({})", s.labels.len(), s.labels.join(", "))?;
    writeln!(out, "Features:  {}", s.n_features)?;

    match &s.report {
        Some(report) => {
            writeln!(out)?;
            writeln!(out, "Test accuracy: {:.4}", report.accuracy)?;
            writeln!(out)?;
            writeln!(out, "Classification Report:")?;
            writeln!(out, "{report}")?;
        }
        None => writeln!(out, "No test samples, evaluation skipped")?,
    }

    if let Some((sample, a)) = &s.preview {
        writeln!(out)?;
        writeln!(out, "Sample Prediction:")?;
        writeln!(out, "  Text:      {}", preview(&sample.text))?;
        writeln!(out, "  Actual:    {}", sample.language)?;
        writeln!(
            out,
            "  Predicted: {} ({:.4})",
            a.detected_language.as_deref().unwrap_or("unknown"),
            a.confidence
        )?;
        stats(out, "  Statistics", &a.statistics)?;
    }

    writeln!(out)?;
    writeln!(out, "Model saved to '{}'", s.model_dir.display())
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::detection::{Detection, LineAnalysis};
    use std::collections::BTreeMap;

    fn render(f: impl FnOnce(&mut Vec<u8>) -> io::Result<()>) -> String {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    fn probs() -> BTreeMap<String, f32> {
        [("English", 0.8f32), ("Greek", 0.1995), ("Russian", 0.0005)]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect()
    }

    #[test]
    fn test_analysis_report() {
        let detection = Detection {
            language:      Some("English".into()),
            confidence:    0.8,
            probabilities: Some(probs()),
            message:       None,
        };
        let text = render(|out| analysis(out, &Analysis::new(detection, TextStats::of("hi there"))));

        assert!(text.contains("Detected Language: English"));
        assert!(text.contains("Confidence: 0.8000 (80.00%)"));
        assert!(text.contains("  • Words: 2"));
        assert!(text.contains("  • Greek: 0.1995"));
        // below the display threshold
        assert!(!text.contains("Russian"));
    }

    #[test]
    fn test_page_preview_is_truncated() {
        let long = "a".repeat(80);
        let p = PageAnalysis {
            overall: Analysis::new(Detection::empty(), TextStats::of(&long)),
            line_breakdown: vec![LineAnalysis {
                line_number:     1,
                text:            long.clone(),
                language:        Some("English".into()),
                confidence:      0.5,
                letter_count:    80,
                word_count:      1,
                character_count: 80,
            }],
            languages_present:     vec!["English".into()],
            language_distribution: BTreeMap::from([("English".to_string(), 1)]),
        };
        let text = render(|out| page(out, &p));

        assert!(text.contains("Overall Detected Language: unknown"));
        assert!(text.contains("Languages Found in Page: English"));
        assert!(text.contains(&format!("  Text: {}...", "a".repeat(60))));
        assert!(text.contains("Letters: 80, Words: 1, Characters: 80"));
    }

    #[test]
    fn test_word_top_probabilities() {
        let w = WordDetection {
            word:              "book".into(),
            language:          Some("English".into()),
            confidence:        0.8,
            all_probabilities: probs(),
        };
        let text = render(|out| word(out, &w, true));
        assert!(text.contains("→ Top probabilities: English(0.80), Greek(0.20), Russian(0.00)"));
    }
}
