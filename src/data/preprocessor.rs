// ============================================================
// Layer 4 — Text Preprocessor
// ============================================================
// Cleans raw text before it reaches the vectorizer.
//
// Dataset rows exported from spreadsheets often contain:
//   - Non-breaking spaces (U+00A0)
//   - Zero-width spaces (U+200B) and byte order marks
//   - Windows line endings
//   - Tabs and runs of spaces
//   - Stray control characters
//
// `clean` folds all of those into single plain spaces so the
// character n-grams only see real letters and word boundaries.
//
// `normalize_input` is the lighter pass used on user input
// (files, stdin): it only strips the BOM and converts CRLF, so
// text statistics and line numbers stay faithful to the input.

pub struct Preprocessor;

impl Preprocessor {
    pub fn new() -> Self {
        Self
    }

    /// Clean a training text into a single whitespace-normalised line.
    pub fn clean(&self, text: &str) -> String {
        // ── Step 1: Normalise individual characters ───────────────────────────
        let step1: String = text
            .chars()
            .map(|c| match c {
                '\t' => ' ',
                '\u{00A0}' => ' ',
                '\u{200B}' => ' ',
                '\u{FEFF}' => ' ',
                '\r' | '\n' => ' ',
                c if c.is_control() => ' ',
                c => c,
            })
            .collect();

        // ── Step 2: Collapse runs of spaces ───────────────────────────────────
        let mut out        = String::with_capacity(step1.len());
        let mut last_space = false;
        for c in step1.chars() {
            if c == ' ' {
                if !last_space {
                    out.push(' ');
                }
                last_space = true;
            } else {
                out.push(c);
                last_space = false;
            }
        }

        out.trim().to_string()
    }

    /// Strip a leading BOM and convert CRLF / lone CR to LF.
    pub fn normalize_input(&self, text: &str) -> String {
        text.strip_prefix('\u{FEFF}')
            .unwrap_or(text)
            .replace("\r\n", "\n")
            .replace('\r', "\n")
    }
}

impl Default for Preprocessor {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapses_multiple_spaces() {
        let p = Preprocessor::new();
        assert_eq!(p.clean("hello   world"), "hello world");
    }

    #[test]
    fn test_trims_edges() {
        let p = Preprocessor::new();
        assert_eq!(p.clean("  hello world  "), "hello world");
    }

    #[test]
    fn test_removes_control_chars() {
        let p = Preprocessor::new();
        assert_eq!(p.clean("hello\x01world"), "hello world");
    }

    #[test]
    fn test_joins_lines() {
        let p = Preprocessor::new();
        assert_eq!(p.clean("bonjour\r\n\n  le monde"), "bonjour le monde");
    }

    #[test]
    fn test_unicode_spaces() {
        let p = Preprocessor::new();
        assert_eq!(p.clean("\u{FEFF}hola\u{00A0}mundo\u{200B}"), "hola mundo");
    }

    #[test]
    fn test_empty_string() {
        let p = Preprocessor::new();
        assert_eq!(p.clean(""), "");
    }

    #[test]
    fn test_normalize_input_keeps_lines() {
        let p = Preprocessor::new();
        assert_eq!(p.normalize_input("\u{FEFF}a  b\r\nc\rd"), "a  b\nc\nd");
    }
}
