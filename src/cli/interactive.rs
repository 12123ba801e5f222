// ============================================================
// Layer 1 — Interactive Session
// ============================================================
// A read-eval-print loop over the detector.
//
// Commands:
//   quit / exit / q   leave the session
//   help              list the commands
//   prob              the next entry also shows all probabilities
//   multi             multi-line entry, finished by a blank line,
//                     analysed as a page
//   file:<path>       analyse a text file, or the text of an image
//
// Anything else is analysed as a single text.
//
// Generic over the reader and writer so tests can drive it with
// in-memory buffers.

use std::io::{BufRead, Write};
use std::path::Path;

use anyhow::Result;

use crate::application::{detect_use_case::LanguageDetector, input::read_file};
use crate::cli::render;

const PROMPT: &str = "Enter text (or 'help' for options, 'quit' to exit): ";

pub struct InteractiveSession<'a, R, W> {
    detector: &'a LanguageDetector,
    input:    R,
    output:   W,
}

impl<'a, R: BufRead, W: Write> InteractiveSession<'a, R, W> {
    pub fn new(detector: &'a LanguageDetector, input: R, output: W) -> Self {
        Self { detector, input, output }
    }

    /// Run until `quit` or end of input.
    pub fn run(&mut self) -> Result<()> {
        render::heading(&mut self.output, "MULTILINGUAL LANGUAGE DETECTOR - INTERACTIVE MODE")?;
        writeln!(self.output, "Supported languages: {}", self.detector.labels().join(", "))?;
        writeln!(self.output, "Type 'quit' or 'exit' to stop, 'help' for more options.")?;

        loop {
            writeln!(self.output)?;
            render::rule(&mut self.output)?;
            let Some(entry) = self.prompt(PROMPT)? else { break };

            match entry.to_lowercase().as_str() {
                "" => writeln!(self.output, "Please enter some text.")?,
                "quit" | "exit" | "q" => break,
                "help" => self.help()?,
                "prob" => {
                    writeln!(self.output, "Probability mode enabled. Enter your text:")?;
                    match self.prompt("> ")? {
                        Some(entry) if !entry.is_empty() => self.handle(&entry, true)?,
                        Some(_) => continue,
                        None => break,
                    }
                }
                _ => self.handle(&entry, false)?,
            }
        }

        writeln!(self.output)?;
        writeln!(self.output, "Goodbye!")?;
        self.output.flush()?;
        Ok(())
    }

    /// Analyse one entry. Detector errors are reported, not fatal.
    fn handle(&mut self, entry: &str, show_probabilities: bool) -> Result<()> {
        let result = if entry.eq_ignore_ascii_case("multi") {
            match self.read_multi_line()? {
                Some(text) => self.page(&text, show_probabilities),
                None => {
                    writeln!(self.output, "No text entered.")?;
                    return Ok(());
                }
            }
        } else if let Some(path) = entry.strip_prefix("file:") {
            let path = Path::new(path.trim());
            match read_file(path) {
                Ok(text) if text.trim().is_empty() => {
                    writeln!(self.output, "File '{}' is empty.", path.display())?;
                    return Ok(());
                }
                Ok(text) => {
                    writeln!(self.output, "File loaded: {}", path.display())?;
                    let multi_line = text.lines().filter(|l| !l.trim().is_empty()).count() > 1;
                    if multi_line {
                        self.page(&text, show_probabilities)
                    } else {
                        self.single(&text, show_probabilities)
                    }
                }
                Err(e) => Err(e.into()),
            }
        } else {
            self.single(entry, show_probabilities)
        };

        if let Err(e) = result {
            tracing::warn!("Analysis failed: {e:#}");
            writeln!(self.output)?;
            writeln!(self.output, "Error: {e:#}")?;
        }
        Ok(())
    }

    fn single(&mut self, text: &str, show_probabilities: bool) -> Result<()> {
        let analysis = self.detector.analyze(text, show_probabilities)?;
        render::analysis(&mut self.output, &analysis)?;
        Ok(())
    }

    fn page(&mut self, text: &str, show_probabilities: bool) -> Result<()> {
        let page = self.detector.analyze_page(text, show_probabilities)?;
        render::page(&mut self.output, &page)?;
        Ok(())
    }

    /// Collect lines until a blank line that follows some text, or
    /// end of input. Blank lines before the text are skipped.
    fn read_multi_line(&mut self) -> Result<Option<String>> {
        writeln!(self.output, "Multi-line mode enabled. Enter your text (press Enter twice to finish):")?;
        self.output.flush()?;

        let mut lines: Vec<String> = Vec::new();
        while let Some(line) = self.read_line()? {
            if line.trim().is_empty() {
                if lines.is_empty() {
                    continue;
                }
                break;
            }
            lines.push(line);
        }

        Ok((!lines.is_empty()).then(|| lines.join("\n")))
    }

    fn help(&mut self) -> Result<()> {
        render::heading(&mut self.output, "HELP - Available Commands:")?;
        writeln!(self.output, "  'quit' or 'exit' - Exit the program")?;
        writeln!(self.output, "  'help'           - Show this help message")?;
        writeln!(self.output, "  'prob'           - Show all language probabilities for the next entry")?;
        writeln!(self.output, "  'multi'          - Enter several lines and analyse them as a page")?;
        writeln!(self.output, "  'file:<path>'    - Analyse a text file or the text in an image")?;
        Ok(())
    }

    /// Print `prompt` and read one trimmed line. `None` at end of input.
    fn prompt(&mut self, prompt: &str) -> Result<Option<String>> {
        writeln!(self.output)?;
        write!(self.output, "{prompt}")?;
        self.output.flush()?;
        Ok(self.read_line()?.map(|l| l.trim().to_string()))
    }

    /// One line without its line ending. `None` at end of input.
    fn read_line(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let trimmed = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed);
        Ok(Some(line))
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::application::train_use_case::{
        tests::{toy_config, toy_corpus},
        TrainUseCase,
    };

    fn session_output(script: &str) -> String {
        let dir = tempfile::tempdir().unwrap();
        TrainUseCase::new(toy_config(dir.path()))
            .execute_with(&toy_corpus())
            .unwrap();
        let detector = LanguageDetector::load(dir.path()).unwrap();

        let mut out = Vec::new();
        InteractiveSession::new(&detector, Cursor::new(script.to_string()), &mut out)
            .run()
            .unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_session_commands() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "the cat sat on the mat\nкошка сидит на ковре\n").unwrap();

        let script = format!(
            "help\n\
             \n\
             маленький дом\n\
             prob\n\
             μικρό σπίτι\n\
             multi\n\
             \n\
             the weather is nice\n\
             сегодня хорошая погода\n\
             \n\
             file:{}\n\
             file:/no/such/file.txt\n\
             quit\n\
             never reached\n",
            file.path().display()
        );
        let out = session_output(&script);

        assert!(out.contains("HELP - Available Commands:"));
        assert!(out.contains("Please enter some text."));
        assert!(out.contains("Detected Language: Russian"));
        assert!(out.contains("Detected Language: Greek"));
        assert!(out.contains("All Language Probabilities:"));
        assert!(out.contains("Languages Found in Page: English, Russian"));
        assert!(out.contains("File loaded:"));
        assert!(out.contains("Error: cannot read input file '/no/such/file.txt'"));
        assert!(out.ends_with("Goodbye!\n"));
    }

    #[test]
    fn test_end_of_input_ends_session() {
        let out = session_output("multi\n");
        assert!(out.contains("No text entered."));
        assert!(out.ends_with("Goodbye!\n"));
    }
}
