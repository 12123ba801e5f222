// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the subcommands and all their configurable flags:
//
//   train        fit vectorizer + classifier on a CSV dataset
//   detect       language + statistics for a text
//   words        per-word detection, plain or labelled lists
//   stats        text statistics only, no model needed
//   interactive  REPL over a trained model
//
// clap's derive macros generate --help text, missing-argument
// errors and string → number conversion.
//
// Reference: Rust Book §12 (Building a CLI Program)

use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::application::{input::InputSource, train_use_case::TrainConfig};

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Train the language detector on a CSV of (text, language) rows
    Train(TrainArgs),

    /// Detect the language of a text and show its statistics
    Detect(DetectArgs),

    /// Detect the language of individual words
    Words(WordsArgs),

    /// Count characters, letters, words, spaces and lines
    Stats(StatsArgs),

    /// Interactive detection session
    Interactive(InteractiveArgs),
}

/// All arguments for the `train` command.
/// Defaults match `TrainConfig::default()`.
#[derive(Args, Debug)]
pub struct TrainArgs {
    /// CSV file with `text` and `language` columns
    #[arg(long, default_value = "dataset/language_data.csv")]
    pub dataset: String,

    /// Directory the trained model is written to
    #[arg(long, default_value = "model")]
    pub model_dir: String,

    /// Number of full passes through the training data
    #[arg(long, default_value_t = 30)]
    pub epochs: usize,

    /// Number of samples per gradient step
    #[arg(long, default_value_t = 64)]
    pub batch_size: usize,

    /// Adam learning rate
    #[arg(long, default_value_t = 0.05)]
    pub lr: f64,

    /// Inverse L2 regularisation strength (0 disables the penalty)
    #[arg(long = "regularization-c", default_value_t = 1.0)]
    pub c: f64,

    /// Fraction of each language held out for evaluation
    #[arg(long, default_value_t = 0.2)]
    pub test_fraction: f64,

    /// Seed for the split and the batch order
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Maximum vocabulary size
    #[arg(long, default_value_t = 5000)]
    pub max_features: usize,

    /// Drop n-grams found in fewer documents than this
    #[arg(long, default_value_t = 2)]
    pub min_df: usize,

    /// Drop n-grams found in more than this fraction of documents
    #[arg(long, default_value_t = 0.95)]
    pub max_df: f32,

    /// Shortest character n-gram
    #[arg(long, default_value_t = 1)]
    pub ngram_min: usize,

    /// Longest character n-gram
    #[arg(long, default_value_t = 3)]
    pub ngram_max: usize,
}

/// Convert CLI TrainArgs into the application-layer TrainConfig.
/// The application layer never sees clap types.
impl From<TrainArgs> for TrainConfig {
    fn from(a: TrainArgs) -> Self {
        TrainConfig {
            dataset:       a.dataset,
            model_dir:     a.model_dir,
            epochs:        a.epochs,
            batch_size:    a.batch_size,
            lr:            a.lr,
            c:             a.c,
            test_fraction: a.test_fraction,
            seed:          a.seed,
            max_features:  a.max_features,
            min_df:        a.min_df,
            max_df:        a.max_df,
            ngram_min:     a.ngram_min,
            ngram_max:     a.ngram_max,
        }
    }
}

/// Where the text comes from. Without `--text` or `--file`,
/// stdin is read to the end.
#[derive(Args, Debug)]
pub struct InputArgs {
    /// Text to analyse
    #[arg(long, conflicts_with = "file")]
    pub text: Option<String>,

    /// UTF-8 text file, or an image whose text is read with OCR
    #[arg(long)]
    pub file: Option<PathBuf>,
}

impl InputArgs {
    pub fn source(&self) -> InputSource {
        InputSource::from_args(self.text.clone(), self.file.clone())
    }
}

#[derive(Args, Debug)]
pub struct DetectArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Directory of the trained model
    #[arg(long, default_value = "model")]
    pub model_dir: PathBuf,

    /// Show the probability of every language
    #[arg(long)]
    pub probabilities: bool,

    /// Also analyse every line on its own
    #[arg(long)]
    pub page: bool,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct WordsArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Directory of the trained model
    #[arg(long, default_value = "model")]
    pub model_dir: PathBuf,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct StatsArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct InteractiveArgs {
    /// Directory of the trained model
    #[arg(long, default_value = "model")]
    pub model_dir: PathBuf,
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;
    use crate::cli::Cli;

    #[test]
    fn test_train_defaults_match_config() {
        let cli = Cli::try_parse_from(["script-detect", "train"]).unwrap();
        let Commands::Train(args) = cli.command else { panic!("expected train") };
        assert_eq!(TrainConfig::from(args), TrainConfig::default());
    }

    #[test]
    fn test_detect_flags() {
        let cli = Cli::try_parse_from([
            "script-detect", "detect", "--text", "hola", "--page", "--json", "--model-dir", "m",
        ])
        .unwrap();
        let Commands::Detect(args) = cli.command else { panic!("expected detect") };
        assert!(args.page && args.json && !args.probabilities);
        assert_eq!(args.model_dir, PathBuf::from("m"));
        assert_eq!(args.input.source(), InputSource::Text("hola".into()));
    }

    #[test]
    fn test_text_and_file_conflict() {
        let parsed = Cli::try_parse_from(["script-detect", "stats", "--text", "a", "--file", "b.txt"]);
        assert!(parsed.is_err());
    }
}
