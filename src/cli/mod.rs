// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// The entry point for all user interaction. Parses arguments
// with clap, hands the work to Layer 2 (application) and prints
// what comes back. No detection logic lives here.
//
// Reference: Rust Book §7 (Modules), §12 (CLI programs)

pub mod commands;
pub mod interactive;
pub mod render;

use std::io::{self, Write};

use anyhow::Result;
use clap::Parser;
use commands::{Commands, DetectArgs, InteractiveArgs, StatsArgs, TrainArgs, WordsArgs};

use crate::application::{
    detect_use_case::LanguageDetector,
    train_use_case::TrainUseCase,
    words_use_case::{WordDetector, WordInput, WordSummary},
};
use crate::domain::stats::TextStats;
use interactive::InteractiveSession;

#[derive(Parser, Debug)]
#[command(
    name = "script-detect",
    version,
    about = "Detect the language of a text with a character n-gram TF-IDF classifier."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Dispatch to the handler of the chosen subcommand.
    pub fn run(self) -> Result<()> {
        let stdout  = io::stdout();
        let mut out = stdout.lock();

        match self.command {
            Commands::Train(args)       => run_train(args, &mut out),
            Commands::Detect(args)      => run_detect(args, &mut out),
            Commands::Words(args)       => run_words(args, &mut out),
            Commands::Stats(args)       => run_stats(args, &mut out),
            Commands::Interactive(args) => run_interactive(args, &mut out),
        }
    }
}

fn run_train(args: TrainArgs, out: &mut impl Write) -> Result<()> {
    tracing::info!("Starting training on dataset: {}", args.dataset);

    let summary = TrainUseCase::new(args.into()).execute()?;
    render::train_summary(out, &summary)?;
    Ok(())
}

fn run_detect(args: DetectArgs, out: &mut impl Write) -> Result<()> {
    let text     = args.input.source().read()?;
    let detector = LanguageDetector::load(&args.model_dir)?;

    if args.page {
        let page = detector.analyze_page(&text, args.probabilities)?;
        if args.json {
            render::json(out, &page)
        } else {
            Ok(render::page(out, &page)?)
        }
    } else {
        let analysis = detector.analyze(&text, args.probabilities)?;
        if args.json {
            render::json(out, &analysis)
        } else {
            Ok(render::analysis(out, &analysis)?)
        }
    }
}

fn run_words(args: WordsArgs, out: &mut impl Write) -> Result<()> {
    let text     = args.input.source().read()?;
    let detector = LanguageDetector::load(&args.model_dir)?;
    let words    = WordDetector::new(&detector)?;

    match WordInput::classify(&text) {
        WordInput::Labeled => {
            let sections = words.analyze_labeled_input(&text)?;
            if args.json {
                let summary = WordSummary::of(sections.iter().flat_map(|s| &s.words));
                render::json(out, &serde_json::json!({ "sections": sections, "summary": summary }))
            } else {
                Ok(render::sections(out, &sections)?)
            }
        }
        kind => {
            let detections = if kind == WordInput::List {
                words.detect_words(&text)?
            } else {
                vec![words.detect_word(&text)?]
            };
            if args.json {
                render::json(out, &detections)
            } else {
                // single words get their top probabilities
                Ok(render::words(out, &detections, kind == WordInput::Single)?)
            }
        }
    }
}

fn run_stats(args: StatsArgs, out: &mut impl Write) -> Result<()> {
    let text  = args.input.source().read()?;
    let stats = TextStats::of(&text);

    if args.json {
        render::json(out, &stats)
    } else {
        Ok(render::stats(out, "Text Statistics", &stats)?)
    }
}

fn run_interactive(args: InteractiveArgs, out: &mut impl Write) -> Result<()> {
    let detector = LanguageDetector::load(&args.model_dir)?;

    let stdin = io::stdin();
    InteractiveSession::new(&detector, stdin.lock(), out).run()
}
