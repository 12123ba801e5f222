use std::path::PathBuf;

use thiserror::Error;

/// Failures a user can fix. Each message carries the remediation hint
/// that gets printed by the CLI.
#[derive(Error, Debug)]
pub enum DetectorError {
    #[error(
        "model not found in '{}'. Train the model first: script-detect train --dataset <csv>",
        .dir.display()
    )]
    NotTrained { dir: PathBuf },

    #[error("model artifact in '{}' is inconsistent: {reason}. Retrain the model", .dir.display())]
    ArtifactMismatch { dir: PathBuf, reason: String },

    #[error("dataset not found: '{}'", .path.display())]
    DatasetNotFound { path: PathBuf },

    #[error("dataset '{}' contains no usable samples", .path.display())]
    EmptyDataset { path: PathBuf },

    #[error(
        "no features left after pruning (min_df={min_df}, max_df={max_df}, {documents} documents). \
         Use more training data or lower --min-df"
    )]
    EmptyVocabulary {
        min_df:    usize,
        max_df:    f32,
        documents: usize,
    },

    #[error("input is empty")]
    EmptyInput,

    #[error("cannot read input file '{}'", .path.display())]
    UnreadableInput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(
        "OCR not available: '{binary}' was not found. Install Tesseract \
         (https://github.com/tesseract-ocr/tesseract) or set TESSERACT_CMD to its path"
    )]
    OcrUnavailable { binary: String },

    #[error("OCR failed on '{}': {reason}", .path.display())]
    OcrFailed { path: PathBuf, reason: String },

    #[error(
        "could not extract any text from '{}'. Make sure the image contains readable text",
        .path.display()
    )]
    NoTextInImage { path: PathBuf },
}
