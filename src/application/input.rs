// ============================================================
// Layer 2 — Input Sources
// ============================================================
// Text reaches the detector from an argument, a file or stdin.
// All three are read the same way: BOM stripped, line endings
// converted to LF, and rejected when blank. Image files are run
// through OCR first.

use std::{
    fs,
    io::Read,
    path::{Path, PathBuf},
};

use crate::data::preprocessor::Preprocessor;
use crate::domain::error::DetectorError;
use crate::infra::ocr::{self, TesseractOcr};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    Text(String),
    File(PathBuf),
    Stdin,
}

impl InputSource {
    /// Pick the source from optional `--text` / `--file` values,
    /// falling back to stdin.
    pub fn from_args(text: Option<String>, file: Option<PathBuf>) -> Self {
        match (text, file) {
            (Some(text), _) => InputSource::Text(text),
            (None, Some(path)) => InputSource::File(path),
            (None, None) => InputSource::Stdin,
        }
    }

    /// Read the whole input. Blank input is an error.
    pub fn read(&self) -> Result<String, DetectorError> {
        let text = match self {
            InputSource::Text(text) => Preprocessor::new().normalize_input(text),
            InputSource::File(path) => read_file(path)?,
            InputSource::Stdin => {
                let mut buf = String::new();
                std::io::stdin()
                    .read_to_string(&mut buf)
                    .map_err(|source| DetectorError::UnreadableInput {
                        path: PathBuf::from("<stdin>"),
                        source,
                    })?;
                Preprocessor::new().normalize_input(&buf)
            }
        };

        if text.trim().is_empty() {
            return Err(DetectorError::EmptyInput);
        }
        Ok(text)
    }
}

/// Read a UTF-8 text file, or the text found in an image file.
/// The result has LF line endings and no BOM.
pub fn read_file(path: &Path) -> Result<String, DetectorError> {
    if ocr::is_image(path) {
        tracing::info!("'{}' is an image, extracting its text", path.display());
        return TesseractOcr::from_env().extract_text(path);
    }

    let text = fs::read_to_string(path).map_err(|source| DetectorError::UnreadableInput {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!("Read {} bytes from '{}'", text.len(), path.display());
    Ok(Preprocessor::new().normalize_input(&text))
}
