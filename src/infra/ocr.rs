// ============================================================
// Layer 6 — Image Text Extraction
// ============================================================
// Image files are turned into text by the external `tesseract`
// binary before they reach the detector:
//
//   tesseract <image> stdout --psm 6 [-l <langs>]
//
// A file counts as an image when its extension or its first
// bytes say so. The raw OCR output is then cleaned of the usual
// recognition artifacts (stray symbols, one-character lines,
// runs of whitespace).
//
// Environment:
//   TESSERACT_CMD    path of the binary (default: tesseract)
//   TESSERACT_LANGS  traineddata names, e.g. eng+rus+ell

use std::{
    fs::File,
    io::{self, Read},
    path::Path,
    process::Command,
};

use crate::domain::error::DetectorError;

pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "gif", "tif", "tiff"];

const MAGIC_NUMBERS: &[&[u8]] = &[
    b"\x89PNG\r\n\x1a\n",
    b"\xFF\xD8\xFF",
    b"GIF87a",
    b"GIF89a",
    b"BM",
    b"II*\0",
    b"MM\0*",
];

/// True when `path` names an image, by extension or by content.
pub fn is_image(path: &Path) -> bool {
    let by_extension = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| IMAGE_EXTENSIONS.iter().any(|x| x.eq_ignore_ascii_case(e)));

    by_extension || has_image_magic(path).unwrap_or(false)
}

fn has_image_magic(path: &Path) -> io::Result<bool> {
    let mut head = Vec::with_capacity(8);
    File::open(path)?.take(8).read_to_end(&mut head)?;
    Ok(MAGIC_NUMBERS.iter().any(|magic| head.starts_with(magic)))
}

pub struct TesseractOcr {
    binary:    String,
    languages: Option<String>,
}

impl TesseractOcr {
    pub fn new(binary: impl Into<String>) -> Self {
        Self { binary: binary.into(), languages: None }
    }

    /// Binary and languages from `TESSERACT_CMD` / `TESSERACT_LANGS`.
    pub fn from_env() -> Self {
        let binary    = std::env::var("TESSERACT_CMD").unwrap_or_else(|_| "tesseract".to_string());
        let languages = std::env::var("TESSERACT_LANGS").ok().filter(|l| !l.trim().is_empty());
        Self { languages, ..Self::new(binary) }
    }

    /// Run the binary on `image` and return the cleaned text.
    pub fn extract_text(&self, image: &Path) -> Result<String, DetectorError> {
        let mut cmd = Command::new(&self.binary);
        cmd.arg(image).arg("stdout").args(["--psm", "6"]);
        if let Some(languages) = &self.languages {
            cmd.args(["-l", languages]);
        }

        let output = cmd.output().map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => DetectorError::OcrUnavailable { binary: self.binary.clone() },
            _ => DetectorError::OcrFailed { path: image.to_path_buf(), reason: e.to_string() },
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(DetectorError::OcrFailed {
                path:   image.to_path_buf(),
                reason: format!("{} ({})", stderr.trim(), output.status),
            });
        }

        let text = clean_ocr_text(&String::from_utf8_lossy(&output.stdout));
        if text.is_empty() {
            return Err(DetectorError::NoTextInImage { path: image.to_path_buf() });
        }
        tracing::info!(
            "Extracted {} characters from '{}'",
            text.chars().count(),
            image.display()
        );
        Ok(text)
    }
}

/// Drop noise lines and fix common misreads in raw OCR output.
///
/// Lines shorter than two characters are dropped, `|` becomes `I`,
/// `0` becomes `O`, `®` and `©` are removed and whitespace inside a
/// line is collapsed.
pub fn clean_ocr_text(text: &str) -> String {
    text.lines()
        .filter(|line| line.trim().chars().count() >= 2)
        .map(|line| {
            line.replace('|', "I")
                .replace('0', "O")
                .replace(['®', '©'], "")
                .split_whitespace()
                .collect::<Vec<_>>()
                .join(" ")
        })
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
