//! # Scanner Module
//!
//! Walks the source tree once and produces the candidates worth reading
//! metadata for.
//!
//! ## Supported Formats
//! - RAW (.arw, .cr2, .cr3, .nef, .raf, .rw2, .orf, .dng)
//! - JPEG (.jpg, .jpeg)
//!
//! Everything else is ignored and never counted.
//!
//! ## Example
//! ```rust,ignore
//! let scanner = SourceScanner::new(&fs, false);
//! let outcome = scanner.scan(source, target, &token)?;
//! ```

mod filter;
mod walker;

pub use filter::{RawSiblings, TargetFilter};
pub use walker::{ScanOutcome, SourceScanner};

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Extensions treated as camera RAW files (lower-case, no dot)
pub const RAW_EXTENSIONS: &[&str] = &["arw", "cr2", "cr3", "nef", "raf", "rw2", "orf", "dng"];

/// Extensions treated as JPEG files (lower-case, no dot)
pub const JPEG_EXTENSIONS: &[&str] = &["jpg", "jpeg"];

/// Classification of a photo file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageKind {
    Raw,
    Jpeg,
}

impl ImageKind {
    /// Classify an extension, with or without the leading dot.
    ///
    /// Returns `None` for anything that is neither RAW nor JPEG.
    pub fn from_extension(ext: &str) -> Option<Self> {
        let ext = ext.strip_prefix('.').unwrap_or(ext).to_lowercase();
        if RAW_EXTENSIONS.contains(&ext.as_str()) {
            Some(ImageKind::Raw)
        } else if JPEG_EXTENSIONS.contains(&ext.as_str()) {
            Some(ImageKind::Jpeg)
        } else {
            None
        }
    }

    /// Classify a path by its extension
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }

    pub fn is_raw(self) -> bool {
        matches!(self, ImageKind::Raw)
    }
}

impl std::fmt::Display for ImageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImageKind::Raw => write!(f, "RAW"),
            ImageKind::Jpeg => write!(f, "JPEG"),
        }
    }
}

/// A classified file that survived pre-filtering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub path: PathBuf,
    pub kind: ImageKind,
}

/// Lower-cased file name without its extension; the RAW/JPEG pairing key
pub fn base_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}

/// `path` relative to `root`, or just its file name when it is not under `root`
pub fn relative_to(root: &Path, path: &Path) -> PathBuf {
    match path.strip_prefix(root) {
        Ok(rel) => rel.to_path_buf(),
        Err(_) => path.file_name().map(PathBuf::from).unwrap_or_default(),
    }
}
