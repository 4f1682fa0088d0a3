//! # Metadata Module
//!
//! Reads the capture time a camera embedded in a photo.
//!
//! ## Extracted Fields
//! - DateTimeOriginal (when the shutter fired)
//! - DateTime (fallback, last edit by the camera)
//!
//! EXIF timestamps carry no zone, so they are read as local wall-clock time,
//! the same clock the date filter bounds use.

use crate::core::cancel::CancellationToken;
use crate::error::MetadataError;
use chrono::{DateTime, Local, NaiveDateTime, TimeZone};
use exif::{In, Reader, Tag, Value};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Resolves the capture time of a single file.
///
/// Shared by all metadata workers, so implementations must be safe for
/// concurrent use.
pub trait CaptureTimeReader: Send + Sync {
    /// Capture time of `path`.
    ///
    /// Return [`MetadataError::Cancelled`] when `cancel` is signalled; any other
    /// error makes the caller fall back to the filesystem modification time.
    fn capture_time(
        &self,
        path: &Path,
        cancel: &CancellationToken,
    ) -> Result<DateTime<Local>, MetadataError>;
}

/// [`CaptureTimeReader`] backed by kamadak-exif
#[derive(Debug, Clone, Copy, Default)]
pub struct ExifReader;

impl ExifReader {
    pub fn new() -> Self {
        Self
    }
}

impl CaptureTimeReader for ExifReader {
    fn capture_time(
        &self,
        path: &Path,
        cancel: &CancellationToken,
    ) -> Result<DateTime<Local>, MetadataError> {
        if cancel.is_cancelled() {
            return Err(MetadataError::Cancelled);
        }

        let file = File::open(path).map_err(|source| MetadataError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let mut bufreader = BufReader::new(file);
        let exif_reader = Reader::new()
            .read_from_container(&mut bufreader)
            .map_err(|e| MetadataError::Unavailable {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

        // DateTimeOriginal first, then the generic DateTime tag
        [Tag::DateTimeOriginal, Tag::DateTime]
            .iter()
            .filter_map(|tag| exif_reader.get_field(*tag, In::PRIMARY))
            .filter_map(|field| get_string_value(&field.value))
            .find_map(|s| parse_exif_datetime(&s))
            .ok_or_else(|| MetadataError::Unavailable {
                path: path.to_path_buf(),
                reason: "exif datetime not found".to_string(),
            })
    }
}

/// Parse an EXIF `YYYY:MM:DD HH:MM:SS` timestamp as local time
pub fn parse_exif_datetime(s: &str) -> Option<DateTime<Local>> {
    let naive = NaiveDateTime::parse_from_str(s.trim(), "%Y:%m:%d %H:%M:%S").ok()?;
    // Wall-clock times skipped by a DST jump have no local instant
    Local.from_local_datetime(&naive).earliest()
}

/// Helper to extract string from EXIF ASCII value
fn get_string_value(value: &Value) -> Option<String> {
    if let Value::Ascii(ref vec) = value {
        if let Some(bytes) = vec.first() {
            if let Ok(s) = std::str::from_utf8(bytes) {
                let trimmed = s.trim_end_matches('\0').trim();
                if !trimmed.is_empty() {
                    return Some(trimmed.to_string());
                }
            }
        }
    }
    None
}
