//! Types for the organize module.

use crate::core::scanner::ImageKind;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Resolved configuration for one invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CopyConfig {
    pub source_dir: PathBuf,
    pub target_dir: PathBuf,
    pub range: DateRange,
    pub dry_run: bool,
    pub allow_override: bool,
    pub verbose: bool,
    /// Metadata worker count (None = available parallelism)
    pub workers: Option<usize>,
}

/// Inclusive capture-time bounds; `None` on a side means open-ended
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: Option<DateTime<Local>>,
    pub end: Option<DateTime<Local>>,
}

impl DateRange {
    pub fn new(start: Option<DateTime<Local>>, end: Option<DateTime<Local>>) -> Self {
        Self { start, end }
    }

    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    /// True when `at` is neither before `start` nor after `end`
    pub fn contains(&self, at: DateTime<Local>) -> bool {
        self.start.map_or(true, |start| at >= start) && self.end.map_or(true, |end| at <= end)
    }

    /// Human-readable form used in logs, e.g. `2024-01-01 to any`
    pub fn describe(&self) -> String {
        if self.is_unbounded() {
            return "all dates".to_string();
        }
        let fmt = |d: Option<DateTime<Local>>| {
            d.map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| "any".to_string())
        };
        format!("{} to {}", fmt(self.start), fmt(self.end))
    }
}

/// One candidate file with its resolved capture time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    pub source_path: PathBuf,
    /// Path relative to the source root
    pub relative_path: PathBuf,
    /// File name shown to the user and used as the sort tie-breaker
    pub name: String,
    /// Lower-cased name without extension
    pub base_name: String,
    pub captured_at: DateTime<Local>,
    pub kind: ImageKind,
}

impl FileRecord {
    pub fn new(
        source_path: PathBuf,
        relative_path: PathBuf,
        captured_at: DateTime<Local>,
        kind: ImageKind,
    ) -> Self {
        let name = source_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let base_name = crate::core::scanner::base_name(&source_path);

        Self {
            source_path,
            relative_path,
            name,
            base_name,
            captured_at,
            kind,
        }
    }

    pub fn is_raw(&self) -> bool {
        self.kind == ImageKind::Raw
    }

    pub fn is_jpeg(&self) -> bool {
        self.kind == ImageKind::Jpeg
    }
}

/// A record paired with where it will be copied to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CopyItem {
    pub record: FileRecord,
    pub target_path: PathBuf,
}

impl CopyItem {
    pub fn new(record: FileRecord, target_root: &Path) -> Self {
        let target_path = target_root.join(&record.relative_path);
        Self {
            record,
            target_path,
        }
    }
}

/// The immutable output of planning.
///
/// `raw_count + jpeg_count == items.len()` and every override item is also
/// in `items`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CopyPlan {
    /// Items in copy order: capture time ascending, then name
    pub items: Vec<CopyItem>,
    /// Items whose target already exists (only detected with overrides allowed)
    pub override_items: Vec<CopyItem>,
    pub raw_count: usize,
    pub jpeg_count: usize,
    /// JPEGs skipped because a RAW sibling exists
    pub skipped_jpegs: usize,
    pub skipped_raws_date: usize,
    pub skipped_jpegs_date: usize,
    /// RAWs skipped because the target exists and overrides are off
    pub skipped_raws_duplicate: usize,
    pub skipped_jpegs_duplicate: usize,
    pub raw_overrides: usize,
    pub jpeg_overrides: usize,
    /// Explicit bounds when given, else the observed capture-time span
    pub range: DateRange,
    /// Non-fatal problems, e.g. metadata fallbacks
    pub warnings: Vec<String>,
}

impl CopyPlan {
    pub fn override_count(&self) -> usize {
        self.raw_overrides + self.jpeg_overrides
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items an execution will copy given the override decision
    pub fn items_to_copy(&self, include_overrides: bool) -> Vec<&CopyItem> {
        if include_overrides || self.override_items.is_empty() {
            return self.items.iter().collect();
        }

        let excluded: std::collections::HashSet<&Path> = self
            .override_items
            .iter()
            .map(|item| item.target_path.as_path())
            .collect();

        self.items
            .iter()
            .filter(|item| !excluded.contains(item.target_path.as_path()))
            .collect()
    }
}

/// Result of executing a plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CopyReport {
    pub files_copied: usize,
    /// Plan items left alone because overrides were declined
    pub overrides_skipped: usize,
    pub duration_ms: u64,
}
