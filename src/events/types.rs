//! Event type definitions for progress reporting.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// All events emitted by the copy pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    /// Scanning and planning phase events
    Scan(ScanEvent),
    /// Copy execution phase events
    Copy(CopyEvent),
}

/// Events during scanning and metadata resolution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScanEvent {
    /// Walking the source tree has started
    Started { source: PathBuf },
    /// The walk finished and candidates were pre-filtered
    Candidates {
        /// RAW and JPEG files seen during the walk
        found: usize,
        /// Candidates handed to the metadata workers
        to_process: usize,
        /// JPEGs dropped because a RAW sibling exists
        skipped_jpegs: usize,
        /// Candidates dropped because their target already exists
        skipped_duplicates: usize,
    },
    /// One candidate was resolved (included or skipped)
    Progress(ScanProgress),
    /// The plan is ready
    Completed { planned: usize },
}

/// Progress information while resolving capture times
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanProgress {
    /// Candidates resolved so far
    pub current: usize,
    /// Total candidates to resolve
    pub total: usize,
}

/// Events during copy execution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CopyEvent {
    /// Copying has started
    Started { total: usize },
    /// A file is about to be copied; the final event has an empty name
    Progress(CopyProgress),
    /// Copying completed
    Completed { copied: usize },
}

/// Progress information during copying
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CopyProgress {
    /// Zero-based index of the file about to be copied, or `total` when done
    pub current: usize,
    /// Number of files this execution will copy
    pub total: usize,
    /// Display name of the file about to be copied
    pub file_name: String,
}
