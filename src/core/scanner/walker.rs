//! Source tree walk: classification, RAW sibling detection and target pre-filtering.

use super::{filter::RawSiblings, filter::TargetFilter, Candidate, ImageKind};
use crate::core::cancel::CancellationToken;
use crate::core::fs::FileSystem;
use crate::error::ScanError;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::debug;

/// Result of walking and pre-filtering the source tree
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanOutcome {
    /// Candidates for metadata extraction, RAWs first, each group in walk order
    pub candidates: Vec<Candidate>,
    /// RAW files seen during the walk
    pub raw_found: usize,
    /// JPEG files seen during the walk
    pub jpeg_found: usize,
    /// JPEGs dropped because a RAW with the same base name exists
    pub skipped_jpegs: usize,
    /// RAWs dropped because their target exists and overrides are off
    pub skipped_raws_duplicate: usize,
    /// JPEGs dropped because their target exists and overrides are off
    pub skipped_jpegs_duplicate: usize,
}

impl ScanOutcome {
    pub fn found(&self) -> usize {
        self.raw_found + self.jpeg_found
    }

    pub fn skipped_duplicates(&self) -> usize {
        self.skipped_raws_duplicate + self.skipped_jpegs_duplicate
    }
}

/// Walks a source tree through a [`FileSystem`]
pub struct SourceScanner<'a> {
    fs: &'a dyn FileSystem,
    allow_override: bool,
}

impl<'a> SourceScanner<'a> {
    pub fn new(fs: &'a dyn FileSystem, allow_override: bool) -> Self {
        Self { fs, allow_override }
    }

    /// Walk `source_root` and pre-filter against `target_root`.
    ///
    /// Any walk error aborts the scan; no partial outcome is returned.
    pub fn scan(
        &self,
        source_root: &Path,
        target_root: &Path,
        cancel: &CancellationToken,
    ) -> Result<ScanOutcome, ScanError> {
        let started = Instant::now();

        // Phase 1: classify and collect RAW base names
        let mut raw_paths: Vec<PathBuf> = Vec::new();
        let mut jpeg_paths: Vec<PathBuf> = Vec::new();
        let mut siblings = RawSiblings::new();

        for entry in self.fs.walk(source_root) {
            if cancel.is_cancelled() {
                return Err(ScanError::Cancelled);
            }

            let entry = entry?;
            if entry.is_dir {
                continue;
            }

            match ImageKind::from_path(&entry.path) {
                Some(ImageKind::Raw) => {
                    siblings.insert(&entry.path);
                    raw_paths.push(entry.path);
                }
                Some(ImageKind::Jpeg) => jpeg_paths.push(entry.path),
                None => {}
            }
        }

        // Phase 2: filter on target existence and RAW siblings
        let filter = TargetFilter::new(self.fs, source_root, target_root, self.allow_override);
        let mut outcome = ScanOutcome {
            raw_found: raw_paths.len(),
            jpeg_found: jpeg_paths.len(),
            ..Default::default()
        };

        for path in raw_paths {
            if filter.should_include(&path)? {
                outcome.candidates.push(Candidate {
                    path,
                    kind: ImageKind::Raw,
                });
            } else {
                outcome.skipped_raws_duplicate += 1;
            }
        }

        for path in jpeg_paths {
            if siblings.has_raw_for(&path) {
                outcome.skipped_jpegs += 1;
                continue;
            }

            if filter.should_include(&path)? {
                outcome.candidates.push(Candidate {
                    path,
                    kind: ImageKind::Jpeg,
                });
            } else {
                outcome.skipped_jpegs_duplicate += 1;
            }
        }

        debug!(
            "Found {} candidate files in {} ({} RAW, {} JPEG)",
            outcome.found(),
            source_root.display(),
            outcome.raw_found,
            outcome.jpeg_found
        );
        debug!(
            "Processing {} files after filtering ({} JPEGs skipped for RAW, {} skipped for duplicate)",
            outcome.candidates.len(),
            outcome.skipped_jpegs,
            outcome.skipped_duplicates()
        );
        debug!("Scanning source directory took {:?}", started.elapsed());

        Ok(outcome)
    }
}
