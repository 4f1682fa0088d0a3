//! Plan generator for copy operations.

use super::types::*;
use super::workers::MetadataPool;
use crate::core::cancel::CancellationToken;
use crate::core::fs::FileSystem;
use crate::core::metadata::CaptureTimeReader;
use crate::core::scanner::SourceScanner;
use crate::error::{PhopyError, ScanError};
use crate::events::{Event, EventSender, ScanEvent};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Builder for [`Planner`]
#[derive(Default)]
pub struct PlannerBuilder {
    fs: Option<Arc<dyn FileSystem>>,
    reader: Option<Arc<dyn CaptureTimeReader>>,
    workers: Option<usize>,
    allow_override: bool,
}

impl PlannerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the filesystem capability
    pub fn file_system(mut self, fs: Arc<dyn FileSystem>) -> Self {
        self.fs = Some(fs);
        self
    }

    /// Set the capture-time reader
    pub fn capture_times(mut self, reader: Arc<dyn CaptureTimeReader>) -> Self {
        self.reader = Some(reader);
        self
    }

    /// Set the metadata worker count (default: available parallelism)
    pub fn workers(mut self, workers: usize) -> Self {
        self.workers = Some(workers);
        self
    }

    /// Allow existing targets to be planned as overrides
    pub fn allow_override(mut self, allow: bool) -> Self {
        self.allow_override = allow;
        self
    }

    /// Build the planner; both capabilities are required
    pub fn build(self) -> Result<Planner, PhopyError> {
        let fs = self
            .fs
            .ok_or_else(|| PhopyError::Config("planner requires a filesystem".to_string()))?;
        let reader = self.reader.ok_or_else(|| {
            PhopyError::Config("planner requires a capture-time reader".to_string())
        })?;
        let workers = self
            .workers
            .filter(|&n| n > 0)
            .unwrap_or_else(default_workers);

        Ok(Planner {
            fs,
            reader,
            workers,
            allow_override: self.allow_override,
        })
    }
}

fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

/// Scans a source tree and turns it into a [`CopyPlan`]
pub struct Planner {
    fs: Arc<dyn FileSystem>,
    reader: Arc<dyn CaptureTimeReader>,
    workers: usize,
    allow_override: bool,
}

impl Planner {
    /// Create a new planner builder
    pub fn builder() -> PlannerBuilder {
        PlannerBuilder::new()
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Scan `source_dir`, resolve capture times and build the plan.
    ///
    /// Planning has no side effects: the same inputs always give an equal plan.
    /// Any fatal error (walk, stat, cancellation) discards all partial results.
    pub fn plan(
        &self,
        source_dir: &Path,
        target_dir: &Path,
        range: DateRange,
        cancel: &CancellationToken,
        events: &EventSender,
    ) -> Result<CopyPlan, PhopyError> {
        let started = Instant::now();
        events.send(Event::Scan(ScanEvent::Started {
            source: source_dir.to_path_buf(),
        }));

        let scanned = SourceScanner::new(self.fs.as_ref(), self.allow_override).scan(
            source_dir,
            target_dir,
            cancel,
        )?;

        events.send(Event::Scan(ScanEvent::Candidates {
            found: scanned.found(),
            to_process: scanned.candidates.len(),
            skipped_jpegs: scanned.skipped_jpegs,
            skipped_duplicates: scanned.skipped_duplicates(),
        }));

        let pool = MetadataPool::new(
            self.fs.as_ref(),
            self.reader.as_ref(),
            source_dir,
            range,
            self.workers,
        );
        let mut resolved = pool.resolve(&scanned.candidates, cancel, events)?;
        debug!(
            "Collected {} candidate files ({} warnings)",
            resolved.records.len(),
            resolved.warnings.len()
        );

        // Worker completion order is a race; this sort is the canonical order
        resolved.records.sort_by(|a, b| {
            a.captured_at
                .cmp(&b.captured_at)
                .then_with(|| a.name.cmp(&b.name))
        });
        resolved.warnings.sort();

        let items: Vec<CopyItem> = resolved
            .records
            .into_iter()
            .map(|record| CopyItem::new(record, target_dir))
            .collect();
        let raw_count = items.iter().filter(|i| i.record.is_raw()).count();
        let jpeg_count = items.iter().filter(|i| i.record.is_jpeg()).count();

        let override_items = if self.allow_override {
            self.detect_overrides(&items)?
        } else {
            Vec::new()
        };
        let raw_overrides = override_items.iter().filter(|i| i.record.is_raw()).count();
        let jpeg_overrides = override_items.len() - raw_overrides;

        let plan = CopyPlan {
            range: derive_range(&items, range),
            items,
            override_items,
            raw_count,
            jpeg_count,
            skipped_jpegs: scanned.skipped_jpegs,
            skipped_raws_date: resolved.skipped_raws_date,
            skipped_jpegs_date: resolved.skipped_jpegs_date,
            skipped_raws_duplicate: scanned.skipped_raws_duplicate,
            skipped_jpegs_duplicate: scanned.skipped_jpegs_duplicate,
            raw_overrides,
            jpeg_overrides,
            warnings: resolved.warnings,
        };

        info!(
            "Planned {} items ({} RAW, {} JPEG), {} JPEGs skipped, {} RAWs skipped (date), {} RAWs skipped (dupl), {} overrides",
            plan.items.len(),
            plan.raw_count,
            plan.jpeg_count,
            plan.skipped_jpegs,
            plan.skipped_raws_date,
            plan.skipped_raws_duplicate,
            plan.override_count()
        );
        debug!("Planning copy took {:?}", started.elapsed());

        events.send(Event::Scan(ScanEvent::Completed {
            planned: plan.items.len(),
        }));

        Ok(plan)
    }

    /// Items whose target already exists, in plan order
    fn detect_overrides(&self, items: &[CopyItem]) -> Result<Vec<CopyItem>, ScanError> {
        let mut overrides = Vec::new();
        for item in items {
            let exists = self
                .fs
                .exists(&item.target_path)
                .map_err(|source| ScanError::Exists {
                    path: item.target_path.clone(),
                    source,
                })?;
            if exists {
                overrides.push(item.clone());
            }
        }
        Ok(overrides)
    }
}

/// Explicit bounds win, even half-open ones; otherwise the observed span
pub fn derive_range(items: &[CopyItem], requested: DateRange) -> DateRange {
    if !requested.is_unbounded() {
        return requested;
    }

    let start = items.iter().map(|i| i.record.captured_at).min();
    let end = items.iter().map(|i| i.record.captured_at).max();
    DateRange::new(start, end)
}
