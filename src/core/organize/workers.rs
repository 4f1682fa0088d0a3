//! Bounded metadata worker pool.
//!
//! A feeder thread submits candidates over a bounded channel, a fixed number
//! of workers resolve capture times, and the calling thread collects exactly
//! one outcome per submitted candidate. Completion order is a race; the
//! planner sorts afterwards.

use super::types::{DateRange, FileRecord};
use crate::core::cancel::CancellationToken;
use crate::core::fs::FileSystem;
use crate::core::metadata::CaptureTimeReader;
use crate::core::scanner::{relative_to, Candidate, ImageKind};
use crate::error::ScanError;
use crate::events::{Event, EventSender, ScanEvent, ScanProgress};
use crossbeam_channel::{bounded, Receiver};
use std::path::Path;
use std::thread;
use tracing::debug;

/// What happened to a single candidate
#[derive(Debug)]
enum Outcome {
    Included {
        record: FileRecord,
        warning: Option<String>,
    },
    SkippedByDate(ImageKind),
    Failed(ScanError),
}

/// Everything the pool resolved, in completion order
#[derive(Debug, Default)]
pub(crate) struct Resolved {
    pub records: Vec<FileRecord>,
    pub warnings: Vec<String>,
    pub skipped_raws_date: usize,
    pub skipped_jpegs_date: usize,
}

pub(crate) struct MetadataPool<'a> {
    fs: &'a dyn FileSystem,
    reader: &'a dyn CaptureTimeReader,
    source_root: &'a Path,
    range: DateRange,
    workers: usize,
}

impl<'a> MetadataPool<'a> {
    pub fn new(
        fs: &'a dyn FileSystem,
        reader: &'a dyn CaptureTimeReader,
        source_root: &'a Path,
        range: DateRange,
        workers: usize,
    ) -> Self {
        Self {
            fs,
            reader,
            source_root,
            range,
            workers: workers.max(1),
        }
    }

    /// Resolve every candidate.
    ///
    /// The first fatal outcome (stat failure or cancellation) aborts the whole
    /// batch and discards everything collected so far.
    pub fn resolve(
        &self,
        candidates: &[Candidate],
        cancel: &CancellationToken,
        events: &EventSender,
    ) -> Result<Resolved, ScanError> {
        if candidates.is_empty() {
            return if cancel.is_cancelled() {
                Err(ScanError::Cancelled)
            } else {
                Ok(Resolved::default())
            };
        }

        let worker_count = self.workers.min(candidates.len());
        debug!("Using {} metadata workers", worker_count);

        let (job_tx, job_rx) = bounded::<&Candidate>(worker_count);
        let (result_tx, result_rx) = bounded::<Outcome>(worker_count);
        // Stops the feeder when the collector bails out early
        let abort = CancellationToken::new();

        thread::scope(|scope| {
            for _ in 0..worker_count {
                let job_rx = job_rx.clone();
                let result_tx = result_tx.clone();
                scope.spawn(move || {
                    for candidate in job_rx.iter() {
                        if result_tx.send(self.resolve_one(candidate, cancel)).is_err() {
                            break;
                        }
                    }
                });
            }
            drop(job_rx);
            drop(result_tx);

            let feeder_abort = &abort;
            scope.spawn(move || {
                for candidate in candidates {
                    if cancel.is_cancelled() || feeder_abort.is_cancelled() {
                        break;
                    }
                    if job_tx.send(candidate).is_err() {
                        break;
                    }
                }
            });

            let collected = Self::collect(result_rx, candidates.len(), cancel, events);
            if collected.is_err() {
                abort.cancel();
            }
            collected
        })
    }

    fn collect(
        results: Receiver<Outcome>,
        total: usize,
        cancel: &CancellationToken,
        events: &EventSender,
    ) -> Result<Resolved, ScanError> {
        let mut resolved = Resolved::default();

        for current in 1..=total {
            // Disconnects early only when the feeder stopped on cancellation
            let Ok(outcome) = results.recv() else {
                break;
            };

            match outcome {
                Outcome::Failed(e) => return Err(e),
                Outcome::SkippedByDate(ImageKind::Raw) => resolved.skipped_raws_date += 1,
                Outcome::SkippedByDate(ImageKind::Jpeg) => resolved.skipped_jpegs_date += 1,
                Outcome::Included { record, warning } => {
                    resolved.warnings.extend(warning);
                    resolved.records.push(record);
                }
            }

            events.send(Event::Scan(ScanEvent::Progress(ScanProgress { current, total })));
        }

        if cancel.is_cancelled() {
            return Err(ScanError::Cancelled);
        }
        Ok(resolved)
    }

    fn resolve_one(&self, candidate: &Candidate, cancel: &CancellationToken) -> Outcome {
        if cancel.is_cancelled() {
            return Outcome::Failed(ScanError::Cancelled);
        }

        let path = candidate.path.as_path();
        let modified = match self.fs.modified(path) {
            Ok(modified) => modified,
            Err(source) => {
                return Outcome::Failed(ScanError::Stat {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        // Capture time is assumed never to exceed mtime, so an mtime before
        // the start bound rules the file out without reading metadata.
        if self.range.start.is_some_and(|start| modified < start) {
            return Outcome::SkippedByDate(candidate.kind);
        }

        let (captured_at, warning) = match self.reader.capture_time(path, cancel) {
            Ok(captured_at) => (captured_at, None),
            Err(e) if e.is_cancelled() => return Outcome::Failed(ScanError::Cancelled),
            Err(e) => {
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                debug!("{}", e);
                (
                    modified,
                    Some(format!("EXIF not found for {}, using filesystem time", name)),
                )
            }
        };

        if !self.range.contains(captured_at) {
            return Outcome::SkippedByDate(candidate.kind);
        }

        let record = FileRecord::new(
            candidate.path.clone(),
            relative_to(self.source_root, path),
            captured_at,
            candidate.kind,
        );
        Outcome::Included { record, warning }
    }
}
