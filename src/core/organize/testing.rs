//! In-memory fakes for planner, worker and executor tests.

use crate::core::cancel::CancellationToken;
use crate::core::fs::{FileSystem, WalkEntry, WalkIter};
use crate::core::metadata::CaptureTimeReader;
use crate::error::{MetadataError, ScanError};
use chrono::{DateTime, Local};
use std::collections::hash_map::RandomState;
use std::collections::{HashMap, HashSet};
use std::hash::BuildHasher;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

/// Filesystem whose walk order, mtimes and existing targets are scripted
#[derive(Default)]
pub struct FakeFileSystem {
    entries: Vec<(PathBuf, bool, Option<DateTime<Local>>)>,
    walk_error_after: Option<usize>,
    existing: Mutex<HashSet<PathBuf>>,
    failing_copy: Option<PathBuf>,
    copies: Mutex<Vec<(PathBuf, PathBuf)>>,
    ensured: Mutex<Vec<PathBuf>>,
}

impl FakeFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn file(mut self, path: &str, modified: DateTime<Local>) -> Self {
        self.entries.push((PathBuf::from(path), false, Some(modified)));
        self
    }

    pub fn dir(mut self, path: &str) -> Self {
        self.entries.push((PathBuf::from(path), true, None));
        self
    }

    /// Mark a target path as already present
    pub fn existing(self, path: &str) -> Self {
        self.existing.lock().unwrap().insert(PathBuf::from(path));
        self
    }

    /// Fail the walk after yielding `count` entries
    pub fn walk_error_after(mut self, count: usize) -> Self {
        self.walk_error_after = Some(count);
        self
    }

    pub fn failing_copy(mut self, src: &str) -> Self {
        self.failing_copy = Some(PathBuf::from(src));
        self
    }

    /// `(source, target)` pairs in the order they were copied
    pub fn copies(&self) -> Vec<(PathBuf, PathBuf)> {
        self.copies.lock().unwrap().clone()
    }

    pub fn ensured(&self) -> Vec<PathBuf> {
        self.ensured.lock().unwrap().clone()
    }
}

impl FileSystem for FakeFileSystem {
    fn walk(&self, _root: &Path) -> WalkIter<'_> {
        let entries = self.entries.iter().map(|(path, is_dir, _)| {
            Ok(WalkEntry {
                path: path.clone(),
                is_dir: *is_dir,
            })
        });

        match self.walk_error_after {
            Some(count) => Box::new(entries.take(count).chain(std::iter::once(Err(
                ScanError::PermissionDenied {
                    path: PathBuf::from("/in/locked"),
                },
            )))),
            None => Box::new(entries),
        }
    }

    fn modified(&self, path: &Path) -> io::Result<DateTime<Local>> {
        self.entries
            .iter()
            .find(|(p, is_dir, _)| p == path && !is_dir)
            .and_then(|(_, _, modified)| *modified)
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no such file"))
    }

    fn exists(&self, path: &Path) -> io::Result<bool> {
        Ok(self.existing.lock().unwrap().contains(path))
    }

    fn ensure_dir(&self, path: &Path) -> io::Result<()> {
        self.ensured.lock().unwrap().push(path.to_path_buf());
        Ok(())
    }

    fn copy_file(&self, src: &Path, dst: &Path) -> io::Result<()> {
        if self.failing_copy.as_deref() == Some(src) {
            return Err(io::Error::new(io::ErrorKind::Other, "disk full"));
        }
        self.copies
            .lock()
            .unwrap()
            .push((src.to_path_buf(), dst.to_path_buf()));
        self.existing.lock().unwrap().insert(dst.to_path_buf());
        Ok(())
    }
}

/// Capture-time reader that records every path it was asked about
#[derive(Default)]
pub struct FakeReader {
    times: HashMap<PathBuf, DateTime<Local>>,
    cancelling: bool,
    jitter: Option<RandomState>,
    calls: Mutex<Vec<PathBuf>>,
}

impl FakeReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn time(mut self, path: &str, captured_at: DateTime<Local>) -> Self {
        self.times.insert(PathBuf::from(path), captured_at);
        self
    }

    /// Every read fails with a cancellation-class error
    pub fn cancelling(mut self) -> Self {
        self.cancelling = true;
        self
    }

    /// Sleep a random 0-3ms per read so workers finish out of order
    pub fn jittered(mut self) -> Self {
        self.jitter = Some(RandomState::new());
        self
    }

    pub fn calls(&self) -> Vec<PathBuf> {
        self.calls.lock().unwrap().clone()
    }
}

impl CaptureTimeReader for FakeReader {
    fn capture_time(
        &self,
        path: &Path,
        _cancel: &CancellationToken,
    ) -> Result<DateTime<Local>, MetadataError> {
        self.calls.lock().unwrap().push(path.to_path_buf());

        if let Some(state) = &self.jitter {
            let micros = state.hash_one(path) % 3_000;
            std::thread::sleep(Duration::from_micros(micros));
        }

        if self.cancelling {
            return Err(MetadataError::Cancelled);
        }

        self.times
            .get(path)
            .copied()
            .ok_or_else(|| MetadataError::Unavailable {
                path: path.to_path_buf(),
                reason: "missing exif".to_string(),
            })
    }
}
