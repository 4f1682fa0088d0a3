//! # Filesystem Module
//!
//! The filesystem capability the pipeline is written against.
//!
//! The planner and executor never touch `std::fs` directly. They call a
//! [`FileSystem`] so tests can swap in an in-memory fake and so the copy
//! primitive owns the "no corrupt destination" guarantee.

use crate::error::ScanError;
use chrono::{DateTime, Local};
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// One entry produced by a directory walk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkEntry {
    pub path: PathBuf,
    pub is_dir: bool,
}

/// Boxed walk iterator; the first `Err` ends the walk for the caller
pub type WalkIter<'a> = Box<dyn Iterator<Item = Result<WalkEntry, ScanError>> + 'a>;

/// Filesystem primitives used by the planner and executor.
///
/// Implementations are shared across metadata workers and must be safe
/// for concurrent use.
pub trait FileSystem: Send + Sync {
    /// Recursively walk `root`, yielding directories and files
    fn walk(&self, root: &Path) -> WalkIter<'_>;

    /// Modification time of `path`; fails with `NotFound` if absent
    fn modified(&self, path: &Path) -> io::Result<DateTime<Local>>;

    fn exists(&self, path: &Path) -> io::Result<bool>;

    /// Create `path` and any missing parents
    fn ensure_dir(&self, path: &Path) -> io::Result<()>;

    /// Copy `src` to `dst`, creating missing parent directories.
    ///
    /// An interrupted copy must not leave a partial file at `dst`.
    fn copy_file(&self, src: &Path, dst: &Path) -> io::Result<()>;
}

/// [`FileSystem`] backed by the local disk
#[derive(Debug, Clone, Copy, Default)]
pub struct OsFileSystem;

impl OsFileSystem {
    pub fn new() -> Self {
        Self
    }
}

impl FileSystem for OsFileSystem {
    fn walk(&self, root: &Path) -> WalkIter<'_> {
        let walker = WalkDir::new(root).follow_links(false);

        Box::new(walker.into_iter().map(|entry_result| match entry_result {
            Ok(entry) => Ok(WalkEntry {
                is_dir: entry.file_type().is_dir(),
                path: entry.into_path(),
            }),
            Err(e) => {
                let path = e.path().map(|p| p.to_path_buf()).unwrap_or_default();

                if e.io_error().map(|e| e.kind()) == Some(io::ErrorKind::PermissionDenied) {
                    Err(ScanError::PermissionDenied { path })
                } else {
                    Err(ScanError::Walk {
                        path,
                        source: io::Error::new(io::ErrorKind::Other, e.to_string()),
                    })
                }
            }
        }))
    }

    fn modified(&self, path: &Path) -> io::Result<DateTime<Local>> {
        let modified = fs::metadata(path)?.modified()?;
        Ok(DateTime::<Local>::from(modified))
    }

    fn exists(&self, path: &Path) -> io::Result<bool> {
        match fs::metadata(path) {
            Ok(_) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e),
        }
    }

    fn ensure_dir(&self, path: &Path) -> io::Result<()> {
        fs::create_dir_all(path)
    }

    fn copy_file(&self, src: &Path, dst: &Path) -> io::Result<()> {
        let parent = match dst.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        fs::create_dir_all(parent)?;

        let mut reader = File::open(src)?;
        let permissions = reader.metadata()?.permissions();

        // Stage next to the destination so the final rename stays on one filesystem
        let mut staged = tempfile::NamedTempFile::new_in(parent)?;
        io::copy(&mut reader, staged.as_file_mut())?;
        staged.as_file().sync_all()?;
        staged.as_file().set_permissions(permissions)?;
        staged.persist(dst).map_err(|e| e.error)?;

        Ok(())
    }
}
