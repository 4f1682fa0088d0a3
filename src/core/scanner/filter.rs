//! Pre-filtering rules applied between the walk and metadata extraction.

use super::{base_name, relative_to};
use crate::core::fs::FileSystem;
use crate::error::ScanError;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Base names of every RAW file seen during a walk.
///
/// Built completely before any JPEG is checked against it, so the result
/// does not depend on walk order.
#[derive(Debug, Clone, Default)]
pub struct RawSiblings {
    names: HashSet<String>,
}

impl RawSiblings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, raw_path: &Path) {
        self.names.insert(base_name(raw_path));
    }

    /// True when a RAW with the same case-insensitive base name was seen
    pub fn has_raw_for(&self, jpeg_path: &Path) -> bool {
        self.names.contains(&base_name(jpeg_path))
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl<'a> FromIterator<&'a Path> for RawSiblings {
    fn from_iter<I: IntoIterator<Item = &'a Path>>(iter: I) -> Self {
        let mut siblings = Self::new();
        for path in iter {
            siblings.insert(path);
        }
        siblings
    }
}

/// Decides whether a source file is worth considering at all, given what
/// already sits in the target tree.
pub struct TargetFilter<'a> {
    fs: &'a dyn FileSystem,
    source_root: &'a Path,
    target_root: &'a Path,
    allow_override: bool,
}

impl<'a> TargetFilter<'a> {
    pub fn new(
        fs: &'a dyn FileSystem,
        source_root: &'a Path,
        target_root: &'a Path,
        allow_override: bool,
    ) -> Self {
        Self {
            fs,
            source_root,
            target_root,
            allow_override,
        }
    }

    /// Where `source_path` lands under the target root
    pub fn target_path(&self, source_path: &Path) -> PathBuf {
        self.target_root
            .join(relative_to(self.source_root, source_path))
    }

    /// False when the target already exists and overrides are not allowed
    pub fn should_include(&self, source_path: &Path) -> Result<bool, ScanError> {
        if self.allow_override {
            return Ok(true);
        }

        let target = self.target_path(source_path);
        let exists = self
            .fs
            .exists(&target)
            .map_err(|source| ScanError::Exists {
                path: target.clone(),
                source,
            })?;
        Ok(!exists)
    }
}
