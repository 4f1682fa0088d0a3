//! # Error Module
//!
//! User-friendly error types for phopy.
//!
//! ## Design Principles
//! - **Never panic** on user data - return errors instead
//! - **Include context** - the operation and the path involved
//! - **Cancellation is its own class** - callers can tell it apart from failures
//! - **Metadata problems are recoverable** - they never reach the top level

use std::path::PathBuf;
use thiserror::Error;

/// Top-level application error
#[derive(Error, Debug)]
pub enum PhopyError {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Scanning error: {0}")]
    Scan(#[from] ScanError),

    #[error("Copy error: {0}")]
    Copy(#[from] CopyError),

    #[error("Failed to read confirmation: {0}")]
    Prompt(#[source] std::io::Error),

    #[error("Failed to write output: {0}")]
    Output(String),
}

impl PhopyError {
    /// True when the run stopped because its cancellation token was signalled
    pub fn is_cancelled(&self) -> bool {
        matches!(
            self,
            PhopyError::Scan(ScanError::Cancelled) | PhopyError::Copy(CopyError::Cancelled)
        )
    }

    /// One-line message shown to the user when the run fails
    pub fn user_message(&self) -> String {
        match self {
            PhopyError::Config(reason) => format!("Invalid configuration: {}", reason),
            PhopyError::Scan(ScanError::SourceNotFound { path }) => {
                format!("Path not found: {}", path.display())
            }
            _ if self.is_cancelled() => "Operation cancelled".to_string(),
            PhopyError::Scan(e) => format!("Scan failed: {}", e),
            PhopyError::Copy(e) => format!("I/O error: {}", e),
            other => format!("Unexpected error: {}", other),
        }
    }
}

/// Errors that abort the scan and planning stages
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Source directory not found: {path}")]
    SourceNotFound { path: PathBuf },

    #[error("Permission denied accessing: {path}")]
    PermissionDenied { path: PathBuf },

    #[error("Failed to walk {path}: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to stat {path}: {source}")]
    Stat {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to check whether {path} exists: {source}")]
    Exists {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Scan was cancelled")]
    Cancelled,
}

/// Errors from reading a capture time out of a single file
#[derive(Error, Debug)]
pub enum MetadataError {
    #[error("Metadata read was cancelled")]
    Cancelled,

    #[error("No capture time in {path}: {reason}")]
    Unavailable { path: PathBuf, reason: String },

    #[error("Failed to open {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl MetadataError {
    /// Cancellation-class errors are fatal, everything else falls back to mtime
    pub fn is_cancelled(&self) -> bool {
        matches!(self, MetadataError::Cancelled)
    }
}

/// Errors that abort copy execution
#[derive(Error, Debug)]
pub enum CopyError {
    #[error("Failed to create directory {path}: {source}")]
    EnsureDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to copy {source_path} to {target}: {source}")]
    Copy {
        source_path: PathBuf,
        target: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Copy was cancelled")]
    Cancelled,
}

/// Convenience Result type alias
pub type Result<T> = std::result::Result<T, PhopyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scan_error_includes_path() {
        let error = ScanError::Stat {
            path: PathBuf::from("/photos/DSC01.ARW"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        let message = error.to_string();
        assert!(message.contains("/photos/DSC01.ARW"));
        assert!(message.contains("stat"));
    }

    #[test]
    fn copy_error_includes_both_paths() {
        let error = CopyError::Copy {
            source_path: PathBuf::from("/in/a.jpg"),
            target: PathBuf::from("/out/a.jpg"),
            source: std::io::Error::new(std::io::ErrorKind::Other, "disk full"),
        };
        let message = error.to_string();
        assert!(message.contains("/in/a.jpg"));
        assert!(message.contains("/out/a.jpg"));
        assert!(message.contains("disk full"));
    }

    #[test]
    fn cancellation_is_detected_through_wrapping() {
        assert!(PhopyError::from(ScanError::Cancelled).is_cancelled());
        assert!(PhopyError::from(CopyError::Cancelled).is_cancelled());
        assert!(!PhopyError::Config("x".into()).is_cancelled());
        assert!(MetadataError::Cancelled.is_cancelled());
        assert!(!MetadataError::Unavailable {
            path: PathBuf::from("a.jpg"),
            reason: "no exif".into(),
        }
        .is_cancelled());
    }

    #[test]
    fn user_message_names_missing_path() {
        let error = PhopyError::from(ScanError::SourceNotFound {
            path: PathBuf::from("/nope"),
        });
        assert_eq!(error.user_message(), "Path not found: /nope");
        assert_eq!(
            PhopyError::from(CopyError::Cancelled).user_message(),
            "Operation cancelled"
        );
    }
}
