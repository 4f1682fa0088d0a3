//! # Core Module
//!
//! The UI-agnostic scan, plan and copy engine.
//!
//! ## Modules
//! - `scanner` - Classifies files and pre-filters the source tree
//! - `metadata` - Reads capture times from EXIF
//! - `organize` - Worker pool, plan builder and copy executor
//! - `fs` - Filesystem capability used by everything above
//! - `cancel` - Cooperative cancellation token

pub mod cancel;
pub mod fs;
pub mod metadata;
pub mod organize;
pub mod scanner;

// Re-export commonly used types
pub use cancel::CancellationToken;
pub use fs::{FileSystem, OsFileSystem};
pub use metadata::{CaptureTimeReader, ExifReader};
pub use organize::{CopyConfig, CopyExecutor, CopyItem, CopyPlan, DateRange, FileRecord, Planner};
pub use scanner::ImageKind;
