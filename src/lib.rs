//! # phopy
//!
//! Copies photos from a source tree into a target tree.
//!
//! ## Core Philosophy
//! - **Never overwrite silently** - existing targets are skipped or need confirmation
//! - **RAW wins** - a JPEG is skipped when a RAW with the same name exists
//! - **Plan first** - every run produces an immutable plan before any byte is copied
//!
//! ## Architecture
//! The library is split into a core engine (UI-agnostic) and presentation layers:
//! - `core` - The scan, plan and copy engine
//! - `events` - Event-driven progress reporting
//! - `error` - User-friendly error types
//! - `cli` - Command-line interface (binary only)

pub mod core;
pub mod error;
pub mod events;

// Re-export commonly used types at the crate root
pub use error::{PhopyError, Result};

/// Initialize tracing for the library
///
/// `RUST_LOG` wins when set. Otherwise verbose runs log the pipeline at
/// debug level and quiet runs only surface warnings.
pub fn init_tracing(verbose: bool) {
    let default_directive = if verbose { "phopy=debug" } else { "phopy=warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_directive));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish();

    // A second call (e.g. from tests) keeps the first subscriber.
    let _ = tracing::subscriber::set_global_default(subscriber);
}
