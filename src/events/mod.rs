//! # Events Module
//!
//! Event-driven progress reporting.
//!
//! ## Design
//! The core library emits events through channels, allowing any UI
//! to subscribe and display progress. The core decides *that* progress
//! happened, never *how* it is shown.
//!
//! ## Example
//! ```rust,ignore
//! let (sender, receiver) = EventChannel::new();
//!
//! std::thread::spawn(move || {
//!     for event in receiver.iter() {
//!         if let Event::Copy(CopyEvent::Progress(p)) = event {
//!             println!("{}/{} {}", p.current, p.total, p.file_name);
//!         }
//!     }
//! });
//!
//! executor.execute(&plan, false, &token, &sender)?;
//! ```

mod channel;
mod types;

pub use channel::{null_sender, EventChannel, EventReceiver, EventSender};
pub use types::*;
