//! Executor for copy plans.

use super::types::*;
use crate::core::cancel::CancellationToken;
use crate::core::fs::FileSystem;
use crate::error::{CopyError, PhopyError};
use crate::events::{CopyEvent, CopyProgress, Event, EventSender};
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

/// Copies the items of a [`CopyPlan`] through a [`FileSystem`]
pub struct CopyExecutor {
    fs: Arc<dyn FileSystem>,
}

/// Builder for [`CopyExecutor`]
#[derive(Default)]
pub struct CopyExecutorBuilder {
    fs: Option<Arc<dyn FileSystem>>,
}

impl CopyExecutorBuilder {
    /// Set the filesystem whose `copy_file` performs the copies
    pub fn file_system(mut self, fs: Arc<dyn FileSystem>) -> Self {
        self.fs = Some(fs);
        self
    }

    pub fn build(self) -> Result<CopyExecutor, PhopyError> {
        let fs = self
            .fs
            .ok_or_else(|| PhopyError::Config("executor requires a filesystem".to_string()))?;
        Ok(CopyExecutor { fs })
    }
}

impl CopyExecutor {
    pub fn builder() -> CopyExecutorBuilder {
        CopyExecutorBuilder::default()
    }

    /// Copy every plan item in plan order.
    ///
    /// When `include_overrides` is false, items listed in `override_items` are
    /// left alone. The first failure aborts the run; files copied before it
    /// stay on disk.
    pub fn execute(
        &self,
        plan: &CopyPlan,
        include_overrides: bool,
        cancel: &CancellationToken,
        events: &EventSender,
    ) -> Result<CopyReport, PhopyError> {
        let start = Instant::now();

        let items = plan.items_to_copy(include_overrides);
        let total = items.len();
        debug!("Copying {} of {} items", total, plan.items.len());
        events.send(Event::Copy(CopyEvent::Started { total }));

        for (i, item) in items.iter().enumerate() {
            if cancel.is_cancelled() {
                return Err(CopyError::Cancelled.into());
            }

            events.send(Event::Copy(CopyEvent::Progress(CopyProgress {
                current: i,
                total,
                file_name: item.record.name.clone(),
            })));

            self.fs
                .copy_file(&item.record.source_path, &item.target_path)
                .map_err(|source| CopyError::Copy {
                    source_path: item.record.source_path.clone(),
                    target: item.target_path.clone(),
                    source,
                })?;
        }

        // Final progress
        events.send(Event::Copy(CopyEvent::Progress(CopyProgress {
            current: total,
            total,
            file_name: String::new(),
        })));
        events.send(Event::Copy(CopyEvent::Completed { copied: total }));

        let duration = start.elapsed();
        debug!("Copying files took {:?}", duration);

        Ok(CopyReport {
            files_copied: total,
            overrides_skipped: plan.items.len() - total,
            duration_ms: duration.as_millis() as u64,
        })
    }
}
