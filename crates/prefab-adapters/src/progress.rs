//! Progress observer backed by tracing.

use tracing::info;

use prefab_core::application::{ProgressEvent, ProgressObserver};

/// Emits one `info!` event per progress notification.
///
/// Useful for headless runs where the CLI's interactive renderer is not
/// wanted but progress should still land in the logs.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingProgress;

impl ProgressObserver for TracingProgress {
    fn on_event(&self, event: &ProgressEvent) {
        match event {
            ProgressEvent::StepStarted { index, total, name } => {
                info!(step = %name, position = index + 1, total, "executing step");
            }
            ProgressEvent::CommitStarted { file_count } => {
                info!(files = file_count, "pushing changes to destination");
            }
        }
    }
}
