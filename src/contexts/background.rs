//! Background context over the tokio blocking pool.
//!
//! Handlers are plain synchronous closures, so `spawn_blocking` is the right
//! pool: deliveries never tie up reactor threads. The runtime handle is
//! captured at hub construction when one is current; otherwise each submit
//! re-probes, so a hub built before the runtime still reaches the pool.
//!
//! With no runtime anywhere the job runs inline on the submitting thread,
//! with a warning trace. Delivery still happens exactly once.

use tokio::runtime::Handle;
use tracing::warn;

use super::context::{Executor, Job};

/// `Context::Background` target: fire-and-forget onto `spawn_blocking`.
pub(crate) struct BackgroundExecutor {
    handle: Option<Handle>,
}

impl BackgroundExecutor {
    pub(crate) fn new() -> Self {
        Self {
            handle: Handle::try_current().ok(),
        }
    }
}

impl Executor for BackgroundExecutor {
    fn submit(&self, job: Job) {
        let handle = self.handle.clone().or_else(|| Handle::try_current().ok());
        match handle {
            Some(handle) => {
                let _ = handle.spawn_blocking(job);
            }
            None => {
                warn!("no tokio runtime; running background delivery inline");
                job();
            }
        }
    }
}
