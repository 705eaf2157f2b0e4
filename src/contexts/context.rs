//! # Context and the executor capability.
//!
//! [`Context`] is a closed set of delivery targets; it is a tag, not mutable
//! state. Everything except [`Context::Caller`] resolves to an [`Executor`],
//! the single capability the dispatch engine needs from a target:
//!
//! ```text
//! post(event)
//!    ├─ Context::Caller     ─► invoke inline (before post returns)
//!    ├─ Context::Primary    ─► primary queue ─► PrimaryDriver::run/drain
//!    ├─ Context::Background ─► tokio blocking pool
//!    └─ Context::Custom(ex) ─► ex.submit(job)
//! ```
//!
//! `submit` is a synchronous enqueue: it must not block on the job completing
//! and has no failure channel. A delivery handed to an executor cannot be
//! withdrawn.

use std::fmt;
use std::sync::Arc;

/// A boxed delivery, ready to run on whichever context accepts it.
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// Capability interface for a delivery target.
///
/// Implementations enqueue the job for later execution (or run it inline,
/// if that is what the target means by "execute"). `submit` must return
/// promptly and must not panic on a full or closed target; dropping the job
/// is the only acceptable degradation.
pub trait Executor: Send + Sync + 'static {
    /// Hands one delivery to this execution context.
    fn submit(&self, job: Job);
}

/// Where a subscription's handler runs.
///
/// Defaults to [`Context::Caller`]: synchronous, in the posting context.
#[derive(Clone, Default)]
pub enum Context {
    /// Run inline in whatever context called `post`, before `post` returns.
    #[default]
    Caller,
    /// Run on the process's designated main-equivalent context.
    ///
    /// Deliveries queue until the host drives them via
    /// [`PrimaryDriver`](crate::PrimaryDriver).
    Primary,
    /// Run on the shared low-priority blocking pool.
    Background,
    /// Run on a caller-supplied execution context.
    Custom(Arc<dyn Executor>),
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Context::Caller => f.write_str("Caller"),
            Context::Primary => f.write_str("Primary"),
            Context::Background => f.write_str("Background"),
            Context::Custom(_) => f.write_str("Custom"),
        }
    }
}
