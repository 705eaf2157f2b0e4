//! Execution contexts: where a delivery runs.
//!
//! A subscription names a [`Context`], and the dispatch engine routes each
//! matching delivery accordingly:
//! - [`Context::Caller`]: inline, synchronously, in the posting context;
//! - [`Context::Primary`]: onto the process's designated main-equivalent
//!   context, consumed by a [`PrimaryDriver`];
//! - [`Context::Background`]: onto the shared blocking pool;
//! - [`Context::Custom`]: onto a caller-supplied [`Executor`].
//!
//! The engine depends only on the [`Executor`] capability (`submit(job)`),
//! never on concrete threading primitives.
//!
//! Internal modules:
//! - [`context`]: the [`Context`] enum, the [`Executor`] trait and [`Job`] alias;
//! - [`primary`]: queue-backed executor plus the host-driven [`PrimaryDriver`];
//! - [`background`]: executor over the tokio blocking pool.

mod background;
mod context;
mod primary;

pub use context::{Context, Executor, Job};
pub use primary::PrimaryDriver;

pub(crate) use background::BackgroundExecutor;
pub(crate) use primary::PrimaryExecutor;
