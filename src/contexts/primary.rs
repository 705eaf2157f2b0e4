//! # Primary context: queue plus host-driven consumer.
//!
//! The hub cannot know what the host considers its "main" context (a UI
//! thread, an actor loop, a game tick). So the primary context is split in
//! two halves around an unbounded FIFO queue:
//!
//! - [`PrimaryExecutor`] is the sending half, owned by the hub; `submit` is a
//!   non-blocking enqueue.
//! - [`PrimaryDriver`] is the receiving half, claimed once by the host (via
//!   [`EventHub::primary_driver`](crate::EventHub::primary_driver)) and pinned
//!   to whatever context the host designates as primary.
//!
//! ## What it guarantees
//! - FIFO: primary deliveries run in submission order, across posts.
//! - Deliveries submitted before the driver runs are queued, unbounded.
//!
//! ## What it does **not** guarantee
//! - Delivery when the driver has been dropped: the queue is closed and
//!   submissions are dropped silently (best effort), with a warning trace.

use tokio::sync::mpsc;
use tracing::warn;

use super::context::{Executor, Job};

/// Sending half of the primary queue; the hub's `Context::Primary` target.
pub(crate) struct PrimaryExecutor {
    tx: mpsc::UnboundedSender<Job>,
}

impl PrimaryExecutor {
    /// Creates the queue and returns both halves.
    pub(crate) fn new() -> (Self, PrimaryDriver) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, PrimaryDriver { rx })
    }
}

impl Executor for PrimaryExecutor {
    fn submit(&self, job: Job) {
        if self.tx.send(job).is_err() {
            warn!("primary driver dropped; primary-context delivery discarded");
        }
    }
}

/// Consumes primary-context deliveries on the host's chosen context.
///
/// Claimed at most once from the hub; the host either awaits [`run`] on its
/// main-equivalent task or calls [`drain`] from a tick loop.
///
/// [`run`]: PrimaryDriver::run
/// [`drain`]: PrimaryDriver::drain
pub struct PrimaryDriver {
    rx: mpsc::UnboundedReceiver<Job>,
}

impl PrimaryDriver {
    /// Runs queued deliveries as they arrive.
    ///
    /// Returns once every hub clone holding the sending half is gone and the
    /// queue has been emptied.
    pub async fn run(mut self) {
        while let Some(job) = self.rx.recv().await {
            job();
        }
    }

    /// Runs everything currently queued without waiting; returns the count.
    ///
    /// Suited to tick loops and tests, where the host polls the queue at its
    /// own cadence.
    pub fn drain(&mut self) -> usize {
        let mut ran = 0;
        while let Ok(job) = self.rx.try_recv() {
            job();
            ran += 1;
        }
        ran
    }
}
