//! # Observation registry.
//!
//! Owns the ordered sequence of active [`Observation`]s under one mutex.
//! Insertion order is preserved, so delivery order equals subscription order
//! for a fixed subscription sequence.
//!
//! ## Rules
//! - Every operation takes the same lock; none observes a partially mutated
//!   sequence and no two mutations interleave.
//! - The lock is held only for a push, a retain, or a clone. User code never
//!   runs under it; dispatch works on the snapshot after release.
//! - Expired observers are pruned wherever the list is already being walked
//!   (`remove`, `snapshot_and_prune`, `live_len`), never eagerly.
//! - A poisoned lock is recovered: the guarded section contains no user code,
//!   so a panicking thread cannot leave the sequence half-mutated.

use std::sync::{Mutex, MutexGuard, PoisonError};

use super::observation::Observation;

/// Ordered, mutex-guarded collection of subscriptions.
#[derive(Default)]
pub(crate) struct Registry {
    observations: Mutex<Vec<Observation>>,
}

impl Registry {
    fn guard(&self) -> MutexGuard<'_, Vec<Observation>> {
        self.observations
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Appends one observation; never fails.
    pub(crate) fn add(&self, observation: Observation) {
        self.guard().push(observation);
    }

    /// Removes every observation owned by `owner`, plus any that expired.
    ///
    /// Idempotent; removal doubles as incidental garbage collection.
    pub(crate) fn remove(&self, owner: *const ()) {
        self.guard()
            .retain(|obs| obs.is_alive() && obs.owner_ptr() != owner);
    }

    /// Drops expired observations, then copies the survivors in order.
    pub(crate) fn snapshot_and_prune(&self) -> Vec<Observation> {
        let mut observations = self.guard();
        observations.retain(Observation::is_alive);
        observations.clone()
    }

    /// Prunes expired observations and returns how many remain.
    pub(crate) fn live_len(&self) -> usize {
        let mut observations = self.guard();
        observations.retain(Observation::is_alive);
        observations.len()
    }
}
