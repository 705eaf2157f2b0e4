//! Hub core: subscription registry and dispatch engine.
//!
//! Internal modules:
//! - [`observation`]: one subscription record (weak observer, context, type
//!   tag, type-erased handler);
//! - [`registry`]: the mutex-guarded, ordered collection of observations;
//! - [`core`]: [`EventHub`] itself, snapshot-and-prune dispatch, builder.

mod core;
mod observation;
mod registry;

pub use self::core::{EventHub, HubBuilder};
