//! Event marker trait.
//!
//! Any plain type can act as an event by opting in to [`Event`]. The trait
//! carries no methods; it exists so that the set of postable types is explicit
//! and so the hub can require what dispatch needs:
//!
//! - [`Any`] supplies the runtime type identifier used to filter subscriptions;
//! - `Send + Sync` lets one posted value be shared across deliveries that were
//!   redirected onto other execution contexts.
//!
//! ## Example
//! ```rust
//! use eventhub::Event;
//!
//! struct UserLoggedIn {
//!     pub user_id: u64,
//! }
//!
//! impl Event for UserLoggedIn {}
//! ```

use std::any::Any;

/// Marker trait for values that can be posted through the hub.
///
/// Implement it for each event type; handlers registered for one event type
/// are never invoked for another.
pub trait Event: Any + Send + Sync {}
