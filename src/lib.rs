//! # eventhub
//!
//! **Eventhub** is an in-process, type-filtered publish/subscribe hub.
//!
//! Producers post plain typed events; subscribers register a handler for one
//! event type and choose where it runs. Subscriptions are tied to an owning
//! object's lifetime: the hub holds observers weakly, so dropping the owner
//! retires its subscriptions without an explicit unsubscribe.
//!
//! ## Architecture
//! ```text
//!   subscribe(observer, context, handler)        post(event)
//!                  │                                  │
//!                  ▼                                  ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  EventHub                                                       │
//! │  - Registry (ordered observations, one mutex)                   │
//! │  - dispatch: lock ─► prune dead ─► snapshot ─► unlock ─► route  │
//! └───────┬───────────────┬────────────────┬───────────────┬────────┘
//!         ▼               ▼                ▼               ▼
//!   Context::Caller  Context::Primary  Context::Background  Context::Custom
//!   (inline, in      (queued; host     (tokio blocking      (any Executor
//!   subscription     runs/drains a     pool, fire and       the caller
//!   order)           PrimaryDriver)    forget)              supplies)
//! ```
//!
//! The registry lock is never held while a handler runs, so handlers may
//! re-enter the hub; a posted event reaches only subscriptions registered
//! for its exact type; dead observers are pruned lazily on the next access.
//!
//! ## Features
//! | Area           | Description                                              | Key types / functions                  |
//! |----------------|----------------------------------------------------------|----------------------------------------|
//! | **Events**     | Opt-in marker for postable types.                        | [`Event`]                              |
//! | **Hub**        | Subscription registry and dispatch engine.               | [`EventHub`], [`HubBuilder`]           |
//! | **Contexts**   | Choose where each handler runs.                          | [`Context`], [`Executor`], [`Job`]     |
//! | **Primary**    | Host-driven main-equivalent context.                     | [`PrimaryDriver`]                      |
//! | **Global**     | Process-wide hub with free-function surface.             | [`global`], [`subscribe`], [`post`]    |
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use eventhub::{Context, Event, EventHub};
//!
//! struct Tick(u64);
//! impl Event for Tick {}
//!
//! let hub = EventHub::new();
//! let ui = Arc::new(());
//! let audit = Arc::new(());
//!
//! // Runs inline, before post() returns.
//! hub.subscribe(&ui, |tick: &Tick| println!("tick #{}", tick.0));
//!
//! // Runs on the shared background pool; post() does not wait for it.
//! hub.subscribe_on(&audit, Context::Background, |tick: &Tick| {
//!     // write to the audit log...
//!     let _ = tick.0;
//! });
//!
//! hub.post(Tick(1));
//! hub.unsubscribe(&audit);
//! ```
//!
//! ## Contract notes
//! - Handler panics are **not** caught: an inline handler's panic propagates
//!   out of `post`, a redirected one unwinds on its own context. The hub's
//!   registry stays valid either way; panic hygiene is the subscriber's
//!   responsibility.
//! - Delivery is best effort: no queue bounds, no cross-context ordering, no
//!   way to withdraw a delivery already handed to an execution context.

mod contexts;
mod event;
mod global;
mod hub;

// ---- Public re-exports ----

pub use contexts::{Context, Executor, Job, PrimaryDriver};
pub use event::Event;
pub use global::{global, post, subscribe, subscribe_on, unsubscribe};
pub use hub::{EventHub, HubBuilder};
