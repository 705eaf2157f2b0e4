//! Process-wide hub and the free-function surface.
//!
//! Most hosts want exactly one hub. [`global`] returns it, created lazily on
//! first use and alive for the process lifetime; the free functions forward
//! to it so call sites read like the original observer API:
//!
//! ```rust
//! use std::sync::Arc;
//! use eventhub::Event;
//!
//! struct Saved;
//! impl Event for Saved {}
//!
//! let listener = Arc::new(());
//! eventhub::subscribe(&listener, |_: &Saved| println!("saved"));
//! eventhub::post(Saved);
//! eventhub::unsubscribe(&listener);
//! ```
//!
//! Components that prefer an explicit dependency construct their own
//! [`EventHub`] and pass it around; nothing here is mandatory.

use std::sync::{Arc, OnceLock};

use crate::contexts::Context;
use crate::event::Event;
use crate::hub::EventHub;

static HUB: OnceLock<EventHub> = OnceLock::new();

/// The process-wide hub.
///
/// Also the place to claim the global primary driver:
/// `eventhub::global().primary_driver()`.
pub fn global() -> &'static EventHub {
    HUB.get_or_init(EventHub::new)
}

/// Registers `handler` on the process-wide hub, in the posting context.
///
/// See [`EventHub::subscribe`].
pub fn subscribe<O, E, F>(observer: &Arc<O>, handler: F)
where
    O: Send + Sync + 'static,
    E: Event,
    F: Fn(&E) + Send + Sync + 'static,
{
    global().subscribe(observer, handler);
}

/// Registers `handler` on the process-wide hub, redirected onto `context`.
///
/// See [`EventHub::subscribe_on`].
pub fn subscribe_on<O, E, F>(observer: &Arc<O>, context: Context, handler: F)
where
    O: Send + Sync + 'static,
    E: Event,
    F: Fn(&E) + Send + Sync + 'static,
{
    global().subscribe_on(observer, context, handler);
}

/// Removes every subscription `observer` owns on the process-wide hub.
///
/// See [`EventHub::unsubscribe`].
pub fn unsubscribe<O: Send + Sync + 'static>(observer: &Arc<O>) {
    global().unsubscribe(observer);
}

/// Posts `event` through the process-wide hub.
///
/// See [`EventHub::post`].
pub fn post<E: Event>(event: E) {
    global().post(event);
}
