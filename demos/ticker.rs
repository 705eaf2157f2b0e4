//! # Ticker Example
//!
//! Minimal tour of the hub: two event types, two observers, weak lifetime.
//!
//! The example shows:
//! - Type filtering: the `Tock` handler never sees a `Tick`
//! - Synchronous delivery in subscription order
//! - Dropping an observer retires its subscriptions without unsubscribe
//!
//! ## Run
//! ```bash
//! cargo run --example ticker
//! ```

use std::sync::Arc;

use eventhub::{Event, EventHub};

struct Tick(u64);
impl Event for Tick {}

struct Tock(u64);
impl Event for Tock {}

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let hub = EventHub::new();

    let clock = Arc::new("clock");
    let logger = Arc::new("logger");

    hub.subscribe(&clock, |tick: &Tick| {
        println!(" ├─► clock saw tick #{}", tick.0);
    });
    hub.subscribe(&clock, |tock: &Tock| {
        println!(" ├─► clock saw tock #{}", tock.0);
    });
    hub.subscribe(&logger, |tick: &Tick| {
        println!(" └─► logger saw tick #{}", tick.0);
    });

    println!("posting Tick(1):");
    hub.post(Tick(1));

    println!("posting Tock(1): (tick handlers are skipped)");
    hub.post(Tock(1));

    println!("dropping the logger, posting Tick(2):");
    drop(logger);
    hub.post(Tick(2));

    println!("live subscriptions left: {}", hub.observation_count());
}
