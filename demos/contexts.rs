//! # Execution Contexts Example
//!
//! One event fanned out to all four delivery targets:
//! - `Caller`: inline, before `post` returns
//! - `Primary`: queued, consumed by the primary driver on the main task
//! - `Background`: tokio blocking pool
//! - `Custom`: a dedicated worker thread implementing `Executor`
//!
//! ## Run
//! ```bash
//! cargo run --example contexts
//! ```

use std::sync::Arc;
use std::time::Duration;

use eventhub::{Context, Event, EventHub, Executor, Job};

struct FrameRendered {
    frame: u64,
}
impl Event for FrameRendered {}

/// A caller-supplied execution context: one worker thread fed by a channel.
struct WorkerThread {
    tx: std::sync::mpsc::Sender<Job>,
}

impl WorkerThread {
    fn spawn() -> Arc<Self> {
        let (tx, rx) = std::sync::mpsc::channel::<Job>();
        std::thread::spawn(move || {
            while let Ok(job) = rx.recv() {
                job();
            }
        });
        Arc::new(Self { tx })
    }
}

impl Executor for WorkerThread {
    fn submit(&self, job: Job) {
        let _ = self.tx.send(job);
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let hub = EventHub::new();
    let mut driver = hub.primary_driver().expect("claimed once");

    let renderer = Arc::new("renderer");
    let worker = WorkerThread::spawn();

    hub.subscribe(&renderer, |ev: &FrameRendered| {
        println!(" ├─► [caller]     frame {}", ev.frame);
    });
    hub.subscribe_on(&renderer, Context::Primary, |ev: &FrameRendered| {
        println!(" ├─► [primary]    frame {}", ev.frame);
    });
    hub.subscribe_on(&renderer, Context::Background, |ev: &FrameRendered| {
        println!(" ├─► [background] frame {}", ev.frame);
    });
    hub.subscribe_on(
        &renderer,
        Context::Custom(worker as Arc<dyn Executor>),
        |ev: &FrameRendered| {
            println!(" └─► [custom]     frame {}", ev.frame);
        },
    );

    for frame in 1..=3 {
        println!("posting frame {frame}:");
        hub.post(FrameRendered { frame });

        // This task plays the "main context": drain what queued up.
        let ran = driver.drain();
        println!("    drained {ran} primary deliveries");

        tokio::time::sleep(Duration::from_millis(50)).await;
    }
}
