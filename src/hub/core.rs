//! # EventHub: the dispatch engine.
//!
//! One hub instance owns the observation registry and the default execution
//! contexts. Cloning a hub shares both, so a hub can be handed to every
//! component that publishes or subscribes; a process typically keeps one
//! (see [`crate::global`] for the process-wide instance).
//!
//! ## Dispatch
//! ```text
//! post(event)
//!   ├─► lock registry ─► prune expired ─► snapshot ─► unlock
//!   └─► for each snapshot entry with a matching event type:
//!         ├─ Caller      ─► invoke inline, in subscription order
//!         └─ other       ─► submit job to that context (fire and forget)
//! ```
//!
//! ## What it guarantees
//! - The registry lock is never held while a handler runs: handlers may
//!   freely call `subscribe`, `unsubscribe` or `post` without deadlocking.
//! - Caller-context deliveries for one post run strictly in subscription
//!   order, each completing before the next, all before `post` returns.
//! - A dead observer's handler is never invoked; its entry is pruned on the
//!   next post, unsubscribe, or count.
//!
//! ## What it does **not** guarantee
//! - No ordering between redirected deliveries, or across concurrent posts.
//! - No isolation from handler panics: a panicking caller-context handler
//!   propagates out of [`EventHub::post`]; a redirected one unwinds on its
//!   execution context. The hub itself stays valid either way.

use std::any::TypeId;
use std::sync::{Arc, Mutex, PoisonError};

use tracing::{debug, trace};

use crate::contexts::{BackgroundExecutor, Context, Executor, PrimaryDriver, PrimaryExecutor};
use crate::event::Event;

use super::observation::{Observation, Payload};
use super::registry::Registry;

/// In-process, type-filtered publish/subscribe hub.
///
/// Clones share the same registry and execution contexts.
///
/// ## Example
/// ```rust
/// use std::sync::Arc;
/// use eventhub::{Event, EventHub};
///
/// struct Tick(u64);
/// impl Event for Tick {}
///
/// let hub = EventHub::new();
/// let listener = Arc::new(());
///
/// hub.subscribe(&listener, |tick: &Tick| {
///     println!("tick #{}", tick.0);
/// });
/// hub.post(Tick(1));
/// ```
#[derive(Clone)]
pub struct EventHub {
    registry: Arc<Registry>,
    primary: Arc<dyn Executor>,
    background: Arc<dyn Executor>,
    driver: Arc<Mutex<Option<PrimaryDriver>>>,
}

impl EventHub {
    /// Creates a hub with the default primary queue and background pool.
    #[must_use]
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Starts configuring a hub with injected execution contexts.
    #[must_use]
    pub fn builder() -> HubBuilder {
        HubBuilder::default()
    }

    /// Registers `handler` to run in the posting context (synchronously)
    /// whenever an event of the handler's type is posted, for as long as
    /// `observer` stays alive.
    ///
    /// The hub holds `observer` weakly; dropping it retires the subscription
    /// without an explicit [`unsubscribe`](EventHub::unsubscribe). Subscribing
    /// the same observer twice creates two independent subscriptions, both of
    /// which fire.
    pub fn subscribe<O, E, F>(&self, observer: &Arc<O>, handler: F)
    where
        O: Send + Sync + 'static,
        E: Event,
        F: Fn(&E) + Send + Sync + 'static,
    {
        self.subscribe_on(observer, Context::Caller, handler);
    }

    /// Like [`subscribe`](EventHub::subscribe), with the handler redirected
    /// onto `context`.
    pub fn subscribe_on<O, E, F>(&self, observer: &Arc<O>, context: Context, handler: F)
    where
        O: Send + Sync + 'static,
        E: Event,
        F: Fn(&E) + Send + Sync + 'static,
    {
        trace!(
            observer = ?Arc::as_ptr(observer),
            event = std::any::type_name::<E>(),
            ?context,
            "subscribe",
        );
        self.registry.add(Observation::new(observer, context, handler));
    }

    /// Removes every subscription owned by `observer`.
    ///
    /// Idempotent: safe to call repeatedly, or for an observer that never
    /// subscribed. An already-submitted redirected delivery may still run.
    pub fn unsubscribe<O: Send + Sync + 'static>(&self, observer: &Arc<O>) {
        trace!(observer = ?Arc::as_ptr(observer), "unsubscribe");
        self.registry.remove(Arc::as_ptr(observer) as *const ());
    }

    /// Delivers `event` to every live subscription registered for its type.
    ///
    /// Caller-context handlers run inline, in subscription order, before this
    /// returns; redirected handlers are submitted to their context and not
    /// awaited. Never fails. Handler panics are not caught: an inline panic
    /// propagates to the caller, and the hub remains usable afterwards.
    pub fn post<E: Event>(&self, event: E) {
        let snapshot = self.registry.snapshot_and_prune();
        let wanted = TypeId::of::<E>();
        let payload: Arc<Payload> = Arc::new(event);

        let mut inline = 0usize;
        let mut redirected = 0usize;
        for obs in &snapshot {
            if !obs.matches(wanted) {
                trace!(registered = obs.event_name(), "type mismatch, skipped");
                continue;
            }
            match obs.context() {
                Context::Caller => {
                    obs.invoke(&*payload);
                    inline += 1;
                }
                Context::Primary => {
                    self.primary.submit(obs.job(&payload));
                    redirected += 1;
                }
                Context::Background => {
                    self.background.submit(obs.job(&payload));
                    redirected += 1;
                }
                Context::Custom(executor) => {
                    executor.submit(obs.job(&payload));
                    redirected += 1;
                }
            }
        }
        debug!(
            event = std::any::type_name::<E>(),
            inline, redirected, "posted",
        );
    }

    /// Number of live subscriptions (prunes expired entries as it counts).
    #[must_use]
    pub fn observation_count(&self) -> usize {
        self.registry.live_len()
    }

    /// Claims the primary-context driver.
    ///
    /// Returns `Some` exactly once, and only when the hub owns the default
    /// primary queue (a builder-injected primary executor has no driver).
    /// Until the host runs or drains the driver, primary deliveries queue
    /// unbounded; once it is dropped they are discarded.
    #[must_use]
    pub fn primary_driver(&self) -> Option<PrimaryDriver> {
        self.driver
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }
}

impl Default for EventHub {
    fn default() -> Self {
        Self::new()
    }
}

/// Configures the execution contexts behind [`Context::Primary`] and
/// [`Context::Background`].
///
/// Injecting a primary executor replaces the hub-owned queue, so
/// [`EventHub::primary_driver`] then returns `None`; routing primary
/// deliveries becomes the injected executor's business.
#[derive(Default)]
pub struct HubBuilder {
    primary: Option<Arc<dyn Executor>>,
    background: Option<Arc<dyn Executor>>,
}

impl HubBuilder {
    /// Overrides the primary execution context.
    #[must_use]
    pub fn primary(mut self, executor: Arc<dyn Executor>) -> Self {
        self.primary = Some(executor);
        self
    }

    /// Overrides the background execution context.
    #[must_use]
    pub fn background(mut self, executor: Arc<dyn Executor>) -> Self {
        self.background = Some(executor);
        self
    }

    /// Builds the hub.
    #[must_use]
    pub fn build(self) -> EventHub {
        let (primary, driver) = match self.primary {
            Some(executor) => (executor, None),
            None => {
                let (executor, driver) = PrimaryExecutor::new();
                (Arc::new(executor) as Arc<dyn Executor>, Some(driver))
            }
        };
        let background = self
            .background
            .unwrap_or_else(|| Arc::new(BackgroundExecutor::new()));
        EventHub {
            registry: Arc::new(Registry::default()),
            primary,
            background,
            driver: Arc::new(Mutex::new(driver)),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::time::Duration;

    use super::*;
    use crate::contexts::Job;

    struct Tick(u64);
    impl Event for Tick {}

    struct Tock;
    impl Event for Tock {}

    /// Executor that parks jobs until the test runs them by hand.
    #[derive(Default)]
    struct ParkedExecutor {
        jobs: Mutex<Vec<Job>>,
    }

    impl ParkedExecutor {
        fn run_all(&self) -> usize {
            let jobs: Vec<Job> = std::mem::take(&mut *self.jobs.lock().unwrap());
            let ran = jobs.len();
            for job in jobs {
                job();
            }
            ran
        }
    }

    impl Executor for ParkedExecutor {
        fn submit(&self, job: Job) {
            self.jobs.lock().unwrap().push(job);
        }
    }

    fn counter() -> (Arc<AtomicUsize>, impl Fn(&Tick) + Send + Sync + 'static) {
        let count = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&count);
        (count, move |_: &Tick| {
            seen.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn test_delivers_exactly_once_per_subscription() {
        let hub = EventHub::new();
        let observer = Arc::new(());
        let (count, handler) = counter();

        hub.subscribe(&observer, handler);
        hub.post(Tick(1));
        assert_eq!(count.load(Ordering::SeqCst), 1);

        hub.post(Tick(2));
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_handler_receives_the_posted_value() {
        let hub = EventHub::new();
        let observer = Arc::new(());
        let seen = Arc::new(AtomicUsize::new(0));
        {
            let seen = Arc::clone(&seen);
            hub.subscribe(&observer, move |tick: &Tick| {
                seen.store(tick.0 as usize, Ordering::SeqCst);
            });
        }

        hub.post(Tick(42));
        assert_eq!(seen.load(Ordering::SeqCst), 42);
    }

    #[test]
    fn test_type_isolation() {
        let hub = EventHub::new();
        let observer = Arc::new(());
        let (ticks, handler) = counter();
        let tocks = Arc::new(AtomicUsize::new(0));

        hub.subscribe(&observer, handler);
        {
            let tocks = Arc::clone(&tocks);
            hub.subscribe(&observer, move |_: &Tock| {
                tocks.fetch_add(1, Ordering::SeqCst);
            });
        }

        hub.post(Tock);
        assert_eq!(ticks.load(Ordering::SeqCst), 0);
        assert_eq!(tocks.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_dead_observer_never_fires() {
        let hub = EventHub::new();
        let observer = Arc::new(());
        let (count, handler) = counter();

        hub.subscribe(&observer, handler);
        drop(observer);

        hub.post(Tick(1));
        assert_eq!(count.load(Ordering::SeqCst), 0);
        assert_eq!(hub.observation_count(), 0);
    }

    #[test]
    fn test_unsubscribe_is_idempotent_and_targeted() {
        let hub = EventHub::new();
        let a = Arc::new(());
        let b = Arc::new(());
        let (count_a, handler_a) = counter();
        let (count_b, handler_b) = counter();

        hub.subscribe(&a, handler_a);
        hub.subscribe(&b, handler_b);

        hub.unsubscribe(&a);
        hub.unsubscribe(&a);
        hub.unsubscribe(&Arc::new(0u8));

        hub.post(Tick(1));
        assert_eq!(count_a.load(Ordering::SeqCst), 0);
        assert_eq!(count_b.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_double_subscription_fires_twice() {
        let hub = EventHub::new();
        let observer = Arc::new(());
        let (count, _) = counter();
        for _ in 0..2 {
            let seen = Arc::clone(&count);
            hub.subscribe(&observer, move |_: &Tick| {
                seen.fetch_add(1, Ordering::SeqCst);
            });
        }

        hub.post(Tick(1));
        assert_eq!(count.load(Ordering::SeqCst), 2);
        assert_eq!(hub.observation_count(), 2);
    }

    #[test]
    fn test_caller_context_runs_in_subscription_order() {
        let hub = EventHub::new();
        let observer = Arc::new(());
        let order = Arc::new(Mutex::new(Vec::new()));

        for name in ["first", "second", "third"] {
            let order = Arc::clone(&order);
            hub.subscribe(&observer, move |_: &Tick| {
                order.lock().unwrap().push(name);
            });
        }

        hub.post(Tick(1));
        assert_eq!(*order.lock().unwrap(), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_handler_may_reenter_the_hub() {
        let hub = EventHub::new();
        let observer = Arc::new(());
        let tocks = Arc::new(AtomicUsize::new(0));

        {
            let hub = hub.clone();
            hub.clone().subscribe(&observer, move |_: &Tick| {
                hub.post(Tock);
            });
        }
        {
            let tocks = Arc::clone(&tocks);
            hub.subscribe(&observer, move |_: &Tock| {
                tocks.fetch_add(1, Ordering::SeqCst);
            });
        }

        // Would deadlock if the registry lock were held across handlers.
        hub.post(Tick(1));
        assert_eq!(tocks.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_handler_may_unsubscribe_itself() {
        let hub = EventHub::new();
        let observer = Arc::new(());
        let (count, _) = counter();
        {
            let hub = hub.clone();
            let observer = Arc::clone(&observer);
            let seen = Arc::clone(&count);
            hub.clone().subscribe(&observer.clone(), move |_: &Tick| {
                seen.fetch_add(1, Ordering::SeqCst);
                hub.unsubscribe(&observer);
            });
        }

        hub.post(Tick(1));
        hub.post(Tick(2));
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_hub_survives_handler_panic() {
        let hub = EventHub::new();
        let observer = Arc::new(());
        hub.subscribe(&observer, |_: &Tick| panic!("subscriber bug"));

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            hub.post(Tick(1));
        }));
        assert!(result.is_err());

        // Registry was not corrupted; the hub keeps working.
        let other = Arc::new(());
        let tocks = Arc::new(AtomicUsize::new(0));
        {
            let tocks = Arc::clone(&tocks);
            hub.subscribe(&other, move |_: &Tock| {
                tocks.fetch_add(1, Ordering::SeqCst);
            });
        }
        hub.post(Tock);
        assert_eq!(tocks.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_primary_deliveries_queue_until_drained() {
        let hub = EventHub::new();
        let mut driver = hub.primary_driver().expect("first claim");
        assert!(hub.primary_driver().is_none(), "driver claimed once");

        let observer = Arc::new(());
        let (count, _) = counter();
        {
            let seen = Arc::clone(&count);
            hub.subscribe_on(&observer, Context::Primary, move |_: &Tick| {
                seen.fetch_add(1, Ordering::SeqCst);
            });
        }

        hub.post(Tick(1));
        hub.post(Tick(2));
        assert_eq!(count.load(Ordering::SeqCst), 0, "post must not run primary inline");

        assert_eq!(driver.drain(), 2);
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_primary_queue_is_fifo_across_posts() {
        let hub = EventHub::new();
        let mut driver = hub.primary_driver().unwrap();
        let observer = Arc::new(());
        let order = Arc::new(Mutex::new(Vec::new()));
        {
            let order = Arc::clone(&order);
            hub.subscribe_on(&observer, Context::Primary, move |tick: &Tick| {
                order.lock().unwrap().push(tick.0);
            });
        }

        for n in 1..=4 {
            hub.post(Tick(n));
        }
        driver.drain();
        assert_eq!(*order.lock().unwrap(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_primary_delivery_dropped_without_driver() {
        let hub = EventHub::new();
        drop(hub.primary_driver().unwrap());

        let observer = Arc::new(());
        let (count, _) = counter();
        {
            let seen = Arc::clone(&count);
            hub.subscribe_on(&observer, Context::Primary, move |_: &Tick| {
                seen.fetch_add(1, Ordering::SeqCst);
            });
        }

        // Best effort: silently discarded, nothing panics.
        hub.post(Tick(1));
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_primary_driver_run_finishes_after_last_hub_clone() {
        let hub = EventHub::new();
        let driver = hub.primary_driver().unwrap();
        let observer = Arc::new(());
        let (count, _) = counter();
        {
            let seen = Arc::clone(&count);
            hub.subscribe_on(&observer, Context::Primary, move |_: &Tick| {
                seen.fetch_add(1, Ordering::SeqCst);
            });
        }

        hub.post(Tick(1));
        hub.post(Tick(2));
        drop(hub);

        // All senders gone: run() drains the backlog and returns.
        driver.run().await;
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_custom_executor_receives_the_delivery() {
        let hub = EventHub::new();
        let executor = Arc::new(ParkedExecutor::default());
        let observer = Arc::new(());
        let (count, _) = counter();
        {
            let seen = Arc::clone(&count);
            hub.subscribe_on(
                &observer,
                Context::Custom(Arc::clone(&executor) as Arc<dyn Executor>),
                move |_: &Tick| {
                    seen.fetch_add(1, Ordering::SeqCst);
                },
            );
        }

        hub.post(Tick(1));
        assert_eq!(count.load(Ordering::SeqCst), 0);
        assert_eq!(executor.run_all(), 1);
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_builder_injected_primary_has_no_driver() {
        let executor = Arc::new(ParkedExecutor::default());
        let hub = EventHub::builder()
            .primary(Arc::clone(&executor) as Arc<dyn Executor>)
            .build();
        assert!(hub.primary_driver().is_none());

        let observer = Arc::new(());
        let (count, _) = counter();
        {
            let seen = Arc::clone(&count);
            hub.subscribe_on(&observer, Context::Primary, move |_: &Tick| {
                seen.fetch_add(1, Ordering::SeqCst);
            });
        }

        hub.post(Tick(1));
        assert_eq!(executor.run_all(), 1);
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_background_without_runtime_delivers_inline() {
        let hub = EventHub::new();
        let observer = Arc::new(());
        let (count, _) = counter();
        {
            let seen = Arc::clone(&count);
            hub.subscribe_on(&observer, Context::Background, move |_: &Tick| {
                seen.fetch_add(1, Ordering::SeqCst);
            });
        }

        // No runtime to defer to: delivered before post returns.
        hub.post(Tick(1));
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_background_delivery_does_not_block_post() {
        let hub = EventHub::new();
        let observer = Arc::new(());
        let released = Arc::new(AtomicBool::new(false));
        let count = Arc::new(AtomicUsize::new(0));
        let (done_tx, mut done_rx) = tokio::sync::mpsc::unbounded_channel();
        {
            let released = Arc::clone(&released);
            let count = Arc::clone(&count);
            hub.subscribe_on(&observer, Context::Background, move |_: &Tick| {
                while !released.load(Ordering::SeqCst) {
                    std::thread::sleep(Duration::from_millis(1));
                }
                count.fetch_add(1, Ordering::SeqCst);
                let _ = done_tx.send(());
            });
        }

        hub.post(Tick(1));
        assert_eq!(
            count.load(Ordering::SeqCst),
            0,
            "post must not wait for a background delivery"
        );

        released.store(true, Ordering::SeqCst);
        tokio::time::timeout(Duration::from_secs(5), done_rx.recv())
            .await
            .expect("background delivery never ran");
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_sync_and_background_fanout_on_one_post() {
        let hub = EventHub::new();
        let a = Arc::new(());
        let b = Arc::new(());
        let a_ran = Arc::new(AtomicUsize::new(0));
        let (b_tx, mut b_rx) = tokio::sync::mpsc::unbounded_channel();
        let poster = std::thread::current().id();

        {
            let a_ran = Arc::clone(&a_ran);
            hub.subscribe(&a, move |_: &Tick| {
                a_ran.fetch_add(1, Ordering::SeqCst);
            });
        }
        hub.subscribe_on(&b, Context::Background, move |_: &Tick| {
            let _ = b_tx.send(std::thread::current().id());
        });

        hub.post(Tick(1));
        assert_eq!(a_ran.load(Ordering::SeqCst), 1, "A completes before post returns");

        let b_thread = tokio::time::timeout(Duration::from_secs(5), b_rx.recv())
            .await
            .expect("B never ran")
            .unwrap();
        assert_ne!(b_thread, poster, "B runs off the posting context");
        assert!(b_rx.try_recv().is_err(), "B ran at most once");
    }
}
