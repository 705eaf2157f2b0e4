//! One subscription record.
//!
//! An [`Observation`] is immutable once created and is meaningful only while
//! its observer is alive. The observer is held weakly: the hub never extends
//! an observer's lifetime, and a dead observer's entry is pruned lazily on
//! the next registry access. The handler is stored type-erased next to the
//! [`TypeId`] it was registered for; it is invoked only after the tag
//! comparison succeeds.

use std::any::{Any, TypeId};
use std::sync::{Arc, Weak};

use crate::contexts::{Context, Job};
use crate::event::Event;

/// A posted event, erased for storage and shared across deliveries.
pub(crate) type Payload = dyn Any + Send + Sync;

type DeliverFn = Arc<dyn Fn(&Payload) + Send + Sync>;

/// One subscriber's registration: identity, target context, type tag, handler.
#[derive(Clone)]
pub(crate) struct Observation {
    /// Non-owning handle; queried for liveness and identity, never for content.
    observer: Weak<Payload>,
    /// Where the handler runs.
    context: Context,
    /// Runtime type the handler was registered for.
    event_type: TypeId,
    /// Event type name, for traces only.
    event_name: &'static str,
    /// Type-erased handler; narrows the payload back to the concrete event.
    deliver: DeliverFn,
}

impl Observation {
    pub(crate) fn new<O, E, F>(observer: &Arc<O>, context: Context, handler: F) -> Self
    where
        O: Send + Sync + 'static,
        E: Event,
        F: Fn(&E) + Send + Sync + 'static,
    {
        let deliver: DeliverFn = Arc::new(move |payload: &Payload| {
            if let Some(event) = payload.downcast_ref::<E>() {
                handler(event);
            }
        });
        Self {
            observer: Arc::downgrade(observer) as Weak<Payload>,
            context,
            event_type: TypeId::of::<E>(),
            event_name: std::any::type_name::<E>(),
            deliver,
        }
    }

    /// True while the owning observer has not been dropped.
    #[inline]
    pub(crate) fn is_alive(&self) -> bool {
        self.observer.strong_count() > 0
    }

    /// Identity of the owning observer, as a thin data pointer.
    #[inline]
    pub(crate) fn owner_ptr(&self) -> *const () {
        self.observer.as_ptr() as *const ()
    }

    /// True when this subscription was registered for `event_type`.
    #[inline]
    pub(crate) fn matches(&self, event_type: TypeId) -> bool {
        self.event_type == event_type
    }

    #[inline]
    pub(crate) fn context(&self) -> &Context {
        &self.context
    }

    #[inline]
    pub(crate) fn event_name(&self) -> &'static str {
        self.event_name
    }

    /// Invokes the handler inline against an erased payload.
    #[inline]
    pub(crate) fn invoke(&self, payload: &Payload) {
        (self.deliver)(payload);
    }

    /// Packages one delivery for submission to an executor.
    pub(crate) fn job(&self, payload: &Arc<Payload>) -> Job {
        let deliver = Arc::clone(&self.deliver);
        let payload = Arc::clone(payload);
        Box::new(move || deliver(&*payload))
    }
}
