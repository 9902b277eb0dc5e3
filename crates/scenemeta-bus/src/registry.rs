// SPDX-FileCopyrightText: 2026 Scenemeta Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Generic multi-handler dispatch core.
//!
//! An [`EventBus`] keeps an ordered, copy-on-write list of handler slots.
//! Each slot holds a `Weak` reference to its handler; the bus never keeps a
//! handler alive. A broadcast loads a snapshot of the list without locking
//! and walks it in registration order, so handlers are free to connect or
//! disconnect (themselves included) while a broadcast is running.
//!
//! Every invocation holds a recursive read lock on the handler's slot and
//! re-checks the slot's connected flag under it. `disconnect` clears the
//! flag and then takes the slot's write lock, which waits out invocations
//! already running on other threads. Once `disconnect` returns the handler
//! is never called again.
//!
//! A thread that is itself inside a handler invocation never waits in
//! `disconnect`: two handlers disconnecting each other from two threads
//! would otherwise wait on each other forever. Such a disconnect only
//! clears the flag, so no new call starts, while a call already running on
//! another thread is left to finish.
//!
//! The broadcast's strong reference to a handler is released only after
//! the slot's read lock, so a handler that disconnects from its own `Drop`
//! never waits on a lock held by its own thread.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::Instant;

use arc_swap::ArcSwap;
use parking_lot::{Mutex, RwLock};
use scenemeta_core::SceneMetaError;
use tracing::{debug, error, warn};

use crate::options::BusOptions;
use crate::report::{panic_message, DispatchReport, HandlerFault};

/// Identifies one connection of a handler to a bus.
///
/// Ids are unique across every bus in the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HandlerId(u64);

impl HandlerId {
    fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        HandlerId(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    #[cfg(test)]
    pub(crate) fn from_raw(raw: u64) -> Self {
        HandlerId(raw)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for HandlerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "handler#{}", self.0)
    }
}

thread_local! {
    /// Slots currently being invoked on this thread, innermost last.
    static ACTIVE_DISPATCH: RefCell<Vec<HandlerId>> = const { RefCell::new(Vec::new()) };
}

/// Marks a slot as being invoked on the current thread for the guard's lifetime.
struct DispatchScope(HandlerId);

impl DispatchScope {
    fn enter(id: HandlerId) -> Self {
        ACTIVE_DISPATCH.with(|active| active.borrow_mut().push(id));
        DispatchScope(id)
    }

    fn is_active(id: HandlerId) -> bool {
        ACTIVE_DISPATCH.with(|active| active.borrow().contains(&id))
    }

    fn in_any_dispatch() -> bool {
        ACTIVE_DISPATCH.with(|active| !active.borrow().is_empty())
    }
}

impl Drop for DispatchScope {
    fn drop(&mut self) {
        ACTIVE_DISPATCH.with(|active| {
            let mut active = active.borrow_mut();
            if let Some(pos) = active.iter().rposition(|id| *id == self.0) {
                active.remove(pos);
            }
        });
    }
}

struct Slot<H: ?Sized> {
    id: HandlerId,
    label: String,
    handler: Weak<H>,
    connected: AtomicBool,
    in_flight: RwLock<()>,
}

impl<H: ?Sized> Slot<H> {
    fn points_to(&self, handler: &Arc<H>) -> bool {
        std::ptr::addr_eq(self.handler.as_ptr(), Arc::as_ptr(handler))
    }
}

type QueuedBroadcast<H> = (&'static str, Box<dyn FnMut(&H) + Send>);

struct BusInner<H: ?Sized> {
    name: &'static str,
    options: BusOptions,
    slots: ArcSwap<Vec<Arc<Slot<H>>>>,
    /// Serializes connect/disconnect so read-modify-write of `slots` is atomic.
    writer: Mutex<()>,
    queue: Mutex<VecDeque<QueuedBroadcast<H>>>,
}

/// A typed, in-process, multiple-handler event bus.
///
/// `H` is the handler capability set, usually a trait object such as
/// `dyn ManifestMetaInfoHandler`. Cloning an `EventBus` yields another
/// handle to the same registry.
pub struct EventBus<H: ?Sized + Send + Sync + 'static> {
    inner: Arc<BusInner<H>>,
}

impl<H: ?Sized + Send + Sync + 'static> Clone for EventBus<H> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<H: ?Sized + Send + Sync + 'static> fmt::Debug for EventBus<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("name", &self.inner.name)
            .field("handlers", &self.handler_count())
            .field("queued", &self.queued_len())
            .finish()
    }
}

impl<H: ?Sized + Send + Sync + 'static> EventBus<H> {
    /// Creates an empty bus. `name` only appears in logs.
    pub fn new(name: &'static str, options: BusOptions) -> Self {
        Self {
            inner: Arc::new(BusInner {
                name,
                options,
                slots: ArcSwap::from_pointee(Vec::new()),
                writer: Mutex::new(()),
                queue: Mutex::new(VecDeque::new()),
            }),
        }
    }

    pub fn name(&self) -> &'static str {
        self.inner.name
    }

    pub fn options(&self) -> &BusOptions {
        &self.inner.options
    }

    /// Registers `handler` at the end of the dispatch order.
    ///
    /// The bus keeps only a weak reference; the caller must keep the handler
    /// alive for as long as it should receive broadcasts. Connecting a
    /// handler that is already connected returns its existing id.
    pub fn connect(&self, handler: &Arc<H>, label: impl Into<String>) -> HandlerId {
        let _writer = self.inner.writer.lock();
        let current = self.inner.slots.load_full();

        if let Some(existing) = current.iter().find(|slot| slot.points_to(handler)) {
            debug!(
                bus = self.inner.name,
                handler = %existing.id,
                label = %existing.label,
                "handler already connected"
            );
            return existing.id;
        }

        let slot = Arc::new(Slot {
            id: HandlerId::next(),
            label: label.into(),
            handler: Arc::downgrade(handler),
            connected: AtomicBool::new(true),
            in_flight: RwLock::new(()),
        });
        let id = slot.id;

        let mut next = Vec::with_capacity(current.len() + 1);
        next.extend(current.iter().cloned());
        next.push(Arc::clone(&slot));
        self.inner.slots.store(Arc::new(next));

        debug!(
            bus = self.inner.name,
            handler = %id,
            label = %slot.label,
            total = current.len() + 1,
            "handler connected"
        );
        id
    }

    /// Removes a handler. Returns false if `id` was not connected.
    ///
    /// Blocks until invocations of this handler running on other threads
    /// have returned, unless the calling thread is itself inside a handler
    /// invocation. In that case the handler is only marked disconnected: it
    /// receives no new calls, but a call already running elsewhere may
    /// still be finishing when this returns.
    pub fn disconnect(&self, id: HandlerId) -> bool {
        let removed = {
            let _writer = self.inner.writer.lock();
            let current = self.inner.slots.load_full();
            let Some(pos) = current.iter().position(|slot| slot.id == id) else {
                return false;
            };
            let mut next = Vec::clone(&current);
            let removed = next.remove(pos);
            self.inner.slots.store(Arc::new(next));
            removed
        };

        removed.connected.store(false, Ordering::Release);
        if DispatchScope::is_active(id) {
            debug!(
                bus = self.inner.name,
                handler = %id,
                "handler disconnected from inside its own dispatch"
            );
        } else if DispatchScope::in_any_dispatch() {
            debug!(
                bus = self.inner.name,
                handler = %id,
                "handler disconnected from inside another dispatch, not waiting"
            );
        } else {
            drop(removed.in_flight.write());
        }

        debug!(
            bus = self.inner.name,
            handler = %id,
            label = %removed.label,
            "handler disconnected"
        );
        true
    }

    /// Disconnects every handler, returning how many were removed.
    pub fn disconnect_all(&self) -> usize {
        let ids: Vec<HandlerId> = self.inner.slots.load().iter().map(|s| s.id).collect();
        ids.into_iter().filter(|id| self.disconnect(*id)).count()
    }

    pub fn is_connected(&self, id: HandlerId) -> bool {
        self.inner.slots.load().iter().any(|slot| slot.id == id)
    }

    /// Number of connected handlers, including any whose handler has been
    /// dropped but not yet pruned.
    pub fn handler_count(&self) -> usize {
        self.inner.slots.load().len()
    }

    pub fn has_handlers(&self) -> bool {
        self.handler_count() > 0
    }

    /// Calls `f` on every connected handler in registration order.
    ///
    /// The handler set is fixed when the broadcast starts: handlers connected
    /// during the broadcast are not called, handlers disconnected before
    /// their turn are skipped.
    pub fn broadcast<F>(&self, operation: &'static str, mut f: F) -> DispatchReport
    where
        F: FnMut(&H),
    {
        self.dispatch(operation, |handler| {
            panic::catch_unwind(AssertUnwindSafe(|| f(handler)))
        })
    }

    /// Like [`broadcast`](Self::broadcast), threading an out-parameter
    /// through every handler.
    ///
    /// `checkpoint` captures `state` before each invocation. If the handler
    /// panics, `restore` puts `state` back, so a faulting handler leaves no
    /// partial contribution behind.
    pub fn broadcast_with_rollback<T, C, F>(
        &self,
        operation: &'static str,
        state: &mut T,
        checkpoint: impl Fn(&T) -> C,
        restore: impl Fn(&mut T, C),
        mut f: F,
    ) -> DispatchReport
    where
        T: ?Sized,
        F: FnMut(&H, &mut T),
    {
        self.dispatch(operation, |handler| {
            let saved = checkpoint(&*state);
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| f(handler, &mut *state)));
            if outcome.is_err() {
                restore(&mut *state, saved);
            }
            outcome
        })
    }

    fn dispatch<F>(&self, operation: &'static str, mut invoke: F) -> DispatchReport
    where
        F: FnMut(&H) -> std::thread::Result<()>,
    {
        let snapshot = self.inner.slots.load_full();
        let mut report = DispatchReport::new(operation);
        let mut saw_dead = false;

        for slot in snapshot.iter() {
            // Outlives the slot lock below; see the module docs.
            let mut upgraded: Option<Arc<H>> = None;
            let _in_flight = slot.in_flight.read_recursive();
            if !slot.connected.load(Ordering::Acquire) {
                report.skipped += 1;
                continue;
            }
            let Some(handler) = slot.handler.upgrade() else {
                saw_dead = true;
                report.skipped += 1;
                continue;
            };
            let handler = upgraded.insert(handler);

            let _scope = DispatchScope::enter(slot.id);
            let started = Instant::now();
            let outcome = invoke(&**handler);
            let elapsed = started.elapsed();

            if let Some(threshold) = self.inner.options.slow_handler_warn {
                if elapsed > threshold {
                    warn!(
                        bus = self.inner.name,
                        handler = %slot.id,
                        label = %slot.label,
                        operation,
                        elapsed_ms = elapsed.as_millis() as u64,
                        "slow handler"
                    );
                }
            }

            match outcome {
                Ok(()) => report.delivered += 1,
                Err(payload) => {
                    let fault = HandlerFault {
                        handler: slot.id,
                        label: slot.label.clone(),
                        operation,
                        message: panic_message(payload.as_ref()),
                    };
                    error!(
                        bus = self.inner.name,
                        handler = %fault.handler,
                        label = %fault.label,
                        operation,
                        message = %fault.message,
                        "handler panicked"
                    );
                    if !self.inner.options.isolate_faults {
                        panic::resume_unwind(payload);
                    }
                    report.faults.push(fault);
                }
            }
        }

        if saw_dead {
            self.prune_dead();
        }

        debug!(
            bus = self.inner.name,
            operation,
            delivered = report.delivered,
            skipped = report.skipped,
            faults = report.faults.len(),
            "broadcast complete"
        );
        report
    }

    /// Defers a broadcast until [`execute_queued_events`](Self::execute_queued_events).
    pub fn queue_broadcast<F>(&self, operation: &'static str, f: F) -> Result<(), SceneMetaError>
    where
        F: FnMut(&H) + Send + 'static,
    {
        let mut queue = self.inner.queue.lock();
        let capacity = self.inner.options.max_queued_events;
        if queue.len() >= capacity {
            warn!(bus = self.inner.name, operation, capacity, "event queue full");
            return Err(SceneMetaError::QueueFull { capacity });
        }
        queue.push_back((operation, Box::new(f)));
        Ok(())
    }

    /// Dispatches every broadcast queued before this call, oldest first.
    ///
    /// Broadcasts queued by handlers while this runs stay queued for the
    /// next call.
    pub fn execute_queued_events(&self) -> Vec<DispatchReport> {
        let pending = std::mem::take(&mut *self.inner.queue.lock());
        pending
            .into_iter()
            .map(|(operation, mut f)| self.broadcast(operation, |h| f(h)))
            .collect()
    }

    pub fn queued_len(&self) -> usize {
        self.inner.queue.lock().len()
    }

    /// Drops every pending queued broadcast without dispatching it.
    pub fn clear_queued_events(&self) -> usize {
        let mut queue = self.inner.queue.lock();
        let dropped = queue.len();
        queue.clear();
        dropped
    }

    fn prune_dead(&self) {
        let _writer = self.inner.writer.lock();
        let current = self.inner.slots.load_full();
        let (live, dead): (Vec<_>, Vec<_>) = current
            .iter()
            .cloned()
            .partition(|slot| slot.handler.strong_count() > 0);
        if dead.is_empty() {
            return;
        }
        for slot in &dead {
            slot.connected.store(false, Ordering::Release);
            warn!(
                bus = self.inner.name,
                handler = %slot.id,
                label = %slot.label,
                "handler dropped without disconnecting"
            );
        }
        self.inner.slots.store(Arc::new(live));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    trait Counter: Send + Sync {
        fn hit(&self);
    }

    #[derive(Default)]
    struct Hits(AtomicUsize);

    impl Counter for Hits {
        fn hit(&self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    impl Hits {
        fn count(&self) -> usize {
            self.0.load(Ordering::SeqCst)
        }
    }

    fn bus() -> EventBus<dyn Counter> {
        EventBus::new("test", BusOptions::default())
    }

    fn erased(h: &Arc<Hits>) -> Arc<dyn Counter> {
        h.clone()
    }

    #[test]
    fn connect_twice_does_not_duplicate_delivery() {
        let bus = bus();
        let hits = Arc::new(Hits::default());
        let handler = erased(&hits);

        let first = bus.connect(&handler, "hits");
        let second = bus.connect(&handler, "hits");
        assert_eq!(first, second);
        assert_eq!(bus.handler_count(), 1);

        let report = bus.broadcast("hit", |h| h.hit());
        assert_eq!(report.delivered, 1);
        assert_eq!(hits.count(), 1);
    }

    #[test]
    fn disconnect_unknown_id_returns_false() {
        let bus = bus();
        assert!(!bus.disconnect(HandlerId::from_raw(u64::MAX)));
    }

    #[test]
    fn dropped_handler_is_skipped_and_pruned() {
        let bus = bus();
        let hits = Arc::new(Hits::default());
        let handler = erased(&hits);
        bus.connect(&handler, "kept");
        {
            let gone: Arc<dyn Counter> = Arc::new(Hits::default());
            bus.connect(&gone, "gone");
        }
        assert_eq!(bus.handler_count(), 2);

        let report = bus.broadcast("hit", |h| h.hit());
        assert_eq!(report.delivered, 1);
        assert_eq!(report.skipped, 1);
        assert_eq!(bus.handler_count(), 1);
    }

    #[test]
    fn disconnect_all_empties_registry() {
        let bus = bus();
        let a = erased(&Arc::new(Hits::default()));
        let b = erased(&Arc::new(Hits::default()));
        bus.connect(&a, "a");
        bus.connect(&b, "b");
        assert_eq!(bus.disconnect_all(), 2);
        assert!(!bus.has_handlers());
    }

    #[test]
    fn clones_share_the_registry() {
        let bus = bus();
        let other = bus.clone();
        let hits = Arc::new(Hits::default());
        let id = other.connect(&erased(&hits), "hits");
        assert!(bus.is_connected(id));
        bus.broadcast("hit", |h| h.hit());
        assert_eq!(hits.count(), 1);
    }

    #[test]
    fn dispatch_scope_tracks_nesting() {
        let outer = HandlerId::from_raw(1_000_001);
        let inner = HandlerId::from_raw(1_000_002);
        let a = DispatchScope::enter(outer);
        {
            let _b = DispatchScope::enter(inner);
            assert!(DispatchScope::is_active(outer));
            assert!(DispatchScope::is_active(inner));
        }
        assert!(!DispatchScope::is_active(inner));
        drop(a);
        assert!(!DispatchScope::is_active(outer));
    }

    struct Faulty;

    impl Counter for Faulty {
        fn hit(&self) {
            panic!("counter broke");
        }
    }

    #[test]
    #[tracing_test::traced_test]
    fn fault_is_logged_and_recorded() {
        let bus = bus();
        let faulty: Arc<dyn Counter> = Arc::new(Faulty);
        let hits = Arc::new(Hits::default());
        bus.connect(&faulty, "faulty");
        bus.connect(&erased(&hits), "hits");

        let report = bus.broadcast("hit", |h| h.hit());
        assert_eq!(report.faults.len(), 1);
        assert_eq!(report.faults[0].message, "counter broke");
        assert_eq!(hits.count(), 1);
        assert!(logs_contain("handler panicked"));
        assert!(logs_contain("counter broke"));
    }

    #[test]
    fn rollback_discards_only_the_faulting_contribution() {
        let bus = bus();
        let first = Arc::new(Hits::default());
        let faulty: Arc<dyn Counter> = Arc::new(Faulty);
        let last = Arc::new(Hits::default());
        bus.connect(&erased(&first), "first");
        bus.connect(&faulty, "faulty");
        bus.connect(&erased(&last), "last");

        let mut seen: Vec<&str> = vec!["seed"];
        let report = bus.broadcast_with_rollback(
            "hit",
            &mut seen,
            |seen| seen.len(),
            |seen, len| seen.truncate(len),
            |h, seen| {
                seen.push("hit");
                h.hit();
            },
        );
        assert_eq!(report.faults.len(), 1);
        assert_eq!(report.delivered, 2);
        assert_eq!(seen, ["seed", "hit", "hit"]);
    }

    struct Sluggish;

    impl Counter for Sluggish {
        fn hit(&self) {
            std::thread::sleep(std::time::Duration::from_millis(5));
        }
    }

    #[test]
    #[tracing_test::traced_test]
    fn slow_handler_is_logged() {
        let bus: EventBus<dyn Counter> = EventBus::new(
            "slow",
            BusOptions {
                slow_handler_warn: Some(std::time::Duration::from_millis(1)),
                ..BusOptions::default()
            },
        );
        let sluggish: Arc<dyn Counter> = Arc::new(Sluggish);
        bus.connect(&sluggish, "sluggish");
        bus.broadcast("hit", |h| h.hit());
        assert!(logs_contain("slow handler"));
    }

    #[test]
    fn queued_broadcasts_run_oldest_first() {
        let bus = bus();
        let hits = Arc::new(Hits::default());
        let handler = erased(&hits);
        bus.connect(&handler, "hits");

        let order = Arc::new(Mutex::new(Vec::new()));
        for n in 0..3 {
            let order = Arc::clone(&order);
            bus.queue_broadcast("hit", move |h| {
                h.hit();
                order.lock().push(n);
            })
            .unwrap();
        }
        assert_eq!(hits.count(), 0);

        let reports = bus.execute_queued_events();
        assert_eq!(reports.len(), 3);
        assert_eq!(*order.lock(), [0, 1, 2]);
        assert_eq!(hits.count(), 3);
        assert!(bus.execute_queued_events().is_empty());
    }

    #[test]
    fn queue_respects_capacity() {
        let bus: EventBus<dyn Counter> = EventBus::new(
            "queued",
            BusOptions {
                max_queued_events: 2,
                ..BusOptions::default()
            },
        );
        bus.queue_broadcast("hit", |h| h.hit()).unwrap();
        bus.queue_broadcast("hit", |h| h.hit()).unwrap();
        let err = bus.queue_broadcast("hit", |h| h.hit()).unwrap_err();
        assert!(matches!(err, SceneMetaError::QueueFull { capacity: 2 }));
        assert_eq!(bus.clear_queued_events(), 2);
        assert_eq!(bus.queued_len(), 0);
    }
}
