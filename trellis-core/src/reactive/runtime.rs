//! Reactive Runtime
//!
//! The runtime is the central coordinator that connects signals and
//! reactions. It records the dependency edges and schedules reactions when
//! signals change.
//!
//! # How It Works
//!
//! 1. When a reaction is created, it registers with the runtime.
//!
//! 2. When a reaction reads a signal, the runtime records the dependency.
//!
//! 3. When a signal's value changes, the runtime:
//!    a. Finds all dependent reactions, in subscription order
//!    b. Runs them right away, or queues them if a [`batch`] is open
//!
//! # Batching
//!
//! Inside [`batch`], notifications are queued per subscriber. A reaction
//! that depends on several signals changed in the same batch runs once when
//! the outermost batch closes.
//!
//! # Thread Safety
//!
//! The registry is global and concurrent (`DashMap`), so signals may be
//! shared across threads. Tracking and batching state is thread-local.
//! No map guard is held while a reaction runs: reactions read signals, and
//! reads write back into these maps.

use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::sync::{Arc, OnceLock, Weak};

use dashmap::DashMap;
use indexmap::{IndexMap, IndexSet};

use super::context::ReactiveContext;
use super::subscriber::SubscriberId;

/// A trait for computations the runtime can re-run.
pub trait Reactive: Send + Sync {
    /// Get the subscriber ID for this computation.
    fn subscriber_id(&self) -> SubscriberId;

    /// Run the computation again because a dependency changed.
    fn schedule(&self);
}

/// Handle to a registered reactive value.
///
/// Dropping this handle unregisters the reactive value from the runtime.
pub struct ReactiveHandle {
    subscriber_id: SubscriberId,
}

impl Drop for ReactiveHandle {
    fn drop(&mut self) {
        Runtime::unregister(self.subscriber_id);
    }
}

/// The global reactive runtime.
pub struct Runtime;

// Registered computations. Weak so the registry never keeps one alive.
static REGISTRY: OnceLock<DashMap<SubscriberId, Weak<dyn Reactive>>> = OnceLock::new();
// signal id -> subscribers, in the order they first subscribed.
static SIGNAL_SUBSCRIBERS: OnceLock<DashMap<u64, IndexSet<SubscriberId>>> = OnceLock::new();
// subscriber -> signal ids, so clearing a subscriber does not scan every signal.
static SUBSCRIBER_SIGNALS: OnceLock<DashMap<SubscriberId, HashSet<u64>>> = OnceLock::new();

thread_local! {
    static BATCH_DEPTH: Cell<usize> = const { Cell::new(0) };
    static PENDING: RefCell<IndexMap<SubscriberId, Arc<dyn Reactive>>> = RefCell::new(IndexMap::new());
}

fn get_registry() -> &'static DashMap<SubscriberId, Weak<dyn Reactive>> {
    REGISTRY.get_or_init(DashMap::new)
}

fn get_signal_subscribers() -> &'static DashMap<u64, IndexSet<SubscriberId>> {
    SIGNAL_SUBSCRIBERS.get_or_init(DashMap::new)
}

fn get_subscriber_signals() -> &'static DashMap<SubscriberId, HashSet<u64>> {
    SUBSCRIBER_SIGNALS.get_or_init(DashMap::new)
}

impl Runtime {
    /// Register a reactive value with the runtime.
    ///
    /// Returns a handle that unregisters the value when dropped.
    pub fn register(reactive: Arc<dyn Reactive>) -> ReactiveHandle {
        let id = reactive.subscriber_id();
        get_registry().insert(id, Arc::downgrade(&reactive));
        ReactiveHandle { subscriber_id: id }
    }

    fn unregister(id: SubscriberId) {
        get_registry().remove(&id);
        Self::clear_dependencies(id);
    }

    /// Record that a subscriber depends on a signal.
    ///
    /// Called automatically when a signal is read within a reactive context.
    pub fn add_dependency(signal_id: u64, subscriber_id: SubscriberId) {
        get_signal_subscribers()
            .entry(signal_id)
            .or_default()
            .insert(subscriber_id);
        get_subscriber_signals()
            .entry(subscriber_id)
            .or_default()
            .insert(signal_id);
    }

    /// Remove all dependencies for a subscriber.
    ///
    /// Called before re-running a computation to clear stale dependencies.
    pub fn clear_dependencies(subscriber_id: SubscriberId) {
        let Some((_, signals)) = get_subscriber_signals().remove(&subscriber_id) else {
            return;
        };

        let subscribers = get_signal_subscribers();
        for signal_id in signals {
            let now_empty = match subscribers.get_mut(&signal_id) {
                Some(mut subs) => {
                    subs.shift_remove(&subscriber_id);
                    subs.is_empty()
                }
                None => false,
            };
            if now_empty {
                subscribers.remove_if(&signal_id, |_, subs| subs.is_empty());
            }
        }
    }

    /// Number of subscribers currently depending on a signal.
    pub fn subscriber_count(signal_id: u64) -> usize {
        get_signal_subscribers()
            .get(&signal_id)
            .map(|subs| subs.len())
            .unwrap_or(0)
    }

    /// Notify all subscribers that a signal changed.
    ///
    /// This is the core update propagation mechanism.
    pub fn notify_signal_change(signal_id: u64) {
        let subscriber_ids: Vec<SubscriberId> = match get_signal_subscribers().get(&signal_id) {
            Some(subs) => subs.iter().copied().collect(),
            None => return,
        };

        let reactives: Vec<Arc<dyn Reactive>> = {
            let registry = get_registry();
            subscriber_ids
                .into_iter()
                .filter_map(|id| registry.get(&id).and_then(|weak| weak.upgrade()))
                .collect()
        };

        if BATCH_DEPTH.with(Cell::get) > 0 {
            PENDING.with(|pending| {
                let mut pending = pending.borrow_mut();
                for reactive in reactives {
                    pending.entry(reactive.subscriber_id()).or_insert(reactive);
                }
            });
            return;
        }

        for reactive in reactives {
            reactive.schedule();
        }
    }

    /// Get the current subscriber being tracked, if any.
    pub fn current_subscriber() -> Option<SubscriberId> {
        ReactiveContext::current_subscriber()
    }

    /// Whether a signal read right now would subscribe someone.
    pub fn is_tracking() -> bool {
        ReactiveContext::current_subscriber().is_some()
    }

    /// Check if a batch is open on this thread.
    pub fn is_batching() -> bool {
        BATCH_DEPTH.with(Cell::get) > 0
    }

    fn flush() {
        while let Some((_, reactive)) = PENDING.with(|pending| pending.borrow_mut().shift_remove_index(0)) {
            reactive.schedule();
        }
    }
}

/// Run `f` with notifications deferred until it returns.
///
/// Each affected reaction runs once after the outermost batch closes, no
/// matter how many of its dependencies changed inside it.
pub fn batch<R>(f: impl FnOnce() -> R) -> R {
    struct Depth;

    impl Drop for Depth {
        fn drop(&mut self) {
            BATCH_DEPTH.with(|depth| depth.set(depth.get() - 1));
        }
    }

    BATCH_DEPTH.with(|depth| depth.set(depth.get() + 1));
    let result = {
        let _depth = Depth;
        f()
    };

    if BATCH_DEPTH.with(Cell::get) == 0 {
        Runtime::flush();
    }
    result
}
