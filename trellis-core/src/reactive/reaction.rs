//! Reaction Implementation
//!
//! A Reaction is a side-effecting computation that runs whenever its
//! dependencies change. Reactions are how reactive values reach the DOM:
//! every reactive child, class list or attribute is kept current by one.
//!
//! # How Reactions Work
//!
//! 1. When created, the reaction runs its function immediately to establish
//!    initial dependencies.
//!
//! 2. When any dependency changes, the runtime schedules it to re-run.
//!
//! 3. Before re-running, the reaction disposes whatever its previous run
//!    created (nested reactions, cleanups), clears its old dependencies, and
//!    tracks new ones during execution.
//!
//! # Re-entrancy
//!
//! A reaction triggered while it is already running (for example because it
//! wrote a signal it also reads) does not recurse. The trigger is remembered
//! and the reaction makes another pass once the current one finishes, up to
//! `Config::max_reaction_reruns` extra passes.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use super::context::ReactiveContext;
use super::owner::{self, Scope};
use super::runtime::{Reactive, ReactiveHandle, Runtime};
use super::subscriber::SubscriberId;

struct ReactionInner {
    subscriber_id: SubscriberId,
    run: Box<dyn Fn() + Send + Sync>,
    /// Everything created by the most recent run.
    scope: Arc<Scope>,
    disposed: AtomicBool,
    running: AtomicBool,
    rerun: AtomicBool,
    run_count: AtomicUsize,
    dependency_count: AtomicUsize,
    handle: Mutex<Option<ReactiveHandle>>,
}

/// A computation that re-runs when the signals it read change.
///
/// # Example
///
/// ```rust,ignore
/// let count = Signal::new(0);
///
/// let reaction = Reaction::new({
///     let count = count.clone();
///     move || println!("Count is: {}", count.get())
/// });
///
/// count.set(5);  // Prints: "Count is: 5"
/// ```
#[derive(Clone)]
pub struct Reaction {
    inner: Arc<ReactionInner>,
}

impl Reaction {
    /// Create a reaction and run it immediately.
    ///
    /// The reaction lives as long as some clone of it does. Use
    /// [`use_reaction`] to hand it to the current owner instead.
    pub fn new<F>(run: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        let reaction = Self::new_lazy(run);
        reaction.execute();
        reaction
    }

    /// Create a reaction without running it.
    pub fn new_lazy<F>(run: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        let inner = Arc::new(ReactionInner {
            subscriber_id: SubscriberId::new(),
            run: Box::new(run),
            scope: Scope::new(),
            disposed: AtomicBool::new(false),
            running: AtomicBool::new(false),
            rerun: AtomicBool::new(false),
            run_count: AtomicUsize::new(0),
            dependency_count: AtomicUsize::new(0),
            handle: Mutex::new(None),
        });

        let handle = Runtime::register(inner.clone() as Arc<dyn Reactive>);
        *inner.handle.lock() = Some(handle);

        Self { inner }
    }

    /// Get the subscriber ID for this reaction.
    pub fn subscriber_id(&self) -> SubscriberId {
        self.inner.subscriber_id
    }

    /// Run the reaction now, tracking what it reads.
    pub fn execute(&self) {
        self.inner.execute();
    }

    /// Stop the reaction and dispose everything it owns.
    pub fn dispose(&self) {
        self.inner.dispose();
    }

    /// Check if the reaction has been disposed.
    pub fn is_disposed(&self) -> bool {
        self.inner.disposed.load(Ordering::SeqCst)
    }

    /// Get the number of times the reaction has run.
    pub fn run_count(&self) -> usize {
        self.inner.run_count.load(Ordering::SeqCst)
    }

    /// Get the number of distinct signals read by the last run.
    pub fn dependency_count(&self) -> usize {
        self.inner.dependency_count.load(Ordering::SeqCst)
    }

    /// Number of reactions created by the last run and still alive.
    pub fn owned_count(&self) -> usize {
        self.inner.scope.reaction_count()
    }
}

impl ReactionInner {
    fn execute(&self) {
        if self.disposed.load(Ordering::SeqCst) {
            return;
        }
        if self.running.swap(true, Ordering::SeqCst) {
            self.rerun.store(true, Ordering::SeqCst);
            return;
        }
        let _running = Running(&self.running);

        let budget = crate::config::config().max_reaction_reruns;
        let mut passes = 0;

        loop {
            self.run_once();

            if !self.rerun.swap(false, Ordering::SeqCst) || self.disposed.load(Ordering::SeqCst) {
                break;
            }
            passes += 1;
            if passes > budget {
                tracing::error!(
                    subscriber = self.subscriber_id.raw(),
                    budget,
                    "reaction kept re-triggering itself, giving up"
                );
                break;
            }
        }
    }

    fn run_once(&self) {
        self.scope.dispose();
        Runtime::clear_dependencies(self.subscriber_id);

        tracing::trace!(subscriber = self.subscriber_id.raw(), "running reaction");

        let dependencies = self.scope.run(|| {
            let _ctx = ReactiveContext::enter(self.subscriber_id);
            (self.run)();
            ReactiveContext::get_dependencies()
        });

        self.dependency_count.store(dependencies.len(), Ordering::SeqCst);
        self.run_count.fetch_add(1, Ordering::SeqCst);
    }

    fn dispose(&self) {
        if self.disposed.swap(true, Ordering::SeqCst) {
            return;
        }
        self.scope.dispose();
        Runtime::clear_dependencies(self.subscriber_id);
        self.handle.lock().take();
    }
}

/// Clears the running flag on drop, so a panicking run does not leave the
/// reaction stuck.
struct Running<'a>(&'a AtomicBool);

impl Drop for Running<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl Drop for ReactionInner {
    fn drop(&mut self) {
        self.scope.dispose();
    }
}

impl Reactive for ReactionInner {
    fn subscriber_id(&self) -> SubscriberId {
        self.subscriber_id
    }

    fn schedule(&self) {
        self.execute();
    }
}

impl std::fmt::Debug for Reaction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reaction")
            .field("subscriber_id", &self.subscriber_id())
            .field("run_count", &self.run_count())
            .field("dependency_count", &self.dependency_count())
            .field("disposed", &self.is_disposed())
            .finish()
    }
}

/// Create a reaction owned by the current owner and run it immediately.
///
/// The reaction is disposed when its owner re-runs or is disposed. Outside
/// of any owner it is kept alive on this thread until
/// [`Root::adopt_detached`](super::Root::adopt_detached) hands it to a root.
pub fn use_reaction<F>(run: F)
where
    F: Fn() + Send + Sync + 'static,
{
    let reaction = Reaction::new_lazy(run);
    owner::adopt(reaction.clone());
    reaction.execute();
}
